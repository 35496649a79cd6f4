//! Discovery through evaluation against a recording backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use index_schema::configuration::TypeMapping;
use index_schema::resolver::keyword_name_for_path;
use index_schema::types::{BackendResponse, CreateIndexRequest};
use index_schema::{
    apply_index_configurations, configure_connection_settings, discover, field,
    register_configuration, BackendError, ConfigureDocument, ConnectionSettings, Document,
    EntityConfigBuilder, EvaluationState, IndexBackend, IndexEvaluator, InventoryUniverse,
    TypeUniverse,
};

#[allow(dead_code)]
#[derive(Document)]
struct Address {
    street: String,
    city: String,
}

#[allow(dead_code)]
#[derive(Document)]
struct UserProfile {
    id: String,
    display_name: String,
    addresses: Vec<Address>,
    password_hash: String,
}

#[derive(Default)]
struct UserProfileConfiguration;

impl ConfigureDocument<UserProfile> for UserProfileConfiguration {
    fn configure(
        &self,
        builder: EntityConfigBuilder<UserProfile>,
        prefix: Option<&str>,
    ) -> EntityConfigBuilder<UserProfile> {
        builder
            .to_index(prefix)
            .has_key(field!(UserProfile => id))
            .ignores(vec![field!(UserProfile => password_hash)])
            .properties(|p| {
                p.keyword("id")
                    .text_with_keyword("display_name")
                    .nested::<Address>("addresses", |a| {
                        a.text("street").keyword("city");
                    });
            })
    }
}

register_configuration!(UserProfileConfiguration => UserProfile);

#[derive(Default)]
struct RecordingBackend {
    created: Mutex<Vec<(String, CreateIndexRequest)>>,
    updated: Mutex<Vec<String>>,
}

#[async_trait]
impl IndexBackend for RecordingBackend {
    async fn ping(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    async fn index_exists(&self, _name: &str) -> Result<bool, BackendError> {
        Ok(false)
    }

    async fn create_index(
        &self,
        name: &str,
        request: &CreateIndexRequest,
    ) -> Result<BackendResponse, BackendError> {
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), request.clone()));
        Ok(BackendResponse::success(200))
    }

    async fn put_mapping(
        &self,
        name: &str,
        _mapping: &TypeMapping,
    ) -> Result<BackendResponse, BackendError> {
        self.updated.lock().unwrap().push(name.to_string());
        Ok(BackendResponse::success(200))
    }
}

/// Only the declarations made in this test binary.
struct ThisTestOnly;

impl TypeUniverse for ThisTestOnly {
    fn registrations(
        &self,
    ) -> Box<dyn Iterator<Item = &index_schema::discovery::Registration> + Send + '_> {
        let inventory: &'static InventoryUniverse = &InventoryUniverse;
        Box::new(
            inventory
                .registrations()
                .filter(|r| r.entity_type().is::<UserProfile>()),
        )
    }
}

#[tokio::test]
async fn test_discovered_configuration_creates_index() {
    let backend = Arc::new(RecordingBackend::default());
    let evaluator = IndexEvaluator::new(backend.clone());

    let summary = apply_index_configurations(&evaluator, discover(&ThisTestOnly, None))
        .await
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.created, 1);
    assert!(summary.is_success());
    assert_eq!(summary.reports[0].state, EvaluationState::Created);

    let created = backend.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let (name, request) = &created[0];
    assert_eq!(name, "user_profile");
    assert!(request.settings.is_none());
    assert_eq!(request.mappings.properties["addresses"]["type"], "nested");
    assert_eq!(
        request.to_body()["mappings"]["properties"]["display_name"]["fields"]["keyword"]["type"],
        "keyword"
    );
    assert!(backend.updated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_prefix_flows_into_index_name() {
    let backend = Arc::new(RecordingBackend::default());
    let evaluator = IndexEvaluator::new(backend.clone());

    apply_index_configurations(&evaluator, discover(&ThisTestOnly, Some("Tenant42")))
        .await
        .unwrap();

    let created = backend.created.lock().unwrap();
    assert_eq!(created[0].0, "tenant_42_user_profile");
}

#[test]
fn test_connection_settings_from_discovery() {
    let discovered: Vec<_> = discover(&ThisTestOnly, None)
        .collect::<Result<_, _>>()
        .unwrap();
    let mut settings = ConnectionSettings::parse("http://localhost:9200").unwrap();

    configure_connection_settings(&mut settings, &discovered).unwrap();

    assert_eq!(settings.default_index::<UserProfile>(), Some("user_profile"));
    assert_eq!(settings.id_field::<UserProfile>(), Some("id"));
    assert_eq!(
        settings.ignored_fields::<UserProfile>(),
        &["password_hash".to_string()]
    );
}

#[test]
fn test_keyword_names_for_queries() {
    assert_eq!(
        keyword_name_for_path::<UserProfile>("DisplayName").ok(),
        None,
        "snake_case field names are not matched by PascalCase paths"
    );
    assert_eq!(
        keyword_name_for_path::<UserProfile>("display_name").unwrap(),
        "display_name.keyword"
    );
    assert_eq!(
        keyword_name_for_path::<UserProfile>("addresses.CITY").unwrap(),
        "city.keyword"
    );
}
