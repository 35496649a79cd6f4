//! Configuration discovery.
//!
//! Declaring types implement [`ConfigureDocument<T>`] and register themselves
//! with [`register_configuration!`](crate::register_configuration). Discovery
//! walks a [`TypeUniverse`], instantiates each declaring type, runs its
//! `configure` routine against a fresh builder for `T`, and yields the
//! populated configuration with `T` erased.
//!
//! Every declaration is processed independently. Two declarations targeting
//! the same entity type produce two configurations.

mod registry;

pub use registry::{InventoryUniverse, Registration, TypeRegistry, TypeUniverse};

use std::any::{type_name, TypeId};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::configuration::{EntityConfigBuilder, EntityConfiguration};
use crate::document::Document;
use crate::errors::DiscoveryError;
use crate::evaluator::ErasedConfiguration;

/// Capability of a declaring type: populating the configuration of `T`.
///
/// A declaring type may implement this for several entity types; each
/// implementation is registered and discovered separately.
pub trait ConfigureDocument<T: Document> {
    fn configure(
        &self,
        builder: EntityConfigBuilder<T>,
        prefix: Option<&str>,
    ) -> EntityConfigBuilder<T>;
}

/// Runtime tag for an entity type.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    path: &'static str,
}

impl EntityType {
    pub fn of<T: Document>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::TYPE_NAME,
            path: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name used for index naming.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn is<T: Document>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityType").field(&self.path).finish()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A populated configuration paired with the entity type it governs.
pub struct DiscoveredConfiguration {
    entity_type: EntityType,
    declaring_type: &'static str,
    configuration: Box<dyn ErasedConfiguration>,
}

impl DiscoveredConfiguration {
    pub fn new<T: Document>(
        declaring_type: &'static str,
        configuration: EntityConfiguration<T>,
    ) -> Self {
        Self {
            entity_type: EntityType::of::<T>(),
            declaring_type,
            configuration: Box::new(configuration),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    /// The configuration with its entity type erased.
    pub fn configuration(&self) -> &dyn ErasedConfiguration {
        self.configuration.as_ref()
    }

    /// Recover the typed configuration if `T` is the governed entity type.
    pub fn downcast_ref<T: Document>(&self) -> Option<&EntityConfiguration<T>> {
        self.configuration
            .as_any()
            .downcast_ref::<EntityConfiguration<T>>()
    }
}

impl fmt::Debug for DiscoveredConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredConfiguration")
            .field("entity_type", &self.entity_type)
            .field("declaring_type", &self.declaring_type)
            .finish_non_exhaustive()
    }
}

/// Discover every registered configuration in a universe.
///
/// The returned iterator is lazy: each declaration is instantiated and
/// configured only when the iterator reaches it, in the universe's order.
/// A declaration that fails to instantiate yields an `Err` without ending
/// the scan.
pub fn discover<'a, U>(
    universe: &'a U,
    prefix: Option<&'a str>,
) -> impl Iterator<Item = Result<DiscoveredConfiguration, DiscoveryError>> + Send + 'a
where
    U: TypeUniverse + ?Sized,
{
    universe.registrations().map(move |registration| {
        debug!(
            declaring_type = registration.declaring_type(),
            entity = %registration.entity_type(),
            "Discovering configuration"
        );
        registration.discover(prefix)
    })
}

/// Instantiate a declaring type and run it against a fresh builder for `T`.
///
/// This is what registrations call; it is public so the registration macros
/// can name it.
pub fn discover_declaration<D, T, F, E>(
    declaring_type: &'static str,
    construct: F,
    prefix: Option<&str>,
) -> Result<DiscoveredConfiguration, DiscoveryError>
where
    D: ConfigureDocument<T>,
    T: Document,
    F: FnOnce() -> Result<D, E>,
    E: fmt::Display,
{
    let builder = EntityConfigBuilder::<T>::new();
    let declaration = construct().map_err(|e| {
        DiscoveryError::instantiation(declaring_type, T::TYPE_NAME, e.to_string())
    })?;

    let builder = declaration.configure(builder, prefix);

    Ok(DiscoveredConfiguration::new(declaring_type, builder.build()))
}

/// Constructor used for declaring types registered without one.
pub fn default_constructor<D: Default>() -> Result<D, Infallible> {
    Ok(D::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field, registration, Document};

    #[allow(dead_code)]
    #[derive(Document)]
    struct UserProfile {
        id: String,
        name: String,
        secret: String,
    }

    #[allow(dead_code)]
    #[derive(Document)]
    struct Order {
        number: String,
        total: f64,
    }

    #[allow(dead_code)]
    #[derive(Document)]
    struct Invoice {
        number: String,
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
                .properties(|p| {
                    p.keyword("id").text_with_keyword("name");
                })
                .ignores(vec![field!(UserProfile => secret)])
        }
    }

    #[derive(Default)]
    struct OrderConfiguration;

    impl ConfigureDocument<Order> for OrderConfiguration {
        fn configure(
            &self,
            builder: EntityConfigBuilder<Order>,
            prefix: Option<&str>,
        ) -> EntityConfigBuilder<Order> {
            builder
                .to_index(prefix)
                .properties(|p| {
                    p.keyword("number");
                })
                .settings(|s| {
                    s.number_of_shards(3);
                })
        }
    }

    /// One declaring type covering two entity types.
    #[derive(Default)]
    struct BillingConfiguration;

    impl ConfigureDocument<Order> for BillingConfiguration {
        fn configure(
            &self,
            builder: EntityConfigBuilder<Order>,
            _prefix: Option<&str>,
        ) -> EntityConfigBuilder<Order> {
            builder.to_index(Some("Billing"))
        }
    }

    impl ConfigureDocument<Invoice> for BillingConfiguration {
        fn configure(
            &self,
            builder: EntityConfigBuilder<Invoice>,
            _prefix: Option<&str>,
        ) -> EntityConfigBuilder<Invoice> {
            builder.to_index(Some("Billing"))
        }
    }

    struct NeedsSecrets;

    impl NeedsSecrets {
        fn from_vault() -> Result<Self, String> {
            Err("vault unavailable".to_string())
        }
    }

    impl ConfigureDocument<Invoice> for NeedsSecrets {
        fn configure(
            &self,
            builder: EntityConfigBuilder<Invoice>,
            _prefix: Option<&str>,
        ) -> EntityConfigBuilder<Invoice> {
            builder
        }
    }

    #[test]
    fn test_discovers_each_declaration() {
        let registry = TypeRegistry::new()
            .with(registration!(UserProfileConfiguration => UserProfile))
            .with(registration!(OrderConfiguration => Order));

        let discovered: Vec<_> = discover(&registry, None)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(discovered.len(), 2);
        assert!(discovered[0].entity_type().is::<UserProfile>());
        assert!(discovered[1].entity_type().is::<Order>());
        assert_eq!(discovered[0].declaring_type(), "UserProfileConfiguration");

        let user = discovered[0].downcast_ref::<UserProfile>().unwrap();
        assert_eq!(user.index_name(), Some("user_profile"));
        assert_eq!(user.document_key(), Some(&field!(UserProfile => id)));
        assert_eq!(user.ignored_fields().len(), 1);
        assert!(user.field_mapping().is_some());
        assert!(user.settings().is_none());

        let order = discovered[1].downcast_ref::<Order>().unwrap();
        assert_eq!(order.index_name(), Some("order"));
        assert_eq!(order.build_settings().unwrap().number_of_shards, Some(3));
    }

    #[test]
    fn test_prefix_is_passed_to_configure() {
        let registry = TypeRegistry::new().with(registration!(OrderConfiguration => Order));

        let discovered: Vec<_> = discover(&registry, Some("Tenant"))
            .collect::<Result<_, _>>()
            .unwrap();

        let order = discovered[0].downcast_ref::<Order>().unwrap();
        assert_eq!(order.index_name(), Some("tenant_order"));
    }

    #[test]
    fn test_downcast_to_wrong_type_fails() {
        let registry = TypeRegistry::new().with(registration!(OrderConfiguration => Order));
        let discovered = discover(&registry, None).next().unwrap().unwrap();

        assert!(discovered.downcast_ref::<UserProfile>().is_none());
        assert!(discovered.downcast_ref::<Order>().is_some());
    }

    #[test]
    fn test_one_declaring_type_for_several_entities() {
        let registry = TypeRegistry::new()
            .with(registration!(BillingConfiguration => Order))
            .with(registration!(BillingConfiguration => Invoice));

        let names: Vec<_> = discover(&registry, None)
            .map(|d| {
                let d = d.unwrap();
                (d.entity_type().name(), d.declaring_type())
            })
            .collect();

        assert_eq!(
            names,
            vec![
                ("Order", "BillingConfiguration"),
                ("Invoice", "BillingConfiguration")
            ]
        );
    }

    #[test]
    fn test_duplicate_entity_declarations_are_kept() {
        let registry = TypeRegistry::new()
            .with(registration!(OrderConfiguration => Order))
            .with(registration!(BillingConfiguration => Order));

        let discovered: Vec<_> = discover(&registry, None)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(discovered.len(), 2);
        assert_eq!(discovered[0].entity_type(), discovered[1].entity_type());
        assert_eq!(
            discovered[0].downcast_ref::<Order>().unwrap().index_name(),
            Some("order")
        );
        assert_eq!(
            discovered[1].downcast_ref::<Order>().unwrap().index_name(),
            Some("billing_order")
        );
    }

    #[test]
    fn test_instantiation_failure_affects_only_that_declaration() {
        let registry = TypeRegistry::new()
            .with(registration!(NeedsSecrets => Invoice, constructor = NeedsSecrets::from_vault))
            .with(registration!(OrderConfiguration => Order));

        let results: Vec<_> = discover(&registry, None).collect();

        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(DiscoveryError::InstantiationError {
                declaring_type,
                entity,
                reason,
            }) => {
                assert_eq!(*declaring_type, "NeedsSecrets");
                assert_eq!(*entity, "Invoice");
                assert_eq!(reason, "vault unavailable");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_discovery_is_lazy() {
        let registry = TypeRegistry::new()
            .with(registration!(NeedsSecrets => Invoice, constructor = NeedsSecrets::from_vault))
            .with(registration!(OrderConfiguration => Order));

        let mut iter = discover(&registry, None);
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_entity_type_identity() {
        assert_eq!(EntityType::of::<Order>(), EntityType::of::<Order>());
        assert_ne!(EntityType::of::<Order>(), EntityType::of::<Invoice>());
        assert_eq!(EntityType::of::<Order>().to_string(), "Order");
    }
}
