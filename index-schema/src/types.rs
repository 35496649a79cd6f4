//! Request and response types for index backend operations.

use serde_json::{json, Map, Value};

use crate::configuration::{IndexSettings, TypeMapping};

/// Body of a create-index call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateIndexRequest {
    /// Present only when the configuration declared a settings callback.
    pub settings: Option<IndexSettings>,
    pub mappings: TypeMapping,
}

impl CreateIndexRequest {
    pub fn new(mappings: TypeMapping) -> Self {
        Self {
            settings: None,
            mappings,
        }
    }

    pub fn with_settings(mut self, settings: IndexSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// JSON body in the shape OpenSearch expects.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(settings) = &self.settings {
            body.insert("settings".to_string(), json!(settings));
        }
        body.insert("mappings".to_string(), self.mappings.to_body());
        Value::Object(body)
    }
}

/// Outcome of a create-index or put-mapping call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub success: bool,
    pub status: u16,
    /// Backend-supplied detail, reported when the call failed.
    pub debug_info: String,
}

impl BackendResponse {
    pub fn success(status: u16) -> Self {
        Self {
            success: true,
            status,
            debug_info: String::new(),
        }
    }

    pub fn failure(status: u16, debug_info: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            debug_info: debug_info.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_without_settings() {
        let mut mappings = TypeMapping::default();
        mappings
            .properties
            .insert("name".to_string(), json!({ "type": "keyword" }));

        let body = CreateIndexRequest::new(mappings).to_body();

        assert!(body.get("settings").is_none());
        assert_eq!(body["mappings"]["properties"]["name"]["type"], "keyword");
    }

    #[test]
    fn test_create_body_with_settings() {
        let mut settings = IndexSettings::default();
        settings.number_of_shards(1).number_of_replicas(1);

        let body = CreateIndexRequest::new(TypeMapping::default())
            .with_settings(settings)
            .to_body();

        assert_eq!(body["settings"]["number_of_shards"], 1);
        assert_eq!(body["settings"]["number_of_replicas"], 1);
        assert!(body["mappings"]["properties"].is_object());
    }
}
