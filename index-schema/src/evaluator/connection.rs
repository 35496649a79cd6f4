//! Client connection settings built from entity configurations.
//!
//! Each configuration contributes a default mapping: the index its entity
//! type is stored in, the field used as document id, and the fields left
//! out of default mapping inference.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::configuration::EntityConfiguration;
use crate::discovery::EntityType;
use crate::document::Document;
use crate::errors::{BackendError, ConfigError};
use crate::evaluator::EvaluatorSync;
use crate::resolver;

/// Per-entity defaults registered with the search client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultMapping {
    pub entity: &'static str,
    pub index_name: String,
    pub id_field: Option<String>,
    pub ignored_fields: Vec<String>,
}

/// Settings used to connect to the search server.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    url: Url,
    request_timeout: Option<Duration>,
    default_mappings: HashMap<EntityType, DefaultMapping>,
}

impl ConnectionSettings {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            request_timeout: None,
            default_mappings: HashMap::new(),
        }
    }

    /// Parse the server URL, e.g. `http://localhost:9200`.
    pub fn parse(url: &str) -> Result<Self, BackendError> {
        let parsed = Url::parse(url)
            .map_err(|e| BackendError::connection(format!("Invalid url {}: {}", url, e)))?;
        Ok(Self::new(parsed))
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn default_mapping<T: Document>(&self) -> Option<&DefaultMapping> {
        self.default_mappings.get(&EntityType::of::<T>())
    }

    /// Index documents of `T` go to when no index is named explicitly.
    pub fn default_index<T: Document>(&self) -> Option<&str> {
        self.default_mapping::<T>()
            .map(|mapping| mapping.index_name.as_str())
    }

    pub fn id_field<T: Document>(&self) -> Option<&str> {
        self.default_mapping::<T>()
            .and_then(|mapping| mapping.id_field.as_deref())
    }

    pub fn ignored_fields<T: Document>(&self) -> &[String] {
        self.default_mapping::<T>()
            .map(|mapping| mapping.ignored_fields.as_slice())
            .unwrap_or_default()
    }

    pub fn default_mappings(&self) -> impl Iterator<Item = &DefaultMapping> {
        self.default_mappings.values()
    }
}

/// Evaluator registering default mappings on [`ConnectionSettings`].
///
/// Field references are resolved here, so an unknown key or ignored field
/// surfaces as a resolution error.
pub struct ConnectionSettingsEvaluator<'a> {
    settings: &'a mut ConnectionSettings,
}

impl<'a> ConnectionSettingsEvaluator<'a> {
    pub fn new(settings: &'a mut ConnectionSettings) -> Self {
        Self { settings }
    }
}

impl EvaluatorSync for ConnectionSettingsEvaluator<'_> {
    fn evaluate<T: Document>(
        &mut self,
        configuration: &EntityConfiguration<T>,
    ) -> Result<(), ConfigError> {
        let index_name = configuration
            .index_name()
            .ok_or_else(|| ConfigError::missing_index_name(T::TYPE_NAME))?;

        let id_field = configuration
            .document_key()
            .map(|key| resolver::resolve(key).map(|field| field.name().to_string()))
            .transpose()
            .map_err(|e| ConfigError::resolution(T::TYPE_NAME, e))?;

        let ignored_fields = configuration
            .ignored_fields()
            .iter()
            .map(|accessor| resolver::resolve(accessor).map(|field| field.name().to_string()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::resolution(T::TYPE_NAME, e))?;

        debug!(
            entity = T::TYPE_NAME,
            index = %index_name,
            id_field = ?id_field,
            ignored = ignored_fields.len(),
            "Registering default mapping"
        );

        self.settings.default_mappings.insert(
            EntityType::of::<T>(),
            DefaultMapping {
                entity: T::TYPE_NAME,
                index_name: index_name.to_string(),
                id_field,
                ignored_fields,
            },
        );
        Ok(())
    }
}
