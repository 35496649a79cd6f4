//! # Index Schema
//!
//! Declarative search index configuration for application entity types.
//!
//! Each entity type gets a declaring type implementing [`ConfigureDocument`]
//! that names its index, document key, field mappings, index settings and
//! ignored fields through a fluent builder. Declarations are discovered from
//! a type universe, and evaluators consume the resulting configurations:
//! [`IndexEvaluator`] creates or updates indexes on the backend, while
//! [`ConnectionSettingsEvaluator`] registers per-entity defaults on the
//! client connection settings.
//!
//! ```ignore
//! #[derive(Document)]
//! struct UserProfile {
//!     id: String,
//!     name: String,
//! }
//!
//! #[derive(Default)]
//! struct UserProfileConfiguration;
//!
//! impl ConfigureDocument<UserProfile> for UserProfileConfiguration {
//!     fn configure(
//!         &self,
//!         builder: EntityConfigBuilder<UserProfile>,
//!         prefix: Option<&str>,
//!     ) -> EntityConfigBuilder<UserProfile> {
//!         builder
//!             .to_index(prefix)
//!             .has_key(field!(UserProfile => id))
//!             .properties(|p| {
//!                 p.keyword("id").text_with_keyword("name");
//!             })
//!     }
//! }
//!
//! register_configuration!(UserProfileConfiguration => UserProfile);
//! ```

extern crate self as index_schema;

pub mod config;
pub mod configuration;
pub mod discovery;
pub mod document;
pub mod errors;
pub mod evaluator;
pub mod interfaces;
pub mod naming;
pub mod opensearch;
pub mod resolver;
pub mod types;

pub use config::EvaluatorConfig;
pub use configuration::{EntityConfigBuilder, EntityConfiguration, IndexSettings, Properties};
pub use discovery::{
    discover, ConfigureDocument, DiscoveredConfiguration, EntityType, InventoryUniverse,
    TypeRegistry, TypeUniverse,
};
pub use document::{Document, FieldType};
pub use errors::{BackendError, ConfigError, DiscoveryError, ResolutionError};
pub use evaluator::{
    apply_index_configurations, configure_connection_settings, ConnectionSettings,
    ConnectionSettingsEvaluator, EvaluationReport, EvaluationState, EvaluationSummary,
    IndexEvaluator,
};
pub use index_schema_derive::Document;
pub use interfaces::IndexBackend;
pub use opensearch::OpenSearchBackend;
pub use resolver::Accessor;

#[doc(hidden)]
pub use inventory;
