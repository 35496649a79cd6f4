//! Configuration error types.
//!
//! Declaration and resolution errors indicate a misconfigured declaration.
//! They are raised to the caller of the discovery and evaluation pipeline.

use std::fmt;

use thiserror::Error;

use super::{DiscoveryError, ResolutionError};

/// A setting an entity configuration must carry before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    IndexName,
    FieldMapping,
}

impl fmt::Display for MissingSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexName => f.write_str("index name"),
            Self::FieldMapping => f.write_str("mapping properties"),
        }
    }
}

/// Errors that halt evaluation of index configurations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required setting was never declared.
    #[error("Missing {missing} for {entity}")]
    DeclarationError {
        entity: &'static str,
        missing: MissingSetting,
    },

    /// A field reference in a declaration did not resolve.
    #[error("Resolution error for {entity}: {source}")]
    ResolutionError {
        entity: &'static str,
        #[source]
        source: ResolutionError,
    },

    /// A declaring type could not be instantiated.
    #[error(transparent)]
    DiscoveryError(#[from] DiscoveryError),
}

impl ConfigError {
    /// Create an error for a configuration without an index name.
    pub fn missing_index_name(entity: &'static str) -> Self {
        Self::DeclarationError {
            entity,
            missing: MissingSetting::IndexName,
        }
    }

    /// Create an error for a configuration without a field mapping.
    pub fn missing_field_mapping(entity: &'static str) -> Self {
        Self::DeclarationError {
            entity,
            missing: MissingSetting::FieldMapping,
        }
    }

    /// Create a resolution error scoped to an entity type.
    pub fn resolution(entity: &'static str, source: ResolutionError) -> Self {
        Self::ResolutionError { entity, source }
    }
}
