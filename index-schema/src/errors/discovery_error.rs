//! Configuration discovery errors.

use thiserror::Error;

/// Errors raised while instantiating a discovered declaration.
///
/// A failure affects only the declaration it names; the rest of the scan
/// continues.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// The declaring type could not be constructed.
    #[error("Cannot instantiate {declaring_type} configuring {entity}: {reason}")]
    InstantiationError {
        declaring_type: &'static str,
        entity: &'static str,
        reason: String,
    },
}

impl DiscoveryError {
    /// Create an instantiation error.
    pub fn instantiation(
        declaring_type: &'static str,
        entity: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InstantiationError {
            declaring_type,
            entity,
            reason: reason.into(),
        }
    }
}
