//! Error types for index configuration.

mod backend_error;
mod config_error;
mod discovery_error;
mod resolution_error;

pub use backend_error::BackendError;
pub use config_error::{ConfigError, MissingSetting};
pub use discovery_error::DiscoveryError;
pub use resolution_error::ResolutionError;
