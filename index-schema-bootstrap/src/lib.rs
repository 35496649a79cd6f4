//! # Index Schema Bootstrap
//!
//! Application startup wiring for index configuration.
//!
//! Reads settings from the environment, builds the OpenSearch backend,
//! discovers every registered index configuration, registers connection
//! defaults and creates or updates the indexes.

pub mod bootstrap;
pub mod config;

pub use bootstrap::Bootstrap;
pub use config::{BootstrapSettings, LogFormat};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors that can occur during bootstrap.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid index declaration.
    #[error("Index configuration error: {0}")]
    IndexConfigError(#[from] index_schema::ConfigError),

    /// Backend error.
    #[error("Backend error: {0}")]
    BackendError(#[from] index_schema::BackendError),
}

impl BootstrapError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Fails if a
/// global subscriber is already installed.
///
/// ```ignore
/// let settings = BootstrapSettings::from_env()?;
/// init_tracing(settings.log_format)?;
/// let mut bootstrap = Bootstrap::new(settings)?;
/// let summary = bootstrap.run().await?;
/// ```
pub fn init_tracing(format: LogFormat) -> Result<(), BootstrapError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    result.map_err(|e| BootstrapError::config(format!("Failed to initialize tracing: {}", e)))
}
