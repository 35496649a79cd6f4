//! Bootstrap configuration.

mod settings;

pub use settings::{BootstrapSettings, LogFormat};
