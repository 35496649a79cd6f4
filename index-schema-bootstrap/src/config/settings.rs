//! Settings read from the environment.

use std::env;
use std::time::Duration;

use dotenv::dotenv;
use index_schema::EvaluatorConfig;
use tracing::info;

use crate::BootstrapError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Everything bootstrap needs to know before it talks to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSettings {
    pub opensearch_url: String,
    /// Prepended to every type name before it is normalized to an index name.
    pub index_prefix: Option<String>,
    pub request_timeout: Option<Duration>,
    pub continue_on_declaration_error: bool,
    pub log_format: LogFormat,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            index_prefix: None,
            request_timeout: None,
            continue_on_declaration_error: false,
            log_format: LogFormat::Pretty,
        }
    }
}

impl BootstrapSettings {
    /// Load settings from environment variables, after reading `.env` if present.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_PREFIX`: prefix for every index name (default: none)
    /// - `OPENSEARCH_REQUEST_TIMEOUT_MS`: deadline for each backend call (default: none)
    /// - `INDEX_CONTINUE_ON_DECLARATION_ERROR`: `true` to record invalid
    ///   declarations and keep going (default: false)
    /// - `LOG_FORMAT`: `json` or `pretty` (default: pretty)
    pub fn from_env() -> Result<Self, BootstrapError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BootstrapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let opensearch_url =
            lookup("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());

        let index_prefix = lookup("INDEX_PREFIX").filter(|prefix| !prefix.trim().is_empty());

        let request_timeout = lookup("OPENSEARCH_REQUEST_TIMEOUT_MS")
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|e| {
                    BootstrapError::config(format!(
                        "Invalid OPENSEARCH_REQUEST_TIMEOUT_MS {}: {}",
                        raw, e
                    ))
                })
            })
            .transpose()?;

        let continue_on_declaration_error = lookup("INDEX_CONTINUE_ON_DECLARATION_ERROR")
            .map(|raw| parse_flag("INDEX_CONTINUE_ON_DECLARATION_ERROR", &raw))
            .transpose()?
            .unwrap_or(false);

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(BootstrapError::config(format!(
                    "Invalid LOG_FORMAT {}: expected json or pretty",
                    other
                )))
            }
        };

        info!(
            opensearch_url = %opensearch_url,
            index_prefix = ?index_prefix,
            request_timeout_ms = request_timeout.map(|t| t.as_millis() as u64),
            continue_on_declaration_error,
            "Loaded bootstrap settings"
        );

        Ok(Self {
            opensearch_url,
            index_prefix,
            request_timeout,
            continue_on_declaration_error,
            log_format,
        })
    }

    /// Evaluator configuration derived from these settings.
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        let mut config = EvaluatorConfig::default();
        if let Some(timeout) = self.request_timeout {
            config = config.with_request_timeout(timeout);
        }
        if self.continue_on_declaration_error {
            config = config.continue_on_declaration_error();
        }
        config
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, BootstrapError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(BootstrapError::config(format!(
            "Invalid {} {}: expected true or false",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = BootstrapSettings::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(settings, BootstrapSettings::default());
        assert_eq!(settings.evaluator_config(), EvaluatorConfig::default());
    }

    #[test]
    fn test_all_variables() {
        let settings = BootstrapSettings::from_lookup(lookup_in(&[
            ("OPENSEARCH_URL", "http://search:9200"),
            ("INDEX_PREFIX", "Staging"),
            ("OPENSEARCH_REQUEST_TIMEOUT_MS", "1500"),
            ("INDEX_CONTINUE_ON_DECLARATION_ERROR", "TRUE"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(settings.opensearch_url, "http://search:9200");
        assert_eq!(settings.index_prefix.as_deref(), Some("Staging"));
        assert_eq!(settings.request_timeout, Some(Duration::from_millis(1500)));
        assert!(settings.continue_on_declaration_error);
        assert_eq!(settings.log_format, LogFormat::Json);

        let config = settings.evaluator_config();
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert!(!config.halt_on_declaration_error);
    }

    #[test]
    fn test_blank_prefix_is_none() {
        let settings =
            BootstrapSettings::from_lookup(lookup_in(&[("INDEX_PREFIX", "  ")])).unwrap();
        assert!(settings.index_prefix.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let err = BootstrapSettings::from_lookup(lookup_in(&[(
            "OPENSEARCH_REQUEST_TIMEOUT_MS",
            "soon",
        )]))
        .unwrap_err();
        assert!(matches!(err, BootstrapError::ConfigError(_)));

        assert!(BootstrapSettings::from_lookup(lookup_in(&[(
            "INDEX_CONTINUE_ON_DECLARATION_ERROR",
            "maybe"
        )]))
        .is_err());
        assert!(BootstrapSettings::from_lookup(lookup_in(&[("LOG_FORMAT", "xml")])).is_err());
    }
}
