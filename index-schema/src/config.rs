//! Configuration types for the index evaluator.

use std::time::Duration;

/// Configuration for the IndexEvaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Deadline for each backend call. None waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Stop the batch at the first declaration or resolution error.
    pub halt_on_declaration_error: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            halt_on_declaration_error: true,
        }
    }
}

impl EvaluatorConfig {
    /// Bound each backend call by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Record invalid declarations as failed reports and keep going.
    pub fn continue_on_declaration_error(mut self) -> Self {
        self.halt_on_declaration_error = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_halts_without_deadline() {
        let config = EvaluatorConfig::default();
        assert!(config.request_timeout.is_none());
        assert!(config.halt_on_declaration_error);
    }

    #[test]
    fn test_builders() {
        let config = EvaluatorConfig::default()
            .with_request_timeout(Duration::from_millis(250))
            .continue_on_declaration_error();
        assert_eq!(config.request_timeout, Some(Duration::from_millis(250)));
        assert!(!config.halt_on_declaration_error);
    }
}
