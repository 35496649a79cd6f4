//! Index schema evaluation.
//!
//! Creates an index from a configuration, or updates the mappings of an
//! index that already exists.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{self, error::Elapsed};
use tracing::{error, info, instrument, warn};

use crate::config::EvaluatorConfig;
use crate::configuration::EntityConfiguration;
use crate::document::Document;
use crate::errors::ConfigError;
use crate::evaluator::Evaluator;
use crate::interfaces::IndexBackend;
use crate::resolver;
use crate::types::{BackendResponse, CreateIndexRequest};

/// A single call made to the index backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    Ping,
    IndexExists,
    CreateIndex,
    PutMapping,
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ping => f.write_str("ping"),
            Self::IndexExists => f.write_str("index exists"),
            Self::CreateIndex => f.write_str("create index"),
            Self::PutMapping => f.write_str("put mapping"),
        }
    }
}

/// Where the evaluation of one configuration stands.
///
/// `Pending` moves to `Unreachable`, or through `IndexAbsent` to `Created`,
/// or through `IndexPresent` to `Updated`. `Rejected` and `TimedOut` end an
/// evaluation the backend could not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationState {
    Pending,
    Unreachable,
    IndexAbsent,
    IndexPresent,
    Created,
    Updated,
    Rejected {
        operation: BackendOperation,
        debug_info: String,
    },
    TimedOut {
        operation: BackendOperation,
    },
    ValidationFailed {
        reason: String,
    },
}

impl EvaluationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::IndexAbsent | Self::IndexPresent)
    }
}

/// Result of evaluating one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationReport {
    pub entity: &'static str,
    pub index_name: Option<String>,
    pub state: EvaluationState,
    /// Every state passed through, starting with `Pending`.
    pub history: Vec<EvaluationState>,
}

impl EvaluationReport {
    pub fn new(entity: &'static str, index_name: impl Into<String>) -> Self {
        Self {
            entity,
            index_name: Some(index_name.into()),
            state: EvaluationState::Pending,
            history: vec![EvaluationState::Pending],
        }
    }

    /// Report for a configuration that failed validation.
    pub fn validation_failed(
        entity: &'static str,
        index_name: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        let state = EvaluationState::ValidationFailed {
            reason: reason.into(),
        };
        Self {
            entity,
            index_name,
            state: state.clone(),
            history: vec![EvaluationState::Pending, state],
        }
    }

    fn transition(&mut self, state: EvaluationState) {
        self.history.push(state.clone());
        self.state = state;
    }

    fn finish(mut self, state: EvaluationState) -> Self {
        self.transition(state);
        self
    }
}

/// Evaluator that applies configurations to an index backend.
pub struct IndexEvaluator {
    backend: Arc<dyn IndexBackend>,
    config: EvaluatorConfig,
}

impl IndexEvaluator {
    /// Create a new evaluator with default configuration.
    pub fn new(backend: Arc<dyn IndexBackend>) -> Self {
        Self {
            backend,
            config: EvaluatorConfig::default(),
        }
    }

    /// Create a new evaluator with custom configuration.
    pub fn with_config(backend: Arc<dyn IndexBackend>, config: EvaluatorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Create or update the index described by `configuration`.
    ///
    /// Missing index name or field mapping, or a document key or ignored
    /// field that does not resolve, fails before any backend call.
    /// Backend failures never raise: they end in `Unreachable`, `Rejected`
    /// or `TimedOut` and are logged.
    #[instrument(skip_all, fields(entity = T::TYPE_NAME))]
    pub async fn evaluate_configuration<T: Document>(
        &self,
        configuration: &EntityConfiguration<T>,
    ) -> Result<EvaluationReport, ConfigError> {
        let index_name = configuration
            .index_name()
            .ok_or_else(|| ConfigError::missing_index_name(T::TYPE_NAME))?;
        let mapping_callback = configuration
            .field_mapping()
            .ok_or_else(|| ConfigError::missing_field_mapping(T::TYPE_NAME))?;

        for accessor in configuration
            .document_key()
            .into_iter()
            .chain(configuration.ignored_fields())
        {
            resolver::resolve(accessor).map_err(|e| ConfigError::resolution(T::TYPE_NAME, e))?;
        }

        let mut report = EvaluationReport::new(T::TYPE_NAME, index_name);

        match self.within(self.backend.ping()).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => {
                warn!(index = %index_name, "Cannot connect with search server");
                return Ok(report.finish(EvaluationState::Unreachable));
            }
            Ok(Err(e)) => {
                warn!(index = %index_name, error = %e, "Cannot connect with search server");
                return Ok(report.finish(EvaluationState::Unreachable));
            }
            Err(_) => return Ok(self.timed_out(report, BackendOperation::Ping)),
        }

        let exists = match self.within(self.backend.index_exists(index_name)).await {
            Ok(Ok(exists)) => exists,
            Ok(Err(e)) => {
                error!(index = %index_name, error = %e, "Index existence check failed");
                return Ok(report.finish(EvaluationState::Rejected {
                    operation: BackendOperation::IndexExists,
                    debug_info: e.to_string(),
                }));
            }
            Err(_) => return Ok(self.timed_out(report, BackendOperation::IndexExists)),
        };

        let mut properties = crate::configuration::Properties::<T>::new();
        mapping_callback(&mut properties);
        let mapping = properties.build();

        let (operation, outcome) = if exists {
            report.transition(EvaluationState::IndexPresent);
            let outcome = self
                .within(self.backend.put_mapping(index_name, &mapping))
                .await;
            (BackendOperation::PutMapping, outcome)
        } else {
            report.transition(EvaluationState::IndexAbsent);
            let mut request = CreateIndexRequest::new(mapping);
            if let Some(settings) = configuration.build_settings() {
                request = request.with_settings(settings);
            }
            let outcome = self
                .within(self.backend.create_index(index_name, &request))
                .await;
            (BackendOperation::CreateIndex, outcome)
        };

        let action = if exists { "Update" } else { "Create" };
        let state = match outcome {
            Ok(Ok(BackendResponse { success: true, .. })) => {
                info!(index = %index_name, "{} index successfully", action);
                if exists {
                    EvaluationState::Updated
                } else {
                    EvaluationState::Created
                }
            }
            Ok(Ok(response)) => {
                error!(
                    index = %index_name,
                    status = response.status,
                    debug_info = %response.debug_info,
                    "{} index mapping has failed",
                    action
                );
                EvaluationState::Rejected {
                    operation,
                    debug_info: response.debug_info,
                }
            }
            Ok(Err(e)) => {
                error!(index = %index_name, error = %e, "{} index mapping has failed", action);
                EvaluationState::Rejected {
                    operation,
                    debug_info: e.to_string(),
                }
            }
            Err(_) => return Ok(self.timed_out(report, operation)),
        };

        Ok(report.finish(state))
    }

    /// Run one backend call under the configured deadline.
    async fn within<F: Future>(&self, call: F) -> Result<F::Output, Elapsed> {
        match self.config.request_timeout {
            Some(limit) => time::timeout(limit, call).await,
            None => Ok(call.await),
        }
    }

    fn timed_out(&self, report: EvaluationReport, operation: BackendOperation) -> EvaluationReport {
        warn!(
            index = report.index_name.as_deref().unwrap_or_default(),
            operation = %operation,
            timeout_ms = self
                .config
                .request_timeout
                .map(|t| t.as_millis() as u64)
                .unwrap_or_default(),
            "Backend call timed out"
        );
        report.finish(EvaluationState::TimedOut { operation })
    }
}

#[async_trait]
impl Evaluator for IndexEvaluator {
    async fn evaluate<T: Document>(
        &self,
        configuration: &EntityConfiguration<T>,
    ) -> Result<EvaluationReport, ConfigError> {
        self.evaluate_configuration(configuration).await
    }
}
