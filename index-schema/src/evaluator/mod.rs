//! Evaluators consume entity configurations.
//!
//! An evaluator is generic over the entity type. Discovered configurations
//! are type-erased, so the pipeline helpers here dispatch each one back to
//! its concrete `T` through [`ErasedConfiguration`].

mod connection;
mod dispatch;
mod index;

pub use connection::{ConnectionSettings, ConnectionSettingsEvaluator, DefaultMapping};
pub use dispatch::ErasedConfiguration;
pub use index::{BackendOperation, EvaluationReport, EvaluationState, IndexEvaluator};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::configuration::EntityConfiguration;
use crate::discovery::DiscoveredConfiguration;
use crate::document::Document;
use crate::errors::{ConfigError, DiscoveryError};

/// Asynchronous consumer of entity configurations.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate<T: Document>(
        &self,
        configuration: &EntityConfiguration<T>,
    ) -> Result<EvaluationReport, ConfigError>;
}

/// Synchronous consumer of entity configurations.
pub trait EvaluatorSync {
    fn evaluate<T: Document>(
        &mut self,
        configuration: &EntityConfiguration<T>,
    ) -> Result<(), ConfigError>;
}

/// Counts and reports for one batch of index evaluations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub unreachable: usize,
    pub rejected: usize,
    pub timed_out: usize,
    pub validation_failed: usize,
    pub discovery_failures: usize,
    pub reports: Vec<EvaluationReport>,
}

impl EvaluationSummary {
    /// Count a finished report and keep it.
    pub fn record(&mut self, report: EvaluationReport) {
        self.total += 1;
        match &report.state {
            EvaluationState::Created => self.created += 1,
            EvaluationState::Updated => self.updated += 1,
            EvaluationState::Unreachable => self.unreachable += 1,
            EvaluationState::Rejected { .. } => self.rejected += 1,
            EvaluationState::TimedOut { .. } => self.timed_out += 1,
            EvaluationState::ValidationFailed { .. } => self.validation_failed += 1,
            EvaluationState::Pending
            | EvaluationState::IndexAbsent
            | EvaluationState::IndexPresent => {}
        }
        self.reports.push(report);
    }

    /// True when every evaluated index was created or updated.
    pub fn is_success(&self) -> bool {
        self.discovery_failures == 0 && self.created + self.updated == self.total
    }
}

/// Apply every configuration to client connection settings.
///
/// Stops at the first declaration or resolution error.
pub fn configure_connection_settings<'a, I>(
    settings: &mut ConnectionSettings,
    configurations: I,
) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = &'a DiscoveredConfiguration>,
{
    let mut evaluator = ConnectionSettingsEvaluator::new(settings);
    for discovered in configurations {
        discovered
            .configuration()
            .configure_connection(&mut evaluator)?;
    }
    Ok(())
}

/// Create or update the index of every discovered configuration, in order.
///
/// Discovery failures are logged and counted. Declaration and resolution
/// errors halt the batch unless the evaluator is configured to continue,
/// in which case they are recorded as `ValidationFailed`. Backend failures
/// are recorded and the batch continues.
pub async fn apply_index_configurations<I>(
    evaluator: &IndexEvaluator,
    discovered: I,
) -> Result<EvaluationSummary, ConfigError>
where
    I: IntoIterator<Item = Result<DiscoveredConfiguration, DiscoveryError>>,
{
    let mut summary = EvaluationSummary::default();

    for item in discovered {
        let discovered = match item {
            Ok(discovered) => discovered,
            Err(e) => {
                warn!(error = %e, "Skipping configuration that could not be discovered");
                summary.discovery_failures += 1;
                continue;
            }
        };

        let entity = discovered.entity_type();
        match discovered.configuration().evaluate_index(evaluator).await {
            Ok(report) => summary.record(report),
            Err(e) if evaluator.config().halt_on_declaration_error => {
                error!(entity = %entity, error = %e, "Invalid index configuration");
                return Err(e);
            }
            Err(e) => {
                error!(entity = %entity, error = %e, "Invalid index configuration, continuing");
                summary.record(EvaluationReport::validation_failed(
                    entity.name(),
                    None,
                    e.to_string(),
                ));
            }
        }
    }

    info!(
        total = summary.total,
        created = summary.created,
        updated = summary.updated,
        unreachable = summary.unreachable,
        rejected = summary.rejected,
        timed_out = summary.timed_out,
        validation_failed = summary.validation_failed,
        discovery_failures = summary.discovery_failures,
        "Index configuration completed"
    );

    Ok(summary)
}
