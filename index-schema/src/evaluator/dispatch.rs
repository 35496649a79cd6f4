//! Type-erased dispatch back to generic evaluators.
//!
//! Discovery stores each configuration as `Box<dyn ErasedConfiguration>`.
//! The implementation for `EntityConfiguration<T>` is monomorphized per
//! entity type, so calling through the trait object recovers `T` for exactly
//! one generic evaluator call.

use std::any::Any;

use async_trait::async_trait;

use crate::configuration::EntityConfiguration;
use crate::discovery::EntityType;
use crate::document::Document;
use crate::errors::ConfigError;
use crate::evaluator::connection::ConnectionSettingsEvaluator;
use crate::evaluator::index::{EvaluationReport, IndexEvaluator};
use crate::evaluator::{Evaluator, EvaluatorSync};

/// An entity configuration whose entity type is known only at runtime.
#[async_trait]
pub trait ErasedConfiguration: Send + Sync {
    fn entity_type(&self) -> EntityType;

    fn as_any(&self) -> &dyn Any;

    /// Apply this configuration to client connection settings.
    fn configure_connection(
        &self,
        evaluator: &mut ConnectionSettingsEvaluator<'_>,
    ) -> Result<(), ConfigError>;

    /// Create or update this configuration's index.
    async fn evaluate_index(&self, evaluator: &IndexEvaluator)
        -> Result<EvaluationReport, ConfigError>;
}

#[async_trait]
impl<T: Document> ErasedConfiguration for EntityConfiguration<T> {
    fn entity_type(&self) -> EntityType {
        EntityType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn configure_connection(
        &self,
        evaluator: &mut ConnectionSettingsEvaluator<'_>,
    ) -> Result<(), ConfigError> {
        evaluator.evaluate(self)
    }

    async fn evaluate_index(
        &self,
        evaluator: &IndexEvaluator,
    ) -> Result<EvaluationReport, ConfigError> {
        Evaluator::evaluate(evaluator, self).await
    }
}
