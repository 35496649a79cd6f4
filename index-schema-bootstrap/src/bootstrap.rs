//! Discovery and evaluation wiring.

use std::sync::Arc;

use index_schema::discovery::TypeUniverse;
use index_schema::{
    apply_index_configurations, configure_connection_settings, discover, ConnectionSettings,
    DiscoveredConfiguration, EvaluationSummary, IndexBackend, IndexEvaluator, InventoryUniverse,
    OpenSearchBackend,
};
use tracing::{info, instrument, warn};

use crate::config::BootstrapSettings;
use crate::BootstrapError;

/// Initialized backend and evaluators, ready to apply index configurations.
pub struct Bootstrap {
    settings: BootstrapSettings,
    connection: ConnectionSettings,
    evaluator: IndexEvaluator,
}

impl Bootstrap {
    /// Build the OpenSearch backend described by `settings`.
    pub fn new(settings: BootstrapSettings) -> Result<Self, BootstrapError> {
        let connection = Self::connection_settings_for(&settings)?;
        let backend = OpenSearchBackend::new(&connection)
            .map_err(|e| BootstrapError::config(format!("Failed to create OpenSearch backend: {}", e)))?;

        Ok(Self::assemble(settings, connection, Arc::new(backend)))
    }

    /// Load settings from the environment and build the backend.
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::new(BootstrapSettings::from_env()?)
    }

    /// Use an already constructed backend.
    pub fn with_backend(
        settings: BootstrapSettings,
        backend: Arc<dyn IndexBackend>,
    ) -> Result<Self, BootstrapError> {
        let connection = Self::connection_settings_for(&settings)?;
        Ok(Self::assemble(settings, connection, backend))
    }

    fn connection_settings_for(
        settings: &BootstrapSettings,
    ) -> Result<ConnectionSettings, BootstrapError> {
        let mut connection = ConnectionSettings::parse(&settings.opensearch_url)?;
        if let Some(timeout) = settings.request_timeout {
            connection = connection.with_request_timeout(timeout);
        }
        Ok(connection)
    }

    fn assemble(
        settings: BootstrapSettings,
        connection: ConnectionSettings,
        backend: Arc<dyn IndexBackend>,
    ) -> Self {
        let evaluator = IndexEvaluator::with_config(backend, settings.evaluator_config());

        info!(
            url = %connection.url(),
            index_prefix = ?settings.index_prefix,
            "Initialized index bootstrap"
        );

        Self {
            settings,
            connection,
            evaluator,
        }
    }

    pub fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    /// Connection settings, including defaults registered by the last run.
    pub fn connection_settings(&self) -> &ConnectionSettings {
        &self.connection
    }

    /// Apply every configuration registered with `register_configuration!`.
    pub async fn run(&mut self) -> Result<EvaluationSummary, BootstrapError> {
        self.run_in(&InventoryUniverse).await
    }

    /// Apply every configuration in `universe`.
    ///
    /// Connection defaults are registered first; an invalid declaration stops
    /// before any index is touched.
    #[instrument(skip_all, fields(prefix = ?self.settings.index_prefix))]
    pub async fn run_in<U>(&mut self, universe: &U) -> Result<EvaluationSummary, BootstrapError>
    where
        U: TypeUniverse + ?Sized,
    {
        let discovered: Vec<_> = discover(universe, self.settings.index_prefix.as_deref()).collect();

        let configurations: Vec<&DiscoveredConfiguration> =
            discovered.iter().filter_map(|item| item.as_ref().ok()).collect();
        info!(
            discovered = configurations.len(),
            failed = discovered.len() - configurations.len(),
            "Discovered index configurations"
        );

        if !self.settings.continue_on_declaration_error {
            configure_connection_settings(&mut self.connection, configurations)?;
        } else {
            for configuration in configurations {
                if let Err(e) = configure_connection_settings(&mut self.connection, [configuration]) {
                    warn!(
                        entity = %configuration.entity_type(),
                        error = %e,
                        "Skipping connection defaults for invalid configuration"
                    );
                }
            }
        }

        let summary = apply_index_configurations(&self.evaluator, discovered).await?;
        Ok(summary)
    }
}
