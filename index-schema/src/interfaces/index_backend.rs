//! Index backend trait definition.

use async_trait::async_trait;

use crate::configuration::TypeMapping;
use crate::errors::BackendError;
use crate::types::{BackendResponse, CreateIndexRequest};

/// The schema operations the evaluator needs from a search engine.
///
/// Implementations only issue requests; they hold no per-configuration state.
/// The evaluator calls one operation at a time.
///
/// # Error Handling
///
/// `Err` means the request could not be completed at all. A request the
/// backend answered but refused is an `Ok(BackendResponse)` with
/// `success == false`.
#[async_trait]
pub trait IndexBackend: Send + Sync {
    /// Liveness probe with no side effects.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The backend is reachable
    /// * `Ok(false)` - The backend answered but reported itself unavailable
    /// * `Err(BackendError)` - The probe could not be sent
    async fn ping(&self) -> Result<bool, BackendError>;

    /// Check whether an index exists.
    async fn index_exists(&self, name: &str) -> Result<bool, BackendError>;

    /// Create an index with optional settings and field mappings.
    async fn create_index(
        &self,
        name: &str,
        request: &CreateIndexRequest,
    ) -> Result<BackendResponse, BackendError>;

    /// Update the field mappings of an existing index.
    ///
    /// Settings are never changed on an existing index.
    async fn put_mapping(
        &self,
        name: &str,
        mapping: &TypeMapping,
    ) -> Result<BackendResponse, BackendError>;
}
