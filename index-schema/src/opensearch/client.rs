//! OpenSearch index backend.
//!
//! This module provides the concrete implementation of `IndexBackend`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesPutMappingParts},
    OpenSearch,
};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::configuration::TypeMapping;
use crate::errors::BackendError;
use crate::evaluator::ConnectionSettings;
use crate::interfaces::IndexBackend;
use crate::types::{BackendResponse, CreateIndexRequest};

/// OpenSearch implementation of [`IndexBackend`].
///
/// # Example
///
/// ```ignore
/// let settings = ConnectionSettings::parse("http://localhost:9200")?;
/// let backend = OpenSearchBackend::new(&settings)?;
/// let evaluator = IndexEvaluator::new(Arc::new(backend));
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
}

impl OpenSearchBackend {
    /// Create a backend for the server and timeout in `settings`.
    ///
    /// No request is sent; connectivity is checked by `ping`.
    pub fn new(settings: &ConnectionSettings) -> Result<Self, BackendError> {
        let conn_pool = SingleNodeConnectionPool::new(settings.url().clone());
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let transport = builder
            .build()
            .map_err(|e| BackendError::connection(e.to_string()))?;

        info!(
            url = %settings.url(),
            timeout_ms = settings.request_timeout().map(|t| t.as_millis() as u64),
            "Created OpenSearch backend"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Create a backend for `url` with default settings.
    pub fn connect(url: &str) -> Result<Self, BackendError> {
        let parsed_url = Url::parse(url).map_err(|e| BackendError::connection(e.to_string()))?;
        Self::new(&ConnectionSettings::new(parsed_url))
    }

    async fn into_backend_response(response: Response) -> BackendResponse {
        let status = response.status_code().as_u16();
        let body = response.text().await.unwrap_or_default();
        to_backend_response(status, body)
    }
}

/// Map a create or put-mapping answer to a response record.
fn to_backend_response(status: u16, body: String) -> BackendResponse {
    if (200..300).contains(&status) {
        BackendResponse::success(status)
    } else {
        BackendResponse::failure(status, body)
    }
}

/// Interpret the status of a HEAD index request.
fn exists_from_status(status: u16, body: String) -> Result<bool, BackendError> {
    match status {
        200..=299 => Ok(true),
        404 => Ok(false),
        _ => Err(BackendError::unexpected_status(status, body)),
    }
}

#[async_trait]
impl IndexBackend for OpenSearchBackend {
    async fn ping(&self) -> Result<bool, BackendError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| BackendError::connection(e.to_string()))?;

        let status = response.status_code();
        debug!(status = %status, "Ping answered");
        Ok(status.is_success())
    }

    #[instrument(skip(self))]
    async fn index_exists(&self, name: &str) -> Result<bool, BackendError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| BackendError::request(e.to_string()))?;

        let status = response.status_code().as_u16();
        let body = response.text().await.unwrap_or_default();
        exists_from_status(status, body)
    }

    #[instrument(skip(self, request))]
    async fn create_index(
        &self,
        name: &str,
        request: &CreateIndexRequest,
    ) -> Result<BackendResponse, BackendError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(request.to_body())
            .send()
            .await
            .map_err(|e| BackendError::request(e.to_string()))?;

        let result = Self::into_backend_response(response).await;
        if !result.success {
            error!(status = result.status, body = %result.debug_info, "Create index request failed");
        }
        Ok(result)
    }

    #[instrument(skip(self, mapping))]
    async fn put_mapping(
        &self,
        name: &str,
        mapping: &TypeMapping,
    ) -> Result<BackendResponse, BackendError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[name]))
            .body(mapping.to_body())
            .send()
            .await
            .map_err(|e| BackendError::request(e.to_string()))?;

        let result = Self::into_backend_response(response).await;
        if !result.success {
            error!(status = result.status, body = %result.debug_info, "Put mapping request failed");
        }
        Ok(result)
    }
}
