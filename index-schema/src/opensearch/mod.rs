//! OpenSearch implementation of the index backend.

mod client;

pub use client::OpenSearchBackend;
