//! Interface definitions for the index backend.
//!
//! This module defines the abstract `IndexBackend` trait so the evaluator can
//! run against OpenSearch or a test double.

mod index_backend;

pub use index_backend::IndexBackend;
