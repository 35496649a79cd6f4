//! Property path resolution errors.

use thiserror::Error;

/// Errors raised when a field reference cannot be resolved against a type.
///
/// Every variant carries the offending expression or segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The accessor is not a single field access or a cast of one.
    #[error("Expression `{expression}` is not supported: expected a single field access")]
    UnsupportedExpression { expression: String },

    /// A path segment names no field on the current type.
    #[error("property {segment} is not found on {type_name}")]
    FieldNotFound { segment: String, type_name: String },

    /// A path segment matches several fields when compared case-insensitively.
    #[error("property {segment} is ambiguous on {type_name}: matches {candidates:?}")]
    AmbiguousField {
        segment: String,
        type_name: String,
        candidates: Vec<&'static str>,
    },
}

impl ResolutionError {
    /// Create an unsupported expression error.
    pub fn unsupported(expression: impl Into<String>) -> Self {
        Self::UnsupportedExpression {
            expression: expression.into(),
        }
    }

    /// Create a field not found error.
    pub fn not_found(segment: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::FieldNotFound {
            segment: segment.into(),
            type_name: type_name.into(),
        }
    }

    /// The segment or expression this error is about.
    pub fn subject(&self) -> &str {
        match self {
            Self::UnsupportedExpression { expression } => expression,
            Self::FieldNotFound { segment, .. } | Self::AmbiguousField { segment, .. } => segment,
        }
    }
}
