//! Persistence errors.

use crate::feature::RegistryError;

/// Errors raised while reading a tree or model.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    UnknownFeature(#[from] RegistryError),
    #[error("feature {feature:?} cannot take argument {arg}")]
    InvalidArgument { feature: String, arg: String },
    #[error("feature {feature:?} cannot produce outcome {key}")]
    InvalidOutcome { feature: String, key: String },
    #[error("feature {feature:?} has duplicate outcome {key}")]
    DuplicateOutcome { feature: String, key: String },
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Errors raised while writing a tree or model.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
