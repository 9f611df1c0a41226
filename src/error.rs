//! Error types for the price prediction core

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PriceError>;

#[derive(Debug, Error)]
pub enum PriceError {
    /// Artifact file is missing or unreadable.
    #[error("failed to read {artifact} artifact at {path}: {source}")]
    ArtifactIo {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not a valid document.
    #[error("failed to parse {artifact} artifact at {path}: {source}")]
    ArtifactFormat {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact parsed but its parameters are unusable.
    #[error("invalid {artifact} artifact: {reason}")]
    InvalidArtifact {
        artifact: &'static str,
        reason: String,
    },

    #[error("unknown {field} category: {value:?}")]
    UnknownCategory { field: &'static str, value: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("numeric error: {0}")]
    NumericDomain(String),

    #[error("shape mismatch: expected {expected} columns, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PriceError {
    /// True when the failure was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PriceError::UnknownCategory { .. } | PriceError::InvalidInput(_)
        )
    }

    pub fn invalid_artifact(artifact: &'static str, reason: impl Into<String>) -> Self {
        PriceError::InvalidArtifact {
            artifact,
            reason: reason.into(),
        }
    }
}
