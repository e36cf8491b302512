//! Classifier error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading artifacts or predicting labels
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifact shape mismatch: {0}")]
    Shape(String),

    #[error("Vectorizer is not fitted (empty vocabulary)")]
    NotFitted,

    #[error("Model has no classes")]
    EmptyModel,
}

impl ClassifierError {
    /// True for errors raised while reading artifacts from disk
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Parse { .. } | Self::Shape(_) | Self::EmptyModel)
    }
}
