//! Error types for the Kolosal kNN evaluator

use thiserror::Error;

/// Result type alias for Kolosal kNN operations
pub type Result<T> = std::result::Result<T, KolosalError>;

/// Main error type for the Kolosal kNN evaluator
#[derive(Error, Debug)]
pub enum KolosalError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Training pool is empty")]
    EmptyTrainingPool,

    #[error("Classifier not trained")]
    NotTrained,
}

impl From<csv::Error> for KolosalError {
    fn from(err: csv::Error) -> Self {
        KolosalError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for KolosalError {
    fn from(err: serde_json::Error) -> Self {
        KolosalError::SerializationError(err.to_string())
    }
}
