//! Error types for the palmerml crate

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, PalmerError>;

/// Errors produced by the pipeline stages
#[derive(Error, Debug)]
pub enum PalmerError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Model is not fitted")]
    ModelNotFitted,

    #[error("Shape mismatch: expected {expected}, actual {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
