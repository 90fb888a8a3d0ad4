//! Ошибки пайплайна

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("empty dataset")]
    EmptyDataset,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("model is not fitted")]
    NotFitted,

    #[error("target contains a single class, ROC AUC is undefined")]
    DegenerateTarget,

    #[error("grid search produced no scorable candidate")]
    NoViableCandidate,
}
