//! Error taxonomy for the training and scoring pipelines.
//!
//! Preprocessing errors are never coerced into default codes or sentinel
//! values: an unseen category or a missing column always surfaces as a typed
//! error, fatal during training and skip-and-continue per message during
//! scoring.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for preprocessing, training, and scoring
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Transform or predict requested before fit. Ordering bug in the
    /// caller, never retried.
    #[error("{0} used before fit")]
    NotFitted(&'static str),

    /// A category value absent from the encoder's fitted vocabulary.
    #[error("unseen category {value:?} in column {column:?}")]
    UnseenCategory { column: String, value: String },

    /// A declared schema column is absent from the input table.
    #[error("column {0:?} not found in input")]
    MissingColumn(String),

    /// Fit attempted over zero values.
    #[error("cannot fit encoder for column {0:?}: no values")]
    EmptyColumn(String),

    #[error("data error: {0}")]
    Data(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("artifact {name:?}: format version {actual} (expected {expected})")]
    ArtifactVersion {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("artifact {name:?}: kind {actual:?} (expected {expected:?})")]
    ArtifactKindMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// True for errors that degrade to a per-message skip during scoring.
    /// Everything else is fatal to the caller.
    pub fn is_message_scoped(&self) -> bool {
        matches!(
            self,
            PipelineError::UnseenCategory { .. }
                | PipelineError::MissingColumn(_)
                | PipelineError::Data(_)
        )
    }
}
