use thiserror::Error;

/// Custom error type for the gradtape engine.
///
/// Every fallible operation of the crate returns this type. The two errors a mis-wired
/// model graph can produce at run time are [`TapeError::ShapeMismatch`] and
/// [`TapeError::IndexOutOfBounds`]; both are raised before anything is computed or
/// mutated.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum TapeError {
    #[error("Shape mismatch during operation {operation}: left {left:?}, right {right:?}")]
    ShapeMismatch {
        operation: String,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: (usize, usize),
        shape: (usize, usize),
    },

    #[error("Matrix creation error: data length {data_len} does not match shape {shape:?}")]
    MatrixCreationError {
        data_len: usize,
        shape: (usize, usize),
    },

    #[error("Invalid matrix handle {id}: arena holds {len} matrices")]
    InvalidHandle { id: usize, len: usize },

    #[error("Tape of {entries} entries was already replayed; call forget_current_sequence() before backward() again")]
    TapeAlreadyReplayed { entries: usize },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for TapeError {
    fn from(err: serde_json::Error) -> Self {
        TapeError::SerializationError(err.to_string())
    }
}
