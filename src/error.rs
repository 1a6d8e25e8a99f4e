use thiserror::Error;

use crate::data::model::{Position, SpotKey};

/// Convenience alias used throughout the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Record level
// ---------------------------------------------------------------------------

/// A single record carries a field that violates its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} cannot be less than zero (got {value})")]
    NegativeIndex { field: &'static str, value: i64 },

    #[error("{field} is out of range (got {value})")]
    IndexOutOfRange { field: &'static str, value: i64 },

    #[error("minimum ({min}) must not exceed maximum ({max})")]
    MinExceedsMax { min: f64, max: f64 },

    #[error("mean ({mean}) must lie in the interval [{min}; {max}]")]
    MeanOutOfRange { mean: f64, min: f64, max: f64 },
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

/// The text handed to a decoder is not in the expected format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("missing header")]
    MissingHeader,

    #[error("malformed row at line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("reading TSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid measurement: {0}")]
    Validation(#[from] ValidationError),

    #[error("provided datapoints contain the duplicate key {0}")]
    DuplicateKey(SpotKey),

    #[error(
        "spotfields have a differing shape: position {position} occurs {found} times, expected {expected}"
    )]
    IrregularShape {
        position: Position,
        expected: usize,
        found: usize,
    },

    #[error("malformed input: {0}")]
    Format(#[from] FormatError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Format(FormatError::Json(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Format(FormatError::Csv(err))
    }
}
