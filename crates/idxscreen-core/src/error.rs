use thiserror::Error;

/// Validation and contract errors exposed by `idxscreen-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("trade date must be a valid calendar date: '{value}'")]
    InvalidDate { value: String },

    #[error("instrument name cannot be empty")]
    EmptyInstrumentName,

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be strictly positive")]
    NonPositivePrice { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("price series must contain at least one bar")]
    EmptySeries,
    #[error("price series bars must be strictly ascending by date (violation at index {index})")]
    UnorderedSeries { index: usize },

    #[error("minimum daily gain must be a finite percentage > 0: {value}")]
    InvalidGainThreshold { value: f64 },
    #[error("minimum traded value must be finite and non-negative: {value}")]
    InvalidValueThreshold { value: f64 },
    #[error("consecutive day count must be between {min} and {max}: {value}")]
    InvalidConsecutiveDays {
        value: usize,
        min: usize,
        max: usize,
    },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
