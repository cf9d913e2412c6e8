use thiserror::Error;

/// Construction-time validation errors exposed by `backtester-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("time series dates are required")]
    MissingDates,
    #[error("time series values are required")]
    MissingValues,
    #[error("dates/values must have matching lengths (dates={dates}, values={values})")]
    LengthMismatch { dates: usize, values: usize },
    #[error("invalid date string at index {index}: '{value}' (YYYY-MM-DD is required)")]
    InvalidDate { index: usize, value: String },

    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("amount must be a positive finite number, got {value}")]
    NonPositiveAmount { value: String },
    #[error("invalid rebalance schedule '{value}', expected one of never, monthly, quarterly, yearly")]
    InvalidSchedule { value: String },
}

/// Errors raised by operations on a set of time series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("time series set has no members")]
    EmptySet,

    #[error("time series set members share no common date")]
    NoCommonDates,

    #[error("date out of range: {date} (common range is {start}..={end})")]
    OutOfRange {
        date: String,
        start: String,
        end: String,
    },

    #[error("series '{series}' has no value on common date {date}")]
    Alignment { series: String, date: String },

    #[error("expected {expected} target percents, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} share quantities, got {actual}")]
    AllocationSizeMismatch { expected: usize, actual: usize },
}
