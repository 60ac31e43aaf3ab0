//! Error types for the ledger-analytics library.

use thiserror::Error;

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur during analytics operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Not enough distinct calendar dates to fit a forecast.
    #[error("insufficient history: need at least {needed} distinct dates, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// Not enough distinct counterparties to segment.
    #[error("insufficient customers: need at least {needed} distinct counterparties, got {got}")]
    InsufficientCustomers { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Date-related error.
    #[error("date error: {0}")]
    DateError(String),
}
