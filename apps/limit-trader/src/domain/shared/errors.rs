//! Domain errors for limit trading.

use std::fmt;

/// Domain-level errors that can occur while building domain values.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Ticker is not present in the loaded instrument catalog.
    UnknownTicker {
        /// The ticker that failed to resolve.
        ticker: String,
    },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::UnknownTicker { ticker } => write!(f, "unknown ticker: {ticker}"),
        }
    }
}

impl std::error::Error for DomainError {}
