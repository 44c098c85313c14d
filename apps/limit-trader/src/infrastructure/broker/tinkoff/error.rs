//! Tinkoff-specific error types.

use thiserror::Error;

use crate::application::ports::TradeClientError;
use crate::broker::RateLimitClassify;

/// Errors from the Tinkoff adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TinkoffError {
    /// Token is empty.
    #[error("Tinkoff token is missing")]
    MissingToken,

    /// Network error (connect, send, read body).
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete within the timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// HTTP 429.
    #[error("Rate limited (code=429)")]
    RateLimited {
        /// `Retry-After` header, when sent.
        retry_after_secs: Option<u64>,
    },

    /// HTTP 401/403.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Any other non-success response.
    #[error("API error: status {status}, {code} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from the payload.
        code: String,
        /// Error message from the payload.
        message: String,
    },

    /// Order accepted by the API but rejected by the exchange.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Ticker not in the instrument list.
    #[error("unknown ticker: {ticker}")]
    UnknownTicker {
        /// The ticker that failed to resolve.
        ticker: String,
    },
}

impl RateLimitClassify for TinkoffError {
    fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<TinkoffError> for TradeClientError {
    fn from(err: TinkoffError) -> Self {
        match err {
            TinkoffError::MissingToken => Self::Configuration {
                message: err.to_string(),
            },
            TinkoffError::Network(_) | TinkoffError::Timeout(_) => Self::Connection {
                message: err.to_string(),
            },
            TinkoffError::JsonParse(msg) => Self::Protocol { message: msg },
            TinkoffError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            TinkoffError::UnknownTicker { ticker } => Self::UnknownTicker { ticker },
            TinkoffError::AuthenticationFailed
            | TinkoffError::Api { .. }
            | TinkoffError::OrderRejected(_) => Self::Backend {
                message: err.to_string(),
            },
        }
    }
}
