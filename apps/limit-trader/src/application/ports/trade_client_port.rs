//! Trade Client Port (Driven Port)
//!
//! The one contract both trading backends satisfy. The CLI and use cases depend
//! on nothing else.

use async_trait::async_trait;

use crate::domain::shared::DomainError;
use crate::domain::trading::{Limit, Stock};

/// Trade client port error.
///
/// Adapters map their own error enums into this taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeClientError {
    /// Adapter settings are unusable (detected before any network activity).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error details.
        message: String,
    },

    /// Dial failure, I/O failure or network timeout.
    #[error("Broker connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Malformed or unexpected data on the wire.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error details.
        message: String,
    },

    /// The backend answered a different command than the one sent. The socket
    /// connector does this when a Lua handler fails.
    #[error("Protocol error: got error response to {request_cmd}: {lua_error}")]
    ErrorResponse {
        /// Command that was sent.
        request_cmd: String,
        /// Command the response carried.
        response_cmd: String,
        /// Error text reported by the backend.
        lua_error: String,
    },

    /// Ticker is absent from the backend's instrument catalog.
    #[error("unknown ticker: {ticker}")]
    UnknownTicker {
        /// The ticker that failed to resolve.
        ticker: String,
    },

    /// Rate limited by the broker and no further retry is allowed.
    #[error("Rate limited by broker")]
    RateLimited {
        /// Broker-suggested wait, when provided.
        retry_after_secs: Option<u64>,
    },

    /// Any other broker-side failure.
    #[error("Broker error: {message}")]
    Backend {
        /// Error details.
        message: String,
    },
}

impl From<DomainError> for TradeClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnknownTicker { ticker } => Self::UnknownTicker { ticker },
            DomainError::InvalidValue { .. } => Self::Backend {
                message: err.to_string(),
            },
        }
    }
}

/// Port for trading backends.
///
/// Every method takes `&mut self`: a client owns its connection, transaction
/// counter and catalog, and serves a single sequential caller. No method is
/// idempotent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeClientPort: Send {
    /// All instruments the backend currently offers, in backend order.
    async fn get_stocks(&mut self) -> Result<Vec<Stock>, TradeClientError>;

    /// Place one buy limit order for `limit.lots()` at `limit.price()`.
    async fn add_limit(&mut self, limit: &Limit) -> Result<(), TradeClientError>;

    /// Cancel every outstanding order and return how many were cancelled.
    async fn clear_limits(&mut self) -> Result<usize, TradeClientError>;

    /// Release network resources held by the client.
    async fn close(&mut self) -> Result<(), TradeClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ticker_maps_from_domain() {
        let err: TradeClientError = DomainError::UnknownTicker {
            ticker: "ZZZZ".to_string(),
        }
        .into();
        assert_eq!(
            err,
            TradeClientError::UnknownTicker {
                ticker: "ZZZZ".to_string()
            }
        );
    }

    #[test]
    fn invalid_value_maps_to_backend() {
        let err: TradeClientError = DomainError::InvalidValue {
            field: "lots".to_string(),
            message: "must be positive".to_string(),
        }
        .into();
        assert!(matches!(err, TradeClientError::Backend { .. }));
    }

    #[test]
    fn error_display() {
        let err = TradeClientError::Protocol {
            message: "got error response: boom".to_string(),
        };
        assert_eq!(err.to_string(), "Protocol error: got error response: boom");
    }

    #[test]
    fn error_response_display_names_command_and_lua_error() {
        let err = TradeClientError::ErrorResponse {
            request_cmd: "sendTransaction".to_string(),
            response_cmd: "lua_error".to_string(),
            lua_error: "bad SECCODE".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Protocol error: got error response to sendTransaction: bad SECCODE"
        );
    }
}
