//! QUIK-specific error types.

use thiserror::Error;

use super::message::Message;
use crate::application::ports::TradeClientError;

/// Errors from the QUIK adapter.
#[derive(Debug, Error, Clone)]
pub enum QuikError {
    /// Settings rejected before any network activity.
    #[error("Invalid QUIK configuration: {0}")]
    InvalidConfig(String),

    /// Dial failed or timed out.
    #[error("Failed to connect to {addr}: {message}")]
    Connect {
        /// Address dialled.
        addr: String,
        /// Error details.
        message: String,
    },

    /// Socket deadline expired.
    #[error("Socket {operation} timed out")]
    Timeout {
        /// "write" or "read".
        operation: &'static str,
    },

    /// Socket I/O failure.
    #[error("Socket I/O error: {0}")]
    Io(String),

    /// A write transmitted fewer bytes than requested.
    #[error("Partial socket write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes accepted by the socket.
        written: usize,
        /// Bytes in the buffer.
        expected: usize,
    },

    /// Peer closed the command socket before a full line arrived.
    #[error("Connection closed by QUIK")]
    ConnectionClosed,

    /// Message could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// Response decoded but its `data` has the wrong shape.
    #[error("Unknown response format: {0}")]
    UnknownResponseFormat(String),

    /// Response `cmd` did not match the request.
    #[error("got error response: {}", response.lua_error)]
    ErrorResponse {
        /// Command that was sent.
        request_cmd: String,
        /// The decoded response, for inspection.
        response: Box<Message>,
    },

    /// Ticker not in the class security list.
    #[error("unknown ticker: {ticker}")]
    UnknownTicker {
        /// The ticker that failed to resolve.
        ticker: String,
    },
}

impl From<std::io::Error> for QuikError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for QuikError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<QuikError> for TradeClientError {
    fn from(err: QuikError) -> Self {
        match err {
            QuikError::InvalidConfig(message) => Self::Configuration { message },
            QuikError::Connect { .. }
            | QuikError::Timeout { .. }
            | QuikError::Io(_)
            | QuikError::ConnectionClosed => Self::Connection {
                message: err.to_string(),
            },
            QuikError::ShortWrite { .. }
            | QuikError::Json(_)
            | QuikError::UnknownResponseFormat(_) => Self::Protocol {
                message: err.to_string(),
            },
            QuikError::ErrorResponse {
                request_cmd,
                response,
            } => Self::ErrorResponse {
                request_cmd,
                response_cmd: response.cmd,
                lua_error: response.lua_error,
            },
            QuikError::UnknownTicker { ticker } => Self::UnknownTicker { ticker },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn error_response_message_includes_lua_error() {
        let response = Message {
            cmd: "lua_error".into(),
            data: Value::Null,
            time: String::new(),
            lua_error: "attempt to index a nil value".into(),
        };
        let err = QuikError::ErrorResponse {
            request_cmd: "sendTransaction".into(),
            response: Box::new(response),
        };
        assert_eq!(err.to_string(), "got error response: attempt to index a nil value");

        let client_err: TradeClientError = err.into();
        assert_eq!(
            client_err,
            TradeClientError::ErrorResponse {
                request_cmd: "sendTransaction".into(),
                response_cmd: "lua_error".into(),
                lua_error: "attempt to index a nil value".into(),
            }
        );
        assert!(client_err.to_string().contains("attempt to index"));
    }

    #[test]
    fn quik_error_to_trade_client_error_connection() {
        let err: TradeClientError = QuikError::ConnectionClosed.into();
        assert!(matches!(err, TradeClientError::Connection { .. }));

        let err: TradeClientError = QuikError::Timeout { operation: "read" }.into();
        assert!(matches!(err, TradeClientError::Connection { .. }));
    }

    #[test]
    fn quik_error_to_trade_client_error_short_write() {
        let err: TradeClientError = QuikError::ShortWrite {
            written: 3,
            expected: 10,
        }
        .into();
        assert!(matches!(err, TradeClientError::Protocol { .. }));
    }

    #[test]
    fn quik_error_to_trade_client_error_config() {
        let err: TradeClientError = QuikError::InvalidConfig("account must not be empty".into()).into();
        assert!(matches!(err, TradeClientError::Configuration { .. }));
    }
}
