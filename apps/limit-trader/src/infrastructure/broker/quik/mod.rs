//! QUIK Broker Adapter
//!
//! Implementation of `TradeClientPort` over the QUIK Lua connector:
//! - Line-delimited JSON on a command socket, plus a callback socket
//! - Lazy connect, no automatic reconnect
//! - Responses correlated to requests by `cmd`

mod adapter;
mod config;
mod connection;
mod error;
mod message;
mod transaction;

pub use adapter::QuikBrokerAdapter;
pub use config::{DEFAULT_CLASS_CODE, QuikConfig};
pub use error::QuikError;
pub use message::Message;
