//! Tinkoff Invest Broker Adapter
//!
//! Implementation of `TradeClientPort` over the Tinkoff Invest OpenAPI (REST):
//! - Bearer-token HTTP client with a per-request timeout
//! - Fixed-wait retry on HTTP 429 for every call
//! - Instrument list cached for the adapter's lifetime

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::TinkoffBrokerAdapter;
pub use config::{DEFAULT_BASE_URL, SANDBOX_BASE_URL, TinkoffConfig};
pub use error::TinkoffError;
