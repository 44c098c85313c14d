//! Broker Adapters
//!
//! Implementations of `TradeClientPort` for the supported brokers, and the
//! closed `Backend` enum the CLI holds.

pub mod quik;
pub mod tinkoff;

use async_trait::async_trait;

pub use quik::{QuikBrokerAdapter, QuikConfig, QuikError};
pub use tinkoff::{TinkoffBrokerAdapter, TinkoffConfig, TinkoffError};

use crate::application::ports::{TradeClientError, TradeClientPort};
use crate::config::ProviderConfig;
use crate::domain::trading::{Limit, Stock};

/// The trading backend selected at startup.
#[derive(Debug)]
pub enum Backend {
    /// QUIK Lua connector over TCP.
    Socket(QuikBrokerAdapter),
    /// Tinkoff Invest OpenAPI over HTTPS.
    Rest(TinkoffBrokerAdapter),
}

impl Backend {
    /// Build the adapter for a validated provider section. Does not touch the
    /// network.
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, TradeClientError> {
        match config {
            ProviderConfig::Socket(settings) => {
                let adapter = QuikBrokerAdapter::new(QuikConfig::from(settings))?;
                Ok(Self::Socket(adapter))
            }
            ProviderConfig::Rest(settings) => {
                let adapter = TinkoffBrokerAdapter::new(TinkoffConfig::from(settings))?;
                Ok(Self::Rest(adapter))
            }
        }
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Socket(_) => "quik",
            Self::Rest(_) => "tinkoff",
        }
    }
}

#[async_trait]
impl TradeClientPort for Backend {
    async fn get_stocks(&mut self) -> Result<Vec<Stock>, TradeClientError> {
        match self {
            Self::Socket(adapter) => adapter.get_stocks().await,
            Self::Rest(adapter) => adapter.get_stocks().await,
        }
    }

    async fn add_limit(&mut self, limit: &Limit) -> Result<(), TradeClientError> {
        match self {
            Self::Socket(adapter) => adapter.add_limit(limit).await,
            Self::Rest(adapter) => adapter.add_limit(limit).await,
        }
    }

    async fn clear_limits(&mut self) -> Result<usize, TradeClientError> {
        match self {
            Self::Socket(adapter) => adapter.clear_limits().await,
            Self::Rest(adapter) => adapter.clear_limits().await,
        }
    }

    async fn close(&mut self) -> Result<(), TradeClientError> {
        match self {
            Self::Socket(adapter) => adapter.close().await,
            Self::Rest(adapter) => adapter.close().await,
        }
    }
}
