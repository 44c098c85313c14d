//! Tinkoff Invest OpenAPI request and response types.
//!
//! These types map directly to the OpenAPI v1 JSON format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{InstrumentCode, OrderId, Ticker};
use crate::domain::trading::{Instrument, round_price};

// ============================================================================
// Envelope
// ============================================================================

/// Every response body, success or error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Server-side request id, useful in support requests.
    #[serde(default)]
    pub tracking_id: String,
    /// "Ok" or "Error".
    #[serde(default)]
    pub status: String,
    /// Endpoint-specific payload.
    pub payload: T,
}

/// Payload of an "Error" envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Machine-readable code.
    #[serde(default)]
    pub code: String,
}

// ============================================================================
// Market
// ============================================================================

/// Payload of `GET /market/stocks`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketInstrumentList {
    /// Number of instruments.
    #[serde(default)]
    pub total: usize,
    /// Instruments.
    pub instruments: Vec<MarketInstrument>,
}

/// One tradeable instrument.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct MarketInstrument {
    /// FIGI, the id orders are placed against.
    pub figi: String,
    /// Exchange ticker.
    pub ticker: String,
    /// ISIN.
    #[serde(default)]
    pub isin: Option<String>,
    /// Lot size.
    #[serde(default)]
    pub lot: u32,
    /// Quote currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl MarketInstrument {
    /// Convert into the catalog entry.
    #[must_use]
    pub fn to_instrument(&self) -> Instrument {
        Instrument {
            ticker: Ticker::new(&self.ticker),
            code: InstrumentCode::new(&self.figi),
            currency: self.currency.clone().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Body of `POST /orders/limit-order`.
#[derive(Debug, Clone, Serialize)]
pub struct LimitOrderRequest {
    /// Number of lots.
    pub lots: u32,
    /// "Buy" or "Sell".
    pub operation: &'static str,
    /// Limit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl LimitOrderRequest {
    /// Buy `lots` at `price`, rounded to cents like the QUIK price text.
    #[must_use]
    pub fn buy(lots: u32, price: Decimal) -> Self {
        Self {
            lots,
            operation: "Buy",
            price: round_price(price),
        }
    }
}

/// Payload of `POST /orders/limit-order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct PlacedLimitOrder {
    /// Broker order id.
    pub order_id: String,
    /// "Buy" or "Sell".
    #[serde(default)]
    pub operation: String,
    /// Order status ("New", "Rejected", ...).
    #[serde(default)]
    pub status: String,
    /// Why the exchange refused the order.
    #[serde(default)]
    pub reject_reason: Option<String>,
    /// Free-form broker message.
    #[serde(default)]
    pub message: Option<String>,
    /// Lots requested.
    #[serde(default)]
    pub requested_lots: u32,
    /// Lots executed so far.
    #[serde(default)]
    pub executed_lots: u32,
}

impl PlacedLimitOrder {
    /// Whether the broker refused the order.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.status.eq_ignore_ascii_case("Rejected")
    }

    /// Best available explanation for a rejection.
    #[must_use]
    pub fn rejection_reason(&self) -> String {
        self.reject_reason
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| self.status.clone())
    }
}

/// Element of the `GET /orders` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct Order {
    /// Broker order id.
    pub order_id: OrderId,
    /// Instrument FIGI.
    pub figi: String,
    /// "Buy" or "Sell".
    #[serde(default)]
    pub operation: String,
    /// Order status.
    #[serde(default)]
    pub status: String,
    /// Lots requested.
    #[serde(default)]
    pub requested_lots: u32,
    /// Lots executed so far.
    #[serde(default)]
    pub executed_lots: u32,
    /// Limit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
