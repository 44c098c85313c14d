//! Limit value object.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, Ticker};

/// A buy limit to place: `lots` lots of `ticker` at `price` or better.
///
/// Immutable once constructed. Carries no identity beyond its fields, so
/// submitting the same limit twice places two orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    ticker: Ticker,
    price: Decimal,
    lots: u32,
}

impl Limit {
    /// Create a new limit.
    ///
    /// The ticker must be non-empty, the price positive and the lot count
    /// non-zero.
    pub fn new(ticker: Ticker, price: Decimal, lots: u32) -> Result<Self, DomainError> {
        if ticker.as_str().trim().is_empty() {
            return Err(DomainError::InvalidValue {
                field: "ticker".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if price <= Decimal::ZERO {
            return Err(DomainError::InvalidValue {
                field: "price".to_string(),
                message: format!("must be positive, got {price}"),
            });
        }
        if lots == 0 {
            return Err(DomainError::InvalidValue {
                field: "lots".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(Self { ticker, price, lots })
    }

    /// Ticker to buy.
    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Limit price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Number of lots.
    #[must_use]
    pub const fn lots(&self) -> u32 {
        self.lots
    }

    /// Price as sent on the wire: exactly two decimal places.
    #[must_use]
    pub fn price_text(&self) -> String {
        format_price(self.price)
    }
}

/// Round a price to cents. Halves round away from zero (`1.015` → `1.02`).
#[must_use]
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a price with exactly two decimal places, rounded by [`round_price`].
#[must_use]
pub fn format_price(price: Decimal) -> String {
    format!("{:.2}", round_price(price))
}
