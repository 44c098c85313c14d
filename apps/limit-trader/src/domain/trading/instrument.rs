//! Instruments and the per-backend instrument catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, InstrumentCode, Ticker};

/// A tradeable instrument as a backend knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange ticker.
    pub ticker: Ticker,
    /// Backend identifier (security code or FIGI).
    pub code: InstrumentCode,
    /// Quote currency (e.g. "USD").
    pub currency: String,
}

/// Public view of an instrument: ticker and currency only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Exchange ticker.
    pub ticker: Ticker,
    /// Quote currency.
    pub currency: String,
}

impl From<&Instrument> for Stock {
    fn from(instrument: &Instrument) -> Self {
        Self {
            ticker: instrument.ticker.clone(),
            currency: instrument.currency.clone(),
        }
    }
}

/// Ticker → instrument mapping loaded once per client.
///
/// Tickers are unique; inserting a ticker twice keeps the last instrument.
/// Iteration is in ticker order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentCatalog {
    instruments: BTreeMap<Ticker, Instrument>,
}

impl InstrumentCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instruments: BTreeMap::new(),
        }
    }

    /// Add an instrument, replacing any previous entry for the same ticker.
    pub fn insert(&mut self, instrument: Instrument) {
        self.instruments
            .insert(instrument.ticker.clone(), instrument);
    }

    /// Resolve a ticker to its instrument.
    pub fn resolve(&self, ticker: &Ticker) -> Result<&Instrument, DomainError> {
        self.instruments
            .get(ticker)
            .ok_or_else(|| DomainError::UnknownTicker {
                ticker: ticker.to_string(),
            })
    }

    /// Number of instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether the catalog has no instruments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Iterate instruments in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    /// All instruments as stocks.
    #[must_use]
    pub fn stocks(&self) -> Vec<Stock> {
        self.iter().map(Stock::from).collect()
    }

    /// Instruments quoted in `currency` as stocks.
    #[must_use]
    pub fn stocks_in(&self, currency: &str) -> Vec<Stock> {
        self.iter()
            .filter(|instrument| instrument.currency.eq_ignore_ascii_case(currency))
            .map(Stock::from)
            .collect()
    }
}

impl FromIterator<Instrument> for InstrumentCatalog {
    fn from_iter<I: IntoIterator<Item = Instrument>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for instrument in iter {
            catalog.insert(instrument);
        }
        catalog
    }
}
