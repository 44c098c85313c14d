//! Shared Value Objects
//!
//! Immutable domain types compared by value, not identity.

mod identifiers;

pub use identifiers::{InstrumentCode, OrderId, Ticker};
