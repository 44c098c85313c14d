//! Trading Bounded Context
//!
//! Limits read from the template and the instrument catalog every backend
//! resolves them against.

mod instrument;
mod limit;

pub use instrument::{Instrument, InstrumentCatalog, Stock};
pub use limit::{Limit, format_price, round_price};
