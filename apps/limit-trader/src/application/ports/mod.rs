//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! - `TradeClientPort`: the brokerage backend (socket or REST)
//! - `LimitSourcePort`: where limits come from

mod limit_source_port;
mod trade_client_port;

pub use limit_source_port::{LimitSourceError, LimitSourcePort};
pub use trade_client_port::{TradeClientError, TradeClientPort};

#[cfg(test)]
pub use limit_source_port::MockLimitSourcePort;
#[cfg(test)]
pub use trade_client_port::MockTradeClientPort;
