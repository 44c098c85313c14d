//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod clear_limits;
mod list_tickers;
mod set_limits;

pub use clear_limits::ClearLimitsUseCase;
pub use list_tickers::ListTickersUseCase;
pub use set_limits::{SetLimitsError, SetLimitsUseCase};
