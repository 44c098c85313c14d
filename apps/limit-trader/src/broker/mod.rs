//! Broker-agnostic resilience.
//!
//! Vendor adapters live in `infrastructure::broker`; this module holds what
//! they share.

mod retry;

pub use retry::{
    DEFAULT_RATE_LIMIT_WAIT, RateLimitClassify, RateLimitPolicy, parse_retry_after,
    retry_on_rate_limit,
};
