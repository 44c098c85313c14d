//! Fixed-wait retry for rate-limited broker calls.
//!
//! A rate-limited call is repeated after a flat wait, for as long as the
//! broker keeps answering 429. There is no exponential growth and, unless a
//! cap is configured, no attempt limit. Every other error is returned as-is.
//!
//! # Example
//!
//! ```rust,ignore
//! use limit_trader::broker::{RateLimitPolicy, retry_on_rate_limit};
//!
//! let policy = RateLimitPolicy::default(); // 30s wait, unbounded
//! let stocks = retry_on_rate_limit(&policy, "market/stocks", || client.stocks()).await?;
//! ```

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Default wait between rate-limited attempts.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(30);

/// Retry policy for HTTP 429 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Wait before each repeated attempt (default: 30s).
    ///
    /// Always this fixed wait: a `Retry-After` header is reported in the error
    /// but never used to pick the sleep.
    pub wait: Duration,
    /// Total attempts allowed, `None` for unbounded (default: `None`).
    pub max_attempts: Option<u32>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            wait: DEFAULT_RATE_LIMIT_WAIT,
            max_attempts: None,
        }
    }
}

impl RateLimitPolicy {
    /// Create an unbounded policy with the given wait.
    #[must_use]
    pub const fn new(wait: Duration) -> Self {
        Self {
            wait,
            max_attempts: None,
        }
    }

    /// Cap the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    const fn exhausted(&self, attempts: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts >= max,
            None => false,
        }
    }
}

/// Errors that can tell whether the broker asked us to slow down.
pub trait RateLimitClassify {
    /// True for rate-limit rejections that are worth repeating.
    fn is_rate_limited(&self) -> bool;
}

/// Parse a `Retry-After` header given in seconds.
///
/// HTTP-date values are not supported and yield `None`.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Run `call` until it succeeds, fails with a non-rate-limit error, or the
/// policy's attempt cap is reached.
pub async fn retry_on_rate_limit<T, E, F, Fut>(
    policy: &RateLimitPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RateLimitClassify + Display,
{
    let mut attempts = 0_u32;

    loop {
        attempts += 1;
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limited() => {
                if policy.exhausted(attempts) {
                    tracing::warn!(
                        operation,
                        attempts,
                        "Rate limit retries exhausted"
                    );
                    return Err(err);
                }
                tracing::warn!(
                    operation,
                    attempt = attempts,
                    wait_secs = policy.wait.as_secs_f64(),
                    error = %err,
                    "Rate limited, waiting before retry"
                );
                tokio::time::sleep(policy.wait).await;
            }
            Err(err) => return Err(err),
        }
    }
}
