//! Tinkoff adapter configuration.

use std::time::Duration;

use crate::broker::RateLimitPolicy;
use crate::config::TinkoffSettings;

/// Production OpenAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-invest.tinkoff.ru/openapi";

/// Sandbox OpenAPI endpoint.
pub const SANDBOX_BASE_URL: &str = "https://api-invest.tinkoff.ru/openapi/sandbox";

/// Configuration for the Tinkoff broker adapter.
#[derive(Debug, Clone)]
pub struct TinkoffConfig {
    /// OpenAPI token.
    pub token: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Broker account, or the default account when `None`.
    pub broker_account_id: Option<String>,
    /// `get_stocks` only lists instruments quoted in this currency.
    pub currency: String,
    /// Per-request timeout (connect plus response).
    pub timeout: Duration,
    /// HTTP 429 handling.
    pub rate_limit: RateLimitPolicy,
}

impl TinkoffConfig {
    /// Create a configuration with production defaults.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            broker_account_id: None,
            currency: "USD".to_string(),
            timeout: Duration::from_secs(5),
            rate_limit: RateLimitPolicy::default(),
        }
    }

    /// Set the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Trade on a specific broker account.
    #[must_use]
    pub fn with_broker_account_id(mut self, broker_account_id: impl Into<String>) -> Self {
        self.broker_account_id = Some(broker_account_id.into());
        self
    }

    /// Set the currency `get_stocks` filters on.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the rate-limit policy.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate_limit: RateLimitPolicy) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}

impl From<&TinkoffSettings> for TinkoffConfig {
    fn from(settings: &TinkoffSettings) -> Self {
        let mut config = Self::new(settings.token.clone())
            .with_base_url(settings.base_url.clone())
            .with_currency(settings.currency.clone())
            .with_timeout(Duration::from_millis(settings.request_timeout_ms))
            .with_rate_limit(RateLimitPolicy::new(Duration::from_secs(
                settings.rate_limit_wait_secs,
            )));
        if let Some(account) = &settings.broker_account_id {
            config = config.with_broker_account_id(account.clone());
        }
        config
    }
}
