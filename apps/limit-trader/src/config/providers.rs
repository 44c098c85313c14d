//! Per-provider settings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::ConfigError;

/// Trading backend selected with `--provider`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    /// QUIK Lua connector (socket protocol).
    Open,
    /// Tinkoff Invest OpenAPI (REST).
    Tinkoff,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Tinkoff => write!(f, "tinkoff"),
        }
    }
}

/// `providers:` section.
///
/// Sections stay raw YAML until [`Config::provider`](super::Config::provider)
/// picks one, so a broken section only fails the provider it belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Raw `providers.open` section.
    #[serde(default)]
    pub open: Option<serde_yaml_bw::Value>,
    /// Raw `providers.tinkoff` section.
    #[serde(default)]
    pub tinkoff: Option<serde_yaml_bw::Value>,
}

/// Validated settings of the selected provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// Socket backend.
    Socket(QuikSettings),
    /// REST backend.
    Rest(TinkoffSettings),
}

// ============================================
// QUIK
// ============================================

/// `providers.open` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuikSettings {
    /// Trading account.
    pub account: String,
    /// Connector host.
    pub host: String,
    /// Connector ports.
    pub port: QuikPorts,
    /// Instrument class.
    #[serde(default = "default_class_code")]
    pub class_code: String,
    /// Dial timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Write deadline in milliseconds.
    #[serde(default = "default_socket_timeout_ms")]
    pub write_timeout_ms: u64,
    /// Read deadline in milliseconds.
    #[serde(default = "default_socket_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Pause before each transaction in milliseconds.
    #[serde(default = "default_transaction_delay_ms")]
    pub transaction_delay_ms: u64,
}

/// `providers.open.port` section. Ports may be written as numbers or strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuikPorts {
    /// Command socket port.
    #[serde(deserialize_with = "deserialize_port")]
    pub cmd: u16,
    /// Callback socket port.
    #[serde(deserialize_with = "deserialize_port")]
    pub callback: u16,
}

impl QuikSettings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("providers.open.account", &self.account)?;
        require_non_empty("providers.open.host", &self.host)?;
        require_non_empty("providers.open.class_code", &self.class_code)?;
        if self.port.cmd == 0 || self.port.callback == 0 {
            return Err(ConfigError::ValidationError(
                "providers.open.port.cmd and port.callback must be non-zero".to_string(),
            ));
        }
        require_positive("providers.open.connect_timeout_ms", self.connect_timeout_ms)?;
        require_positive("providers.open.write_timeout_ms", self.write_timeout_ms)?;
        require_positive("providers.open.read_timeout_ms", self.read_timeout_ms)?;
        Ok(())
    }
}

fn default_class_code() -> String {
    "SPBXM".to_string()
}

const fn default_connect_timeout_ms() -> u64 {
    10_000
}

const fn default_socket_timeout_ms() -> u64 {
    5_000
}

const fn default_transaction_delay_ms() -> u64 {
    100
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PortValue {
        Number(u16),
        Text(String),
    }

    match PortValue::deserialize(deserializer)? {
        PortValue::Number(port) => Ok(port),
        PortValue::Text(text) => text
            .trim()
            .parse::<u16>()
            .map_err(|e| serde::de::Error::custom(format!("invalid port {text:?}: {e}"))),
    }
}

// ============================================
// Tinkoff
// ============================================

/// `providers.tinkoff` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TinkoffSettings {
    /// OpenAPI token.
    pub token: String,
    /// API base URL.
    #[serde(default = "default_tinkoff_base_url")]
    pub base_url: String,
    /// Broker account, default account when absent.
    #[serde(default)]
    pub broker_account_id: Option<String>,
    /// Currency listed by `tickers`.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_socket_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Wait after HTTP 429 in seconds.
    #[serde(default = "default_rate_limit_wait_secs")]
    pub rate_limit_wait_secs: u64,
}

impl TinkoffSettings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("providers.tinkoff.token", &self.token)?;
        require_non_empty("providers.tinkoff.base_url", &self.base_url)?;
        require_non_empty("providers.tinkoff.currency", &self.currency)?;
        require_positive("providers.tinkoff.request_timeout_ms", self.request_timeout_ms)?;
        require_positive(
            "providers.tinkoff.rate_limit_wait_secs",
            self.rate_limit_wait_secs,
        )?;
        Ok(())
    }
}

fn default_tinkoff_base_url() -> String {
    "https://api-invest.tinkoff.ru/openapi".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

const fn default_rate_limit_wait_secs() -> u64 {
    30
}

// ============================================
// Validation helpers
// ============================================

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn require_positive(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn quik() -> QuikSettings {
        QuikSettings {
            account: "acc".into(),
            host: "127.0.0.1".into(),
            port: QuikPorts {
                cmd: 34130,
                callback: 34131,
            },
            class_code: default_class_code(),
            connect_timeout_ms: default_connect_timeout_ms(),
            write_timeout_ms: default_socket_timeout_ms(),
            read_timeout_ms: default_socket_timeout_ms(),
            transaction_delay_ms: default_transaction_delay_ms(),
        }
    }

    fn tinkoff() -> TinkoffSettings {
        TinkoffSettings {
            token: "t".into(),
            base_url: default_tinkoff_base_url(),
            broker_account_id: None,
            currency: default_currency(),
            request_timeout_ms: default_socket_timeout_ms(),
            rate_limit_wait_secs: default_rate_limit_wait_secs(),
        }
    }

    #[test]
    fn valid_settings_pass() {
        assert!(quik().validate().is_ok());
        assert!(tinkoff().validate().is_ok());
    }

    #[test_case(QuikSettings { account: String::new(), ..quik() } ; "empty account")]
    #[test_case(QuikSettings { host: " ".into(), ..quik() } ; "blank host")]
    #[test_case(QuikSettings { port: QuikPorts { cmd: 0, callback: 1 }, ..quik() } ; "zero port")]
    #[test_case(QuikSettings { read_timeout_ms: 0, ..quik() } ; "zero read timeout")]
    fn invalid_quik_settings(settings: QuikSettings) {
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test_case(TinkoffSettings { token: String::new(), ..tinkoff() } ; "empty token")]
    #[test_case(TinkoffSettings { rate_limit_wait_secs: 0, ..tinkoff() } ; "zero wait")]
    #[test_case(TinkoffSettings { request_timeout_ms: 0, ..tinkoff() } ; "zero timeout")]
    fn invalid_tinkoff_settings(settings: TinkoffSettings) {
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn string_port_is_accepted() {
        let ports: QuikPorts = serde_yaml_bw::from_str("cmd: \"34130\"\ncallback: 34131\n").unwrap();
        assert_eq!(ports.cmd, 34130);
        assert_eq!(ports.callback, 34131);
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        assert!(serde_yaml_bw::from_str::<QuikPorts>("cmd: abc\ncallback: 1\n").is_err());
    }

    #[test]
    fn provider_display() {
        assert_eq!(Provider::Open.to_string(), "open");
        assert_eq!(Provider::Tinkoff.to_string(), "tinkoff");
    }
}
