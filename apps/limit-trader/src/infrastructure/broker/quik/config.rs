//! QUIK adapter configuration.

use std::time::Duration;

use crate::config::QuikSettings;

/// Instrument class listed and traded by default (SPB exchange, foreign shares).
pub const DEFAULT_CLASS_CODE: &str = "SPBXM";

/// Configuration for the QUIK broker adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuikConfig {
    /// Trading account transactions are booked on.
    pub account: String,
    /// Host running the QUIK Lua connector.
    pub host: String,
    /// Command socket port.
    pub cmd_port: u16,
    /// Callback socket port.
    pub callback_port: u16,
    /// Instrument class for the catalog and transactions.
    pub class_code: String,
    /// Per-socket dial timeout.
    pub connect_timeout: Duration,
    /// Deadline covering both writes of one command.
    pub write_timeout: Duration,
    /// Deadline for reading one response line.
    pub read_timeout: Duration,
    /// Pause before every `sendTransaction`. QUIK charges a fee above ~20/s.
    pub transaction_delay: Duration,
}

impl QuikConfig {
    /// Create a configuration with default class code and timings.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        host: impl Into<String>,
        cmd_port: u16,
        callback_port: u16,
    ) -> Self {
        Self {
            account: account.into(),
            host: host.into(),
            cmd_port,
            callback_port,
            class_code: DEFAULT_CLASS_CODE.to_string(),
            connect_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
            transaction_delay: Duration::from_millis(100),
        }
    }

    /// Set the instrument class.
    #[must_use]
    pub fn with_class_code(mut self, class_code: impl Into<String>) -> Self {
        self.class_code = class_code.into();
        self
    }

    /// Set the dial timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the write deadline.
    #[must_use]
    pub const fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set the read deadline.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the pause before each transaction.
    #[must_use]
    pub const fn with_transaction_delay(mut self, delay: Duration) -> Self {
        self.transaction_delay = delay;
        self
    }

    /// `host:port` of the command socket.
    #[must_use]
    pub fn cmd_addr(&self) -> String {
        format!("{}:{}", self.host, self.cmd_port)
    }

    /// `host:port` of the callback socket.
    #[must_use]
    pub fn callback_addr(&self) -> String {
        format!("{}:{}", self.host, self.callback_port)
    }

    /// Reject settings that cannot work before any dial is attempted.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.account.trim().is_empty() {
            return Err("account must not be empty".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.cmd_port == 0 || self.callback_port == 0 {
            return Err("ports must be non-zero".to_string());
        }
        if self.class_code.trim().is_empty() {
            return Err("class_code must not be empty".to_string());
        }
        Ok(())
    }
}

impl From<&QuikSettings> for QuikConfig {
    fn from(settings: &QuikSettings) -> Self {
        Self::new(
            settings.account.clone(),
            settings.host.clone(),
            settings.port.cmd,
            settings.port.callback,
        )
        .with_class_code(settings.class_code.clone())
        .with_connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .with_write_timeout(Duration::from_millis(settings.write_timeout_ms))
        .with_read_timeout(Duration::from_millis(settings.read_timeout_ms))
        .with_transaction_delay(Duration::from_millis(settings.transaction_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = QuikConfig::new("L01-00000F00", "127.0.0.1", 34130, 34131);
        assert_eq!(config.class_code, "SPBXM");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.write_timeout, Duration::from_secs(5));
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.transaction_delay, Duration::from_millis(100));
    }

    #[test]
    fn config_addresses() {
        let config = QuikConfig::new("acc", "quik.local", 34130, 34131);
        assert_eq!(config.cmd_addr(), "quik.local:34130");
        assert_eq!(config.callback_addr(), "quik.local:34131");
    }

    #[test]
    fn from_settings() {
        let settings: QuikSettings = serde_yaml_bw::from_str(
            "account: acc\nhost: quik.local\nport: {cmd: 34130, callback: 34131}\ntransaction_delay_ms: 250\n",
        )
        .unwrap();
        let config = QuikConfig::from(&settings);
        assert_eq!(config.cmd_addr(), "quik.local:34130");
        assert_eq!(config.class_code, DEFAULT_CLASS_CODE);
        assert_eq!(config.transaction_delay, Duration::from_millis(250));
        assert_eq!(config.read_timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_validation() {
        assert!(QuikConfig::new("acc", "h", 1, 2).validate().is_ok());
        assert!(QuikConfig::new("", "h", 1, 2).validate().is_err());
        assert!(QuikConfig::new("acc", " ", 1, 2).validate().is_err());
        assert!(QuikConfig::new("acc", "h", 0, 2).validate().is_err());
        assert!(
            QuikConfig::new("acc", "h", 1, 2)
                .with_class_code("")
                .validate()
                .is_err()
        );
    }
}
