//! QUIK broker adapter implementing `TradeClientPort`.

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{TradeClientError, TradeClientPort};
use crate::domain::shared::{InstrumentCode, Ticker};
use crate::domain::trading::{Instrument, InstrumentCatalog, Limit, Stock};

use super::config::QuikConfig;
use super::connection::QuikConnection;
use super::error::QuikError;
use super::message::Message;
use super::transaction::Transaction;

const CMD_CLASS_SECURITY_INFO: &str = "getClassSecurityInfo";
const CMD_SEND_TRANSACTION: &str = "sendTransaction";
const CMD_CANCEL_ALL_ORDERS: &str = "cancelAllOrders";

/// QUIK Lua connector adapter.
///
/// Connects lazily on the first command and never reconnects on its own. One
/// command is in flight at a time.
#[derive(Debug)]
pub struct QuikBrokerAdapter {
    config: QuikConfig,
    connection: Option<QuikConnection>,
    transaction_id: u64,
    catalog: Option<InstrumentCatalog>,
}

impl QuikBrokerAdapter {
    /// Create a new QUIK adapter. No socket is opened until first use.
    pub fn new(config: QuikConfig) -> Result<Self, QuikError> {
        config.validate().map_err(QuikError::InvalidConfig)?;
        Ok(Self {
            config,
            connection: None,
            transaction_id: 1,
            catalog: None,
        })
    }

    /// Whether both sockets are currently held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Id of the most recently built transaction (1 before the first one).
    #[must_use]
    pub const fn transaction_id(&self) -> u64 {
        self.transaction_id
    }

    async fn send_command(&mut self, request: &Message) -> Result<Message, QuikError> {
        let connection = match self.connection.take() {
            Some(connection) => connection,
            None => QuikConnection::open(&self.config).await?,
        };
        let connection = self.connection.insert(connection);

        tracing::debug!(cmd = %request.cmd, "Sending QUIK command");
        connection.exchange(request).await
    }

    async fn catalog(&mut self) -> Result<&InstrumentCatalog, QuikError> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => self.load_catalog().await?,
        };
        Ok(self.catalog.insert(catalog))
    }

    async fn load_catalog(&mut self) -> Result<InstrumentCatalog, QuikError> {
        let request = Message::new(
            CMD_CLASS_SECURITY_INFO,
            Value::String(self.config.class_code.clone()),
        );
        let response = self.send_command(&request).await?;
        let catalog = parse_catalog(&response.data)?;

        tracing::info!(
            class_code = %self.config.class_code,
            instruments = catalog.len(),
            "Loaded QUIK class securities"
        );
        Ok(catalog)
    }

    async fn place_limit(&mut self, limit: &Limit) -> Result<(), QuikError> {
        let sec_code = self
            .catalog()
            .await?
            .resolve(limit.ticker())
            .map(|instrument| instrument.code.clone())
            .map_err(|_| QuikError::UnknownTicker {
                ticker: limit.ticker().to_string(),
            })?;

        self.transaction_id += 1;
        let transaction = Transaction::buy_limit(
            self.transaction_id,
            &self.config.account,
            &self.config.class_code,
            &sec_code,
            limit,
        );

        tokio::time::sleep(self.config.transaction_delay).await;

        let request = Message::new(CMD_SEND_TRANSACTION, serde_json::to_value(&transaction)?);
        self.send_command(&request).await?;

        tracing::info!(
            ticker = %limit.ticker(),
            trans_id = self.transaction_id,
            price = %transaction.price,
            lots = limit.lots(),
            "Limit transaction sent"
        );
        Ok(())
    }

    async fn cancel_all(&mut self) -> Result<usize, QuikError> {
        let request = Message::new(CMD_CANCEL_ALL_ORDERS, Value::Null);
        let response = self.send_command(&request).await?;
        parse_cancel_count(&response.data)
    }

    async fn disconnect(&mut self) -> Result<(), QuikError> {
        match self.connection.take() {
            Some(connection) => {
                tracing::info!("Disconnecting from QUIK");
                connection.shutdown().await
            }
            None => Ok(()),
        }
    }
}

/// `{ticker: {currency, code}}` → catalog. Anything else is rejected whole.
fn parse_catalog(data: &Value) -> Result<InstrumentCatalog, QuikError> {
    let securities = data.as_object().ok_or_else(|| {
        QuikError::UnknownResponseFormat(format!("expected security map, got {data}"))
    })?;

    securities
        .iter()
        .map(|(ticker, security)| {
            let field = |name: &str| {
                security
                    .get(name)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        QuikError::UnknownResponseFormat(format!(
                            "security {ticker} has no string {name}"
                        ))
                    })
            };
            Ok(Instrument {
                ticker: Ticker::new(ticker.as_str()),
                code: InstrumentCode::new(field("code")?),
                currency: field("currency")?,
            })
        })
        .collect()
}

/// `"7"` → 7.
fn parse_cancel_count(data: &Value) -> Result<usize, QuikError> {
    data.as_str()
        .and_then(|count| count.trim().parse::<usize>().ok())
        .ok_or_else(|| {
            QuikError::UnknownResponseFormat(format!("expected cancelled count, got {data}"))
        })
}

#[async_trait]
impl TradeClientPort for QuikBrokerAdapter {
    async fn get_stocks(&mut self) -> Result<Vec<Stock>, TradeClientError> {
        let catalog = self.catalog().await.map_err(TradeClientError::from)?;
        Ok(catalog.stocks())
    }

    async fn add_limit(&mut self, limit: &Limit) -> Result<(), TradeClientError> {
        self.place_limit(limit).await.map_err(TradeClientError::from)
    }

    async fn clear_limits(&mut self) -> Result<usize, TradeClientError> {
        let cancelled = self.cancel_all().await.map_err(TradeClientError::from)?;
        tracing::info!(cancelled, "QUIK cancelled all orders");
        Ok(cancelled)
    }

    async fn close(&mut self) -> Result<(), TradeClientError> {
        self.disconnect().await.map_err(TradeClientError::from)
    }
}
