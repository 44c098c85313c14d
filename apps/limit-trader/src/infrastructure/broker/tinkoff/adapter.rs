//! Tinkoff broker adapter implementing `TradeClientPort`.

use async_trait::async_trait;

use crate::application::ports::{TradeClientError, TradeClientPort};
use crate::broker::{RateLimitPolicy, retry_on_rate_limit};
use crate::domain::shared::InstrumentCode;
use crate::domain::trading::{InstrumentCatalog, Limit, Stock};

use super::api_types::{LimitOrderRequest, MarketInstrumentList, Order, PlacedLimitOrder};
use super::config::TinkoffConfig;
use super::error::TinkoffError;
use super::http_client::TinkoffHttpClient;

/// Cancellation progress is logged after this many orders.
const PROGRESS_EVERY: usize = 10;

/// Tinkoff Invest broker adapter.
///
/// Every request is retried on HTTP 429 after a fixed wait. The instrument
/// list is fetched once per adapter and shared by `get_stocks` and
/// `add_limit`.
#[derive(Debug)]
pub struct TinkoffBrokerAdapter {
    client: TinkoffHttpClient,
    currency: String,
    rate_limit: RateLimitPolicy,
    catalog: Option<InstrumentCatalog>,
}

impl TinkoffBrokerAdapter {
    /// Create a new Tinkoff broker adapter. No request is made until first use.
    pub fn new(config: TinkoffConfig) -> Result<Self, TinkoffError> {
        let client = TinkoffHttpClient::new(&config)?;
        Ok(Self {
            client,
            currency: config.currency,
            rate_limit: config.rate_limit,
            catalog: None,
        })
    }

    /// Cached catalog, fetched on first call.
    async fn catalog(&mut self) -> Result<&InstrumentCatalog, TinkoffError> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => self.load_catalog().await?,
        };
        Ok(self.catalog.insert(catalog))
    }

    async fn load_catalog(&self) -> Result<InstrumentCatalog, TinkoffError> {
        let list: MarketInstrumentList = retry_on_rate_limit(&self.rate_limit, "market/stocks", || {
            self.client.get("/market/stocks", &[])
        })
        .await?;

        let catalog: InstrumentCatalog = list
            .instruments
            .iter()
            .map(|instrument| instrument.to_instrument())
            .collect();
        tracing::info!(instruments = catalog.len(), "Loaded Tinkoff instrument list");
        Ok(catalog)
    }

    async fn resolve_figi(&mut self, limit: &Limit) -> Result<InstrumentCode, TinkoffError> {
        self.catalog()
            .await?
            .resolve(limit.ticker())
            .map(|instrument| instrument.code.clone())
            .map_err(|_| TinkoffError::UnknownTicker {
                ticker: limit.ticker().to_string(),
            })
    }

    async fn place_limit(&mut self, limit: &Limit) -> Result<(), TinkoffError> {
        let figi = self.resolve_figi(limit).await?;
        let body = LimitOrderRequest::buy(limit.lots(), limit.price());

        tracing::debug!(
            ticker = %limit.ticker(),
            figi = %figi,
            lots = body.lots,
            price = %body.price,
            "Placing limit order"
        );

        let query = [("figi", figi.as_str())];
        let placed: PlacedLimitOrder =
            retry_on_rate_limit(&self.rate_limit, "orders/limit-order", || {
                self.client.post("/orders/limit-order", &query, Some(&body))
            })
            .await?;

        if placed.is_rejected() {
            return Err(TinkoffError::OrderRejected(placed.rejection_reason()));
        }

        tracing::info!(
            ticker = %limit.ticker(),
            order_id = %placed.order_id,
            status = %placed.status,
            "Limit order placed"
        );
        Ok(())
    }

    async fn cancel_all(&self) -> Result<usize, TinkoffError> {
        let orders: Vec<Order> =
            retry_on_rate_limit(&self.rate_limit, "orders", || self.client.get("/orders", &[]))
                .await?;

        tracing::info!(orders = orders.len(), "Cancelling open orders");

        let mut cancelled = 0;
        for order in &orders {
            let query = [("orderId", order.order_id.as_str())];
            let operation = format!("orders/cancel ({cancelled} cleared so far)");
            let _: serde_json::Value = retry_on_rate_limit(&self.rate_limit, &operation, || {
                self.client.post("/orders/cancel", &query, None::<&()>)
            })
            .await?;

            cancelled += 1;
            if cancelled % PROGRESS_EVERY == 0 {
                tracing::info!("{} limits have been cleared", cancelled);
            }
        }

        Ok(cancelled)
    }
}

#[async_trait]
impl TradeClientPort for TinkoffBrokerAdapter {
    async fn get_stocks(&mut self) -> Result<Vec<Stock>, TradeClientError> {
        let currency = self.currency.clone();
        let catalog = self.catalog().await.map_err(TradeClientError::from)?;
        Ok(catalog.stocks_in(&currency))
    }

    async fn add_limit(&mut self, limit: &Limit) -> Result<(), TradeClientError> {
        self.place_limit(limit).await.map_err(TradeClientError::from)
    }

    async fn clear_limits(&mut self) -> Result<usize, TradeClientError> {
        self.cancel_all().await.map_err(TradeClientError::from)
    }

    async fn close(&mut self) -> Result<(), TradeClientError> {
        Ok(())
    }
}
