//! List Tickers Use Case

use crate::application::ports::{TradeClientError, TradeClientPort};
use crate::domain::shared::Ticker;

/// Use case for listing the tickers a backend can trade.
pub struct ListTickersUseCase<'a, C>
where
    C: TradeClientPort,
{
    client: &'a mut C,
}

impl<'a, C> ListTickersUseCase<'a, C>
where
    C: TradeClientPort,
{
    /// Create a new `ListTickersUseCase`.
    pub const fn new(client: &'a mut C) -> Self {
        Self { client }
    }

    /// Tickers in backend order.
    pub async fn execute(&mut self) -> Result<Vec<Ticker>, TradeClientError> {
        let stocks = self.client.get_stocks().await?;
        Ok(stocks.into_iter().map(|stock| stock.ticker).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTradeClientPort;
    use crate::domain::trading::Stock;

    #[tokio::test]
    async fn keeps_backend_order() {
        let mut client = MockTradeClientPort::new();
        client.expect_get_stocks().times(1).returning(|| {
            Ok(vec![
                Stock {
                    ticker: Ticker::new("MSFT"),
                    currency: "USD".to_string(),
                },
                Stock {
                    ticker: Ticker::new("AAPL"),
                    currency: "USD".to_string(),
                },
            ])
        });

        let tickers = ListTickersUseCase::new(&mut client).execute().await.unwrap();

        assert_eq!(tickers, vec![Ticker::new("MSFT"), Ticker::new("AAPL")]);
    }
}
