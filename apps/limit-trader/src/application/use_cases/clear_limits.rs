//! Clear Limits Use Case

use crate::application::ports::{TradeClientError, TradeClientPort};

/// Use case for cancelling every outstanding order on the account.
pub struct ClearLimitsUseCase<'a, C>
where
    C: TradeClientPort,
{
    client: &'a mut C,
}

impl<'a, C> ClearLimitsUseCase<'a, C>
where
    C: TradeClientPort,
{
    /// Create a new `ClearLimitsUseCase`.
    pub const fn new(client: &'a mut C) -> Self {
        Self { client }
    }

    /// Cancel all orders and return how many the broker cancelled.
    pub async fn execute(&mut self) -> Result<usize, TradeClientError> {
        let cancelled = self.client.clear_limits().await?;
        tracing::info!(cancelled, "Limits cleared");
        Ok(cancelled)
    }
}
