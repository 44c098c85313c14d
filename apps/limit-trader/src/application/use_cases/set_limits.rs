//! Set Limits Use Case

use crate::application::ports::{LimitSourceError, LimitSourcePort, TradeClientError, TradeClientPort};

/// Progress is logged after this many placed limits.
const PROGRESS_EVERY: usize = 10;

/// Failure while setting limits. Carries how many were placed before it.
#[derive(Debug, thiserror::Error)]
pub enum SetLimitsError {
    /// The template could not be read.
    #[error("reading limits failed after {placed} placed: {source}")]
    Source {
        /// Limits placed before the failure.
        placed: usize,
        /// Underlying error.
        #[source]
        source: LimitSourceError,
    },

    /// The broker rejected or failed a limit.
    #[error("placing limit failed after {placed} placed: {source}")]
    Client {
        /// Limits placed before the failure.
        placed: usize,
        /// Underlying error.
        #[source]
        source: TradeClientError,
    },
}

impl SetLimitsError {
    /// Limits placed before the failure.
    #[must_use]
    pub const fn placed(&self) -> usize {
        match self {
            Self::Source { placed, .. } | Self::Client { placed, .. } => *placed,
        }
    }
}

/// Use case for placing every marked limit from a template.
///
/// Limits go out one at a time in template order. The first failure stops the
/// run; orders already placed stay placed.
pub struct SetLimitsUseCase<'a, C>
where
    C: TradeClientPort,
{
    client: &'a mut C,
}

impl<'a, C> SetLimitsUseCase<'a, C>
where
    C: TradeClientPort,
{
    /// Create a new `SetLimitsUseCase`.
    pub const fn new(client: &'a mut C) -> Self {
        Self { client }
    }

    /// Drain `source` into the broker and return the number of limits placed.
    pub async fn execute<S>(&mut self, source: &mut S) -> Result<usize, SetLimitsError>
    where
        S: LimitSourcePort,
    {
        let mut placed = 0;

        loop {
            let limit = match source.next_limit() {
                Ok(Some(limit)) => limit,
                Ok(None) => break,
                Err(source) => return Err(SetLimitsError::Source { placed, source }),
            };

            tracing::debug!(
                ticker = %limit.ticker(),
                price = %limit.price_text(),
                lots = limit.lots(),
                "Placing limit"
            );

            if let Err(source) = self.client.add_limit(&limit).await {
                tracing::error!(ticker = %limit.ticker(), error = %source, "Failed to place limit");
                return Err(SetLimitsError::Client { placed, source });
            }

            placed += 1;
            if placed % PROGRESS_EVERY == 0 {
                tracing::info!("{} limits are set so far", placed);
            }
        }

        tracing::info!(placed, "Limits set");
        Ok(placed)
    }
}
