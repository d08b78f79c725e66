use async_trait::async_trait;
use std::time::SystemTime;

use super::market_data_errors::Result;
use super::market_data_model::{OhlcvBar, TickerQuote};

/// The read-only price oracle the engine depends on. Implemented by concrete
/// providers and by the ordered fallback registry; tests substitute a double.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Resolves a ticker to its display name, last price and previous close.
    async fn resolve(&self, ticker: &str) -> Result<TickerQuote>;

    /// Fetches daily OHLCV bars for a ticker between two points in time.
    async fn daily_history(
        &self,
        ticker: &str,
        start: SystemTime,
        end: SystemTime,
    ) -> Result<Vec<OhlcvBar>>;
}
