use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use log::{info, warn};
use tokio::time::timeout;

use crate::constants::PRICE_ORACLE_TIMEOUT_SECS;
use crate::market_data::market_data_errors::{MarketDataError, Result};
use crate::market_data::market_data_model::{OhlcvBar, TickerQuote};
use crate::market_data::market_data_traits::PriceOracle;
use crate::market_data::providers::yahoo_provider::YahooProvider;

/// Ordered fallback chain over concrete providers. Each provider call is
/// bounded by a timeout; a failure or timeout moves on to the next provider,
/// and only success or a single NotFound is surfaced to the caller.
pub struct ProviderRegistry {
    providers: Vec<(String, Arc<dyn PriceOracle>)>,
    call_timeout: Duration,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<(String, Arc<dyn PriceOracle>)>) -> Self {
        for (id, _) in &providers {
            info!("Registered market data provider: {}", id);
        }
        Self {
            providers,
            call_timeout: Duration::from_secs(PRICE_ORACLE_TIMEOUT_SECS),
        }
    }

    /// Default chain: Yahoo Finance only. Additional providers slot in ahead
    /// of or behind it by priority order.
    pub fn with_default_providers() -> Result<Self> {
        let yahoo = Arc::new(YahooProvider::new()?);
        Ok(Self::new(vec![("YAHOO".to_string(), yahoo)]))
    }
}

#[async_trait]
impl PriceOracle for ProviderRegistry {
    async fn resolve(&self, ticker: &str) -> Result<TickerQuote> {
        for (id, provider) in &self.providers {
            match timeout(self.call_timeout, provider.resolve(ticker)).await {
                Ok(Ok(quote)) => return Ok(quote),
                Ok(Err(e)) => {
                    warn!("Provider {} failed to resolve {}: {}", id, ticker, e);
                }
                Err(_) => {
                    warn!(
                        "Provider {} timed out resolving {} after {:?}",
                        id, ticker, self.call_timeout
                    );
                }
            }
        }
        Err(MarketDataError::NotFound(ticker.to_string()))
    }

    async fn daily_history(
        &self,
        ticker: &str,
        start: SystemTime,
        end: SystemTime,
    ) -> Result<Vec<OhlcvBar>> {
        for (id, provider) in &self.providers {
            match timeout(self.call_timeout, provider.daily_history(ticker, start, end)).await {
                Ok(Ok(bars)) => return Ok(bars),
                Ok(Err(e)) => {
                    warn!("Provider {} failed history for {}: {}", id, ticker, e);
                }
                Err(_) => {
                    warn!(
                        "Provider {} timed out on history for {} after {:?}",
                        id, ticker, self.call_timeout
                    );
                }
            }
        }
        Err(MarketDataError::NotFound(ticker.to_string()))
    }
}
