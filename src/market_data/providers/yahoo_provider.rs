use std::time::SystemTime;

use async_trait::async_trait;
use chrono::DateTime;
use log::debug;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use yahoo_finance_api as yahoo;

use crate::market_data::market_data_errors::{MarketDataError, Result};
use crate::market_data::market_data_model::{OhlcvBar, TickerQuote};
use crate::market_data::market_data_traits::PriceOracle;

/// Price oracle backed by Yahoo Finance
pub struct YahooProvider {
    provider: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| MarketDataError::ProviderError(e.to_string()))?;
        Ok(YahooProvider { provider })
    }

    /// Looks up a display name for the ticker. Name lookup is best-effort;
    /// the ticker itself is an acceptable fallback.
    async fn lookup_name(&self, ticker: &str) -> String {
        match self.provider.search_ticker(ticker).await {
            Ok(result) => result
                .quotes
                .iter()
                .find(|item| item.symbol.eq_ignore_ascii_case(ticker))
                .map(|item| {
                    if item.long_name.is_empty() {
                        item.short_name.clone()
                    } else {
                        item.long_name.clone()
                    }
                })
                .unwrap_or_else(|| ticker.to_string()),
            Err(e) => {
                debug!("Name lookup failed for {}: {}", ticker, e);
                ticker.to_string()
            }
        }
    }

    fn decimal_from_price(value: f64, ticker: &str) -> Result<Decimal> {
        Decimal::from_f64(value).ok_or_else(|| {
            MarketDataError::ProviderError(format!(
                "Unrepresentable price {} for {}",
                value, ticker
            ))
        })
    }
}

#[async_trait]
impl PriceOracle for YahooProvider {
    async fn resolve(&self, ticker: &str) -> Result<TickerQuote> {
        let response = self
            .provider
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(|e| match e {
                yahoo::YahooError::NoResult
                | yahoo::YahooError::NoQuotes
                | yahoo::YahooError::FetchFailed(_) => {
                    MarketDataError::NotFound(ticker.to_string())
                }
                other => MarketDataError::ProviderError(other.to_string()),
            })?;

        let meta = response
            .metadata()
            .map_err(|e| MarketDataError::ProviderError(e.to_string()))?;
        let last_quote = response
            .last_quote()
            .map_err(|_| MarketDataError::NotFound(ticker.to_string()))?;

        let last_price = Self::decimal_from_price(last_quote.close, ticker)?;
        let previous_close_raw = meta.chart_previous_close.ok_or_else(|| {
            MarketDataError::ProviderError(format!("Missing previous close for {}", ticker))
        })?;
        let previous_close = Self::decimal_from_price(previous_close_raw, ticker)?;

        let name = self.lookup_name(ticker).await;

        Ok(TickerQuote {
            name,
            last_price,
            previous_close,
        })
    }

    async fn daily_history(
        &self,
        ticker: &str,
        start: SystemTime,
        end: SystemTime,
    ) -> Result<Vec<OhlcvBar>> {
        let response = self
            .provider
            .get_quote_history(ticker, start.into(), end.into())
            .await
            .map_err(|e| match e {
                yahoo::YahooError::NoResult
                | yahoo::YahooError::NoQuotes
                | yahoo::YahooError::FetchFailed(_) => {
                    MarketDataError::NotFound(ticker.to_string())
                }
                other => MarketDataError::ProviderError(other.to_string()),
            })?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketDataError::ProviderError(e.to_string()))?;

        let bars = quotes
            .into_iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                let close = Decimal::from_f64(q.close)?;
                Some(OhlcvBar {
                    date,
                    open: Decimal::from_f64(q.open),
                    high: Decimal::from_f64(q.high),
                    low: Decimal::from_f64(q.low),
                    close,
                    volume: i64::try_from(q.volume).ok(),
                })
            })
            .collect();

        Ok(bars)
    }
}
