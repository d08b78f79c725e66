use std::sync::Arc;
use std::time::{Duration, SystemTime};

use log::{info, warn};

use super::market_data_errors::{MarketDataError, Result};
use super::market_data_repository::HistoricalPriceRepository;
use super::market_data_traits::PriceOracle;
use crate::assets::AssetRepository;
use crate::db::{get_connection, DbPool};

const HISTORY_LOOKBACK_DAYS: u64 = 365;

/// Periodic market-data maintenance: bulk price refresh and OHLCV history
/// sync. Invoked by external jobs, never by order placement.
pub struct MarketDataService {
    pool: Arc<DbPool>,
    oracle: Arc<dyn PriceOracle>,
    asset_repository: AssetRepository,
    history_repository: HistoricalPriceRepository,
}

impl MarketDataService {
    pub fn new(pool: Arc<DbPool>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self {
            pool,
            oracle,
            asset_repository: AssetRepository::new(),
            history_repository: HistoricalPriceRepository::new(),
        }
    }

    /// Refreshes the cached last/previous-close price of every refreshable
    /// asset. Tickers the oracle cannot resolve are skipped, not fatal.
    /// Returns the number of assets updated.
    pub async fn refresh_all_prices(&self) -> Result<usize> {
        let assets = {
            let mut conn = get_connection(&self.pool)
                .map_err(|e| MarketDataError::DatabaseError(e.to_string()))?;
            self.asset_repository
                .list_refreshable(&mut conn)
                .map_err(|e| MarketDataError::DatabaseError(e.to_string()))?
        };

        info!("Starting bulk price refresh for {} assets", assets.len());

        let lookups = assets
            .iter()
            .map(|asset| self.oracle.resolve(&asset.ticker_symbol));
        let quotes = futures::future::join_all(lookups).await;

        let mut updated = 0;
        for (asset, quote) in assets.iter().zip(quotes) {
            match quote {
                Ok(quote) => {
                    let mut conn = get_connection(&self.pool)
                        .map_err(|e| MarketDataError::DatabaseError(e.to_string()))?;
                    self.asset_repository
                        .update_price_cache(
                            &mut conn,
                            &asset.id,
                            quote.last_price,
                            quote.previous_close,
                        )
                        .map_err(|e| MarketDataError::DatabaseError(e.to_string()))?;
                    updated += 1;
                }
                Err(e) => {
                    warn!(
                        "No price data for {}, skipping refresh: {}",
                        asset.ticker_symbol, e
                    );
                }
            }
        }

        info!("Price refresh finished: {}/{} assets updated", updated, assets.len());
        Ok(updated)
    }

    /// Fetches the trailing year of daily bars for a ticker and upserts them
    /// into the stored history.
    pub async fn sync_historical_prices(&self, ticker: &str) -> Result<usize> {
        let asset = {
            let mut conn = get_connection(&self.pool)
                .map_err(|e| MarketDataError::DatabaseError(e.to_string()))?;
            self.asset_repository
                .get_by_ticker(&mut conn, ticker)
                .map_err(|e| MarketDataError::NotFound(e.to_string()))?
        };

        let end = SystemTime::now();
        let start = end - Duration::from_secs(HISTORY_LOOKBACK_DAYS * 24 * 60 * 60);
        let bars = self
            .oracle
            .daily_history(&asset.ticker_symbol, start, end)
            .await?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| MarketDataError::DatabaseError(e.to_string()))?;
        let written = self
            .history_repository
            .upsert_bars(&mut conn, &asset.id, &bars)?;

        info!(
            "Synced {} historical bars for {}",
            written, asset.ticker_symbol
        );
        Ok(written)
    }
}
