use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::market_data_errors::Result;
use super::market_data_model::{HistoricalPrice, HistoricalPriceDB, OhlcvBar};
use crate::schema::historical_prices;
use crate::schema::historical_prices::dsl::*;

/// Repository for stored OHLCV history
pub struct HistoricalPriceRepository;

impl HistoricalPriceRepository {
    pub fn new() -> Self {
        Self
    }

    /// Inserts bars for an asset, replacing any row already stored for the
    /// same date.
    pub fn upsert_bars(
        &self,
        conn: &mut SqliteConnection,
        asset: &str,
        bars: &[OhlcvBar],
    ) -> Result<usize> {
        let mut written = 0;
        for bar in bars {
            let row = HistoricalPriceDB::from_bar(asset, bar);
            written += diesel::insert_into(historical_prices::table)
                .values(&row)
                .on_conflict((asset_id, price_date))
                .do_update()
                .set((
                    open_price.eq(&row.open_price),
                    high_price.eq(&row.high_price),
                    low_price.eq(&row.low_price),
                    close_price.eq(&row.close_price),
                    volume.eq(row.volume),
                ))
                .execute(conn)?;
        }
        Ok(written)
    }

    pub fn list_for_asset(
        &self,
        conn: &mut SqliteConnection,
        asset: &str,
    ) -> Result<Vec<HistoricalPrice>> {
        Ok(historical_prices
            .filter(asset_id.eq(asset))
            .order(price_date.asc())
            .load::<HistoricalPriceDB>(conn)?
            .into_iter()
            .map(HistoricalPrice::from)
            .collect())
    }

    pub fn latest_for_asset(
        &self,
        conn: &mut SqliteConnection,
        asset: &str,
    ) -> Result<Option<HistoricalPrice>> {
        Ok(historical_prices
            .filter(asset_id.eq(asset))
            .order(price_date.desc())
            .first::<HistoricalPriceDB>(conn)
            .optional()?
            .map(HistoricalPrice::from))
    }
}

impl Default for HistoricalPriceRepository {
    fn default() -> Self {
        Self::new()
    }
}
