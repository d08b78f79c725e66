use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::QUANTITY_DECIMAL_PRECISION;

/// What the price oracle answers for a ticker: the display name, the last
/// traded price and the previous session close.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TickerQuote {
    pub name: String,
    pub last_price: Decimal,
    pub previous_close: Decimal,
}

/// One daily OHLCV bar as returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<i64>,
}

/// Domain model for a stored historical price row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPrice {
    pub id: String,
    pub asset_id: String,
    pub price_date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<i64>,
}

/// Database model for historical prices
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::historical_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoricalPriceDB {
    pub id: String,
    pub asset_id: String,
    pub price_date: NaiveDate,
    pub open_price: Option<String>,
    pub high_price: Option<String>,
    pub low_price: Option<String>,
    pub close_price: String,
    pub volume: Option<i64>,
}

impl From<HistoricalPriceDB> for HistoricalPrice {
    fn from(db: HistoricalPriceDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            price_date: db.price_date,
            open: db.open_price.as_deref().and_then(|v| Decimal::from_str(v).ok()),
            high: db.high_price.as_deref().and_then(|v| Decimal::from_str(v).ok()),
            low: db.low_price.as_deref().and_then(|v| Decimal::from_str(v).ok()),
            close: Decimal::from_str(&db.close_price).unwrap_or_default(),
            volume: db.volume,
        }
    }
}

impl HistoricalPriceDB {
    pub fn from_bar(asset_id: &str, bar: &OhlcvBar) -> Self {
        let to_col = |d: Decimal| d.round_dp(QUANTITY_DECIMAL_PRECISION).to_string();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            price_date: bar.date,
            open_price: bar.open.map(to_col),
            high_price: bar.high.map(to_col),
            low_price: bar.low.map(to_col),
            close_price: to_col(bar.close),
            volume: bar.volume,
        }
    }
}
