use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::assets_errors::AssetError;
use crate::constants::QUANTITY_DECIMAL_PRECISION;
use crate::market_data::{HistoricalPrice, TickerQuote};

/// Closed set of asset kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Stock,
    Etf,
    Cash,
    Index,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "STOCK",
            AssetType::Etf => "ETF",
            AssetType::Cash => "CASH",
            AssetType::Index => "INDEX",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STOCK" => Ok(AssetType::Stock),
            "ETF" => Ok(AssetType::Etf),
            "CASH" => Ok(AssetType::Cash),
            "INDEX" => Ok(AssetType::Index),
            other => Err(AssetError::InvalidData(format!(
                "Unknown asset type '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing a tradable asset with its denormalized price
/// cache and optional fundamentals. The cache is written by the oracle
/// refresh cycle and by initial resolution, never by order placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub ticker_symbol: String,
    pub name: String,
    pub asset_type: AssetType,
    pub last_price: Option<Decimal>,
    pub previous_close_price: Option<Decimal>,
    pub price_updated_at: Option<NaiveDateTime>,
    pub market_cap: Option<i64>,
    pub sector: Option<String>,
    pub pe_ratio: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new asset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub ticker_symbol: String,
    pub name: String,
    pub asset_type: AssetType,
    pub last_price: Option<Decimal>,
    pub previous_close_price: Option<Decimal>,
    pub market_cap: Option<i64>,
    pub sector: Option<String>,
    pub pe_ratio: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
}

impl NewAsset {
    /// Builds the asset row for a ticker the oracle just resolved
    pub fn from_quote(ticker: &str, quote: &TickerQuote) -> Self {
        Self {
            ticker_symbol: ticker.to_uppercase(),
            name: quote.name.clone(),
            asset_type: AssetType::Stock,
            last_price: Some(quote.last_price),
            previous_close_price: Some(quote.previous_close),
            market_cap: None,
            sector: None,
            pe_ratio: None,
            eps: None,
            dividend_yield: None,
        }
    }
}

/// Read model combining an asset with its stored price history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOverview {
    pub asset: Asset,
    pub historical_prices: Vec<HistoricalPrice>,
}

/// Database model for assets
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub ticker_symbol: String,
    pub name: String,
    pub asset_type: String,
    pub last_price: Option<String>,
    pub previous_close_price: Option<String>,
    pub price_updated_at: Option<NaiveDateTime>,
    pub market_cap: Option<i64>,
    pub sector: Option<String>,
    pub pe_ratio: Option<String>,
    pub eps: Option<String>,
    pub dividend_yield: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn parse_decimal(value: &Option<String>) -> Option<Decimal> {
    value.as_deref().and_then(|v| Decimal::from_str(v).ok())
}

fn decimal_column(value: Option<Decimal>) -> Option<String> {
    value.map(|d| d.round_dp(QUANTITY_DECIMAL_PRECISION).to_string())
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Self {
            id: db.id,
            ticker_symbol: db.ticker_symbol,
            name: db.name,
            asset_type: db.asset_type.parse().unwrap_or(AssetType::Stock),
            last_price: parse_decimal(&db.last_price),
            previous_close_price: parse_decimal(&db.previous_close_price),
            price_updated_at: db.price_updated_at,
            market_cap: db.market_cap,
            sector: db.sector,
            pe_ratio: parse_decimal(&db.pe_ratio),
            eps: parse_decimal(&db.eps),
            dividend_yield: parse_decimal(&db.dividend_yield),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAsset> for AssetDB {
    fn from(domain: NewAsset) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ticker_symbol: domain.ticker_symbol.to_uppercase(),
            name: domain.name,
            asset_type: domain.asset_type.to_string(),
            price_updated_at: domain.last_price.map(|_| now),
            last_price: decimal_column(domain.last_price),
            previous_close_price: decimal_column(domain.previous_close_price),
            market_cap: domain.market_cap,
            sector: domain.sector,
            pe_ratio: decimal_column(domain.pe_ratio),
            eps: decimal_column(domain.eps),
            dividend_yield: decimal_column(domain.dividend_yield),
            created_at: now,
            updated_at: now,
        }
    }
}
