use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assets::Asset;

/// Domain model for a named watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub id: String,
    pub name: String,
    pub portfolio_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for watchlists
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::watchlists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistDB {
    pub id: String,
    pub name: String,
    pub portfolio_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<WatchlistDB> for Watchlist {
    fn from(db: WatchlistDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            portfolio_id: db.portfolio_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl WatchlistDB {
    pub fn new(name: &str, portfolio_id: &str) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            portfolio_id: portfolio_id.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Database model for watchlist membership rows
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::watchlist_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WatchlistItemDB {
    pub id: String,
    pub watchlist_id: String,
    pub asset_id: String,
}

impl WatchlistItemDB {
    pub fn new(watchlist_id: &str, asset_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            watchlist_id: watchlist_id.to_string(),
            asset_id: asset_id.to_string(),
        }
    }
}

/// One watchlist entry as presented to callers, with its asset's cached price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItemView {
    pub asset_id: String,
    pub ticker_symbol: String,
    pub name: String,
    pub last_price: Option<f64>,
}

impl From<Asset> for WatchlistItemView {
    fn from(asset: Asset) -> Self {
        use rust_decimal::prelude::ToPrimitive;
        Self {
            asset_id: asset.id,
            ticker_symbol: asset.ticker_symbol,
            name: asset.name,
            last_price: asset.last_price.and_then(|p| p.to_f64()),
        }
    }
}

/// A watchlist with its member assets resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistView {
    pub id: String,
    pub name: String,
    pub items: Vec<WatchlistItemView>,
}
