use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::assets_errors::{AssetError, Result};
use super::assets_model::{Asset, AssetDB, AssetType, NewAsset};
use crate::constants::QUANTITY_DECIMAL_PRECISION;
use crate::schema::assets;
use crate::schema::assets::dsl::*;

/// Repository for managing asset rows
pub struct AssetRepository;

impl AssetRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, conn: &mut SqliteConnection, new_asset: NewAsset) -> Result<Asset> {
        if new_asset.ticker_symbol.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Ticker symbol cannot be empty".to_string(),
            ));
        }

        let asset_db: AssetDB = new_asset.into();

        diesel::insert_into(assets::table)
            .values(&asset_db)
            .execute(conn)?;

        Ok(asset_db.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, asset_id: &str) -> Result<Asset> {
        assets
            .find(asset_id)
            .first::<AssetDB>(conn)
            .map(Asset::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AssetError::NotFound(format!("Asset with id {} not found", asset_id))
                }
                _ => AssetError::DatabaseError(e.to_string()),
            })
    }

    pub fn get_by_ticker(&self, conn: &mut SqliteConnection, ticker: &str) -> Result<Asset> {
        assets
            .filter(ticker_symbol.eq(ticker.to_uppercase()))
            .first::<AssetDB>(conn)
            .map(Asset::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AssetError::NotFound(format!("Asset '{}' not found", ticker.to_uppercase()))
                }
                _ => AssetError::DatabaseError(e.to_string()),
            })
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<Asset>> {
        assets
            .order(ticker_symbol.asc())
            .load::<AssetDB>(conn)
            .map(|rows| rows.into_iter().map(Asset::from).collect())
            .map_err(|e| AssetError::DatabaseError(e.to_string()))
    }

    /// Lists the assets whose prices the refresh cycle maintains
    pub fn list_refreshable(&self, conn: &mut SqliteConnection) -> Result<Vec<Asset>> {
        assets
            .filter(asset_type.eq_any(vec![
                AssetType::Stock.as_str(),
                AssetType::Etf.as_str(),
            ]))
            .order(ticker_symbol.asc())
            .load::<AssetDB>(conn)
            .map(|rows| rows.into_iter().map(Asset::from).collect())
            .map_err(|e| AssetError::DatabaseError(e.to_string()))
    }

    /// Overwrites the denormalized price cache for one asset
    pub fn update_price_cache(
        &self,
        conn: &mut SqliteConnection,
        asset_id: &str,
        last: Decimal,
        previous_close: Decimal,
    ) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();
        let affected = diesel::update(assets.find(asset_id))
            .set((
                last_price.eq(Some(last.round_dp(QUANTITY_DECIMAL_PRECISION).to_string())),
                previous_close_price.eq(Some(
                    previous_close
                        .round_dp(QUANTITY_DECIMAL_PRECISION)
                        .to_string(),
                )),
                price_updated_at.eq(Some(now)),
                updated_at.eq(now),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(AssetError::NotFound(format!(
                "Asset with id {} not found",
                asset_id
            )));
        }

        Ok(())
    }
}

impl Default for AssetRepository {
    fn default() -> Self {
        Self::new()
    }
}
