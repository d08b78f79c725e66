use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::assets_errors::{AssetError, Result};
use super::assets_model::{Asset, AssetOverview, NewAsset};
use super::assets_repository::AssetRepository;
use super::assets_traits::AssetServiceTrait;
use crate::db::{get_connection, DbPool};
use crate::market_data::{HistoricalPriceRepository, PriceOracle};

/// Service for managing assets
pub struct AssetService {
    pool: Arc<DbPool>,
    oracle: Arc<dyn PriceOracle>,
    repository: AssetRepository,
    history_repository: HistoricalPriceRepository,
}

impl AssetService {
    pub fn new(pool: Arc<DbPool>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self {
            pool,
            oracle,
            repository: AssetRepository::new(),
            history_repository: HistoricalPriceRepository::new(),
        }
    }

    fn connection(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| AssetError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl AssetServiceTrait for AssetService {
    async fn get_or_create_asset(&self, ticker: &str) -> Result<Asset> {
        let ticker = ticker.to_uppercase();

        {
            let mut conn = self.connection()?;
            match self.repository.get_by_ticker(&mut conn, &ticker) {
                Ok(existing) => return Ok(existing),
                Err(AssetError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        debug!("Asset '{}' not in store, resolving via price oracle", ticker);
        let quote = self
            .oracle
            .resolve(&ticker)
            .await
            .map_err(|e| AssetError::MarketDataError(e.to_string()))?;

        let mut conn = self.connection()?;
        let created = self
            .repository
            .create(&mut conn, NewAsset::from_quote(&ticker, &quote))?;
        info!("Created asset '{}' ({})", created.ticker_symbol, created.name);
        Ok(created)
    }

    fn get_by_ticker(&self, ticker: &str) -> Result<Asset> {
        let mut conn = self.connection()?;
        self.repository.get_by_ticker(&mut conn, ticker)
    }

    fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = self.connection()?;
        self.repository.get_by_id(&mut conn, asset_id)
    }

    fn list_assets(&self) -> Result<Vec<Asset>> {
        let mut conn = self.connection()?;
        self.repository.list(&mut conn)
    }

    fn get_asset_overview(&self, ticker: &str) -> Result<AssetOverview> {
        let mut conn = self.connection()?;
        let asset = self.repository.get_by_ticker(&mut conn, ticker)?;
        let historical_prices = self
            .history_repository
            .list_for_asset(&mut conn, &asset.id)
            .map_err(|e| AssetError::DatabaseError(e.to_string()))?;
        Ok(AssetOverview {
            asset,
            historical_prices,
        })
    }
}
