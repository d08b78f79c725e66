use async_trait::async_trait;

use super::assets_errors::Result;
use super::assets_model::{Asset, AssetOverview};

/// Asset lookup/creation surface used by the order engine, the transaction
/// recorder and watchlists.
#[async_trait]
pub trait AssetServiceTrait: Send + Sync {
    /// Returns the asset for a ticker, creating it lazily through the price
    /// oracle the first time the ticker is referenced.
    async fn get_or_create_asset(&self, ticker: &str) -> Result<Asset>;

    /// Returns an already-known asset by ticker; never calls the oracle.
    fn get_by_ticker(&self, ticker: &str) -> Result<Asset>;

    fn get_asset(&self, asset_id: &str) -> Result<Asset>;

    fn list_assets(&self) -> Result<Vec<Asset>>;

    /// Asset plus stored OHLCV history, for detail views
    fn get_asset_overview(&self, ticker: &str) -> Result<AssetOverview>;
}
