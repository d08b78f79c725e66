use std::sync::Arc;

use log::debug;

use super::watchlists_errors::{Result, WatchlistError};
use super::watchlists_model::{Watchlist, WatchlistItemView, WatchlistView};
use super::watchlists_repository::WatchlistRepository;
use crate::assets::AssetServiceTrait;
use crate::db::{get_connection, DbPool};
use crate::portfolios::PortfolioRepository;

/// Service managing watchlists and their membership
pub struct WatchlistService {
    pool: Arc<DbPool>,
    repository: WatchlistRepository,
    portfolio_repository: PortfolioRepository,
    asset_service: Arc<dyn AssetServiceTrait>,
}

impl WatchlistService {
    pub fn new(pool: Arc<DbPool>, asset_service: Arc<dyn AssetServiceTrait>) -> Self {
        Self {
            pool,
            repository: WatchlistRepository::new(),
            portfolio_repository: PortfolioRepository::new(),
            asset_service,
        }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| WatchlistError::DatabaseError(e.to_string()))
    }

    pub fn create_watchlist(&self, portfolio_id: &str, name: &str) -> Result<Watchlist> {
        if name.trim().is_empty() {
            return Err(WatchlistError::InvalidData(
                "Watchlist name cannot be empty".to_string(),
            ));
        }

        let mut conn = self.conn()?;
        self.portfolio_repository
            .get_by_id(&mut conn, portfolio_id)
            .map_err(|e| WatchlistError::NotFound(e.to_string()))?;

        if self
            .repository
            .name_taken(&mut conn, portfolio_id, name, None)?
        {
            return Err(WatchlistError::DuplicateName(name.to_string()));
        }

        debug!("Creating watchlist '{}' in portfolio {}", name, portfolio_id);
        self.repository.create(&mut conn, name, portfolio_id)
    }

    pub fn rename_watchlist(&self, watchlist_id: &str, new_name: &str) -> Result<Watchlist> {
        if new_name.trim().is_empty() {
            return Err(WatchlistError::InvalidData(
                "Watchlist name cannot be empty".to_string(),
            ));
        }

        let mut conn = self.conn()?;
        let watchlist = self.repository.get_by_id(&mut conn, watchlist_id)?;

        if self.repository.name_taken(
            &mut conn,
            &watchlist.portfolio_id,
            new_name,
            Some(watchlist_id),
        )? {
            return Err(WatchlistError::DuplicateName(new_name.to_string()));
        }

        self.repository.rename(&mut conn, watchlist_id, new_name)
    }

    pub fn delete_watchlist(&self, watchlist_id: &str) -> Result<()> {
        let mut conn = self.conn()?;
        self.repository.delete(&mut conn, watchlist_id)
    }

    /// All watchlists of a portfolio with their member assets resolved
    pub fn list_watchlists(&self, portfolio_id: &str) -> Result<Vec<WatchlistView>> {
        let mut conn = self.conn()?;
        let watchlists = self.repository.list_by_portfolio(&mut conn, portfolio_id)?;

        let mut views = Vec::with_capacity(watchlists.len());
        for watchlist in watchlists {
            let items = self
                .repository
                .list_assets(&mut conn, &watchlist.id)?
                .into_iter()
                .map(WatchlistItemView::from)
                .collect();
            views.push(WatchlistView {
                id: watchlist.id,
                name: watchlist.name,
                items,
            });
        }
        Ok(views)
    }

    /// Adds a ticker to a watchlist, creating the asset through the price
    /// oracle the first time the ticker is seen. Duplicates are rejected.
    pub async fn add_item(&self, watchlist_id: &str, ticker: &str) -> Result<WatchlistItemView> {
        {
            let mut conn = self.conn()?;
            self.repository.get_by_id(&mut conn, watchlist_id)?;
        }

        let asset = self
            .asset_service
            .get_or_create_asset(ticker)
            .await
            .map_err(|e| WatchlistError::Asset(e.to_string()))?;

        let mut conn = self.conn()?;
        if self
            .repository
            .contains_asset(&mut conn, watchlist_id, &asset.id)?
        {
            return Err(WatchlistError::DuplicateItem(
                asset.ticker_symbol.clone(),
            ));
        }

        self.repository.add_item(&mut conn, watchlist_id, &asset.id)?;
        Ok(asset.into())
    }

    pub fn remove_item(&self, watchlist_id: &str, ticker: &str) -> Result<()> {
        let asset = self
            .asset_service
            .get_by_ticker(ticker)
            .map_err(|e| WatchlistError::NotFound(e.to_string()))?;

        let mut conn = self.conn()?;
        let removed = self
            .repository
            .remove_item(&mut conn, watchlist_id, &asset.id)?;
        if removed == 0 {
            return Err(WatchlistError::NotFound(format!(
                "'{}' not found in this watchlist",
                asset.ticker_symbol
            )));
        }
        Ok(())
    }
}
