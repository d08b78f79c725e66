use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::watchlists_errors::{Result, WatchlistError};
use super::watchlists_model::{Watchlist, WatchlistDB, WatchlistItemDB};
use crate::assets::{Asset, AssetDB};
use crate::schema::{assets, watchlist_items, watchlists};

/// Repository for watchlist and watchlist-item rows
pub struct WatchlistRepository;

impl WatchlistRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn create(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
        portfolio: &str,
    ) -> Result<Watchlist> {
        let row = WatchlistDB::new(name, portfolio);
        diesel::insert_into(watchlists::table)
            .values(&row)
            .execute(conn)?;
        Ok(row.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, watchlist_id: &str) -> Result<Watchlist> {
        watchlists::table
            .find(watchlist_id)
            .first::<WatchlistDB>(conn)
            .map(Watchlist::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => WatchlistError::NotFound(format!(
                    "Watchlist with id {} not found",
                    watchlist_id
                )),
                _ => WatchlistError::DatabaseError(e.to_string()),
            })
    }

    pub fn list_by_portfolio(
        &self,
        conn: &mut SqliteConnection,
        portfolio: &str,
    ) -> Result<Vec<Watchlist>> {
        Ok(watchlists::table
            .filter(watchlists::portfolio_id.eq(portfolio))
            .order(watchlists::name.asc())
            .load::<WatchlistDB>(conn)?
            .into_iter()
            .map(Watchlist::from)
            .collect())
    }

    /// True when another watchlist in the same portfolio already uses the
    /// name. `exclude` skips the watchlist being renamed.
    pub fn name_taken(
        &self,
        conn: &mut SqliteConnection,
        portfolio: &str,
        name: &str,
        exclude: Option<&str>,
    ) -> Result<bool> {
        let mut query = watchlists::table
            .filter(watchlists::portfolio_id.eq(portfolio))
            .filter(watchlists::name.eq(name))
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(watchlists::id.ne(id));
        }
        let count: i64 = query.count().get_result(conn)?;
        Ok(count > 0)
    }

    pub fn rename(
        &self,
        conn: &mut SqliteConnection,
        watchlist_id: &str,
        new_name: &str,
    ) -> Result<Watchlist> {
        diesel::update(watchlists::table.find(watchlist_id))
            .set((
                watchlists::name.eq(new_name),
                watchlists::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        self.get_by_id(conn, watchlist_id)
    }

    pub fn delete(&self, conn: &mut SqliteConnection, watchlist_id: &str) -> Result<()> {
        let affected =
            diesel::delete(watchlists::table.find(watchlist_id)).execute(conn)?;
        if affected == 0 {
            return Err(WatchlistError::NotFound(format!(
                "Watchlist with id {} not found",
                watchlist_id
            )));
        }
        Ok(())
    }

    pub fn contains_asset(
        &self,
        conn: &mut SqliteConnection,
        watchlist_id: &str,
        asset: &str,
    ) -> Result<bool> {
        let count: i64 = watchlist_items::table
            .filter(watchlist_items::watchlist_id.eq(watchlist_id))
            .filter(watchlist_items::asset_id.eq(asset))
            .count()
            .get_result(conn)?;
        Ok(count > 0)
    }

    pub fn add_item(
        &self,
        conn: &mut SqliteConnection,
        watchlist_id: &str,
        asset: &str,
    ) -> Result<WatchlistItemDB> {
        let row = WatchlistItemDB::new(watchlist_id, asset);
        diesel::insert_into(watchlist_items::table)
            .values(&row)
            .execute(conn)?;
        Ok(row)
    }

    pub fn remove_item(
        &self,
        conn: &mut SqliteConnection,
        watchlist_id: &str,
        asset: &str,
    ) -> Result<usize> {
        Ok(diesel::delete(
            watchlist_items::table
                .filter(watchlist_items::watchlist_id.eq(watchlist_id))
                .filter(watchlist_items::asset_id.eq(asset)),
        )
        .execute(conn)?)
    }

    /// Member assets of a watchlist, in ticker order
    pub fn list_assets(
        &self,
        conn: &mut SqliteConnection,
        watchlist_id: &str,
    ) -> Result<Vec<Asset>> {
        Ok(watchlist_items::table
            .inner_join(assets::table)
            .filter(watchlist_items::watchlist_id.eq(watchlist_id))
            .order(assets::ticker_symbol.asc())
            .select(AssetDB::as_select())
            .load::<AssetDB>(conn)?
            .into_iter()
            .map(Asset::from)
            .collect())
    }
}

impl Default for WatchlistRepository {
    fn default() -> Self {
        Self::new()
    }
}
