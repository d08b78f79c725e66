use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::holdings_accountant::PositionState;
use super::holdings_errors::{HoldingError, Result};
use super::holdings_model::{Holding, HoldingDB};
use crate::assets::{Asset, AssetDB};
use crate::constants::{MONEY_DECIMAL_PRECISION, QUANTITY_DECIMAL_PRECISION};
use crate::schema::{accounts, assets, holdings};

/// Repository for managing holding rows
pub struct HoldingRepository;

impl HoldingRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn find_for_account_asset(
        &self,
        conn: &mut SqliteConnection,
        account: &str,
        asset: &str,
    ) -> Result<Option<Holding>> {
        Ok(holdings::table
            .filter(holdings::account_id.eq(account))
            .filter(holdings::asset_id.eq(asset))
            .first::<HoldingDB>(conn)
            .optional()?
            .map(Holding::from))
    }

    /// Writes the new position for an (account, asset) pair, creating the row
    /// on first buy. Must run inside the caller's transaction.
    pub fn save_position(
        &self,
        conn: &mut SqliteConnection,
        account: &str,
        asset: &str,
        state: &PositionState,
    ) -> Result<Holding> {
        let existing = self.find_for_account_asset(conn, account, asset)?;

        match existing {
            Some(holding) => {
                diesel::update(holdings::table.find(&holding.id))
                    .set((
                        holdings::quantity.eq(state
                            .quantity
                            .round_dp(QUANTITY_DECIMAL_PRECISION)
                            .to_string()),
                        holdings::cost_basis.eq(state
                            .cost_basis
                            .round_dp(MONEY_DECIMAL_PRECISION)
                            .to_string()),
                    ))
                    .execute(conn)?;
                Ok(Holding {
                    quantity: state.quantity,
                    cost_basis: state.cost_basis,
                    ..holding
                })
            }
            None => {
                let row = HoldingDB::from_position(account, asset, state);
                diesel::insert_into(holdings::table)
                    .values(&row)
                    .execute(conn)?;
                Ok(row.into())
            }
        }
    }

    pub fn list_by_account(
        &self,
        conn: &mut SqliteConnection,
        account: &str,
    ) -> Result<Vec<Holding>> {
        Ok(holdings::table
            .filter(holdings::account_id.eq(account))
            .load::<HoldingDB>(conn)?
            .into_iter()
            .map(Holding::from)
            .collect())
    }

    /// All holdings under a portfolio, joined with their assets, for the
    /// valuation aggregator.
    pub fn list_with_assets_by_portfolio(
        &self,
        conn: &mut SqliteConnection,
        portfolio: &str,
    ) -> Result<Vec<(Holding, Asset)>> {
        let rows = holdings::table
            .inner_join(accounts::table)
            .inner_join(assets::table)
            .filter(accounts::portfolio_id.eq(portfolio))
            .select((HoldingDB::as_select(), AssetDB::as_select()))
            .load::<(HoldingDB, AssetDB)>(conn)
            .map_err(|e| HoldingError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(h, a)| (Holding::from(h), Asset::from(a)))
            .collect())
    }
}

impl Default for HoldingRepository {
    fn default() -> Self {
        Self::new()
    }
}
