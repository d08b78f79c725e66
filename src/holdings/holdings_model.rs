use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::holdings_accountant::PositionState;
use crate::constants::{MONEY_DECIMAL_PRECISION, QUANTITY_DECIMAL_PRECISION};

/// Domain model for the materialized position of one account in one asset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub account_id: String,
    pub asset_id: String,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl Holding {
    pub fn position(&self) -> PositionState {
        PositionState::new(self.quantity, self.cost_basis)
    }

    /// Weighted-average cost per share; 0 at zero quantity
    pub fn average_price(&self) -> Decimal {
        self.position().average_price()
    }

    /// Current market value given the asset's cached price; 0 when the price
    /// is unknown.
    pub fn market_value(&self, last_price: Option<Decimal>) -> Decimal {
        last_price
            .map(|price| self.quantity * price)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn unrealized_pnl(&self, last_price: Option<Decimal>) -> Decimal {
        self.market_value(last_price) - self.cost_basis
    }
}

/// Database model for holdings
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub account_id: String,
    pub asset_id: String,
    pub quantity: String,
    pub cost_basis: String,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            asset_id: db.asset_id,
            quantity: Decimal::from_str(&db.quantity).unwrap_or_default(),
            cost_basis: Decimal::from_str(&db.cost_basis).unwrap_or_default(),
        }
    }
}

impl HoldingDB {
    pub fn from_position(account_id: &str, asset_id: &str, state: &PositionState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            asset_id: asset_id.to_string(),
            quantity: state
                .quantity
                .round_dp(QUANTITY_DECIMAL_PRECISION)
                .to_string(),
            cost_basis: state
                .cost_basis
                .round_dp(MONEY_DECIMAL_PRECISION)
                .to_string(),
        }
    }
}
