use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_errors::{Result, TransactionError};
use crate::constants::{MONEY_DECIMAL_PRECISION, QUANTITY_DECIMAL_PRECISION};

/// Closed set of ledger entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Deposit,
    Withdrawal,
    Dividend,
    Interest,
    Fee,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Dividend => "DIVIDEND",
            TransactionType::Interest => "INTEREST",
            TransactionType::Fee => "FEE",
        }
    }

    /// Trade types carry an asset, quantity and unit price
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionType::Buy | TransactionType::Sell)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            "DIVIDEND" => Ok(TransactionType::Dividend),
            "INTEREST" => Ok(TransactionType::Interest),
            "FEE" => Ok(TransactionType::Fee),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Lifecycle of a ledger entry. MARKET orders complete directly; pending
/// LIMIT/STOP_LOSS orders may later complete, fail or be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "FAILED" => Ok(TransactionStatus::Failed),
            "CANCELLED" => Ok(TransactionStatus::Cancelled),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction status '{}'",
                other
            ))),
        }
    }
}

/// Closed set of order kinds accepted by the order engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLoss => "STOP_LOSS",
        }
    }

    /// LIMIT and STOP_LOSS orders are recorded as pending intents
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLoss)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP_LOSS" => Ok(OrderType::StopLoss),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown order type '{}'",
                other
            ))),
        }
    }
}

/// Domain model for one immutable ledger entry. `total_amount` is signed:
/// negative for outflows, positive for inflows. A COMPLETED entry has
/// already been applied to its account balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub asset_id: Option<String>,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub order_type: Option<OrderType>,
    pub trigger_price: Option<Decimal>,
    pub transaction_date: NaiveDate,
    pub quantity: Option<Decimal>,
    pub price_per_unit: Option<Decimal>,
    pub total_amount: Decimal,
    pub commission_fee: Decimal,
    pub realized_pnl: Option<Decimal>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for the transaction recorder (non-order cash events and
/// direct BUY/SELL backfill).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: String,
    pub transaction_type: String,
    pub total_amount: Option<Decimal>,
    pub transaction_date: String,
    pub asset_ticker: Option<String>,
    pub quantity: Option<Decimal>,
    pub price_per_unit: Option<Decimal>,
    pub description: Option<String>,
}

impl NewTransaction {
    /// Checks required fields and parses the closed-enum and date inputs
    pub fn validate(&self) -> Result<(TransactionType, Decimal, NaiveDate)> {
        if self.account_id.trim().is_empty() {
            return Err(TransactionError::MissingField("account_id".to_string()));
        }
        if self.transaction_type.trim().is_empty() {
            return Err(TransactionError::MissingField(
                "transaction_type".to_string(),
            ));
        }
        let transaction_type: TransactionType = self.transaction_type.parse()?;
        let total_amount = self
            .total_amount
            .ok_or_else(|| TransactionError::MissingField("total_amount".to_string()))?;
        if self.transaction_date.trim().is_empty() {
            return Err(TransactionError::MissingField(
                "transaction_date".to_string(),
            ));
        }
        let transaction_date = NaiveDate::parse_from_str(&self.transaction_date, "%Y-%m-%d")
            .map_err(|_| {
                TransactionError::InvalidData(
                    "Invalid transaction_date, expected YYYY-MM-DD".to_string(),
                )
            })?;

        if transaction_type.is_trade() {
            if self.asset_ticker.as_deref().unwrap_or("").trim().is_empty() {
                return Err(TransactionError::MissingField("asset_ticker".to_string()));
            }
            if self.quantity.is_none() {
                return Err(TransactionError::MissingField("quantity".to_string()));
            }
            if self.price_per_unit.is_none() {
                return Err(TransactionError::MissingField("price_per_unit".to_string()));
            }
        }

        Ok((transaction_type, total_amount, transaction_date))
    }
}

/// Metadata-only amendment of an existing ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub transaction_date: Option<String>,
    pub total_amount: Option<Decimal>,
}

/// Changeset for a metadata amendment. `None` fields are left untouched; the
/// whole amendment lands in one UPDATE statement.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::transactions)]
pub struct TransactionMetadataChangeset {
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub total_amount: Option<String>,
}

impl TransactionMetadataChangeset {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.transaction_date.is_none()
            && self.total_amount.is_none()
    }
}

/// Database model for transactions
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub asset_id: Option<String>,
    pub transaction_type: String,
    pub status: String,
    pub order_type: Option<String>,
    pub trigger_price: Option<String>,
    pub transaction_date: NaiveDate,
    pub quantity: Option<String>,
    pub price_per_unit: Option<String>,
    pub total_amount: String,
    pub commission_fee: String,
    pub realized_pnl: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

fn parse_decimal(value: &Option<String>) -> Option<Decimal> {
    value.as_deref().and_then(|v| Decimal::from_str(v).ok())
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            asset_id: db.asset_id,
            transaction_type: db
                .transaction_type
                .parse()
                .unwrap_or(TransactionType::Fee),
            status: db.status.parse().unwrap_or(TransactionStatus::Completed),
            order_type: db.order_type.as_deref().and_then(|v| v.parse().ok()),
            trigger_price: parse_decimal(&db.trigger_price),
            transaction_date: db.transaction_date,
            quantity: parse_decimal(&db.quantity),
            price_per_unit: parse_decimal(&db.price_per_unit),
            total_amount: Decimal::from_str(&db.total_amount).unwrap_or_default(),
            commission_fee: Decimal::from_str(&db.commission_fee).unwrap_or_default(),
            realized_pnl: parse_decimal(&db.realized_pnl),
            description: db.description,
            created_at: db.created_at,
        }
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        let money = |d: Decimal| d.round_dp(MONEY_DECIMAL_PRECISION).to_string();
        let qty = |d: Decimal| d.round_dp(QUANTITY_DECIMAL_PRECISION).to_string();
        Self {
            id: domain.id.clone(),
            account_id: domain.account_id.clone(),
            asset_id: domain.asset_id.clone(),
            transaction_type: domain.transaction_type.to_string(),
            status: domain.status.to_string(),
            order_type: domain.order_type.map(|o| o.to_string()),
            trigger_price: domain.trigger_price.map(qty),
            transaction_date: domain.transaction_date,
            quantity: domain.quantity.map(qty),
            price_per_unit: domain.price_per_unit.map(qty),
            total_amount: money(domain.total_amount),
            commission_fee: money(domain.commission_fee),
            realized_pnl: domain.realized_pnl.map(money),
            description: domain.description.clone(),
            created_at: domain.created_at,
        }
    }
}
