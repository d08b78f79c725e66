use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accounts_errors::{AccountError, Result};
use crate::constants::MONEY_DECIMAL_PRECISION;

/// Closed set of account kinds. Unknown values are rejected at the boundary
/// instead of being stored as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Cash,
    Investment,
    Retirement,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "CASH",
            AccountType::Investment => "INVESTMENT",
            AccountType::Retirement => "RETIREMENT",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "CASH" => Ok(AccountType::Cash),
            "INVESTMENT" => Ok(AccountType::Investment),
            "RETIREMENT" => Ok(AccountType::Retirement),
            other => Err(AccountError::InvalidData(format!(
                "Unknown account type '{}'",
                other
            ))),
        }
    }
}

/// Domain model representing an account. The balance is the cash portion;
/// invested value lives in holdings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub institution: Option<String>,
    pub balance: Decimal,
    pub portfolio_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub account_type: String,
    pub institution: Option<String>,
    pub balance: Option<Decimal>,
    pub portfolio_id: String,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AccountError::InvalidData(
                "Account name cannot be empty".to_string(),
            ));
        }
        if self.portfolio_id.trim().is_empty() {
            return Err(AccountError::InvalidData(
                "Portfolio ID cannot be empty".to_string(),
            ));
        }
        self.account_type.parse::<AccountType>()?;
        if let Some(opening_balance) = self.balance {
            if opening_balance < Decimal::ZERO {
                return Err(AccountError::InvalidData(
                    "Opening balance cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Database model for accounts. Monetary columns are stored as exact
/// fixed-point text, never floating point.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub name: String,
    pub account_type: String,
    pub institution: Option<String>,
    pub balance: String,
    pub portfolio_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            account_type: db
                .account_type
                .parse()
                .unwrap_or(AccountType::Cash),
            institution: db.institution,
            balance: Decimal::from_str(&db.balance).unwrap_or_default(),
            portfolio_id: db.portfolio_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: domain.name,
            account_type: domain.account_type.to_uppercase(),
            institution: domain.institution,
            balance: domain
                .balance
                .unwrap_or_default()
                .round_dp(MONEY_DECIMAL_PRECISION)
                .to_string(),
            portfolio_id: domain.portfolio_id,
            created_at: now,
            updated_at: now,
        }
    }
}
