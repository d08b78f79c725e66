use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::accounts_errors::{AccountError, Result};
use super::accounts_model::{Account, AccountDB, NewAccount};
use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::schema::accounts;
use crate::schema::accounts::dsl::*;

/// Repository for managing account rows
pub struct AccountRepository;

impl AccountRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, conn: &mut SqliteConnection, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        let account_db: AccountDB = new_account.into();

        diesel::insert_into(accounts::table)
            .values(&account_db)
            .execute(conn)?;

        Ok(account_db.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, account_id: &str) -> Result<Account> {
        accounts
            .find(account_id)
            .first::<AccountDB>(conn)
            .map(Account::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    AccountError::NotFound(format!("Account with id {} not found", account_id))
                }
                _ => AccountError::DatabaseError(e.to_string()),
            })
    }

    pub fn list_by_portfolio(
        &self,
        conn: &mut SqliteConnection,
        portfolio: &str,
    ) -> Result<Vec<Account>> {
        accounts
            .filter(portfolio_id.eq(portfolio))
            .order(name.asc())
            .load::<AccountDB>(conn)
            .map(|rows| rows.into_iter().map(Account::from).collect())
            .map_err(|e| AccountError::DatabaseError(e.to_string()))
    }

    /// Writes a new cash balance for an account. Callers are responsible for
    /// running this inside the same transaction as the ledger entry that
    /// justifies the change.
    pub fn set_balance(
        &self,
        conn: &mut SqliteConnection,
        account_id: &str,
        new_balance: Decimal,
    ) -> Result<()> {
        let affected = diesel::update(accounts.find(account_id))
            .set((
                balance.eq(new_balance.round_dp(MONEY_DECIMAL_PRECISION).to_string()),
                updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(AccountError::NotFound(format!(
                "Account with id {} not found",
                account_id
            )));
        }

        Ok(())
    }

    pub fn delete(&self, conn: &mut SqliteConnection, account_id: &str) -> Result<usize> {
        let affected = diesel::delete(accounts.find(account_id)).execute(conn)?;

        if affected == 0 {
            return Err(AccountError::NotFound(format!(
                "Account with id {} not found",
                account_id
            )));
        }

        Ok(affected)
    }
}

impl Default for AccountRepository {
    fn default() -> Self {
        Self::new()
    }
}
