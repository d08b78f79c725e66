use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::transactions_errors::{Result, TransactionError};
use super::transactions_model::{
    Transaction, TransactionDB, TransactionMetadataChangeset, TransactionStatus,
};
use crate::schema::{accounts, transactions};

/// Repository for the append-only ledger table
pub struct TransactionRepository;

impl TransactionRepository {
    pub fn new() -> Self {
        Self
    }

    /// Appends one ledger entry. Must run inside the caller's transaction
    /// when paired with a balance or holding mutation.
    pub fn insert(&self, conn: &mut SqliteConnection, entry: &Transaction) -> Result<Transaction> {
        let row = TransactionDB::from(entry);

        diesel::insert_into(transactions::table)
            .values(&row)
            .execute(conn)?;

        Ok(row.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, transaction_id: &str) -> Result<Transaction> {
        transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(conn)
            .map(Transaction::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => TransactionError::NotFound(format!(
                    "Transaction with id {} not found",
                    transaction_id
                )),
                _ => TransactionError::DatabaseError(e.to_string()),
            })
    }

    /// Amends display metadata on an existing entry in a single UPDATE, so a
    /// multi-field amendment can never land partially. The financial effects
    /// already applied to balances and holdings are not replayed.
    pub fn update_metadata(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
        changes: &TransactionMetadataChangeset,
    ) -> Result<Transaction> {
        let existing = self.get_by_id(conn, transaction_id)?;
        if changes.is_empty() {
            return Ok(existing);
        }

        diesel::update(transactions::table.find(transaction_id))
            .set(changes)
            .execute(conn)?;

        self.get_by_id(conn, transaction_id)
    }

    /// Ledger entries for one account, newest first
    pub fn list_by_account(
        &self,
        conn: &mut SqliteConnection,
        account: &str,
    ) -> Result<Vec<Transaction>> {
        Ok(transactions::table
            .filter(transactions::account_id.eq(account))
            .order((
                transactions::transaction_date.desc(),
                transactions::created_at.desc(),
            ))
            .load::<TransactionDB>(conn)?
            .into_iter()
            .map(Transaction::from)
            .collect())
    }

    /// Completed entries across every account of a portfolio on or after the
    /// given date. Feeds the cash flow window; pending orders never count.
    pub fn list_completed_for_portfolio_since(
        &self,
        conn: &mut SqliteConnection,
        portfolio: &str,
        since: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        Ok(transactions::table
            .inner_join(accounts::table)
            .filter(accounts::portfolio_id.eq(portfolio))
            .filter(transactions::status.eq(TransactionStatus::Completed.as_str()))
            .filter(transactions::transaction_date.ge(since))
            .select(TransactionDB::as_select())
            .load::<TransactionDB>(conn)?
            .into_iter()
            .map(Transaction::from)
            .collect())
    }
}

impl Default for TransactionRepository {
    fn default() -> Self {
        Self::new()
    }
}
