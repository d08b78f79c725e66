use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::transactions_errors::{Result, TransactionError};
use super::transactions_model::{
    NewTransaction, Transaction, TransactionMetadataChangeset, TransactionStatus, TransactionType,
    TransactionUpdate,
};
use super::transactions_repository::TransactionRepository;
use super::transactions_traits::TransactionServiceTrait;
use crate::accounts::AccountRepository;
use crate::assets::{AssetError, AssetRepository};
use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::db::{DbPool, DbTransactionExecutor};
use crate::holdings::{apply_buy, apply_sell, HoldingRepository};

/// Service recording ledger entries and applying their financial effects.
/// Every write runs as one database transaction: the ledger row, the account
/// balance and any holding mutation land together or not at all.
pub struct TransactionService {
    pool: Arc<DbPool>,
    repository: TransactionRepository,
    account_repository: AccountRepository,
    asset_repository: AssetRepository,
    holding_repository: HoldingRepository,
}

impl TransactionService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: TransactionRepository::new(),
            account_repository: AccountRepository::new(),
            asset_repository: AssetRepository::new(),
            holding_repository: HoldingRepository::new(),
        }
    }

    /// Signed cash effect of a transaction type: outflows are negative,
    /// inflows positive. The caller supplies either a magnitude or an already
    /// signed amount; a sign contradicting the type is rejected rather than
    /// silently flipped.
    fn signed_amount(transaction_type: TransactionType, amount: Decimal) -> Result<Decimal> {
        let inflow = matches!(
            transaction_type,
            TransactionType::Deposit
                | TransactionType::Sell
                | TransactionType::Dividend
                | TransactionType::Interest
        );
        if inflow && amount < Decimal::ZERO {
            return Err(TransactionError::InvalidData(format!(
                "{} amount cannot be negative",
                transaction_type
            )));
        }
        Ok(if inflow { amount } else { -amount.abs() })
    }
}

impl TransactionServiceTrait for TransactionService {
    fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let (transaction_type, total_amount, transaction_date) = new_transaction.validate()?;

        debug!(
            "Recording {} of {} for account {}",
            transaction_type, total_amount, new_transaction.account_id
        );

        self.pool.execute(|conn| {
            let account = self
                .account_repository
                .get_by_id(conn, &new_transaction.account_id)?;

            let signed = Self::signed_amount(transaction_type, total_amount)?;

            let (asset_id, realized_pnl) = if transaction_type.is_trade() {
                // validate() guarantees ticker, quantity and price are present
                let ticker = new_transaction.asset_ticker.as_deref().unwrap_or_default();
                let asset = self
                    .asset_repository
                    .get_by_ticker(conn, ticker)
                    .map_err(|e| match e {
                        AssetError::NotFound(msg) => TransactionError::AssetNotFound(msg),
                        other => TransactionError::DatabaseError(other.to_string()),
                    })?;
                let quantity = new_transaction.quantity.unwrap_or_default();
                let price = new_transaction.price_per_unit.unwrap_or_default();

                let state = self
                    .holding_repository
                    .find_for_account_asset(conn, &account.id, &asset.id)?
                    .map(|h| h.position())
                    .unwrap_or_default();

                let (next_state, pnl) = match transaction_type {
                    TransactionType::Buy => (apply_buy(state, quantity, price)?, None),
                    TransactionType::Sell => {
                        let outcome = apply_sell(state, quantity, price)?;
                        (outcome.state, Some(outcome.realized_pnl))
                    }
                    _ => unreachable!(),
                };

                self.holding_repository
                    .save_position(conn, &account.id, &asset.id, &next_state)?;

                (Some(asset.id), pnl)
            } else {
                (None, None)
            };

            let new_balance = account.balance + signed;
            if signed < Decimal::ZERO && new_balance < Decimal::ZERO {
                return Err(TransactionError::InsufficientFunds);
            }
            self.account_repository
                .set_balance(conn, &account.id, new_balance)?;

            let entry = Transaction {
                id: Uuid::new_v4().to_string(),
                account_id: account.id.clone(),
                asset_id,
                transaction_type,
                status: TransactionStatus::Completed,
                order_type: None,
                trigger_price: None,
                transaction_date,
                quantity: new_transaction.quantity,
                price_per_unit: new_transaction.price_per_unit,
                total_amount: signed,
                commission_fee: Decimal::ZERO,
                realized_pnl,
                description: new_transaction.description.clone(),
                created_at: Utc::now().naive_utc(),
            };

            self.repository.insert(conn, &entry)
        })
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = crate::db::get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;
        self.repository.get_by_id(&mut conn, transaction_id)
    }

    fn get_transactions_by_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = crate::db::get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;
        self.repository.list_by_account(&mut conn, account_id)
    }

    fn update_transaction(
        &self,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let parsed_date = match update.transaction_date.as_deref() {
            Some(raw) => Some(
                chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    TransactionError::InvalidData(
                        "Invalid transaction_date, expected YYYY-MM-DD".to_string(),
                    )
                })?,
            ),
            None => None,
        };

        if update.total_amount.is_some() {
            warn!(
                "Amending total_amount of transaction {}; balances and holdings are not replayed",
                transaction_id
            );
        }

        let changes = TransactionMetadataChangeset {
            description: update.description,
            transaction_date: parsed_date,
            total_amount: update
                .total_amount
                .map(|a| a.round_dp(MONEY_DECIMAL_PRECISION).to_string()),
        };

        let mut conn = crate::db::get_connection(&self.pool)
            .map_err(|e| TransactionError::DatabaseError(e.to_string()))?;
        self.repository
            .update_metadata(&mut conn, transaction_id, &changes)
    }

    fn deposit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Deposit amount must be positive".to_string(),
            ));
        }
        self.add_transaction(NewTransaction {
            account_id: account_id.to_string(),
            transaction_type: TransactionType::Deposit.to_string(),
            total_amount: Some(amount),
            transaction_date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            asset_ticker: None,
            quantity: None,
            price_per_unit: None,
            description,
        })
    }

    fn withdraw(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Withdrawal amount must be positive".to_string(),
            ));
        }
        self.add_transaction(NewTransaction {
            account_id: account_id.to_string(),
            transaction_type: TransactionType::Withdrawal.to_string(),
            total_amount: Some(amount),
            transaction_date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            asset_ticker: None,
            quantity: None,
            price_per_unit: None,
            description,
        })
    }
}
