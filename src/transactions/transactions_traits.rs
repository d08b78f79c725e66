use rust_decimal::Decimal;

use super::transactions_errors::Result;
use super::transactions_model::{NewTransaction, Transaction, TransactionUpdate};

/// Ledger recording surface for cash events and direct trade entries.
/// Order placement goes through the order engine instead, which layers
/// order validation and pricing on top of the same ledger.
pub trait TransactionServiceTrait: Send + Sync {
    /// Records a transaction and applies its financial effects (balance and,
    /// for trades, holdings) atomically.
    fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    fn get_transactions_by_account(&self, account_id: &str) -> Result<Vec<Transaction>>;

    /// Amends metadata on a recorded entry. Balances and holdings are NOT
    /// recomputed from the amended values.
    fn update_transaction(
        &self,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    fn deposit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction>;

    fn withdraw(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction>;
}
