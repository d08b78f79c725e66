use super::accounts_model::{Account, NewAccount};
use super::accounts_errors::Result;

/// Read/CRUD surface other services depend on, kept behind a trait so tests
/// can substitute a double.
pub trait AccountServiceTrait: Send + Sync {
    fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    fn get_account(&self, account_id: &str) -> Result<Account>;
    fn list_accounts_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Account>>;
    fn delete_account(&self, account_id: &str) -> Result<()>;
}
