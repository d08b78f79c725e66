use std::sync::Arc;

use log::debug;

use super::accounts_errors::{AccountError, Result};
use super::accounts_model::{Account, NewAccount};
use super::accounts_repository::AccountRepository;
use super::accounts_traits::AccountServiceTrait;
use crate::db::{get_connection, DbPool};
use crate::portfolios::PortfolioRepository;

/// Service for managing accounts
pub struct AccountService {
    pool: Arc<DbPool>,
    repository: AccountRepository,
    portfolio_repository: PortfolioRepository,
}

impl AccountService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: AccountRepository::new(),
            portfolio_repository: PortfolioRepository::new(),
        }
    }
}

impl AccountServiceTrait for AccountService {
    fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!(
            "Creating account '{}' in portfolio {}",
            new_account.name, new_account.portfolio_id
        );

        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        // The owning portfolio must exist; accounts are never orphaned.
        self.portfolio_repository
            .get_by_id(&mut conn, &new_account.portfolio_id)
            .map_err(|e| AccountError::InvalidData(e.to_string()))?;

        self.repository.create(&mut conn, new_account)
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        self.repository.get_by_id(&mut conn, account_id)
    }

    fn list_accounts_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        self.repository.list_by_portfolio(&mut conn, portfolio_id)
    }

    fn delete_account(&self, account_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        self.repository.delete(&mut conn, account_id)?;
        Ok(())
    }
}
