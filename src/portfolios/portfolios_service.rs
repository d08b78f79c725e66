use std::sync::Arc;

use log::debug;

use super::portfolios_model::{NewPortfolio, Portfolio};
use super::portfolios_repository::PortfolioRepository;
use super::Result;
use crate::db::{get_connection, DbPool};

/// Service for managing portfolios
pub struct PortfolioService {
    pool: Arc<DbPool>,
    repository: PortfolioRepository,
}

impl PortfolioService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            repository: PortfolioRepository::new(),
        }
    }

    pub fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        debug!("Creating portfolio '{}'", new_portfolio.name);
        let mut conn = get_connection(&self.pool)
            .map_err(|e| super::PortfolioError::DatabaseError(e.to_string()))?;
        self.repository.create(&mut conn, new_portfolio)
    }

    pub fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| super::PortfolioError::DatabaseError(e.to_string()))?;
        self.repository.get_by_id(&mut conn, portfolio_id)
    }

    pub fn list_portfolios(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| super::PortfolioError::DatabaseError(e.to_string()))?;
        self.repository.list(&mut conn)
    }

    pub fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| super::PortfolioError::DatabaseError(e.to_string()))?;
        self.repository.delete(&mut conn, portfolio_id)?;
        Ok(())
    }
}
