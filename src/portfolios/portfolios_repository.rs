use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::portfolios_errors::{PortfolioError, Result};
use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDB};
use crate::schema::portfolios;
use crate::schema::portfolios::dsl::*;

/// Repository for managing portfolio rows
pub struct PortfolioRepository;

impl PortfolioRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, conn: &mut SqliteConnection, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;

        let portfolio_db: PortfolioDB = new_portfolio.into();

        diesel::insert_into(portfolios::table)
            .values(&portfolio_db)
            .execute(conn)?;

        Ok(portfolio_db.into())
    }

    pub fn get_by_id(&self, conn: &mut SqliteConnection, portfolio_id: &str) -> Result<Portfolio> {
        portfolios
            .find(portfolio_id)
            .first::<PortfolioDB>(conn)
            .map(Portfolio::from)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => PortfolioError::NotFound(format!(
                    "Portfolio with id {} not found",
                    portfolio_id
                )),
                _ => PortfolioError::DatabaseError(e.to_string()),
            })
    }

    pub fn list(&self, conn: &mut SqliteConnection) -> Result<Vec<Portfolio>> {
        portfolios
            .order(name.asc())
            .load::<PortfolioDB>(conn)
            .map(|rows| rows.into_iter().map(Portfolio::from).collect())
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    /// Deletes a portfolio; accounts and watchlists go with it via cascade.
    pub fn delete(&self, conn: &mut SqliteConnection, portfolio_id: &str) -> Result<usize> {
        let affected = diesel::delete(portfolios.find(portfolio_id)).execute(conn)?;

        if affected == 0 {
            return Err(PortfolioError::NotFound(format!(
                "Portfolio with id {} not found",
                portfolio_id
            )));
        }

        Ok(affected)
    }
}

impl Default for PortfolioRepository {
    fn default() -> Self {
        Self::new()
    }
}
