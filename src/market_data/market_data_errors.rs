use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for price-oracle and market-data operations
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("No market data found for ticker '{0}'")]
    NotFound(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Provider call timed out: {0}")]
    Timeout(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for MarketDataError {
    fn from(err: DieselError) -> Self {
        MarketDataError::DatabaseError(err.to_string())
    }
}

impl From<r2d2::Error> for MarketDataError {
    fn from(err: r2d2::Error) -> Self {
        MarketDataError::DatabaseError(err.to_string())
    }
}

/// Result type for market-data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;
