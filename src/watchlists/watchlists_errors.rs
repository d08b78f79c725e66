use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for watchlist operations
#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("A watchlist named '{0}' already exists in this portfolio")]
    DuplicateName(String),
    #[error("Asset '{0}' is already in this watchlist")]
    DuplicateItem(String),
    #[error("Asset error: {0}")]
    Asset(String),
}

impl From<DieselError> for WatchlistError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => WatchlistError::NotFound("Record not found".to_string()),
            _ => WatchlistError::DatabaseError(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for WatchlistError {
    fn from(err: r2d2::Error) -> Self {
        WatchlistError::DatabaseError(err.to_string())
    }
}

/// Result type for watchlist operations
pub type Result<T> = std::result::Result<T, WatchlistError>;
