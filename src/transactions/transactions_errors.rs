use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;
use crate::holdings::HoldingError;

/// Custom error type for ledger operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Required field '{0}' is missing")]
    MissingField(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Insufficient shares to sell")]
    InsufficientShares,
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => TransactionError::NotFound("Record not found".to_string()),
            _ => TransactionError::DatabaseError(err.to_string()),
        }
    }
}

impl From<r2d2::Error> for TransactionError {
    fn from(err: r2d2::Error) -> Self {
        TransactionError::DatabaseError(err.to_string())
    }
}

impl From<AccountError> for TransactionError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => TransactionError::AccountNotFound(msg),
            other => TransactionError::DatabaseError(other.to_string()),
        }
    }
}

impl From<HoldingError> for TransactionError {
    fn from(err: HoldingError) -> Self {
        match err {
            HoldingError::InsufficientShares => TransactionError::InsufficientShares,
            HoldingError::InvalidQuantity => {
                TransactionError::InvalidData("Quantity must be positive".to_string())
            }
            other => TransactionError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, TransactionError>;
