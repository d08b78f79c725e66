use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::accounts::AccountError;
use crate::assets::AssetError;
use crate::holdings::HoldingError;
use crate::transactions::TransactionError;

/// Custom error type for order placement
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),
    #[error("Invalid order type '{0}'")]
    InvalidOrderType(String),
    #[error("Invalid transaction type '{0}' for an order")]
    InvalidTransactionType(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Quantity must be positive")]
    InvalidQuantity,
    #[error("Could not retrieve a valid market price for {0}")]
    NoValidMarketPrice(String),
    #[error("A valid trigger price is required for LIMIT and STOP_LOSS orders")]
    MissingTriggerPrice,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Insufficient shares to sell")]
    InsufficientShares,
    #[error("Asset error: {0}")]
    Asset(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for OrderError {
    fn from(err: DieselError) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl From<r2d2::Error> for OrderError {
    fn from(err: r2d2::Error) -> Self {
        OrderError::DatabaseError(err.to_string())
    }
}

impl From<AccountError> for OrderError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(msg) => OrderError::AccountNotFound(msg),
            other => OrderError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AssetError> for OrderError {
    fn from(err: AssetError) -> Self {
        OrderError::Asset(err.to_string())
    }
}

impl From<HoldingError> for OrderError {
    fn from(err: HoldingError) -> Self {
        match err {
            HoldingError::InsufficientShares => OrderError::InsufficientShares,
            HoldingError::InvalidQuantity => OrderError::InvalidQuantity,
            other => OrderError::DatabaseError(other.to_string()),
        }
    }
}

impl From<TransactionError> for OrderError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InsufficientFunds => OrderError::InsufficientFunds,
            TransactionError::InsufficientShares => OrderError::InsufficientShares,
            other => OrderError::DatabaseError(other.to_string()),
        }
    }
}

/// Result type for order placement
pub type Result<T> = std::result::Result<T, OrderError>;
