use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::orders_errors::{OrderError, Result};
use crate::transactions::{OrderType, TransactionType};

/// Input model for order placement. Fields are optional so missing input is
/// reported as a typed `MissingField` instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub account_id: Option<String>,
    pub ticker: Option<String>,
    pub quantity: Option<Decimal>,
    pub order_type: Option<String>,
    pub transaction_type: Option<String>,
    pub trigger_price: Option<Decimal>,
}

/// The validated form of an order request
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub account_id: String,
    pub ticker: String,
    pub quantity: Decimal,
    pub order_type: OrderType,
    pub transaction_type: TransactionType,
    pub trigger_price: Option<Decimal>,
}

impl OrderRequest {
    /// Field and enum validation, in the order callers observe failures:
    /// required fields, then order type, then transaction type, then quantity.
    pub fn validate(&self) -> Result<ValidatedOrder> {
        let account_id = require_str(&self.account_id, "account_id")?;
        let ticker = require_str(&self.ticker, "ticker")?;
        let quantity = self
            .quantity
            .ok_or_else(|| OrderError::MissingField("quantity".to_string()))?;
        let order_type_raw = require_str(&self.order_type, "order_type")?;
        let transaction_type_raw = require_str(&self.transaction_type, "transaction_type")?;

        let order_type: OrderType = order_type_raw
            .parse()
            .map_err(|_| OrderError::InvalidOrderType(order_type_raw.clone()))?;

        let transaction_type: TransactionType = transaction_type_raw
            .parse()
            .map_err(|_| OrderError::InvalidTransactionType(transaction_type_raw.clone()))?;
        // Orders only move shares; cash events go through the recorder.
        if !transaction_type.is_trade() {
            return Err(OrderError::InvalidTransactionType(transaction_type_raw));
        }

        Ok(ValidatedOrder {
            account_id,
            ticker,
            quantity,
            order_type,
            transaction_type,
            trigger_price: self.trigger_price,
        })
    }
}

fn require_str(value: &Option<String>, field: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(OrderError::MissingField(field.to_string())),
    }
}
