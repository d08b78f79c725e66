use std::sync::Arc;

use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::orders_errors::{OrderError, Result};
use super::orders_model::{OrderRequest, ValidatedOrder};
use crate::accounts::AccountRepository;
use crate::assets::{Asset, AssetServiceTrait};
use crate::constants::{BROKERAGE_FEE, MONEY_DECIMAL_PRECISION};
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::holdings::{apply_buy, apply_sell, HoldingRepository};
use crate::transactions::{
    OrderType, Transaction, TransactionRepository, TransactionStatus, TransactionType,
};

/// The order engine. Validates an order, prices it through the asset layer's
/// oracle, and settles MARKET orders against the account and holding in one
/// database transaction. LIMIT/STOP_LOSS orders are recorded as PENDING
/// intents and touch neither balance nor holdings.
pub struct OrderService {
    pool: Arc<DbPool>,
    asset_service: Arc<dyn AssetServiceTrait>,
    account_repository: AccountRepository,
    holding_repository: HoldingRepository,
    transaction_repository: TransactionRepository,
}

impl OrderService {
    pub fn new(pool: Arc<DbPool>, asset_service: Arc<dyn AssetServiceTrait>) -> Self {
        Self {
            pool,
            asset_service,
            account_repository: AccountRepository::new(),
            holding_repository: HoldingRepository::new(),
            transaction_repository: TransactionRepository::new(),
        }
    }

    /// Places an order. The asset lookup (and its oracle call) happens before
    /// the database transaction opens; only local reads and writes run inside
    /// it.
    pub async fn place_order(&self, request: OrderRequest) -> Result<Transaction> {
        let order = request.validate()?;

        debug!(
            "Placing {} {} order: {} x {}",
            order.order_type, order.transaction_type, order.quantity, order.ticker
        );

        {
            let mut conn = get_connection(&self.pool)
                .map_err(|e| OrderError::DatabaseError(e.to_string()))?;
            self.account_repository.get_by_id(&mut conn, &order.account_id)?;
        }

        if order.quantity <= Decimal::ZERO {
            return Err(OrderError::InvalidQuantity);
        }

        let asset = self.asset_service.get_or_create_asset(&order.ticker).await?;
        let current_price = asset
            .last_price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| OrderError::NoValidMarketPrice(asset.ticker_symbol.clone()))?;

        if order.order_type.is_pending() {
            self.record_pending(&order, &asset)
        } else {
            self.settle_market(&order, &asset, current_price)
        }
    }

    /// Records a LIMIT/STOP_LOSS intent. The total amount is an estimate at
    /// the trigger price; nothing is debited until execution, which is out of
    /// scope here.
    fn record_pending(&self, order: &ValidatedOrder, asset: &Asset) -> Result<Transaction> {
        let trigger_price = order
            .trigger_price
            .filter(|p| *p > Decimal::ZERO)
            .ok_or(OrderError::MissingTriggerPrice)?;

        let entry = Transaction {
            id: Uuid::new_v4().to_string(),
            account_id: order.account_id.clone(),
            asset_id: Some(asset.id.clone()),
            transaction_type: order.transaction_type,
            status: TransactionStatus::Pending,
            order_type: Some(order.order_type),
            trigger_price: Some(trigger_price),
            transaction_date: Utc::now().date_naive(),
            quantity: Some(order.quantity),
            price_per_unit: None,
            total_amount: -(order.quantity * trigger_price),
            commission_fee: Decimal::ZERO,
            realized_pnl: None,
            description: Some(format!(
                "Pending {} {} for {} shares of {} at ${}",
                order.order_type,
                order.transaction_type,
                order.quantity,
                asset.ticker_symbol,
                trigger_price.round_dp(MONEY_DECIMAL_PRECISION)
            )),
            created_at: Utc::now().naive_utc(),
        };

        let mut conn = get_connection(&self.pool)
            .map_err(|e| OrderError::DatabaseError(e.to_string()))?;
        Ok(self.transaction_repository.insert(&mut conn, &entry)?)
    }

    /// Settles a MARKET order at the current cached price. The balance check,
    /// holding mutation, balance write and ledger insert run in one database
    /// transaction; the account is re-read inside it so a concurrent
    /// placement cannot spend the same cash twice.
    fn settle_market(
        &self,
        order: &ValidatedOrder,
        asset: &Asset,
        current_price: Decimal,
    ) -> Result<Transaction> {
        let total_value = order.quantity * current_price;

        self.pool.execute(|conn| {
            let account = self.account_repository.get_by_id(conn, &order.account_id)?;

            let state = self
                .holding_repository
                .find_for_account_asset(conn, &account.id, &asset.id)?
                .map(|h| h.position())
                .unwrap_or_default();

            let (new_balance, total_amount, realized_pnl) = match order.transaction_type {
                TransactionType::Buy => {
                    if account.balance < total_value + BROKERAGE_FEE {
                        return Err(OrderError::InsufficientFunds);
                    }
                    let next = apply_buy(state, order.quantity, current_price)?;
                    self.holding_repository
                        .save_position(conn, &account.id, &asset.id, &next)?;
                    (
                        account.balance - total_value - BROKERAGE_FEE,
                        -total_value,
                        None,
                    )
                }
                TransactionType::Sell => {
                    let outcome = apply_sell(state, order.quantity, current_price)?;
                    self.holding_repository
                        .save_position(conn, &account.id, &asset.id, &outcome.state)?;
                    (
                        account.balance + total_value - BROKERAGE_FEE,
                        total_value,
                        Some(outcome.realized_pnl),
                    )
                }
                // validate() restricts orders to BUY/SELL
                _ => unreachable!(),
            };

            self.account_repository
                .set_balance(conn, &account.id, new_balance)?;

            let entry = Transaction {
                id: Uuid::new_v4().to_string(),
                account_id: account.id.clone(),
                asset_id: Some(asset.id.clone()),
                transaction_type: order.transaction_type,
                status: TransactionStatus::Completed,
                order_type: Some(OrderType::Market),
                trigger_price: None,
                transaction_date: Utc::now().date_naive(),
                quantity: Some(order.quantity),
                price_per_unit: Some(current_price),
                total_amount,
                commission_fee: BROKERAGE_FEE,
                realized_pnl,
                description: None,
                created_at: Utc::now().naive_utc(),
            };

            Ok(self.transaction_repository.insert(conn, &entry)?)
        })
    }
}
