use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::valuation_model::{
    AccountSummary, CashFlowSummary, DailyMover, HoldingValuation, PortfolioInsights,
    PortfolioSummary,
};
use crate::accounts::{AccountRepository, AccountType};
use crate::constants::{CASH_FLOW_WINDOW_DAYS, DEFAULT_SECTOR};
use crate::db::{get_connection, DbPool};
use crate::holdings::HoldingRepository;
use crate::portfolios::{PortfolioError, PortfolioRepository, Result};
use crate::transactions::TransactionRepository;

const HUNDRED: Decimal = dec!(100);

/// Read-only aggregator computing the full valuation of one portfolio.
/// All arithmetic stays in exact decimals; conversion to floats happens once,
/// when the summary is assembled.
pub struct PortfolioValuationService {
    pool: Arc<DbPool>,
    portfolio_repository: PortfolioRepository,
    account_repository: AccountRepository,
    holding_repository: HoldingRepository,
    transaction_repository: TransactionRepository,
}

impl PortfolioValuationService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            pool,
            portfolio_repository: PortfolioRepository::new(),
            account_repository: AccountRepository::new(),
            holding_repository: HoldingRepository::new(),
            transaction_repository: TransactionRepository::new(),
        }
    }

    pub fn get_portfolio_summary(&self, portfolio_id: &str) -> Result<PortfolioSummary> {
        debug!("Computing portfolio summary for {}", portfolio_id);

        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        let portfolio = self.portfolio_repository.get_by_id(&mut conn, portfolio_id)?;

        let holdings = self
            .holding_repository
            .list_with_assets_by_portfolio(&mut conn, portfolio_id)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;
        let accounts = self
            .account_repository
            .list_by_portfolio(&mut conn, portfolio_id)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        let mut investment_value = Decimal::ZERO;
        let mut todays_change = Decimal::ZERO;
        let mut yesterday_value = Decimal::ZERO;
        let mut value_by_account: HashMap<String, Decimal> = HashMap::new();
        let mut value_by_sector: HashMap<String, Decimal> = HashMap::new();
        let mut movers: Vec<(Decimal, DailyMover)> = Vec::new();
        let mut holding_lines: Vec<HoldingValuation> = Vec::new();

        for (holding, asset) in &holdings {
            let market_value = holding.market_value(asset.last_price);
            investment_value += market_value;
            *value_by_account
                .entry(holding.account_id.clone())
                .or_default() += market_value;

            let sector = asset
                .sector
                .clone()
                .unwrap_or_else(|| DEFAULT_SECTOR.to_string());
            *value_by_sector.entry(sector).or_default() += market_value;

            if let (Some(last), Some(previous)) = (asset.last_price, asset.previous_close_price) {
                let change = (last - previous) * holding.quantity;
                let yesterday = previous * holding.quantity;
                todays_change += change;
                yesterday_value += yesterday;

                let percent = if yesterday > Decimal::ZERO {
                    change / yesterday * HUNDRED
                } else {
                    Decimal::ZERO
                };
                movers.push((
                    change,
                    DailyMover {
                        ticker: asset.ticker_symbol.clone(),
                        name: asset.name.clone(),
                        change_amount: to_f64(change),
                        percent_change: to_f64(percent),
                    },
                ));
            }

            holding_lines.push(HoldingValuation {
                ticker: asset.ticker_symbol.clone(),
                name: asset.name.clone(),
                quantity: to_f64(holding.quantity),
                average_price: to_f64(holding.average_price()),
                cost_basis: to_f64(holding.cost_basis),
                market_value: to_f64(market_value),
                unrealized_pnl: to_f64(holding.unrealized_pnl(asset.last_price)),
            });
        }

        let cash_value: Decimal = accounts.iter().map(|a| a.balance).sum();
        let net_worth = cash_value + investment_value;

        let todays_change_percent = if yesterday_value > Decimal::ZERO {
            todays_change / yesterday_value * HUNDRED
        } else {
            Decimal::ZERO
        };

        movers.sort_by(|a, b| b.0.cmp(&a.0));
        let top_gainers: Vec<DailyMover> =
            movers.iter().take(5).map(|(_, m)| m.clone()).collect();
        let mut losers: Vec<(Decimal, DailyMover)> = movers
            .into_iter()
            .filter(|(change, _)| *change < Decimal::ZERO)
            .collect();
        losers.sort_by(|a, b| a.0.cmp(&b.0));
        let top_losers: Vec<DailyMover> =
            losers.into_iter().take(5).map(|(_, m)| m).collect();

        let sector_allocation: HashMap<String, f64> = value_by_sector
            .into_iter()
            .map(|(sector, value)| {
                let percent = if investment_value > Decimal::ZERO {
                    value / investment_value * HUNDRED
                } else {
                    Decimal::ZERO
                };
                (sector, to_f64(percent))
            })
            .collect();

        let window_start = Utc::now().date_naive() - Duration::days(CASH_FLOW_WINDOW_DAYS);
        let window = self
            .transaction_repository
            .list_completed_for_portfolio_since(&mut conn, portfolio_id, window_start)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;
        let mut income = Decimal::ZERO;
        let mut spending = Decimal::ZERO;
        for entry in &window {
            if entry.total_amount > Decimal::ZERO {
                income += entry.total_amount;
            } else {
                spending += entry.total_amount;
            }
        }

        let account_summaries: Vec<AccountSummary> = accounts
            .iter()
            .map(|account| {
                let reported = match account.account_type {
                    AccountType::Cash => account.balance,
                    AccountType::Investment | AccountType::Retirement => value_by_account
                        .get(&account.id)
                        .copied()
                        .unwrap_or_default(),
                };
                AccountSummary {
                    id: account.id.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type.to_string(),
                    balance: to_f64(reported),
                }
            })
            .collect();

        Ok(PortfolioSummary {
            portfolio_id: portfolio.id,
            portfolio_name: portfolio.name,
            net_worth: to_f64(net_worth),
            todays_change_amount: to_f64(todays_change),
            todays_change_percent: to_f64(todays_change_percent),
            cash_flow: CashFlowSummary {
                income: to_f64(income),
                spending: to_f64(spending.abs()),
            },
            accounts: account_summaries,
            holdings: holding_lines,
            insights: PortfolioInsights {
                top_gainers,
                top_losers,
                sector_allocation,
            },
        })
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
