use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One holding's daily dollar move, for the gainers/losers insight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyMover {
    pub ticker: String,
    pub name: String,
    pub change_amount: f64,
    pub percent_change: f64,
}

/// Trailing-window cash flow. Spending is reported as a positive magnitude.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub income: f64,
    pub spending: f64,
}

/// Per-account line of the summary. Cash accounts report their balance;
/// investment accounts report the market value of their holdings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
}

/// Per-holding valuation line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub ticker: String,
    pub name: String,
    pub quantity: f64,
    pub average_price: f64,
    pub cost_basis: f64,
    pub market_value: f64,
    pub unrealized_pnl: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInsights {
    pub top_gainers: Vec<DailyMover>,
    pub top_losers: Vec<DailyMover>,
    /// Sector name to percentage of total holdings market value
    pub sector_allocation: HashMap<String, f64>,
}

/// The full valuation output for one portfolio. Aggregation runs on exact
/// decimals; these floats exist only at the serialization boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub portfolio_id: String,
    pub portfolio_name: String,
    pub net_worth: f64,
    pub todays_change_amount: f64,
    pub todays_change_percent: f64,
    pub cash_flow: CashFlowSummary,
    pub accounts: Vec<AccountSummary>,
    pub holdings: Vec<HoldingValuation>,
    pub insights: PortfolioInsights,
}
