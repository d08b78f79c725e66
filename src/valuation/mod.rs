pub(crate) mod valuation_model;
pub(crate) mod valuation_service;

pub use crate::portfolios::{PortfolioError, Result};
pub use valuation_model::{
    AccountSummary, CashFlowSummary, DailyMover, HoldingValuation, PortfolioInsights,
    PortfolioSummary,
};
pub use valuation_service::PortfolioValuationService;
