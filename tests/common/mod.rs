use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::Local;
use rust_decimal::Decimal;

use finledger_core::accounts::{Account, AccountService, AccountServiceTrait, NewAccount};
use finledger_core::assets::AssetService;
use finledger_core::db::{self, DbPool};
use finledger_core::market_data::{
    MarketDataError, OhlcvBar, PriceOracle, Result as MarketDataResult, TickerQuote,
};
use finledger_core::portfolios::{NewPortfolio, Portfolio, PortfolioService};

/// A price oracle answering from a fixed table, for deterministic tests.
pub struct StaticPriceOracle {
    quotes: HashMap<String, TickerQuote>,
    bars: Vec<OhlcvBar>,
}

impl StaticPriceOracle {
    pub fn new() -> Self {
        Self {
            quotes: HashMap::new(),
            bars: Vec::new(),
        }
    }

    pub fn with_quote(
        mut self,
        ticker: &str,
        name: &str,
        last_price: Decimal,
        previous_close: Decimal,
    ) -> Self {
        self.quotes.insert(
            ticker.to_uppercase(),
            TickerQuote {
                name: name.to_string(),
                last_price,
                previous_close,
            },
        );
        self
    }

    pub fn with_bars(mut self, bars: Vec<OhlcvBar>) -> Self {
        self.bars = bars;
        self
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn resolve(&self, ticker: &str) -> MarketDataResult<TickerQuote> {
        self.quotes
            .get(&ticker.to_uppercase())
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_uppercase()))
    }

    async fn daily_history(
        &self,
        _ticker: &str,
        _start: SystemTime,
        _end: SystemTime,
    ) -> MarketDataResult<Vec<OhlcvBar>> {
        Ok(self.bars.clone())
    }
}

pub fn get_test_db_path(test_id: &str) -> String {
    let now = Local::now();
    now.format(&format!("./tests/output/%Y%m%d/%H%M%S%f-{}/", test_id))
        .to_string()
}

/// Initializes a file-backed test database with migrations applied
pub fn setup_test_db(test_id: &str) -> Arc<DbPool> {
    let db_dir = get_test_db_path(test_id);
    let db_path = db::init(&db_dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    pool
}

pub fn asset_service(pool: Arc<DbPool>, oracle: StaticPriceOracle) -> Arc<AssetService> {
    Arc::new(AssetService::new(pool, Arc::new(oracle)))
}

pub fn create_portfolio(pool: &Arc<DbPool>, name: &str) -> Portfolio {
    PortfolioService::new(pool.clone())
        .create_portfolio(NewPortfolio {
            name: name.to_string(),
        })
        .expect("Failed to create portfolio")
}

pub fn create_account(
    pool: &Arc<DbPool>,
    portfolio_id: &str,
    name: &str,
    account_type: &str,
    balance: Decimal,
) -> Account {
    AccountService::new(pool.clone())
        .create_account(NewAccount {
            name: name.to_string(),
            account_type: account_type.to_string(),
            institution: None,
            balance: Some(balance),
            portfolio_id: portfolio_id.to_string(),
        })
        .expect("Failed to create account")
}
