mod common;

use diesel::prelude::*;
use rust_decimal_macros::dec;

use finledger_core::assets::AssetServiceTrait;
use finledger_core::orders::{OrderRequest, OrderService};
use finledger_core::portfolios::PortfolioError;
use finledger_core::schema::assets;
use finledger_core::transactions::{NewTransaction, TransactionService, TransactionServiceTrait};
use finledger_core::valuation::PortfolioValuationService;

use common::StaticPriceOracle;

fn set_sector(pool: &std::sync::Arc<finledger_core::db::DbPool>, asset_id: &str, sector: &str) {
    let mut conn = pool.get().unwrap();
    diesel::update(assets::table.find(asset_id))
        .set(assets::sector.eq(sector))
        .execute(&mut conn)
        .unwrap();
}

#[tokio::test]
async fn summary_combines_cash_and_holdings() {
    let pool = common::setup_test_db("summary_basic");
    let portfolio = common::create_portfolio(&pool, "Main");
    common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(5000.00));
    let brokerage = common::create_account(
        &pool,
        &portfolio.id,
        "Brokerage",
        "INVESTMENT",
        dec!(1750.00),
    );

    // One holding: 10 shares, last 175, previous close 170
    let oracle = StaticPriceOracle::new().with_quote("AAPL", "Apple Inc.", dec!(175), dec!(170));
    let assets_service = common::asset_service(pool.clone(), oracle);
    assets_service.get_or_create_asset("AAPL").await.unwrap();

    let recorder = TransactionService::new(pool.clone());
    recorder
        .add_transaction(NewTransaction {
            account_id: brokerage.id.clone(),
            transaction_type: "BUY".to_string(),
            total_amount: Some(dec!(1750.00)),
            transaction_date: "2026-08-01".to_string(),
            asset_ticker: Some("AAPL".to_string()),
            quantity: Some(dec!(10)),
            price_per_unit: Some(dec!(175.00)),
            description: None,
        })
        .unwrap();

    let summary = PortfolioValuationService::new(pool.clone())
        .get_portfolio_summary(&portfolio.id)
        .unwrap();

    // 5000 cash + 0 brokerage cash + 10 x 175 market value
    assert_eq!(summary.net_worth, 6750.0);
    assert_eq!(summary.todays_change_amount, 50.0);
    let expected_percent = 50.0 / 1700.0 * 100.0;
    assert!((summary.todays_change_percent - expected_percent).abs() < 1e-9);

    assert_eq!(summary.holdings.len(), 1);
    let line = &summary.holdings[0];
    assert_eq!(line.ticker, "AAPL");
    assert_eq!(line.quantity, 10.0);
    assert_eq!(line.market_value, 1750.0);
    assert_eq!(line.unrealized_pnl, 0.0);

    // Cash account reports its balance, the brokerage its holdings value
    let checking = summary
        .accounts
        .iter()
        .find(|a| a.name == "Checking")
        .unwrap();
    assert_eq!(checking.balance, 5000.0);
    let invest = summary
        .accounts
        .iter()
        .find(|a| a.name == "Brokerage")
        .unwrap();
    assert_eq!(invest.balance, 1750.0);
}

#[tokio::test]
async fn movers_and_sector_allocation() {
    let pool = common::setup_test_db("movers_sectors");
    let portfolio = common::create_portfolio(&pool, "Main");
    let brokerage = common::create_account(
        &pool,
        &portfolio.id,
        "Brokerage",
        "INVESTMENT",
        dec!(100000.00),
    );

    let oracle = StaticPriceOracle::new()
        .with_quote("AAPL", "Apple Inc.", dec!(110), dec!(100))
        .with_quote("MSFT", "Microsoft", dec!(95), dec!(100))
        .with_quote("XOM", "Exxon Mobil", dec!(100), dec!(100));
    let assets_service = common::asset_service(pool.clone(), oracle);

    let aapl = assets_service.get_or_create_asset("AAPL").await.unwrap();
    let msft = assets_service.get_or_create_asset("MSFT").await.unwrap();
    assets_service.get_or_create_asset("XOM").await.unwrap();
    set_sector(&pool, &aapl.id, "Technology");
    set_sector(&pool, &msft.id, "Technology");

    let recorder = TransactionService::new(pool.clone());
    for (ticker, quantity, price) in [
        ("AAPL", dec!(10), dec!(100)),
        ("MSFT", dec!(10), dec!(100)),
        ("XOM", dec!(20), dec!(100)),
    ] {
        recorder
            .add_transaction(NewTransaction {
                account_id: brokerage.id.clone(),
                transaction_type: "BUY".to_string(),
                total_amount: Some(quantity * price),
                transaction_date: "2026-08-01".to_string(),
                asset_ticker: Some(ticker.to_string()),
                quantity: Some(quantity),
                price_per_unit: Some(price),
                description: None,
            })
            .unwrap();
    }

    let summary = PortfolioValuationService::new(pool.clone())
        .get_portfolio_summary(&portfolio.id)
        .unwrap();

    // AAPL +100, XOM 0, MSFT -50
    let gainers: Vec<&str> = summary
        .insights
        .top_gainers
        .iter()
        .map(|m| m.ticker.as_str())
        .collect();
    assert_eq!(gainers, vec!["AAPL", "XOM", "MSFT"]);

    let losers: Vec<&str> = summary
        .insights
        .top_losers
        .iter()
        .map(|m| m.ticker.as_str())
        .collect();
    assert_eq!(losers, vec!["MSFT"]);
    assert_eq!(summary.insights.top_losers[0].change_amount, -50.0);

    // Market values: AAPL 1100, MSFT 950, XOM 2000 (no sector -> Other)
    let total = 1100.0 + 950.0 + 2000.0;
    let tech = summary.insights.sector_allocation["Technology"];
    let other = summary.insights.sector_allocation["Other"];
    assert!((tech - (2050.0 / total * 100.0)).abs() < 1e-9);
    assert!((other - (2000.0 / total * 100.0)).abs() < 1e-9);
}

#[tokio::test]
async fn cash_flow_counts_completed_entries_only() {
    let pool = common::setup_test_db("cash_flow");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(10000.00));

    let recorder = TransactionService::new(pool.clone());
    recorder
        .deposit(&account.id, dec!(2000.00), Some("Salary".to_string()))
        .unwrap();
    recorder.withdraw(&account.id, dec!(300.00), None).unwrap();

    // A pending limit order must not appear in the cash flow window.
    let oracle = StaticPriceOracle::new().with_quote("AAPL", "Apple Inc.", dec!(175), dec!(170));
    let assets_service = common::asset_service(pool.clone(), oracle);
    OrderService::new(pool.clone(), assets_service)
        .place_order(OrderRequest {
            account_id: Some(account.id.clone()),
            ticker: Some("AAPL".to_string()),
            quantity: Some(dec!(5)),
            order_type: Some("LIMIT".to_string()),
            transaction_type: Some("BUY".to_string()),
            trigger_price: Some(dec!(150.00)),
        })
        .await
        .unwrap();

    let summary = PortfolioValuationService::new(pool.clone())
        .get_portfolio_summary(&portfolio.id)
        .unwrap();

    assert_eq!(summary.cash_flow.income, 2000.0);
    assert_eq!(summary.cash_flow.spending, 300.0);
}

#[tokio::test]
async fn summary_is_idempotent() {
    let pool = common::setup_test_db("idempotent");
    let portfolio = common::create_portfolio(&pool, "Main");
    common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(1234.56));

    let service = PortfolioValuationService::new(pool.clone());
    let first = service.get_portfolio_summary(&portfolio.id).unwrap();
    let second = service.get_portfolio_summary(&portfolio.id).unwrap();
    assert_eq!(first, second);
}

#[test]
fn summary_for_missing_portfolio_is_not_found() {
    let pool = common::setup_test_db("missing_portfolio");
    let err = PortfolioValuationService::new(pool)
        .get_portfolio_summary("no-such-portfolio")
        .unwrap_err();
    assert!(matches!(err, PortfolioError::NotFound(_)));
}

#[test]
fn summary_serializes_with_camel_case_keys() {
    let pool = common::setup_test_db("summary_json");
    let portfolio = common::create_portfolio(&pool, "Main");
    common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(5000.00));

    let summary = PortfolioValuationService::new(pool)
        .get_portfolio_summary(&portfolio.id)
        .unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["netWorth"], 5000.0);
    assert_eq!(json["todaysChangeAmount"], 0.0);
    assert_eq!(json["cashFlow"]["income"], 0.0);
    assert_eq!(json["accounts"][0]["accountType"], "CASH");
}

#[test]
fn empty_portfolio_reports_zeroes() {
    let pool = common::setup_test_db("empty_portfolio");
    let portfolio = common::create_portfolio(&pool, "Empty");

    let summary = PortfolioValuationService::new(pool)
        .get_portfolio_summary(&portfolio.id)
        .unwrap();

    assert_eq!(summary.net_worth, 0.0);
    assert_eq!(summary.todays_change_amount, 0.0);
    assert_eq!(summary.todays_change_percent, 0.0);
    assert!(summary.holdings.is_empty());
    assert!(summary.insights.top_gainers.is_empty());
    assert!(summary.insights.sector_allocation.is_empty());
}
