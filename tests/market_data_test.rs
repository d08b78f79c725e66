mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use finledger_core::assets::AssetServiceTrait;
use finledger_core::market_data::{MarketDataError, MarketDataService, OhlcvBar};

use common::StaticPriceOracle;

fn bar(year: i32, month: u32, day: u32, close: Decimal) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        open: Some(close - dec!(1)),
        high: Some(close + dec!(1)),
        low: Some(close - dec!(2)),
        close,
        volume: Some(1_000_000),
    }
}

#[tokio::test]
async fn refresh_updates_cache_and_skips_unresolvable_tickers() {
    let pool = common::setup_test_db("price_refresh");

    let seed_oracle = StaticPriceOracle::new()
        .with_quote("AAPL", "Apple Inc.", dec!(175), dec!(170))
        .with_quote("MSFT", "Microsoft", dec!(200), dec!(198));
    let assets = common::asset_service(pool.clone(), seed_oracle);
    assets.get_or_create_asset("AAPL").await.unwrap();
    assets.get_or_create_asset("MSFT").await.unwrap();

    // On the next refresh the oracle only knows AAPL, at new prices.
    let refresh_oracle =
        StaticPriceOracle::new().with_quote("AAPL", "Apple Inc.", dec!(180), dec!(175));
    let service = MarketDataService::new(pool.clone(), Arc::new(refresh_oracle));

    let updated = service.refresh_all_prices().await.unwrap();
    assert_eq!(updated, 1);

    let aapl = assets.get_by_ticker("AAPL").unwrap();
    assert_eq!(aapl.last_price, Some(dec!(180)));
    assert_eq!(aapl.previous_close_price, Some(dec!(175)));

    // The unresolvable ticker keeps its cached prices.
    let msft = assets.get_by_ticker("MSFT").unwrap();
    assert_eq!(msft.last_price, Some(dec!(200)));
    assert_eq!(msft.previous_close_price, Some(dec!(198)));
}

#[tokio::test]
async fn repeated_history_sync_replaces_bars_for_the_same_date() {
    let pool = common::setup_test_db("history_sync");

    let seed_oracle =
        StaticPriceOracle::new().with_quote("AAPL", "Apple Inc.", dec!(175), dec!(170));
    let assets = common::asset_service(pool.clone(), seed_oracle);
    assets.get_or_create_asset("AAPL").await.unwrap();

    let first = StaticPriceOracle::new()
        .with_bars(vec![bar(2026, 8, 1, dec!(100)), bar(2026, 8, 2, dec!(101))]);
    let written = MarketDataService::new(pool.clone(), Arc::new(first))
        .sync_historical_prices("AAPL")
        .await
        .unwrap();
    assert_eq!(written, 2);

    // The second sync overlaps on Aug 2 with a corrected close.
    let second = StaticPriceOracle::new()
        .with_bars(vec![bar(2026, 8, 2, dec!(150)), bar(2026, 8, 3, dec!(151))]);
    MarketDataService::new(pool.clone(), Arc::new(second))
        .sync_historical_prices("AAPL")
        .await
        .unwrap();

    let overview = assets.get_asset_overview("AAPL").unwrap();
    let history = &overview.historical_prices;
    assert_eq!(history.len(), 3);

    let dates: Vec<NaiveDate> = history.iter().map(|h| h.price_date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 2).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        ]
    );
    assert_eq!(history[0].close, dec!(100));
    assert_eq!(history[1].close, dec!(150));
    assert_eq!(history[2].close, dec!(151));
}

#[tokio::test]
async fn history_sync_for_unknown_ticker_is_not_found() {
    let pool = common::setup_test_db("history_unknown");

    let service = MarketDataService::new(pool, Arc::new(StaticPriceOracle::new()));
    let err = service.sync_historical_prices("ZZZZ").await.unwrap_err();
    assert!(matches!(err, MarketDataError::NotFound(_)));
}
