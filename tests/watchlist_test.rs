mod common;

use rust_decimal_macros::dec;

use finledger_core::watchlists::{WatchlistError, WatchlistService};

use common::StaticPriceOracle;

#[test]
fn create_rename_and_duplicate_names() {
    let pool = common::setup_test_db("watchlist_names");
    let portfolio = common::create_portfolio(&pool, "Main");

    let assets = common::asset_service(pool.clone(), StaticPriceOracle::new());
    let service = WatchlistService::new(pool.clone(), assets);

    let tech = service.create_watchlist(&portfolio.id, "Tech").unwrap();
    service.create_watchlist(&portfolio.id, "Energy").unwrap();

    let err = service.create_watchlist(&portfolio.id, "Tech").unwrap_err();
    assert!(matches!(err, WatchlistError::DuplicateName(_)));

    let err = service.rename_watchlist(&tech.id, "Energy").unwrap_err();
    assert!(matches!(err, WatchlistError::DuplicateName(_)));

    let renamed = service.rename_watchlist(&tech.id, "Growth").unwrap();
    assert_eq!(renamed.name, "Growth");

    // Renaming to its own current name is allowed
    let same = service.rename_watchlist(&renamed.id, "Growth").unwrap();
    assert_eq!(same.name, "Growth");
}

#[test]
fn creating_in_missing_portfolio_fails() {
    let pool = common::setup_test_db("watchlist_no_portfolio");
    let assets = common::asset_service(pool.clone(), StaticPriceOracle::new());
    let service = WatchlistService::new(pool, assets);

    let err = service.create_watchlist("no-such-portfolio", "Tech").unwrap_err();
    assert!(matches!(err, WatchlistError::NotFound(_)));
}

#[test]
fn add_item_creates_asset_and_rejects_duplicates() {
    let pool = common::setup_test_db("watchlist_items");
    let portfolio = common::create_portfolio(&pool, "Main");

    let oracle = StaticPriceOracle::new().with_quote("AAPL", "Apple Inc.", dec!(175.50), dec!(170));
    let assets = common::asset_service(pool.clone(), oracle);
    let service = WatchlistService::new(pool.clone(), assets);

    let watchlist = service.create_watchlist(&portfolio.id, "Tech").unwrap();

    let item = tokio_test::block_on(service.add_item(&watchlist.id, "aapl")).unwrap();
    assert_eq!(item.ticker_symbol, "AAPL");
    assert_eq!(item.name, "Apple Inc.");
    assert_eq!(item.last_price, Some(175.5));

    let err = tokio_test::block_on(service.add_item(&watchlist.id, "AAPL")).unwrap_err();
    assert!(matches!(err, WatchlistError::DuplicateItem(_)));

    let views = service.list_watchlists(&portfolio.id).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].items.len(), 1);
    assert_eq!(views[0].items[0].ticker_symbol, "AAPL");
}

#[test]
fn remove_item_by_ticker() {
    let pool = common::setup_test_db("watchlist_remove");
    let portfolio = common::create_portfolio(&pool, "Main");

    let oracle = StaticPriceOracle::new().with_quote("MSFT", "Microsoft", dec!(200), dec!(198));
    let assets = common::asset_service(pool.clone(), oracle);
    let service = WatchlistService::new(pool.clone(), assets);

    let watchlist = service.create_watchlist(&portfolio.id, "Tech").unwrap();
    tokio_test::block_on(service.add_item(&watchlist.id, "MSFT")).unwrap();

    service.remove_item(&watchlist.id, "MSFT").unwrap();
    let views = service.list_watchlists(&portfolio.id).unwrap();
    assert!(views[0].items.is_empty());

    // Removing again is a not-found, not a silent success
    let err = service.remove_item(&watchlist.id, "MSFT").unwrap_err();
    assert!(matches!(err, WatchlistError::NotFound(_)));
}

#[test]
fn unknown_ticker_cannot_be_added() {
    let pool = common::setup_test_db("watchlist_unknown");
    let portfolio = common::create_portfolio(&pool, "Main");

    let assets = common::asset_service(pool.clone(), StaticPriceOracle::new());
    let service = WatchlistService::new(pool.clone(), assets);

    let watchlist = service.create_watchlist(&portfolio.id, "Tech").unwrap();
    let err = tokio_test::block_on(service.add_item(&watchlist.id, "ZZZZ")).unwrap_err();
    assert!(matches!(err, WatchlistError::Asset(_)));
}

#[test]
fn delete_watchlist_removes_it_from_listing() {
    let pool = common::setup_test_db("watchlist_delete");
    let portfolio = common::create_portfolio(&pool, "Main");

    let assets = common::asset_service(pool.clone(), StaticPriceOracle::new());
    let service = WatchlistService::new(pool.clone(), assets);

    let watchlist = service.create_watchlist(&portfolio.id, "Tech").unwrap();
    service.delete_watchlist(&watchlist.id).unwrap();

    assert!(service.list_watchlists(&portfolio.id).unwrap().is_empty());
    assert!(matches!(
        service.delete_watchlist(&watchlist.id),
        Err(WatchlistError::NotFound(_))
    ));
}
