mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use finledger_core::accounts::{AccountService, AccountServiceTrait};
use finledger_core::assets::AssetServiceTrait;
use finledger_core::transactions::{
    NewTransaction, TransactionError, TransactionService, TransactionServiceTrait,
    TransactionStatus, TransactionType, TransactionUpdate,
};

use common::StaticPriceOracle;

#[test]
fn deposit_and_withdrawal_move_the_balance() {
    let pool = common::setup_test_db("deposit_withdraw");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(1000.00));

    let recorder = TransactionService::new(pool.clone());

    let deposit = recorder
        .deposit(&account.id, dec!(500.00), Some("Salary".to_string()))
        .unwrap();
    assert_eq!(deposit.transaction_type, TransactionType::Deposit);
    assert_eq!(deposit.status, TransactionStatus::Completed);
    assert_eq!(deposit.total_amount, dec!(500.00));

    let withdrawal = recorder.withdraw(&account.id, dec!(200.00), None).unwrap();
    assert_eq!(withdrawal.total_amount, dec!(-200.00));

    let account = AccountService::new(pool.clone())
        .get_account(&account.id)
        .unwrap();
    assert_eq!(account.balance, dec!(1300.00));
}

#[test]
fn withdrawal_cannot_overdraw() {
    let pool = common::setup_test_db("overdraw");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(50.00));

    let recorder = TransactionService::new(pool.clone());
    let err = recorder.withdraw(&account.id, dec!(100.00), None).unwrap_err();
    assert!(matches!(err, TransactionError::InsufficientFunds));

    let account = AccountService::new(pool.clone())
        .get_account(&account.id)
        .unwrap();
    assert_eq!(account.balance, dec!(50.00));
    assert!(recorder
        .get_transactions_by_account(&account.id)
        .unwrap()
        .is_empty());
}

#[test]
fn non_positive_cash_amounts_are_rejected() {
    let pool = common::setup_test_db("bad_amounts");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(100.00));

    let recorder = TransactionService::new(pool.clone());
    assert!(matches!(
        recorder.deposit(&account.id, Decimal::ZERO, None),
        Err(TransactionError::InvalidData(_))
    ));
    assert!(matches!(
        recorder.withdraw(&account.id, dec!(-5), None),
        Err(TransactionError::InvalidData(_))
    ));
}

#[test]
fn contradictory_amount_sign_is_rejected() {
    let pool = common::setup_test_db("contradictory_sign");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(1000.00));

    let recorder = TransactionService::new(pool.clone());

    // A negative amount on an inflow type is a caller mistake, not a hint.
    let err = recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "DEPOSIT".to_string(),
            total_amount: Some(dec!(-500.00)),
            transaction_date: "2026-08-01".to_string(),
            asset_ticker: None,
            quantity: None,
            price_per_unit: None,
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidData(_)));

    // Outflow types accept a magnitude or an already signed amount.
    let signed = recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "WITHDRAWAL".to_string(),
            total_amount: Some(dec!(-200.00)),
            transaction_date: "2026-08-01".to_string(),
            asset_ticker: None,
            quantity: None,
            price_per_unit: None,
            description: None,
        })
        .unwrap();
    assert_eq!(signed.total_amount, dec!(-200.00));

    let account = AccountService::new(pool.clone())
        .get_account(&account.id)
        .unwrap();
    assert_eq!(account.balance, dec!(800.00));
    assert_eq!(
        recorder.get_transactions_by_account(&account.id).unwrap().len(),
        1
    );
}

#[test]
fn balance_conservation_over_completed_entries() {
    let pool = common::setup_test_db("conservation");
    let portfolio = common::create_portfolio(&pool, "Main");
    let initial = dec!(1000.00);
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", initial);

    let recorder = TransactionService::new(pool.clone());
    recorder.deposit(&account.id, dec!(500.00), None).unwrap();
    recorder.withdraw(&account.id, dec!(200.00), None).unwrap();
    recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "FEE".to_string(),
            total_amount: Some(dec!(50.00)),
            transaction_date: "2026-08-20".to_string(),
            asset_ticker: None,
            quantity: None,
            price_per_unit: None,
            description: Some("Account maintenance".to_string()),
        })
        .unwrap();

    let ledger = recorder.get_transactions_by_account(&account.id).unwrap();
    let ledger_sum: Decimal = ledger
        .iter()
        .filter(|t| t.status == TransactionStatus::Completed)
        .map(|t| t.total_amount)
        .sum();

    let account = AccountService::new(pool.clone())
        .get_account(&account.id)
        .unwrap();
    assert_eq!(account.balance - initial, ledger_sum);
    assert_eq!(account.balance, dec!(1250.00));
}

#[test]
fn ledger_lists_newest_first() {
    let pool = common::setup_test_db("newest_first");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(0));

    let recorder = TransactionService::new(pool.clone());
    for (date, amount) in [
        ("2026-08-01", dec!(10)),
        ("2026-08-15", dec!(20)),
        ("2026-08-10", dec!(30)),
    ] {
        recorder
            .add_transaction(NewTransaction {
                account_id: account.id.clone(),
                transaction_type: "DEPOSIT".to_string(),
                total_amount: Some(amount),
                transaction_date: date.to_string(),
                asset_ticker: None,
                quantity: None,
                price_per_unit: None,
                description: None,
            })
            .unwrap();
    }

    let ledger = recorder.get_transactions_by_account(&account.id).unwrap();
    let dates: Vec<String> = ledger
        .iter()
        .map(|t| t.transaction_date.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(dates, vec!["2026-08-15", "2026-08-10", "2026-08-01"]);
}

#[test]
fn update_amends_metadata_without_replaying_balances() {
    let pool = common::setup_test_db("metadata_update");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(100.00));

    let recorder = TransactionService::new(pool.clone());
    let entry = recorder
        .deposit(&account.id, dec!(40.00), Some("initial".to_string()))
        .unwrap();

    let updated = recorder
        .update_transaction(
            &entry.id,
            TransactionUpdate {
                description: Some("corrected".to_string()),
                transaction_date: Some("2026-07-01".to_string()),
                total_amount: Some(dec!(60.00)),
            },
        )
        .unwrap();

    assert_eq!(updated.description.as_deref(), Some("corrected"));
    assert_eq!(
        updated.transaction_date.format("%Y-%m-%d").to_string(),
        "2026-07-01"
    );
    assert_eq!(updated.total_amount, dec!(60.00));

    // The balance still reflects the originally recorded amount.
    let account = AccountService::new(pool.clone())
        .get_account(&account.id)
        .unwrap();
    assert_eq!(account.balance, dec!(140.00));
}

#[test]
fn partial_update_leaves_other_fields_untouched() {
    let pool = common::setup_test_db("partial_update");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(100.00));

    let recorder = TransactionService::new(pool.clone());
    let entry = recorder
        .deposit(&account.id, dec!(40.00), Some("Salary".to_string()))
        .unwrap();

    let updated = recorder
        .update_transaction(
            &entry.id,
            TransactionUpdate {
                description: None,
                transaction_date: Some("2026-07-01".to_string()),
                total_amount: None,
            },
        )
        .unwrap();

    assert_eq!(
        updated.transaction_date.format("%Y-%m-%d").to_string(),
        "2026-07-01"
    );
    assert_eq!(updated.description.as_deref(), Some("Salary"));
    assert_eq!(updated.total_amount, dec!(40.00));

    // An empty amendment is a no-op, not an error.
    let unchanged = recorder
        .update_transaction(&entry.id, TransactionUpdate::default())
        .unwrap();
    assert_eq!(unchanged, updated);
}

#[test]
fn update_of_missing_transaction_is_not_found() {
    let pool = common::setup_test_db("update_missing");
    let recorder = TransactionService::new(pool);

    let err = recorder
        .update_transaction("no-such-id", TransactionUpdate::default())
        .unwrap_err();
    assert!(matches!(err, TransactionError::NotFound(_)));
}

#[tokio::test]
async fn trade_backfill_replays_accountant_math() {
    let pool = common::setup_test_db("trade_backfill");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(
        &pool,
        &portfolio.id,
        "Brokerage",
        "INVESTMENT",
        dec!(5000.00),
    );

    let oracle = StaticPriceOracle::new().with_quote("AAPL", "Apple Inc.", dec!(180), dec!(178));
    let assets = common::asset_service(pool.clone(), oracle);
    assets.get_or_create_asset("AAPL").await.unwrap();

    let recorder = TransactionService::new(pool.clone());
    let buy = recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "BUY".to_string(),
            total_amount: Some(dec!(1700.00)),
            transaction_date: "2026-08-01".to_string(),
            asset_ticker: Some("AAPL".to_string()),
            quantity: Some(dec!(10)),
            price_per_unit: Some(dec!(170.00)),
            description: None,
        })
        .unwrap();
    assert!(buy.asset_id.is_some());

    let sell = recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "SELL".to_string(),
            total_amount: Some(dec!(900.00)),
            transaction_date: "2026-08-10".to_string(),
            asset_ticker: Some("AAPL".to_string()),
            quantity: Some(dec!(5)),
            price_per_unit: Some(dec!(180.00)),
            description: None,
        })
        .unwrap();
    assert_eq!(sell.realized_pnl, Some(dec!(50.00)));

    let account = AccountService::new(pool.clone())
        .get_account(&account.id)
        .unwrap();
    assert_eq!(account.balance, dec!(4200.00));
}

#[test]
fn trade_backfill_requires_a_known_asset() {
    let pool = common::setup_test_db("backfill_unknown_asset");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(
        &pool,
        &portfolio.id,
        "Brokerage",
        "INVESTMENT",
        dec!(5000.00),
    );

    let recorder = TransactionService::new(pool.clone());
    let err = recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "BUY".to_string(),
            total_amount: Some(dec!(100.00)),
            transaction_date: "2026-08-01".to_string(),
            asset_ticker: Some("ZZZZ".to_string()),
            quantity: Some(dec!(1)),
            price_per_unit: Some(dec!(100.00)),
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, TransactionError::AssetNotFound(_)));
}

#[test]
fn unknown_enum_values_are_rejected() {
    let pool = common::setup_test_db("unknown_enum");
    let portfolio = common::create_portfolio(&pool, "Main");
    let account = common::create_account(&pool, &portfolio.id, "Checking", "CASH", dec!(100.00));

    let recorder = TransactionService::new(pool);
    let err = recorder
        .add_transaction(NewTransaction {
            account_id: account.id.clone(),
            transaction_type: "TRANSFER".to_string(),
            total_amount: Some(dec!(10.00)),
            transaction_date: "2026-08-01".to_string(),
            asset_ticker: None,
            quantity: None,
            price_per_unit: None,
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, TransactionError::InvalidData(_)));
}
