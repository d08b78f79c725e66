diesel::table! {
    portfolios (id) {
        id -> Text,
        name -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    accounts (id) {
        id -> Text,
        name -> Text,
        account_type -> Text,
        institution -> Nullable<Text>,
        balance -> Text,
        portfolio_id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    assets (id) {
        id -> Text,
        ticker_symbol -> Text,
        name -> Text,
        asset_type -> Text,
        last_price -> Nullable<Text>,
        previous_close_price -> Nullable<Text>,
        price_updated_at -> Nullable<Timestamp>,
        market_cap -> Nullable<BigInt>,
        sector -> Nullable<Text>,
        pe_ratio -> Nullable<Text>,
        eps -> Nullable<Text>,
        dividend_yield -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    historical_prices (id) {
        id -> Text,
        asset_id -> Text,
        price_date -> Date,
        open_price -> Nullable<Text>,
        high_price -> Nullable<Text>,
        low_price -> Nullable<Text>,
        close_price -> Text,
        volume -> Nullable<BigInt>,
    }
}

diesel::table! {
    holdings (id) {
        id -> Text,
        account_id -> Text,
        asset_id -> Text,
        quantity -> Text,
        cost_basis -> Text,
    }
}

diesel::table! {
    transactions (id) {
        id -> Text,
        account_id -> Text,
        asset_id -> Nullable<Text>,
        transaction_type -> Text,
        status -> Text,
        order_type -> Nullable<Text>,
        trigger_price -> Nullable<Text>,
        transaction_date -> Date,
        quantity -> Nullable<Text>,
        price_per_unit -> Nullable<Text>,
        total_amount -> Text,
        commission_fee -> Text,
        realized_pnl -> Nullable<Text>,
        description -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    watchlists (id) {
        id -> Text,
        name -> Text,
        portfolio_id -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    watchlist_items (id) {
        id -> Text,
        watchlist_id -> Text,
        asset_id -> Text,
    }
}

diesel::joinable!(accounts -> portfolios (portfolio_id));
diesel::joinable!(historical_prices -> assets (asset_id));
diesel::joinable!(holdings -> accounts (account_id));
diesel::joinable!(holdings -> assets (asset_id));
diesel::joinable!(transactions -> accounts (account_id));
diesel::joinable!(transactions -> assets (asset_id));
diesel::joinable!(watchlists -> portfolios (portfolio_id));
diesel::joinable!(watchlist_items -> watchlists (watchlist_id));
diesel::joinable!(watchlist_items -> assets (asset_id));

diesel::allow_tables_to_appear_in_same_query!(
    portfolios,
    accounts,
    assets,
    historical_prices,
    holdings,
    transactions,
    watchlists,
    watchlist_items,
);
