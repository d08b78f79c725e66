use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flat per-trade commission charged on market BUY and SELL executions
pub const BROKERAGE_FEE: Decimal = dec!(1.00);

/// Decimal precision for stored monetary amounts
pub const MONEY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for stored share quantities and prices
pub const QUANTITY_DECIMAL_PRECISION: u32 = 4;

/// Trailing window, in days, for the portfolio cash-flow summary
pub const CASH_FLOW_WINDOW_DAYS: i64 = 30;

/// Sector bucket used when an asset has no sector on record
pub const DEFAULT_SECTOR: &str = "Other";

/// Upper bound on a single price-oracle provider call
pub const PRICE_ORACLE_TIMEOUT_SECS: u64 = 10;
