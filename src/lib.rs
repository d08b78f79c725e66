pub mod db;

pub mod accounts;
pub mod assets;
pub mod constants;
pub mod errors;
pub mod holdings;
pub mod market_data;
pub mod orders;
pub mod portfolios;
pub mod schema;
pub mod transactions;
pub mod valuation;
pub mod watchlists;

pub use errors::{Error, Result};
