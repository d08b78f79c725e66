pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_repository;
pub(crate) mod market_data_service;
pub(crate) mod market_data_traits;
pub mod providers;

pub use market_data_errors::{MarketDataError, Result};
pub use market_data_model::{HistoricalPrice, OhlcvBar, TickerQuote};
pub use market_data_repository::HistoricalPriceRepository;
pub use market_data_service::MarketDataService;
pub use market_data_traits::PriceOracle;
