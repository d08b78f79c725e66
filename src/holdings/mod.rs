pub(crate) mod holdings_accountant;
pub(crate) mod holdings_errors;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;

pub use holdings_accountant::{apply_buy, apply_sell, PositionState, SellOutcome};
pub use holdings_errors::{HoldingError, Result};
pub use holdings_model::{Holding, HoldingDB};
pub use holdings_repository::HoldingRepository;
