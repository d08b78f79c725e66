pub(crate) mod portfolios_errors;
pub(crate) mod portfolios_model;
pub(crate) mod portfolios_repository;
pub(crate) mod portfolios_service;

pub use portfolios_errors::{PortfolioError, Result};
pub use portfolios_model::{NewPortfolio, Portfolio, PortfolioDB};
pub use portfolios_repository::PortfolioRepository;
pub use portfolios_service::PortfolioService;
