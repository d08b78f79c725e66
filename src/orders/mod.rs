pub(crate) mod orders_errors;
pub(crate) mod orders_model;
pub(crate) mod orders_service;

pub use orders_errors::{OrderError, Result};
pub use orders_model::OrderRequest;
pub use orders_service::OrderService;
