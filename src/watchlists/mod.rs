pub(crate) mod watchlists_errors;
pub(crate) mod watchlists_model;
pub(crate) mod watchlists_repository;
pub(crate) mod watchlists_service;

pub use watchlists_errors::{Result, WatchlistError};
pub use watchlists_model::{
    Watchlist, WatchlistDB, WatchlistItemDB, WatchlistItemView, WatchlistView,
};
pub use watchlists_repository::WatchlistRepository;
pub use watchlists_service::WatchlistService;
