pub(crate) mod assets_errors;
pub(crate) mod assets_model;
pub(crate) mod assets_repository;
pub(crate) mod assets_service;
pub(crate) mod assets_traits;

pub use assets_errors::{AssetError, Result};
pub use assets_model::{Asset, AssetDB, AssetOverview, AssetType, NewAsset};
pub use assets_repository::AssetRepository;
pub use assets_service::AssetService;
pub use assets_traits::AssetServiceTrait;
