pub(crate) mod provider_registry;
pub(crate) mod yahoo_provider;

pub use provider_registry::ProviderRegistry;
pub use yahoo_provider::YahooProvider;
