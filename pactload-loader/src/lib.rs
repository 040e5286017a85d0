//! # pactload-loader
//!
//! Pact loaders: resolve the pacts a provider must be verified against.
//!
//! - [`PactBrokerLoader`] queries a pact broker per tag, filters consumers,
//!   and downloads each pact.
//! - [`PactFolderLoader`] reads pact files from a local directory.
//!
//! Both record what they loaded in a [`PactSource`], exposed through
//! [`PactLoader::pact_source`].

pub mod broker_loader;
pub mod config;
pub mod error;
pub mod filter;
pub mod folder_loader;
pub mod source;

pub use broker_loader::PactBrokerLoader;
pub use config::{load_config_at, resolver_by_name, resolver_or_default, BrokerLoaderConfig};
pub use error::LoadError;
pub use filter::filter_consumers;
pub use folder_loader::PactFolderLoader;
pub use source::PactSource;

use pactload_core::{PactDocument, ProviderName, ValueResolver};

/// A source of pacts for provider verification.
pub trait PactLoader {
    /// Human-readable origin, e.g. `Pact Broker(http://pb:9292)`.
    fn description(&self) -> String;

    /// Load every pact for `provider`.
    fn load(&mut self, provider: &ProviderName) -> Result<Vec<PactDocument>, LoadError>;

    /// Everything loaded so far, across all calls to [`PactLoader::load`].
    fn pact_source(&self) -> &PactSource;

    /// Replace the resolver used for `${...}` expressions.
    fn set_value_resolver(&mut self, _resolver: Box<dyn ValueResolver>) {}
}
