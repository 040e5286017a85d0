//! # pactload-broker
//!
//! Pact broker access: endpoint validation, authentication selection, the
//! HAL transport, and the consumer queries the loader builds on.
//!
//! Build a [`BrokerClient`] from a validated [`BrokerEndpoint`] and an
//! optional [`AuthConfig`], then call [`fetch_consumers`] for a provider and
//! [`BrokerClient::load_pact`] with each returned consumer's href and credentials.

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod hal;

pub use auth::{AuthConfig, AuthDescriptor};
pub use client::{BrokerClient, BrokerConsumer};
pub use endpoint::BrokerEndpoint;
pub use error::BrokerError;
pub use fetcher::{
    display_url_for_provider, fetch_consumers, is_latest, ConsumerDescriptor, LATEST, UNKNOWN_URL,
};
pub use hal::{HalTransport, UreqTransport};
