//! Broker client handle.
//!
//! A [`BrokerClient`] is bound to one base URL and one [`AuthDescriptor`]. It
//! is rebuilt for every load because both depend on resolved configuration.

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use pactload_core::{PactDocument, ValueResolver};

use crate::auth::{AuthConfig, AuthDescriptor};
use crate::error::{invalid_hal, BrokerError};
use crate::hal::{self, HalTransport};

pub const LATEST_PROVIDER_PACTS: &str = "pb:latest-provider-pacts";
pub const LATEST_PROVIDER_PACTS_WITH_TAG: &str = "pb:latest-provider-pacts-with-tag";
pub const PACTS: &str = "pacts";

/// A raw consumer record from a broker pacts listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConsumer {
    pub name: String,
    /// Absolute URL of the pact document.
    pub href: String,
}

/// Configured handle onto a pact broker.
#[derive(Clone)]
pub struct BrokerClient {
    base_url: Url,
    auth: AuthDescriptor,
    transport: Arc<dyn HalTransport>,
}

impl BrokerClient {
    /// Select authentication for `auth` and bind it to `base_url`.
    pub fn build(
        base_url: Url,
        auth: Option<&AuthConfig>,
        resolver: &dyn ValueResolver,
        transport: Arc<dyn HalTransport>,
    ) -> Result<Self, BrokerError> {
        let auth = AuthDescriptor::resolve(auth, resolver)?;
        Ok(Self::with_auth(base_url, auth, transport))
    }

    pub fn with_auth(base_url: Url, auth: AuthDescriptor, transport: Arc<dyn HalTransport>) -> Self {
        Self {
            base_url,
            auth,
            transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthDescriptor {
        &self.auth
    }

    /// Credential options passed along with every document fetch.
    pub fn options(&self) -> Vec<String> {
        self.auth.options()
    }

    fn get(&self, url: &Url) -> Result<Value, BrokerError> {
        self.transport.get_json(url, &self.auth)
    }

    fn root(&self) -> Result<Value, BrokerError> {
        self.get(&self.base_url)
    }

    /// URL of relation `rel` from the broker index, templated with `params`.
    pub fn link_url(&self, rel: &str, params: &[(&str, &str)]) -> Result<Url, BrokerError> {
        let root = self.root()?;
        hal::link_url(&root, rel, params, &self.base_url)
    }

    /// Consumers with a latest pact for `provider`.
    pub fn fetch_consumers(&self, provider: &str) -> Result<Vec<BrokerConsumer>, BrokerError> {
        self.consumers_for(LATEST_PROVIDER_PACTS, &[("provider", provider)])
    }

    /// Consumers with a latest pact for `provider` tagged `tag`.
    pub fn fetch_consumers_with_tag(
        &self,
        provider: &str,
        tag: &str,
    ) -> Result<Vec<BrokerConsumer>, BrokerError> {
        self.consumers_for(
            LATEST_PROVIDER_PACTS_WITH_TAG,
            &[("provider", provider), ("tag", tag)],
        )
    }

    fn consumers_for(
        &self,
        rel: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<BrokerConsumer>, BrokerError> {
        let listing = self
            .link_url(rel, params)
            .and_then(|url| self.get(&url).map(|doc| (url, doc)));
        let (url, doc) = match listing {
            Ok(listing) => listing,
            // Provider unknown to the broker.
            Err(BrokerError::NotFound { url }) => {
                tracing::debug!("no pacts listing at {url}");
                return Ok(vec![]);
            }
            Err(e) => return Err(e),
        };

        hal::link_entries(&doc, PACTS)
            .into_iter()
            .map(|entry| -> Result<BrokerConsumer, BrokerError> {
                let field = |key: &str| {
                    entry
                        .get(key)
                        .and_then(Value::as_str)
                        .filter(|v| !v.trim().is_empty())
                        .ok_or_else(|| {
                            invalid_hal(&url, format!("pact link without {key}: {entry}"))
                        })
                };
                let name = field("name")?;
                let href = field("href")?;
                let href = self
                    .base_url
                    .join(href)
                    .map_err(|source| BrokerError::InvalidUrl {
                        url: href.to_string(),
                        source,
                    })?;
                Ok(BrokerConsumer {
                    name: name.to_string(),
                    href: href.to_string(),
                })
            })
            .collect()
    }

    /// Display URL of the pacts listing for `provider` and `tag`.
    pub fn url_for_provider(&self, provider: &str, tag: Option<&str>) -> Result<String, BrokerError> {
        let url = match tag {
            Some(tag) => self.link_url(
                LATEST_PROVIDER_PACTS_WITH_TAG,
                &[("provider", provider), ("tag", tag)],
            )?,
            None => self.link_url(LATEST_PROVIDER_PACTS, &[("provider", provider)])?,
        };
        Ok(url.to_string())
    }

    /// Fetch and parse the pact document at `href`, authenticating with the
    /// credential `options` (see [`AuthDescriptor::options`]).
    pub fn load_pact(&self, href: &str, options: &[String]) -> Result<PactDocument, BrokerError> {
        let url = Url::parse(href).map_err(|source| BrokerError::InvalidUrl {
            url: href.to_string(),
            source,
        })?;
        let auth = AuthDescriptor::from_options(options);
        let body = self.transport.get_json(&url, &auth)?;
        Ok(PactDocument::from_value(body, href)?)
    }
}

impl std::fmt::Debug for BrokerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}
