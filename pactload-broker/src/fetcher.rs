//! Consumer queries for a provider, with or without a tag.

use pactload_core::{ConsumerName, ProviderName};

use crate::client::{BrokerClient, BrokerConsumer};
use crate::error::BrokerError;

/// Tag sentinel meaning "latest pact regardless of tag".
pub const LATEST: &str = "latest";

/// Placeholder used in diagnostics when the broker URL cannot be computed.
pub const UNKNOWN_URL: &str = "Unknown";

/// A consumer with a pact for the provider, plus where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerDescriptor {
    pub name: ConsumerName,
    pub pact_href: String,
    /// Credential options of the client that found the consumer, passed
    /// along when the pact is downloaded.
    pub credentials: Vec<String>,
    /// Tag the consumer was found under; `None` for latest.
    pub tag: Option<String>,
}

impl ConsumerDescriptor {
    fn from_broker(consumer: BrokerConsumer, credentials: &[String], tag: Option<&str>) -> Self {
        Self {
            name: ConsumerName::from(consumer.name),
            pact_href: consumer.href,
            credentials: credentials.to_vec(),
            tag: tag.map(str::to_string),
        }
    }
}

/// True when `tag` selects the latest pacts rather than a tagged set.
pub fn is_latest(tag: Option<&str>) -> bool {
    match tag {
        None => true,
        Some(t) => t.is_empty() || t == LATEST,
    }
}

/// Query the broker for consumers of `provider`.
///
/// An empty result is not an error here.
pub fn fetch_consumers(
    client: &BrokerClient,
    provider: &ProviderName,
    tag: Option<&str>,
) -> Result<Vec<ConsumerDescriptor>, BrokerError> {
    let (raw, tag) = if is_latest(tag) {
        (client.fetch_consumers(&provider.0)?, None)
    } else {
        let tag = tag.unwrap_or(LATEST);
        (client.fetch_consumers_with_tag(&provider.0, tag)?, Some(tag))
    };
    let credentials = client.options();
    Ok(raw
        .into_iter()
        .map(|c| ConsumerDescriptor::from_broker(c, &credentials, tag))
        .collect())
}

/// Best-effort URL of the provider's pacts listing, for error messages.
pub fn display_url_for_provider(
    client: &BrokerClient,
    provider: &ProviderName,
    tag: Option<&str>,
) -> String {
    let tag = tag.filter(|t| !is_latest(Some(*t)));
    match client.url_for_provider(&provider.0, tag) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("failed to get provider URL from the pact broker: {e}");
            UNKNOWN_URL.to_string()
        }
    }
}
