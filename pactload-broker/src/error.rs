//! Error types for pactload-broker.

use thiserror::Error;

use pactload_core::PactError;

/// All errors that can arise while talking to a pact broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Host resolved to an empty string. `raw` is the configured value.
    #[error(
        "Invalid pact broker host specified ('{raw}'). Please provide a valid host or specify \
         the system property 'pactbroker.host'."
    )]
    InvalidHost { raw: String },

    /// Port resolved to something other than digits. `raw` is the configured value.
    #[error(
        "Invalid pact broker port specified ('{raw}'). Please provide a valid port number or \
         specify the system property 'pactbroker.port'."
    )]
    InvalidPort { raw: String },

    /// No explicit scheme, and neither username nor token resolved to a value.
    #[error("Invalid pact authentication specified. Either username or token must be set.")]
    InvalidAuthentication,

    /// The broker URL could not be built from the resolved parts.
    #[error("was not able to load pacts from the broker as the broker URL was invalid ('{url}'): {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection-level failure (DNS, refused, TLS, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The broker answered 404.
    #[error("no HAL document found at {url}")]
    NotFound { url: String },

    /// Any other non-success status.
    #[error("request to {url} failed with status {status}")]
    RequestFailed { url: String, status: u16 },

    /// The response was not the HAL document expected.
    #[error("invalid HAL response from {url}: {reason}")]
    InvalidHal { url: String, reason: String },

    /// The pact body could not be read.
    #[error(transparent)]
    Document(#[from] PactError),
}

impl BrokerError {
    /// True for errors caused by configuration rather than the broker.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BrokerError::InvalidHost { .. }
                | BrokerError::InvalidPort { .. }
                | BrokerError::InvalidAuthentication
        )
    }
}

pub(crate) fn invalid_hal(url: impl ToString, reason: impl Into<String>) -> BrokerError {
    BrokerError::InvalidHal {
        url: url.to_string(),
        reason: reason.into(),
    }
}
