//! Error types for pactload-loader.

use std::path::PathBuf;

use thiserror::Error;

use pactload_broker::BrokerError;
use pactload_core::{PactError, ProviderName};

/// All errors that can arise from loading pacts.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Broker configuration, transport, or HAL failure.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// A pact document could not be read.
    #[error(transparent)]
    Pact(#[from] PactError),

    /// The broker returned no consumers while `fail_if_no_pacts_found` is set.
    #[error("No consumer pacts were found for provider '{provider}' and tag '{tag}'. (URL {url})")]
    NoPactsFound {
        provider: ProviderName,
        tag: String,
        url: String,
    },

    /// Loader config file could not be read.
    #[error("failed to read loader config at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loader config file is not valid YAML for [`crate::BrokerLoaderConfig`].
    #[error("failed to parse loader config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `value_resolver` named something this build does not know.
    #[error("unknown value resolver '{name}'; expected 'system', 'env' or 'file:<path>'")]
    UnknownResolver { name: String },
}

impl LoadError {
    /// True for errors caused by configuration rather than the broker.
    pub fn is_configuration(&self) -> bool {
        match self {
            LoadError::Broker(e) => e.is_configuration(),
            LoadError::ConfigIo { .. }
            | LoadError::ConfigParse { .. }
            | LoadError::UnknownResolver { .. } => true,
            LoadError::Pact(_) | LoadError::NoPactsFound { .. } => false,
        }
    }
}
