//! Error types for pactload-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while reading pact documents or resolver files.
#[derive(Debug, Error)]
pub enum PactError {
    /// Underlying I/O failure, annotated with the path being read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pact body was not valid JSON. `origin` is the file path or URL it came from.
    #[error("failed to parse pact from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but missing the consumer/provider envelope.
    #[error("invalid pact document from {origin}: {reason}")]
    InvalidDocument { origin: String, reason: String },

    /// YAML parse error on a resolver values file.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Convenience constructor for [`PactError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PactError {
    PactError::Io {
        path: path.into(),
        source,
    }
}
