//! Record of where loaded pacts came from.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pactload_core::{PactDocument, PactRegistry};

/// Pacts accumulated by a loader.
#[derive(Debug, Clone, PartialEq)]
pub enum PactSource {
    /// Pacts downloaded from a broker, keyed by consumer.
    Broker {
        scheme: String,
        host: String,
        port: String,
        pacts: PactRegistry,
    },
    /// Pact files read from a directory, keyed by file path.
    Directory {
        dir: PathBuf,
        pacts: BTreeMap<PathBuf, PactDocument>,
    },
}

impl PactSource {
    pub fn pact_count(&self) -> usize {
        match self {
            PactSource::Broker { pacts, .. } => pacts.pact_count(),
            PactSource::Directory { pacts, .. } => pacts.len(),
        }
    }

    /// The consumer registry, for broker sources.
    pub fn registry(&self) -> Option<&PactRegistry> {
        match self {
            PactSource::Broker { pacts, .. } => Some(pacts),
            PactSource::Directory { .. } => None,
        }
    }
}
