//! Strongly-typed names used across the pact resolution pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the provider whose pacts are being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderName(pub String);

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProviderName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProviderName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Consumer identity. Registry entries are keyed by this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumerName(pub String);

impl ConsumerName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConsumerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ConsumerName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConsumerName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
