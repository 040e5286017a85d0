//! The pact document envelope.
//!
//! Only the parts the resolution pipeline needs are modelled: the consumer and
//! provider names, the interaction/message lists (kept as raw JSON), and the
//! metadata block. Everything else in the file is ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{io_err, PactError};
use crate::types::{ConsumerName, ProviderName};

/// A consumer or provider entry in a pact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
}

/// A deserialized consumer-driven contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PactDocument {
    pub consumer: Participant,
    pub provider: Participant,
    #[serde(default)]
    pub interactions: Vec<Value>,
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default)]
    pub metadata: Value,
    /// Where the document was read from (file path or broker URL).
    #[serde(skip)]
    pub source: String,
}

impl PactDocument {
    /// Parse a pact from raw JSON text. `origin` names the source in errors.
    pub fn from_json_str(body: &str, origin: &str) -> Result<Self, PactError> {
        let value: Value = serde_json::from_str(body).map_err(|e| PactError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;
        Self::from_value(value, origin)
    }

    /// Build a pact from an already-parsed JSON value.
    pub fn from_value(value: Value, origin: &str) -> Result<Self, PactError> {
        for field in ["consumer", "provider"] {
            let name = value.get(field).and_then(|p| p.get("name")).and_then(Value::as_str);
            match name {
                Some(n) if !n.trim().is_empty() => {}
                _ => {
                    return Err(PactError::InvalidDocument {
                        origin: origin.to_string(),
                        reason: format!("missing {field} name"),
                    })
                }
            }
        }
        let mut doc: PactDocument =
            serde_json::from_value(value).map_err(|e| PactError::Parse {
                origin: origin.to_string(),
                source: e,
            })?;
        doc.source = origin.to_string();
        Ok(doc)
    }

    /// Read and parse a pact file from disk.
    pub fn load_at(path: &Path) -> Result<Self, PactError> {
        let body = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Self::from_json_str(&body, &path.display().to_string())
    }

    pub fn consumer_name(&self) -> ConsumerName {
        ConsumerName::from(self.consumer.name.as_str())
    }

    pub fn provider_name(&self) -> ProviderName {
        ProviderName::from(self.provider.name.as_str())
    }

    /// Interactions plus messages.
    pub fn interaction_count(&self) -> usize {
        self.interactions.len() + self.messages.len()
    }

    /// Pact specification version from the metadata block, if declared.
    pub fn spec_version(&self) -> Option<&str> {
        ["pactSpecification", "pact-specification", "pactSpecificationVersion"]
            .iter()
            .find_map(|key| {
                let entry = self.metadata.get(key)?;
                entry.get("version").unwrap_or(entry).as_str()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACT: &str = r#"{
        "consumer": {"name": "web"},
        "provider": {"name": "orders"},
        "interactions": [{"description": "get order"}, {"description": "list orders"}],
        "metadata": {"pactSpecification": {"version": "3.0.0"}}
    }"#;

    #[test]
    fn parses_envelope() {
        let doc = PactDocument::from_json_str(PACT, "mem").expect("parse");
        assert_eq!(doc.consumer_name(), ConsumerName::from("web"));
        assert_eq!(doc.provider_name(), ProviderName::from("orders"));
        assert_eq!(doc.interaction_count(), 2);
        assert_eq!(doc.spec_version(), Some("3.0.0"));
        assert_eq!(doc.source, "mem");
    }

    #[test]
    fn legacy_metadata_key_is_recognised() {
        let body = r#"{"consumer":{"name":"a"},"provider":{"name":"b"},
            "metadata":{"pact-specification":{"version":"2.0.0"}}}"#;
        let doc = PactDocument::from_json_str(body, "mem").expect("parse");
        assert_eq!(doc.spec_version(), Some("2.0.0"));
        assert_eq!(doc.interaction_count(), 0);
    }

    #[test]
    fn missing_provider_is_invalid() {
        let err = PactDocument::from_json_str(r#"{"consumer":{"name":"a"}}"#, "x.json").unwrap_err();
        assert!(matches!(err, PactError::InvalidDocument { .. }), "got: {err}");
        assert!(err.to_string().contains("missing provider name"));
    }

    #[test]
    fn malformed_json_reports_origin() {
        let err = PactDocument::from_json_str("{not json", "http://pb/pacts/1").unwrap_err();
        assert!(matches!(err, PactError::Parse { .. }));
        assert!(err.to_string().contains("http://pb/pacts/1"));
    }
}
