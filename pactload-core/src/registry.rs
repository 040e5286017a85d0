//! Consumer-keyed pact registry.
//!
//! Keys keep first-insertion order. Recording a pact for a consumer that is
//! already present appends to that consumer's list; nothing is deduplicated,
//! so the same consumer found under two tags ends up with two entries.

use indexmap::IndexMap;
use serde::Serialize;

use crate::document::PactDocument;
use crate::types::ConsumerName;

/// Ordered map of consumer → pacts loaded for that consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PactRegistry {
    pacts: IndexMap<ConsumerName, Vec<PactDocument>>,
}

impl PactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `pact` to the list for `consumer`, creating the entry if needed.
    pub fn record(&mut self, consumer: ConsumerName, pact: PactDocument) {
        self.pacts.entry(consumer).or_default().push(pact);
    }

    pub fn get(&self, consumer: &ConsumerName) -> Option<&[PactDocument]> {
        self.pacts.get(consumer).map(Vec::as_slice)
    }

    /// Consumers in first-insertion order.
    pub fn consumers(&self) -> impl Iterator<Item = &ConsumerName> {
        self.pacts.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConsumerName, &[PactDocument])> {
        self.pacts.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of distinct consumers.
    pub fn len(&self) -> usize {
        self.pacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pacts.is_empty()
    }

    /// Total pacts across all consumers.
    pub fn pact_count(&self) -> usize {
        self.pacts.values().map(Vec::len).sum()
    }

    /// Append every entry of `other`, preserving its per-consumer order.
    pub fn merge(&mut self, other: PactRegistry) {
        for (consumer, pacts) in other.pacts {
            self.pacts.entry(consumer).or_default().extend(pacts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Participant;

    fn pact(consumer: &str, source: &str) -> PactDocument {
        PactDocument {
            consumer: Participant { name: consumer.into() },
            provider: Participant { name: "orders".into() },
            interactions: vec![],
            messages: vec![],
            metadata: serde_json::Value::Null,
            source: source.into(),
        }
    }

    #[test]
    fn duplicate_consumer_appends() {
        let mut reg = PactRegistry::new();
        reg.record("svc".into(), pact("svc", "v1"));
        reg.record("svc".into(), pact("svc", "v2"));
        assert_eq!(reg.len(), 1);
        let sources: Vec<_> = reg.get(&"svc".into()).unwrap().iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, ["v1", "v2"]);
    }

    #[test]
    fn keys_keep_insertion_order() {
        let mut reg = PactRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            reg.record(name.into(), pact(name, name));
        }
        let keys: Vec<_> = reg.consumers().map(ConsumerName::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn merge_appends_to_existing_entries() {
        let mut a = PactRegistry::new();
        a.record("web".into(), pact("web", "first"));
        let mut b = PactRegistry::new();
        b.record("web".into(), pact("web", "second"));
        b.record("app".into(), pact("app", "third"));
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.pact_count(), 3);
        assert_eq!(a.get(&"web".into()).unwrap()[1].source, "second");
    }
}
