//! Placeholder expressions in configuration strings.
//!
//! A value such as `"${pactbroker.host:localhost}"` is resolved against a
//! [`ValueResolver`]: the key `pactbroker.host` is looked up, and when it has
//! no binding the default after the first `:` is used. A placeholder with no
//! binding and no default is left in the output verbatim, so callers must be
//! prepared to see literal `${...}` text.
//!
//! List expressions are resolved first and then split on `,`, which lets a
//! default carry several values: `"${TAGS:dev,prod}"` → `["dev", "prod"]`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{io_err, PactError};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}:]*)(?::([^}]*))?\}").expect("placeholder regex is valid")
});

// ---------------------------------------------------------------------------
// Resolver strategies
// ---------------------------------------------------------------------------

/// Lookup capability used to resolve placeholder keys.
pub trait ValueResolver {
    /// Returns the value bound to `key`, or `None` when unbound.
    fn resolve_value(&self, key: &str) -> Option<String>;
}

impl<F> ValueResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_value(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Default resolver backed by the process environment.
///
/// Looks up the key as given first, then its environment form
/// (`pactbroker.host` → `PACTBROKER_HOST`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPropertyResolver;

impl SystemPropertyResolver {
    /// Upper-cased key with `.` and `-` replaced by `_`.
    pub fn env_form(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl ValueResolver for SystemPropertyResolver {
    fn resolve_value(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        std::env::var(key)
            .ok()
            .or_else(|| std::env::var(Self::env_form(key)).ok())
    }
}

/// In-memory resolver over a fixed key/value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapResolver {
    values: HashMap<String, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Load a flat YAML mapping of `key: value` pairs.
    ///
    /// Non-string scalars are rendered with their YAML text (`8080`, `true`).
    pub fn load_yaml_at(path: &Path) -> Result<Self, PactError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let raw: HashMap<String, serde_yaml::Value> =
            serde_yaml::from_str(&contents).map_err(|e| PactError::Yaml {
                path: path.to_path_buf(),
                source: e,
            })?;
        let values = raw
            .into_iter()
            .filter_map(|(k, v)| scalar_to_string(&v).map(|s| (k, s)))
            .collect();
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueResolver for MapResolver {
    fn resolve_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// True when `value` holds at least one `${...}` placeholder.
pub fn contains_expressions(value: &str) -> bool {
    PLACEHOLDER.is_match(value)
}

/// Substitute every placeholder in `expr` using `resolver`.
pub fn parse_expression(expr: &str, resolver: &dyn ValueResolver) -> String {
    if !contains_expressions(expr) {
        return expr.to_string();
    }
    PLACEHOLDER
        .replace_all(expr, |caps: &Captures<'_>| {
            let key = caps[1].trim();
            match (resolver.resolve_value(key), caps.get(2)) {
                (Some(value), _) => value,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Resolve `expr` and split the result into trimmed, non-empty elements.
pub fn parse_list_expression(expr: &str, resolver: &dyn ValueResolver) -> Vec<String> {
    parse_expression(expr, resolver)
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> MapResolver {
        MapResolver::new()
    }

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(parse_expression("broker.local", &empty()), "broker.local");
    }

    #[test]
    fn bound_key_wins_over_default() {
        let r = MapResolver::new().with("pactbroker.host", "pb.internal");
        assert_eq!(parse_expression("${pactbroker.host:localhost}", &r), "pb.internal");
    }

    #[test]
    fn default_used_when_unbound() {
        assert_eq!(parse_expression("${pactbroker.scheme:http}", &empty()), "http");
    }

    #[test]
    fn empty_default_resolves_to_empty_string() {
        assert_eq!(parse_expression("${pactbroker.host:}", &empty()), "");
    }

    #[test]
    fn unbound_without_default_is_left_literal() {
        assert_eq!(parse_expression("${missing}", &empty()), "${missing}");
    }

    #[test]
    fn substitutes_inside_surrounding_text() {
        let r = MapResolver::new().with("env", "prod");
        assert_eq!(parse_expression("release-${env}-v1", &r), "release-prod-v1");
    }

    #[test]
    fn closures_act_as_resolvers() {
        let r = |key: &str| (key == "k").then(|| "v".to_string());
        assert_eq!(parse_expression("${k}", &r), "v");
    }

    #[test]
    fn list_default_with_commas_splits_after_resolution() {
        assert_eq!(
            parse_list_expression("${TAGS:dev,prod}", &empty()),
            vec!["dev".to_string(), "prod".to_string()]
        );
    }

    #[test]
    fn list_drops_blank_elements() {
        assert!(parse_list_expression("${pactbroker.consumers:}", &empty()).is_empty());
        assert_eq!(parse_list_expression(" a, ,b ,", &empty()), vec!["a", "b"]);
    }

    #[test]
    fn env_form_uppercases_and_replaces_separators() {
        assert_eq!(SystemPropertyResolver::env_form("pactbroker.auth-token"), "PACTBROKER_AUTH_TOKEN");
    }

    #[test]
    fn yaml_values_file_is_loaded() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("values.yaml");
        std::fs::write(&path, "pactbroker.host: pb.local\npactbroker.port: 9292\n").expect("write");
        let r = MapResolver::load_yaml_at(&path).expect("load");
        assert_eq!(r.resolve_value("pactbroker.port").as_deref(), Some("9292"));
        assert_eq!(r.len(), 2);
    }
}
