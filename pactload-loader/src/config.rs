//! Broker loader configuration.
//!
//! Every string field may hold `${...}` placeholders. They are resolved at
//! load time, not when the config is read, so a config file can be shared
//! across environments.
//!
//! ```yaml
//! host: ${pactbroker.host:broker.internal}
//! port: "9292"
//! tags: ["${pactbroker.tags:main,prod}"]
//! consumers: [web]
//! authentication:
//!   token: ${PACT_BROKER_TOKEN:}
//! value_resolver: file:/etc/pact/values.yaml
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use pactload_broker::AuthConfig;
use pactload_core::{MapResolver, SystemPropertyResolver, ValueResolver};

use crate::error::LoadError;

/// Settings for [`crate::PactBrokerLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerLoaderConfig {
    pub host: String,
    pub port: String,
    pub scheme: String,
    /// Tag expressions. Empty means a single untagged (latest) pass.
    pub tags: Vec<String>,
    /// Consumer inclusion expressions. Empty means no restriction.
    pub consumers: Vec<String>,
    pub fail_if_no_pacts_found: bool,
    pub authentication: Option<AuthConfig>,
    /// Named resolver: `system`, `env`, or `file:<path>`.
    pub value_resolver: Option<String>,
    /// Connect/read timeout for broker requests.
    pub timeout_secs: Option<u64>,
}

impl Default for BrokerLoaderConfig {
    fn default() -> Self {
        Self {
            host: "${pactbroker.host:}".to_string(),
            port: "${pactbroker.port:}".to_string(),
            scheme: "${pactbroker.scheme:http}".to_string(),
            tags: vec![],
            consumers: vec![],
            fail_if_no_pacts_found: true,
            authentication: None,
            value_resolver: None,
            timeout_secs: None,
        }
    }
}

/// Read a YAML config file.
pub fn load_config_at(path: &Path) -> Result<BrokerLoaderConfig, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| LoadError::ConfigIo {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&contents).map_err(|e| LoadError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Build the resolver registered under `name`.
pub fn resolver_by_name(name: &str) -> Result<Box<dyn ValueResolver>, LoadError> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("system") || name.eq_ignore_ascii_case("env") {
        return Ok(Box::new(SystemPropertyResolver));
    }
    if let Some(path) = name.strip_prefix("file:") {
        let resolver = MapResolver::load_yaml_at(Path::new(path.trim()))?;
        return Ok(Box::new(resolver));
    }
    Err(LoadError::UnknownResolver {
        name: name.to_string(),
    })
}

/// Resolver for an optional name, falling back to the environment resolver
/// with a warning when the named one cannot be built.
pub fn resolver_or_default(name: Option<&str>) -> Box<dyn ValueResolver> {
    let Some(name) = name else {
        return Box::new(SystemPropertyResolver);
    };
    match resolver_by_name(name) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::warn!("failed to instantiate the value resolver, using the default: {e}");
            Box::new(SystemPropertyResolver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_use_placeholders() {
        let cfg = BrokerLoaderConfig::default();
        assert_eq!(cfg.host, "${pactbroker.host:}");
        assert_eq!(cfg.scheme, "${pactbroker.scheme:http}");
        assert!(cfg.fail_if_no_pacts_found);
        assert!(cfg.tags.is_empty());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("pactload.yaml");
        std::fs::write(&path, "host: pb.local\ntags: [main, prod]\nauthentication:\n  token: abc\n")
            .expect("write");
        let cfg = load_config_at(&path).expect("load");
        assert_eq!(cfg.host, "pb.local");
        assert_eq!(cfg.port, "${pactbroker.port:}");
        assert_eq!(cfg.tags, ["main", "prod"]);
        assert_eq!(cfg.authentication.unwrap().token, "abc");
    }

    #[test]
    fn missing_config_names_path() {
        let err = load_config_at(Path::new("/nonexistent/pactload.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::ConfigIo { .. }));
        assert!(err.to_string().contains("/nonexistent/pactload.yaml"));
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "tags: {not: [a list").expect("write");
        assert!(matches!(load_config_at(&path).unwrap_err(), LoadError::ConfigParse { .. }));
    }

    #[test]
    fn file_resolver_by_name() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("values.yaml");
        std::fs::write(&path, "pactbroker.host: pb.file\n").expect("write");
        let resolver = resolver_by_name(&format!("file:{}", path.display())).expect("resolver");
        assert_eq!(resolver.resolve_value("pactbroker.host").as_deref(), Some("pb.file"));
    }

    #[test]
    fn unknown_resolver_falls_back_to_default() {
        assert!(matches!(
            resolver_by_name("com.example.Resolver"),
            Err(LoadError::UnknownResolver { .. })
        ));
        let resolver = resolver_or_default(Some("com.example.Resolver"));
        assert_eq!(resolver.resolve_value("pactload.test.never.set"), None);
    }

    #[test]
    fn unreadable_resolver_file_falls_back_to_default() {
        let resolver = resolver_or_default(Some("file:/nonexistent/values.yaml"));
        assert_eq!(resolver.resolve_value("pactload.test.never.set"), None);
    }
}
