//! Broker authentication selection.
//!
//! [`AuthDescriptor::resolve`] turns the raw [`AuthConfig`] into a descriptor
//! using a fixed order of checks:
//!
//! 1. no config, or a raw scheme of `none` (any case) → [`AuthDescriptor::None`]
//! 2. scheme resolves non-empty → [`AuthDescriptor::Explicit`] with the
//!    resolved username and password, even when both are empty; `legacy` is
//!    read as `basic`
//! 3. username resolves non-empty → [`AuthDescriptor::Basic`]
//! 4. token resolves non-empty → [`AuthDescriptor::Bearer`]
//! 5. otherwise → [`BrokerError::InvalidAuthentication`]
//!
//! An explicit scheme always overrides inference from the credentials.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use pactload_core::{parse_expression, ValueResolver};

use crate::error::BrokerError;

const LEGACY_SCHEME: &str = "legacy";
const BASIC: &str = "basic";
const BEARER: &str = "bearer";

/// Raw authentication settings; every field may hold `${...}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub scheme: Option<String>,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Resolved authentication for broker requests.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthDescriptor {
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
    Explicit {
        scheme: String,
        username: String,
        password: String,
    },
}

impl AuthDescriptor {
    /// Select the authentication descriptor for `config`.
    pub fn resolve(
        config: Option<&AuthConfig>,
        resolver: &dyn ValueResolver,
    ) -> Result<Self, BrokerError> {
        let Some(config) = config else {
            tracing::debug!("Authentication: None");
            return Ok(AuthDescriptor::None);
        };
        let raw_scheme = config.scheme.as_deref().unwrap_or_default();
        if raw_scheme.eq_ignore_ascii_case("none") {
            tracing::debug!("Authentication: None");
            return Ok(AuthDescriptor::None);
        }

        let scheme = parse_expression(raw_scheme, resolver);
        if !scheme.is_empty() {
            let scheme = if scheme == LEGACY_SCHEME {
                BASIC.to_string()
            } else {
                scheme
            };
            tracing::debug!("Authentication: {scheme}");
            return Ok(AuthDescriptor::Explicit {
                scheme,
                username: parse_expression(&config.username, resolver),
                password: parse_expression(&config.password, resolver),
            });
        }

        let username = parse_expression(&config.username, resolver);
        if !username.is_empty() {
            tracing::debug!("Authentication: Basic");
            return Ok(AuthDescriptor::Basic {
                username,
                password: parse_expression(&config.password, resolver),
            });
        }

        let token = parse_expression(&config.token, resolver);
        if !token.is_empty() {
            tracing::debug!("Authentication: Bearer");
            return Ok(AuthDescriptor::Bearer { token });
        }

        Err(BrokerError::InvalidAuthentication)
    }

    /// Scheme name as sent in credential options (`""` for none).
    pub fn scheme(&self) -> &str {
        match self {
            AuthDescriptor::None => "",
            AuthDescriptor::Basic { .. } => BASIC,
            AuthDescriptor::Bearer { .. } => BEARER,
            AuthDescriptor::Explicit { scheme, .. } => scheme,
        }
    }

    /// Ordered credential options: `[scheme, username, password]` or
    /// `[bearer, token]`; empty when unauthenticated.
    pub fn options(&self) -> Vec<String> {
        match self {
            AuthDescriptor::None => vec![],
            AuthDescriptor::Basic { username, password } => {
                vec![BASIC.to_string(), username.clone(), password.clone()]
            }
            AuthDescriptor::Bearer { token } => vec![BEARER.to_string(), token.clone()],
            AuthDescriptor::Explicit {
                scheme,
                username,
                password,
            } => vec![scheme.clone(), username.clone(), password.clone()],
        }
    }

    /// Rebuild a descriptor from credential options produced by
    /// [`AuthDescriptor::options`]. Unrecognised shapes carry no credentials.
    pub fn from_options(options: &[String]) -> Self {
        match options {
            [] => AuthDescriptor::None,
            [scheme, token] if scheme.eq_ignore_ascii_case(BEARER) => AuthDescriptor::Bearer {
                token: token.clone(),
            },
            [scheme, username, password] if scheme.eq_ignore_ascii_case(BASIC) => {
                AuthDescriptor::Basic {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
            [scheme, username, password] => AuthDescriptor::Explicit {
                scheme: scheme.clone(),
                username: username.clone(),
                password: password.clone(),
            },
            other => {
                tracing::warn!("ignoring malformed credential options ({} values)", other.len());
                AuthDescriptor::None
            }
        }
    }

    /// Value for the `Authorization` header, if this scheme is supported.
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            AuthDescriptor::None => None,
            AuthDescriptor::Basic { username, password } => Some(basic(username, password)),
            AuthDescriptor::Bearer { token } => Some(format!("Bearer {token}")),
            AuthDescriptor::Explicit {
                scheme,
                username,
                password,
            } => {
                if scheme.eq_ignore_ascii_case(BASIC) {
                    Some(basic(username, password))
                } else if scheme.eq_ignore_ascii_case(BEARER) {
                    Some(format!("Bearer {username}"))
                } else {
                    tracing::warn!("authentication scheme '{scheme}' is not supported, sending no credentials");
                    None
                }
            }
        }
    }
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

impl fmt::Debug for AuthDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthDescriptor::None => write!(f, "None"),
            AuthDescriptor::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthDescriptor::Bearer { .. } => {
                f.debug_struct("Bearer").field("token", &"<redacted>").finish()
            }
            AuthDescriptor::Explicit {
                scheme, username, ..
            } => f
                .debug_struct("Explicit")
                .field("scheme", scheme)
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pactload_core::MapResolver;

    fn config(scheme: Option<&str>, username: &str, password: &str, token: &str) -> AuthConfig {
        AuthConfig {
            scheme: scheme.map(str::to_string),
            username: username.into(),
            password: password.into(),
            token: token.into(),
        }
    }

    #[test]
    fn absent_config_is_none() {
        let auth = AuthDescriptor::resolve(None, &MapResolver::new()).unwrap();
        assert_eq!(auth, AuthDescriptor::None);
        assert!(auth.options().is_empty());
        assert!(auth.authorization_header().is_none());
    }

    #[test]
    fn none_scheme_ignores_credentials() {
        let cfg = config(Some("NONE"), "u", "p", "tok");
        assert_eq!(AuthDescriptor::resolve(Some(&cfg), &MapResolver::new()).unwrap(), AuthDescriptor::None);
    }

    #[test]
    fn basic_header_is_base64() {
        let auth = AuthDescriptor::Basic {
            username: "user".into(),
            password: "pass".into(),
        };
        assert_eq!(auth.authorization_header().as_deref(), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn options_rebuild_an_equivalent_descriptor() {
        let cases = [
            AuthDescriptor::None,
            AuthDescriptor::Basic { username: "u".into(), password: "p".into() },
            AuthDescriptor::Bearer { token: "tok".into() },
            AuthDescriptor::Explicit {
                scheme: "bearer".into(),
                username: "abc".into(),
                password: String::new(),
            },
        ];
        for auth in cases {
            let rebuilt = AuthDescriptor::from_options(&auth.options());
            assert_eq!(rebuilt.authorization_header(), auth.authorization_header(), "{auth:?}");
        }
        assert_eq!(AuthDescriptor::from_options(&["x".to_string()]), AuthDescriptor::None);
    }

    #[test]
    fn explicit_bearer_uses_username_slot_as_token() {
        let cfg = config(Some("Bearer"), "abc123", "", "");
        let auth = AuthDescriptor::resolve(Some(&cfg), &MapResolver::new()).unwrap();
        assert_eq!(auth.authorization_header().as_deref(), Some("Bearer abc123"));
    }

    #[test]
    fn unsupported_explicit_scheme_sends_nothing() {
        let cfg = config(Some("digest"), "u", "p", "");
        let auth = AuthDescriptor::resolve(Some(&cfg), &MapResolver::new()).unwrap();
        assert_eq!(auth.options(), ["digest", "u", "p"]);
        assert!(auth.authorization_header().is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let auth = AuthDescriptor::Basic {
            username: "user".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{auth:?}");
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("hunter2"));
    }
}
