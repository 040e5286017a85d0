//! Broker endpoint resolution and URL construction.
//!
//! The raw scheme/host/port strings may contain `${...}` placeholders. They
//! are resolved once per load, then checked before any URL is built:
//!
//! 1. empty host → [`BrokerError::InvalidHost`]
//! 2. non-empty port that is not all digits → [`BrokerError::InvalidPort`]
//! 3. anything the URL parser still rejects → [`BrokerError::InvalidUrl`]

use std::fmt;

use url::Url;

use pactload_core::{parse_expression, ValueResolver};

use crate::error::BrokerError;

/// Resolved broker location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: Option<String>,
}

impl BrokerEndpoint {
    /// Resolve and validate raw configuration values.
    pub fn resolve(
        raw_scheme: &str,
        raw_host: &str,
        raw_port: &str,
        resolver: &dyn ValueResolver,
    ) -> Result<Self, BrokerError> {
        let scheme = parse_expression(raw_scheme, resolver).trim().to_string();
        let host = parse_expression(raw_host, resolver).trim().to_string();
        let port = parse_expression(raw_port, resolver).trim().to_string();

        if host.is_empty() {
            return Err(BrokerError::InvalidHost {
                raw: raw_host.to_string(),
            });
        }
        if !port.is_empty() && !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BrokerError::InvalidPort {
                raw: raw_port.to_string(),
            });
        }

        Ok(Self {
            scheme,
            host,
            port: (!port.is_empty()).then_some(port),
        })
    }

    /// Build the base URL (`scheme://host[:port]/`).
    pub fn url(&self) -> Result<Url, BrokerError> {
        let base = format!("{}://{}", self.scheme, self.host);
        let mut url = Url::parse(&base).map_err(|source| BrokerError::InvalidUrl {
            url: base.clone(),
            source,
        })?;
        if let Some(port) = &self.port {
            let invalid = || BrokerError::InvalidUrl {
                url: format!("{base}:{port}"),
                source: url::ParseError::InvalidPort,
            };
            let number: u16 = port.parse().map_err(|_| invalid())?;
            url.set_port(Some(number)).map_err(|()| invalid())?;
        }
        Ok(url)
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = &self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}
