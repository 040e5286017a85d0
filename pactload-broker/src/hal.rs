//! HAL transport and link navigation.
//!
//! The broker speaks HAL+JSON: every document carries a `_links` object whose
//! entries are either `{ "href": .., "templated": bool }` or an array of such
//! objects. Templated hrefs use `{name}` placeholders which are filled with
//! percent-encoded path segments.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use url::Url;

use crate::auth::AuthDescriptor;
use crate::error::{invalid_hal, BrokerError};

pub const LINKS: &str = "_links";

const ACCEPT: &str = "application/hal+json, application/json";

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Blocking GET of a JSON document.
pub trait HalTransport: Send + Sync {
    fn get_json(&self, url: &Url, auth: &AuthDescriptor) -> Result<Value, BrokerError>;
}

/// [`HalTransport`] backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Agent with connect and read timeouts.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout_read(timeout)
                .build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HalTransport for UreqTransport {
    fn get_json(&self, url: &Url, auth: &AuthDescriptor) -> Result<Value, BrokerError> {
        tracing::debug!("Fetching: {url}");
        let mut request = self
            .agent
            .get(url.as_str())
            .set("Accept", ACCEPT)
            .set("Content-Type", "application/json");
        if let Some(header) = auth.authorization_header() {
            request = request.set("Authorization", &header);
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => {
                return Err(BrokerError::NotFound {
                    url: url.to_string(),
                })
            }
            Err(ureq::Error::Status(status, _)) => {
                return Err(BrokerError::RequestFailed {
                    url: url.to_string(),
                    status,
                })
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(BrokerError::Transport {
                    url: url.to_string(),
                    message: t.to_string(),
                })
            }
        };

        let content_type = response.content_type().to_string();
        if !is_json_content_type(&content_type) {
            return Err(invalid_hal(
                url,
                format!("expected a HAL+JSON response from the pact broker, but got '{content_type}'"),
            ));
        }
        response
            .into_json::<Value>()
            .map_err(|e| invalid_hal(url, e.to_string()))
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("application/json")
        || mime.eq_ignore_ascii_case("application/hal+json")
        || mime.to_ascii_lowercase().ends_with("+json")
}

// ---------------------------------------------------------------------------
// Link handling
// ---------------------------------------------------------------------------

/// Replace `{key}` placeholders in `template` with percent-encoded values.
/// Unknown placeholders are left as they are.
pub fn expand_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in params {
        let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
        out = out.replace(&format!("{{{key}}}"), &encoded);
    }
    out
}

/// Resolve the href of link `rel` in `doc` against `base`.
///
/// Templated links are expanded with `params`; plain links are used as-is.
pub fn link_url(
    doc: &Value,
    rel: &str,
    params: &[(&str, &str)],
    base: &Url,
) -> Result<Url, BrokerError> {
    let links = doc
        .get(LINKS)
        .ok_or_else(|| invalid_hal(base, format!("response has no '{LINKS}', LINK: '{rel}'")))?;
    let links = links
        .as_object()
        .ok_or_else(|| invalid_hal(base, format!("expected a map of links, but found: {links}")))?;
    let link = links.get(rel).ok_or_else(|| {
        let found: Vec<&str> = links.keys().map(String::as_str).collect();
        invalid_hal(
            base,
            format!("link '{rel}' was not found in the response, only the following links were found: {found:?}"),
        )
    })?;

    let href = link
        .get("href")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_hal(base, format!("expected link '{rel}' in map form, but found: {link}")))?;
    let templated = link.get("templated").and_then(Value::as_bool).unwrap_or(false);
    let href = if templated {
        expand_template(href, params)
    } else {
        href.to_string()
    };

    base.join(&href).map_err(|source| BrokerError::InvalidUrl { url: href, source })
}

/// Every entry under link `rel`, whether it is a single object or an array.
/// Missing links yield an empty list.
pub fn link_entries<'a>(doc: &'a Value, rel: &str) -> Vec<&'a Value> {
    match doc.get(LINKS).and_then(|links| links.get(rel)) {
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => vec![],
    }
}
