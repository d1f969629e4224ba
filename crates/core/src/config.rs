//! Proxy runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the forwarder and the REST handlers. Request handling never reads process-wide
//! environment variables, which keeps behaviour consistent across threads and test harnesses.

use crate::constants::{DEFAULT_REST_ADDR, DEFAULT_UPSTREAM_BASE_URL};
use crate::{ProxyError, ProxyResult};
use reqwest::header::HeaderName;
use reqwest::Url;

/// Proxy configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    upstream_base_url: String,
    rest_addr: String,
    forward_headers: Vec<HeaderName>,
}

impl ProxyConfig {
    /// Create a new `ProxyConfig`.
    ///
    /// The upstream base URL is validated and stored without a trailing slash so that route
    /// paths (which always start with `/`) can be appended directly.
    pub fn new(
        upstream_base_url: String,
        rest_addr: String,
        forward_headers: Vec<HeaderName>,
    ) -> ProxyResult<Self> {
        let upstream_base_url = validate_upstream_base_url(&upstream_base_url)?;

        if rest_addr.trim().is_empty() {
            return Err(ProxyError::InvalidInput("rest_addr cannot be empty".into()));
        }

        Ok(Self {
            upstream_base_url,
            rest_addr: rest_addr.trim().to_string(),
            forward_headers,
        })
    }

    pub fn upstream_base_url(&self) -> &str {
        &self.upstream_base_url
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn forward_headers(&self) -> &[HeaderName] {
        &self.forward_headers
    }
}

/// Resolve the upstream base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default local backend address.
pub fn upstream_base_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string())
}

/// Resolve the REST bind address from an optional string value.
pub fn rest_addr_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_REST_ADDR.to_string())
}

/// Parse a comma-separated list of header names.
///
/// Blank entries are skipped. Names are normalised to lowercase by `HeaderName`.
pub fn forward_headers_from_env_value(value: Option<String>) -> ProxyResult<Vec<HeaderName>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ProxyError::InvalidInput(format!("invalid forward header name: {name}"))
            })
        })
        .collect()
}

fn validate_upstream_base_url(raw: &str) -> ProxyResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ProxyError::InvalidInput(
            "upstream base url cannot be empty".into(),
        ));
    }

    let url = Url::parse(trimmed).map_err(|e| ProxyError::InvalidUpstreamUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ProxyError::InvalidUpstreamUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ProxyError::InvalidUpstreamUrl {
            url: trimmed.to_string(),
            reason: "base url must not carry a query or fragment".into(),
        });
    }

    Ok(trimmed.to_string())
}
