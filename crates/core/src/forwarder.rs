//! Generic request forwarder.
//!
//! Every proxy route is a specialisation of [`Forwarder::forward`]: build
//! `<upstream-base><path>[?query]`, send the supplied method, headers and body verbatim, and hand
//! the upstream response back untouched.
//!
//! The forwarder deliberately has no retry, cache, payload validation or timeout policy. A hung
//! upstream blocks the caller until the hosting runtime gives up.

use std::time::Instant;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_LENGTH};
use reqwest::{Method, StatusCode, Url};

use crate::config::ProxyConfig;
use crate::constants::HOP_BY_HOP_HEADERS;
use crate::{ProxyError, ProxyResult};

/// Per-call options. Everything is optional and passed through as-is.
#[derive(Clone, Debug, Default)]
pub struct ForwardOptions {
    /// HTTP method; `GET` when unset.
    pub method: Option<Method>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ForwardOptions {
    pub fn method(&self) -> Method {
        self.method.clone().unwrap_or(Method::GET)
    }
}

/// Query parameters attached to the outbound URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum QueryParams {
    #[default]
    None,
    /// A raw query string without the leading `?`, forwarded verbatim.
    ///
    /// The URL parser still percent-encodes bytes that may not appear in an http(s) query
    /// (space, `"`, `'`, `<`, `>`). Existing escapes and every other byte pass through unchanged.
    Raw(String),
    /// Key/value pairs, form-encoded in order.
    Pairs(Vec<(String, String)>),
}

impl QueryParams {
    /// Build from an inbound raw query, treating `None` and `""` alike.
    pub fn from_raw(raw: Option<String>) -> Self {
        match raw {
            Some(raw) => {
                let raw = raw.trim_start_matches('?');
                if raw.is_empty() {
                    Self::None
                } else {
                    Self::Raw(raw.to_string())
                }
            }
            None => Self::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Raw(raw) => raw.is_empty(),
            Self::Pairs(pairs) => pairs.is_empty(),
        }
    }

    fn apply(&self, url: &mut Url) {
        if self.is_empty() {
            url.set_query(None);
            return;
        }
        match self {
            Self::Raw(raw) => url.set_query(Some(raw)),
            Self::Pairs(pairs) => {
                url.query_pairs_mut().extend_pairs(pairs);
            }
            Self::None => {}
        }
    }
}

/// The upstream's answer, as received.
#[derive(Clone, Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Response headers minus hop-by-hop headers and `content-length`.
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Forwards requests to a fixed upstream base URL.
///
/// Cloning is cheap: the underlying `reqwest::Client` shares its connection pool.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: reqwest::Client,
    base_url: String,
}

impl Forwarder {
    /// Create a forwarder for an already validated base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn from_config(cfg: &ProxyConfig) -> Self {
        Self::new(cfg.upstream_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL, a relative path and the query into the outbound URL.
    pub fn upstream_url(&self, path: &str, query: &QueryParams) -> ProxyResult<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        let mut url = Url::parse(&joined).map_err(|e| ProxyError::InvalidUpstreamUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        query.apply(&mut url);

        Ok(url)
    }

    /// Issue the outbound call and relay the upstream response.
    ///
    /// Upstream 4xx/5xx responses are successes here; only failing to talk to the upstream at
    /// all is an error.
    ///
    /// # Errors
    /// - [`ProxyError::InvalidUpstreamUrl`] if the joined URL does not parse.
    /// - [`ProxyError::Transport`] if the request could not be sent.
    /// - [`ProxyError::UpstreamBody`] if the response body could not be read.
    pub async fn forward(
        &self,
        path: &str,
        options: ForwardOptions,
        query: &QueryParams,
    ) -> ProxyResult<UpstreamResponse> {
        let url = self.upstream_url(path, query)?;
        let method = options.method();
        let call_id = uuid::Uuid::new_v4();
        let started = Instant::now();

        tracing::debug!(%call_id, %method, %url, "forwarding upstream request");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .headers(options.headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(ProxyError::Transport)?;
        let status = response.status();
        let headers = relay_headers(response.headers());
        let body = response.bytes().await.map_err(ProxyError::UpstreamBody)?;

        tracing::debug!(
            %call_id,
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upstream responded"
        );

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Copy response headers, dropping the ones a proxy must not relay.
pub fn relay_headers(headers: &HeaderMap) -> HeaderMap {
    let mut relayed = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if is_hop_by_hop(name) || name == CONTENT_LENGTH {
            continue;
        }
        relayed.append(name.clone(), value.clone());
    }
    relayed
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}
