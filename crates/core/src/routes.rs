//! Proxy route table.
//!
//! Each entry specialises the generic [`Forwarder`] with a fixed upstream path, a request shape
//! and the static message returned to the browser when the upstream cannot be reached.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;

use crate::constants::{ACCEPT_ANY, ID_PLACEHOLDER};
use crate::forwarder::{ForwardOptions, Forwarder, QueryParams, UpstreamResponse};
use crate::{ProxyError, ProxyResult};

/// How a route shapes the outbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    /// `GET`, inbound query string forwarded verbatim, no body.
    Query,
    /// `POST`, inbound body re-encoded as JSON, no query.
    JsonBody,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyRoute {
    pub name: &'static str,
    /// Inbound path as seen by the browser. `{id}` marks the path parameter.
    pub inbound: &'static str,
    /// Upstream path template. `{id}` is replaced with the inbound path parameter.
    pub upstream: &'static str,
    pub kind: RouteKind,
    pub failure_message: &'static str,
}

pub const DRUG_CATEGORY_TREE: ProxyRoute = ProxyRoute {
    name: "drug_category_tree",
    inbound: "/api/drug-categories/tree",
    upstream: "/api/v1/drug-categories/tree",
    kind: RouteKind::Query,
    failure_message: "Failed to load drug category tree",
};

pub const DRUG_PACKS_BY_FORM: ProxyRoute = ProxyRoute {
    name: "drug_packs_by_form",
    inbound: "/api/drug-packs/by-form/{id}",
    upstream: "/api/v1/drug-packs/by-form/{id}",
    kind: RouteKind::Query,
    failure_message: "Failed to load drug packs",
};

pub const PLAN_NETWORKS_BY_NETWORK: ProxyRoute = ProxyRoute {
    name: "plan_networks_by_network",
    inbound: "/api/plan-networks/by-network",
    upstream: "/api/v1/plan-networks/by-network",
    kind: RouteKind::Query,
    failure_message: "Failed to load plan networks",
};

pub const PLAN_NETWORKS_BY_PLAN: ProxyRoute = ProxyRoute {
    name: "plan_networks_by_plan",
    inbound: "/api/plan-networks/by-plan",
    upstream: "/api/v1/plan-networks/by-plan",
    kind: RouteKind::Query,
    failure_message: "Failed to load plan networks",
};

pub const POLICY_EXCLUSIONS: ProxyRoute = ProxyRoute {
    name: "policy_exclusions",
    inbound: "/api/policies/exclusions",
    upstream: "/api/v1/policies/exclusions",
    kind: RouteKind::Query,
    failure_message: "Failed to load exclusions",
};

pub const POLICY_PREAPPROVAL_RULES: ProxyRoute = ProxyRoute {
    name: "policy_preapproval_rules",
    inbound: "/api/policies/preapproval-rules",
    upstream: "/api/v1/policies/preapproval-rules",
    kind: RouteKind::Query,
    failure_message: "Failed to load preapproval rules",
};

pub const POLICY_PROVIDER_EXCEPTIONS: ProxyRoute = ProxyRoute {
    name: "policy_provider_exceptions",
    inbound: "/api/policies/provider-exceptions",
    upstream: "/api/v1/policies/provider-exceptions",
    kind: RouteKind::Query,
    failure_message: "Failed to load provider exceptions",
};

pub const POLICY_SPECIAL_LIMITS: ProxyRoute = ProxyRoute {
    name: "policy_special_limits",
    inbound: "/api/policies/special-limits",
    upstream: "/api/v1/policies/special-limits",
    kind: RouteKind::Query,
    failure_message: "Failed to load special limits",
};

pub const POLICY_WAITING_PERIODS: ProxyRoute = ProxyRoute {
    name: "policy_waiting_periods",
    inbound: "/api/policies/waiting-periods",
    upstream: "/api/v1/policies/waiting-periods",
    kind: RouteKind::Query,
    failure_message: "Failed to load waiting periods",
};

pub const ENROLLMENT_APPLY_USAGE: ProxyRoute = ProxyRoute {
    name: "enrollment_apply_usage",
    inbound: "/api/enrollments/{id}/accumulators/apply-usage",
    upstream: "/api/policy/v1/enrollments/{id}/accumulators/apply-usage",
    kind: RouteKind::JsonBody,
    failure_message: "Failed to apply usage",
};

/// Every proxy route, in registration order.
pub const ALL_ROUTES: &[ProxyRoute] = &[
    DRUG_CATEGORY_TREE,
    DRUG_PACKS_BY_FORM,
    PLAN_NETWORKS_BY_NETWORK,
    PLAN_NETWORKS_BY_PLAN,
    POLICY_EXCLUSIONS,
    POLICY_PREAPPROVAL_RULES,
    POLICY_PROVIDER_EXCEPTIONS,
    POLICY_SPECIAL_LIMITS,
    POLICY_WAITING_PERIODS,
    ENROLLMENT_APPLY_USAGE,
];

/// Look a route up by its `name`.
pub fn find_route(name: &str) -> Option<&'static ProxyRoute> {
    ALL_ROUTES.iter().find(|route| route.name == name)
}

/// The parts of an inbound request a route needs.
#[derive(Clone, Debug, Default)]
pub struct RouteRequest {
    /// Path parameter, for routes whose template contains `{id}`.
    pub id: Option<String>,
    /// Raw inbound query string.
    pub query: Option<String>,
    /// Inbound headers already filtered by the credential allowlist.
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Everything the forwarder needs for one call.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    pub path: String,
    pub options: ForwardOptions,
    pub query: QueryParams,
}

impl ProxyRoute {
    pub fn method(&self) -> Method {
        match self.kind {
            RouteKind::Query => Method::GET,
            RouteKind::JsonBody => Method::POST,
        }
    }

    pub fn has_path_param(&self) -> bool {
        self.upstream.contains(ID_PLACEHOLDER)
    }

    /// Render the upstream path, substituting the literal path parameter.
    ///
    /// # Errors
    /// Returns [`ProxyError::InvalidPathParam`] if the route needs an id and it is missing or
    /// is not a single plain path segment.
    pub fn upstream_path(&self, id: Option<&str>) -> ProxyResult<String> {
        if !self.has_path_param() {
            return Ok(self.upstream.to_string());
        }

        let id = id.unwrap_or_default();
        if !is_plain_segment(id) {
            return Err(ProxyError::InvalidPathParam(id.to_string()));
        }

        Ok(self.upstream.replace(ID_PLACEHOLDER, id))
    }

    /// Shape an inbound request into the forwarder's arguments.
    ///
    /// # Errors
    /// - [`ProxyError::InvalidPathParam`] for a bad path parameter.
    /// - [`ProxyError::InvalidJsonBody`] if a JSON-body route receives a body that does not parse.
    pub fn prepare(&self, request: RouteRequest) -> ProxyResult<PreparedRequest> {
        let path = self.upstream_path(request.id.as_deref())?;
        let mut headers = request.headers;

        match self.kind {
            RouteKind::Query => Ok(PreparedRequest {
                path,
                options: ForwardOptions {
                    method: Some(Method::GET),
                    headers,
                    body: None,
                },
                query: QueryParams::from_raw(request.query),
            }),
            RouteKind::JsonBody => {
                let payload: serde_json::Value =
                    serde_json::from_slice(&request.body).map_err(ProxyError::InvalidJsonBody)?;
                let body = serde_json::to_vec(&payload).map_err(ProxyError::BodyEncoding)?;

                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

                Ok(PreparedRequest {
                    path,
                    options: ForwardOptions {
                        method: Some(Method::POST),
                        headers,
                        body: Some(Bytes::from(body)),
                    },
                    query: QueryParams::None,
                })
            }
        }
    }
}

/// Non-empty, RFC 3986 unreserved characters only, and not a dot segment.
///
/// URL parsing drops tabs and newlines, treats `\` as `/` and collapses `.`, `..` and their
/// percent-encoded forms, so anything outside this set could move the id out of its segment.
fn is_plain_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}

/// Prepare and forward in one step.
pub async fn forward_route(
    forwarder: &Forwarder,
    route: &ProxyRoute,
    request: RouteRequest,
) -> ProxyResult<UpstreamResponse> {
    let prepared = route.prepare(request)?;
    forwarder
        .forward(&prepared.path, prepared.options, &prepared.query)
        .await
}
