//! Constants used throughout the TPA core crate.
//!
//! This module contains defaults and header names shared by the forwarder, the route table and
//! the configuration layer.

/// Upstream backend used when no base URL is configured.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://localhost:8080";

/// Default bind address for the REST proxy.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// `Accept` value sent by JSON-body proxy routes.
pub const ACCEPT_ANY: &str = "*/*";

/// Placeholder substituted with the inbound path parameter in upstream path templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Literal policy id segment that selects create mode on the policy detail page.
pub const NEW_POLICY_SEGMENT: &str = "new";

/// Headers that are scoped to a single connection and never relayed.
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];
