//! # TPA Core
//!
//! Forwarding logic for the TPA proxy layer.
//!
//! This crate contains the request forwarder and its per-resource specialisations:
//! - [`Forwarder`]: `<upstream-base><path>[?query]`, method/headers/body passed through
//! - [`routes`]: the fixed proxy route table and request shaping
//! - [`pages`]: numeric id resolution for detail pages
//! - [`credentials`]: the explicit inbound header allowlist
//!
//! **No server concerns**: routing, response encoding and OpenAPI belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod forwarder;
pub mod pages;
pub mod routes;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use api_shared::{ErrorEnvelope, PageContext, PageMode};
pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use forwarder::{ForwardOptions, Forwarder, QueryParams, UpstreamResponse};
pub use pages::PageRoute;
pub use routes::{forward_route, ProxyRoute, RouteKind, RouteRequest, ALL_ROUTES};

// Callers build options with the same HTTP types the forwarder sends.
pub use reqwest::{header, Method, StatusCode};
