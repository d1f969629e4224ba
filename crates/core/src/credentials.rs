//! Credential propagation to the upstream.
//!
//! Nothing from the inbound request reaches the upstream implicitly. Operators list the header
//! names to pass through (typically `authorization` and any tenant header) and only those are
//! copied onto the outbound call.

use reqwest::header::{HeaderMap, HeaderName};

/// Copy the allowlisted headers, keeping every value of multi-valued headers.
pub fn forwarded_headers(inbound: &HeaderMap, allowlist: &[HeaderName]) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in allowlist {
        for value in inbound.get_all(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
