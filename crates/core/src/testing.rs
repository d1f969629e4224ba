//! Test helpers: a recording upstream stub bound to a loopback port.
//!
//! Enabled for this crate's own tests and, through the `test-support` feature, for downstream
//! crates that exercise the proxy end to end.

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

/// One request as observed by the stub.
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: Method,
    /// Path and query, e.g. `/api/v1/policies/exclusions?region=GCC`.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The canned reply returned for every request.
#[derive(Clone, Debug)]
pub struct StubReply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: &'static str,
}

impl StubReply {
    pub fn json(status: u16, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            content_type: "application/json",
            body,
        }
    }
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    seen: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Handle to a running stub.
pub struct UpstreamStub {
    base_url: String,
    seen: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl UpstreamStub {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Ok(mut seen) = state.seen.lock() {
        seen.push(CapturedRequest {
            method,
            uri: uri.to_string(),
            headers,
            body,
        });
    }

    let mut resp = (state.reply.status, state.reply.body).into_response();
    resp.headers_mut().insert(
        "content-type",
        HeaderValue::from_static(state.reply.content_type),
    );
    resp.headers_mut()
        .insert("x-upstream", HeaderValue::from_static("stub"));
    resp
}

/// Start a stub upstream on `127.0.0.1:<ephemeral>` that answers every request with `reply`.
///
/// # Panics
/// Panics if the loopback listener cannot be bound.
pub async fn spawn_upstream(reply: StubReply) -> UpstreamStub {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(StubState {
        reply,
        seen: seen.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub upstream address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    UpstreamStub {
        base_url: format!("http://{addr}"),
        seen,
    }
}

/// A base URL on a loopback port that nothing listens on.
///
/// # Panics
/// Panics if a loopback port cannot be reserved.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve loopback port");
    let addr = listener.local_addr().expect("reserved address");
    drop(listener);
    format!("http://{addr}")
}
