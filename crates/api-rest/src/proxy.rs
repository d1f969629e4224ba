//! Proxy route handlers.
//!
//! Every handler forwards to the upstream through [`relay`] and differs only in the route it
//! names and whether it takes a path parameter or a body. Upstream responses, including 4xx/5xx,
//! are relayed as received. Failing to reach the upstream yields a 500 with the route's static
//! message.

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};

use api_shared::ErrorEnvelope;
use tpa_core::credentials::forwarded_headers;
use tpa_core::routes::{self, ProxyRoute, RouteRequest};
use tpa_core::{forward_route, UpstreamResponse};

use crate::AppState;

/// Forward one inbound request for `route` and turn the outcome into a response.
pub async fn relay(
    state: &AppState,
    route: &ProxyRoute,
    id: Option<String>,
    query: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let request = RouteRequest {
        id,
        query,
        headers: forwarded_headers(headers, state.cfg.forward_headers()),
        body,
    };

    match forward_route(&state.forwarder, route, request).await {
        Ok(upstream) => upstream_response(upstream),
        Err(e) => {
            tracing::error!(route = route.name, error = %e, "{}", route.failure_message);
            failure_response(route.failure_message)
        }
    }
}

/// Status 500 with `{"message": ...}` and `Content-Type: application/json`.
pub fn failure_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorEnvelope::new(message)),
    )
        .into_response()
}

fn upstream_response(upstream: UpstreamResponse) -> Response {
    let mut resp = Response::new(Body::from(upstream.body));
    *resp.status_mut() = upstream.status;
    *resp.headers_mut() = upstream.headers;
    resp
}

#[utoipa::path(
    get,
    path = "/api/drug-categories/tree",
    tag = "drugs",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn drug_category_tree(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::DRUG_CATEGORY_TREE,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/drug-packs/by-form/{id}",
    tag = "drugs",
    params(("id" = String, Path, description = "Drug form id")),
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn drug_packs_by_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::DRUG_PACKS_BY_FORM,
        Some(id),
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/plan-networks/by-network",
    tag = "plans",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn plan_networks_by_network(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::PLAN_NETWORKS_BY_NETWORK,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/plan-networks/by-plan",
    tag = "plans",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn plan_networks_by_plan(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::PLAN_NETWORKS_BY_PLAN,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/policies/exclusions",
    tag = "policies",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn policy_exclusions(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::POLICY_EXCLUSIONS,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/policies/preapproval-rules",
    tag = "policies",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn policy_preapproval_rules(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::POLICY_PREAPPROVAL_RULES,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/policies/provider-exceptions",
    tag = "policies",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn policy_provider_exceptions(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::POLICY_PROVIDER_EXCEPTIONS,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/policies/special-limits",
    tag = "policies",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn policy_special_limits(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::POLICY_SPECIAL_LIMITS,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/policies/waiting-periods",
    tag = "policies",
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable", body = ErrorEnvelope)
    )
)]
pub async fn policy_waiting_periods(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    relay(
        &state,
        &routes::POLICY_WAITING_PERIODS,
        None,
        query,
        &headers,
        Bytes::new(),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/enrollments/{id}/accumulators/apply-usage",
    tag = "enrollments",
    params(("id" = String, Path, description = "Enrollment id")),
    responses(
        (status = 200, description = "Relayed upstream response"),
        (status = 500, description = "Upstream unreachable or body is not JSON", body = ErrorEnvelope)
    )
)]
/// Apply usage to an enrollment's accumulators
///
/// The body is parsed as JSON and re-sent with `Content-Type: application/json` and
/// `Accept: */*`. A body that does not parse is treated like a transport failure.
pub async fn enrollment_apply_usage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    relay(
        &state,
        &routes::ENROLLMENT_APPLY_USAGE,
        Some(id),
        None,
        &headers,
        body,
    )
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{header, HeaderValue, Method, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use tpa_core::routes::{RouteKind, ALL_ROUTES};
    use tpa_core::testing::{spawn_upstream, unreachable_base_url, StubReply};
    use tpa_core::ProxyConfig;

    use super::*;
    use crate::build_router;

    fn router_for(base_url: &str, forward: Vec<header::HeaderName>) -> axum::Router {
        let cfg = ProxyConfig::new(base_url.into(), "127.0.0.1:0".into(), forward)
            .expect("config");
        build_router(AppState::new(cfg))
    }

    async fn body_bytes(resp: Response) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    fn inbound_request(route: &ProxyRoute) -> Request<Body> {
        let uri = route.inbound.replace("{id}", "42");
        match route.kind {
            RouteKind::Query => Request::get(uri).body(Body::empty()).unwrap(),
            RouteKind::JsonBody => Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"usage":10}"#))
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn unreachable_exclusions_returns_static_envelope() {
        let app = router_for(&unreachable_base_url(), Vec::new());

        let resp = app
            .oneshot(
                Request::get("/api/policies/exclusions?region=GCC")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            &body_bytes(resp).await[..],
            br#"{"message":"Failed to load exclusions"}"#
        );
    }

    #[tokio::test]
    async fn every_route_maps_transport_failure_to_its_message() {
        let app = router_for(&unreachable_base_url(), Vec::new());

        for route in ALL_ROUTES {
            let resp = app.clone().oneshot(inbound_request(route)).await.unwrap();
            assert_eq!(
                resp.status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{}",
                route.name
            );
            assert_eq!(
                resp.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
            let envelope: ErrorEnvelope =
                serde_json::from_slice(&body_bytes(resp).await).unwrap();
            assert_eq!(envelope.message, route.failure_message);
        }
    }

    #[tokio::test]
    async fn apply_usage_is_forwarded_and_relayed() {
        let upstream = spawn_upstream(StubReply::json(200, r#"{"ok":true}"#)).await;
        let app = router_for(upstream.base_url(), Vec::new());

        let resp = app
            .oneshot(
                Request::post("/api/enrollments/42/accumulators/apply-usage")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"usage":10}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(&body_bytes(resp).await[..], br#"{"ok":true}"#);

        let seen = upstream.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(
            seen[0].uri,
            "/api/policy/v1/enrollments/42/accumulators/apply-usage"
        );
        assert_eq!(
            seen[0].headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(seen[0].headers.get(header::ACCEPT).unwrap(), "*/*");
        assert_eq!(&seen[0].body[..], br#"{"usage":10}"#);
    }

    #[tokio::test]
    async fn malformed_usage_body_never_reaches_upstream() {
        let upstream = spawn_upstream(StubReply::json(200, "{}")).await;
        let app = router_for(upstream.base_url(), Vec::new());

        let resp = app
            .oneshot(
                Request::post("/api/enrollments/42/accumulators/apply-usage")
                    .body(Body::from("usage=10"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            &body_bytes(resp).await[..],
            br#"{"message":"Failed to apply usage"}"#
        );
        assert!(upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn encoded_dot_segment_id_never_reaches_upstream() {
        let upstream = spawn_upstream(StubReply::json(200, "{}")).await;
        let app = router_for(upstream.base_url(), Vec::new());

        let resp = app
            .clone()
            .oneshot(
                Request::post("/api/enrollments/%2E%2E/accumulators/apply-usage")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"usage":10}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            &body_bytes(resp).await[..],
            br#"{"message":"Failed to apply usage"}"#
        );

        let resp = app
            .oneshot(
                Request::get("/api/drug-packs/by-form/%2E%2E")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            &body_bytes(resp).await[..],
            br#"{"message":"Failed to load drug packs"}"#
        );

        assert!(upstream.requests().is_empty());
    }

    #[tokio::test]
    async fn get_routes_forward_query_verbatim() {
        let upstream = spawn_upstream(StubReply::json(200, "[]")).await;
        let app = router_for(upstream.base_url(), Vec::new());

        for route in ALL_ROUTES.iter().filter(|r| r.kind == RouteKind::Query) {
            let uri = format!("{}?a=1&b=2", route.inbound.replace("{id}", "42"));
            let resp = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{}", route.name);
        }

        let seen = upstream.requests();
        let expected: Vec<String> = ALL_ROUTES
            .iter()
            .filter(|r| r.kind == RouteKind::Query)
            .map(|r| format!("{}?a=1&b=2", r.upstream.replace("{id}", "42")))
            .collect();
        let actual: Vec<String> = seen.iter().map(|c| c.uri.clone()).collect();
        assert_eq!(actual, expected);
        assert!(seen.iter().all(|c| c.method == Method::GET && c.body.is_empty()));
    }

    #[tokio::test]
    async fn get_without_query_appends_nothing() {
        let upstream = spawn_upstream(StubReply::json(200, "[]")).await;
        let app = router_for(upstream.base_url(), Vec::new());

        app.oneshot(
            Request::get("/api/drug-categories/tree")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        assert_eq!(upstream.requests()[0].uri, "/api/v1/drug-categories/tree");
    }

    #[tokio::test]
    async fn upstream_errors_are_relayed_unchanged() {
        let upstream =
            spawn_upstream(StubReply::json(422, r#"{"errors":["planId required"]}"#)).await;
        let app = router_for(upstream.base_url(), Vec::new());

        let resp = app
            .oneshot(
                Request::get("/api/plan-networks/by-plan")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp.headers().get("x-upstream").unwrap(), "stub");
        assert_eq!(
            &body_bytes(resp).await[..],
            br#"{"errors":["planId required"]}"#
        );
    }

    #[tokio::test]
    async fn only_allowlisted_headers_reach_upstream() {
        let upstream = spawn_upstream(StubReply::json(200, "[]")).await;
        let app = router_for(upstream.base_url(), vec![header::AUTHORIZATION]);

        app.oneshot(
            Request::get("/api/policies/special-limits")
                .header(header::AUTHORIZATION, "Bearer t0k")
                .header(header::COOKIE, "session=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

        let seen = upstream.requests();
        assert_eq!(
            seen[0].headers.get(header::AUTHORIZATION),
            Some(&HeaderValue::from_static("Bearer t0k"))
        );
        assert!(seen[0].headers.get(header::COOKIE).is_none());
    }

    #[tokio::test]
    async fn credentials_are_not_forwarded_by_default() {
        let upstream = spawn_upstream(StubReply::json(200, "[]")).await;
        let state = AppState {
            cfg: Arc::new(
                ProxyConfig::new(upstream.base_url().into(), "127.0.0.1:0".into(), Vec::new())
                    .expect("config"),
            ),
            forwarder: tpa_core::Forwarder::new(upstream.base_url()),
        };

        build_router(state)
            .oneshot(
                Request::get("/api/policies/waiting-periods")
                    .header(header::AUTHORIZATION, "Bearer t0k")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(upstream.requests()[0]
            .headers
            .get(header::AUTHORIZATION)
            .is_none());
    }
}
