//! # API REST
//!
//! REST surface of the TPA proxy.
//!
//! Handles:
//! - One axum handler per proxy route, each a thin specialisation of the core forwarder
//! - The uniform 500 error envelope on transport failure
//! - Detail-page context resolution
//! - OpenAPI/Swagger documentation, CORS and request tracing
//!
//! Uses `tpa-core` for forwarding and `api-shared` for wire types.

#![warn(rust_2018_idioms)]

pub mod pages;
pub mod proxy;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ErrorEnvelope, HealthRes, HealthService, PageContext, PageMode};
use tpa_core::{Forwarder, ProxyConfig};

/// Application state shared across REST handlers
///
/// Holds the startup configuration and the forwarder. Both are immutable after startup; the
/// forwarder's connection pool is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<ProxyConfig>,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(cfg: ProxyConfig) -> Self {
        let forwarder = Forwarder::from_config(&cfg);
        Self {
            cfg: Arc::new(cfg),
            forwarder,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        proxy::drug_category_tree,
        proxy::drug_packs_by_form,
        proxy::plan_networks_by_network,
        proxy::plan_networks_by_plan,
        proxy::policy_exclusions,
        proxy::policy_preapproval_rules,
        proxy::policy_provider_exceptions,
        proxy::policy_special_limits,
        proxy::policy_waiting_periods,
        proxy::enrollment_apply_usage,
        pages::page_context,
    ),
    components(schemas(HealthRes, ErrorEnvelope, PageContext, PageMode))
)]
pub struct ApiDoc;

/// Build the full REST router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/drug-categories/tree", get(proxy::drug_category_tree))
        .route("/api/drug-packs/by-form/:id", get(proxy::drug_packs_by_form))
        .route(
            "/api/plan-networks/by-network",
            get(proxy::plan_networks_by_network),
        )
        .route(
            "/api/plan-networks/by-plan",
            get(proxy::plan_networks_by_plan),
        )
        .route("/api/policies/exclusions", get(proxy::policy_exclusions))
        .route(
            "/api/policies/preapproval-rules",
            get(proxy::policy_preapproval_rules),
        )
        .route(
            "/api/policies/provider-exceptions",
            get(proxy::policy_provider_exceptions),
        )
        .route(
            "/api/policies/special-limits",
            get(proxy::policy_special_limits),
        )
        .route(
            "/api/policies/waiting-periods",
            get(proxy::policy_waiting_periods),
        )
        .route(
            "/api/enrollments/:id/accumulators/apply-usage",
            post(proxy::enrollment_apply_usage),
        )
        .route("/pages/*path", get(pages::page_context))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. The upstream is not probed.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn router() -> Router {
        let cfg = ProxyConfig::new(
            "http://backend.invalid".into(),
            "127.0.0.1:0".into(),
            Vec::new(),
        )
        .expect("config");
        build_router(AppState::new(cfg))
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let resp = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let health: HealthRes = serde_json::from_slice(&body).unwrap();
        assert!(health.ok);
    }

    #[tokio::test]
    async fn openapi_document_lists_proxy_routes() {
        let doc = ApiDoc::openapi();
        for route in tpa_core::ALL_ROUTES {
            assert!(
                doc.paths.paths.contains_key(route.inbound),
                "missing {}",
                route.inbound
            );
        }

        let resp = router()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
