//! Detail-page context resolution.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use api_shared::{ErrorEnvelope, PageContext};
use tpa_core::PageRoute;

#[utoipa::path(
    get,
    path = "/pages/{path}",
    tag = "pages",
    params(("path" = String, Path, description = "Page URL path, e.g. `policies/new`")),
    responses(
        (status = 200, description = "Resolved page context", body = PageContext),
        (status = 404, description = "Unknown page or non-numeric id", body = ErrorEnvelope)
    )
)]
/// Resolve the props for a detail page
///
/// `policies/new` resolves to the policy page in create mode with a null id. Every other id must
/// be numeric.
pub async fn page_context(Path(path): Path<String>) -> Response {
    match PageRoute::parse(&path) {
        Ok(route) => Json(route.context()).into_response(),
        Err(e) => {
            tracing::debug!(%path, error = %e, "page not resolved");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorEnvelope::new("Page not found")),
            )
                .into_response()
        }
    }
}
