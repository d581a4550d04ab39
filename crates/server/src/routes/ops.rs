use std::future::Future;

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use common::types::Health;
use tracing::error;

#[utoipa::path(get, path = "/health", tag = "ops", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Prometheus text exposition of this process's registry.
pub async fn metrics() -> impl IntoResponse {
    match service::observability::encode_metrics() {
        Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, "text/plain; version=0.0.4")], body),
        Err(e) => {
            error!(error = %e, "metrics encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, [(CONTENT_TYPE, "text/plain")], e.to_string())
        }
    }
}

/// Stateless operational routes, merged into each service's router.
pub fn router<H, Fut>(openapi_doc: H) -> Router
where
    H: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Json<utoipa::openapi::OpenApi>> + Send + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_doc))
}
