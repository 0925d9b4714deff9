use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use wellspring_core::gateway::{build_router as gateway_router, GatewayContext};

/// Gateway routes plus the daemon's own liveness endpoints.
pub fn build_router(ctx: Arc<GatewayContext>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/version", get(version_info))
        .merge(gateway_router(ctx))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

async fn version_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
