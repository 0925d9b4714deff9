//! Gateway router.

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::context::GatewayContext;
use super::handlers;

/// CORS for browser callers. Only the configured origins, only the two verbs in use.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false)
        .max_age(Duration::from_secs(3600))
}

/// Build the gateway router: `/inference` and `/media-job`, nothing else.
pub fn build_router(ctx: Arc<GatewayContext>) -> Router {
    let body_limit = ctx.config().max_body_bytes;
    let cors = cors_layer(&ctx.config().allowed_origins);

    Router::new()
        .route(
            "/inference",
            post(handlers::handle_inference).fallback(handlers::method_not_allowed),
        )
        .route(
            "/media-job",
            // Explicit HEAD, otherwise `get` answers it and reaches the provider.
            post(handlers::handle_media_job)
                .head(handlers::method_not_allowed)
                .get(handlers::handle_media_download)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ctx)
}
