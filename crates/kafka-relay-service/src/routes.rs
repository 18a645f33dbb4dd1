//! 路由配置

use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use recflux_shared::observability::middleware as obs_middleware;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

/// 中继 API 路由
pub fn relay_routes() -> Router<AppState> {
    Router::new()
        .route("/publish", post(handlers::publish))
        .route("/results", get(handlers::list_results))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
}

/// 完整应用路由（含中间件）
pub fn build_router(state: AppState, cors_origins: &str) -> Router {
    relay_routes()
        .layer(cors_layer(cors_origins))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    layer.allow_origin(origins)
}
