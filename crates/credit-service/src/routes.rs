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

/// 积分 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/credits/deduct", post(handlers::deduct_credits))
        .route("/credits/{email}", get(handlers::get_credits))
}

/// 完整应用路由（含探针与中间件）
pub fn build_router(state: AppState, cors_origins: &str) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .layer(cors_layer(cors_origins))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// CORS 配置："*" 放行全部来源，否则按逗号分隔的来源列表放行
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
