//! HTTP 请求处理器

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::warn;

use crate::error::Result;
use crate::state::AppState;

/// 发布一条检测结果
///
/// POST /publish
///
/// 请求体不是合法 JSON 时由提取器拒绝（400/415 等），不会进入发布流程。
pub async fn publish(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(status = %rejection.status(), reason = %rejection.body_text(), "发布请求体无效");
            let body = json!({
                "status": "error",
                "message": rejection.body_text(),
            });
            return Ok((rejection.status(), Json(body)).into_response());
        }
    };

    state.publisher.publish(&payload).await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Message published successfully",
    }))
    .into_response())
}

/// 返回缓冲区中的全部检测结果（按消费顺序）
///
/// GET /results
pub async fn list_results(State(state): State<AppState>) -> Json<Vec<Value>> {
    Json(state.store.snapshot())
}

/// 存活探针
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "kafka-relay-service",
        "state": state.lifecycle.current(),
        "buffered": state.store.len(),
        "capacity": state.store.capacity(),
        "evicted": state.store.evicted_total(),
    }))
}

/// 就绪探针：仅 running 状态接收流量
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let current = state.lifecycle.current();
    let status = if state.lifecycle.is_running() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "unavailable" },
            "service": "kafka-relay-service",
            "state": current,
        })),
    )
}
