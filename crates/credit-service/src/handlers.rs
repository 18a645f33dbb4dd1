//! HTTP 请求处理器

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::warn;

use crate::dto::{ApiResponse, CreditBalanceDto, DeductCreditsRequest};
use crate::error::Result;
use crate::models::CreditCheckResult;
use crate::state::AppState;

/// 扣减一次计费动作的积分
///
/// POST /api/credits/deduct
///
/// 积分不足是正常业务结果：返回 200，`success = false`，结果放在 data 中。
pub async fn deduct_credits(
    State(state): State<AppState>,
    Json(req): Json<DeductCreditsRequest>,
) -> Result<Json<ApiResponse<CreditCheckResult>>> {
    let result = state
        .credit_service
        .check_and_deduct_credits(&req.email)
        .await?;

    let message = result.message.clone();
    let response = if result.has_enough_credits {
        ApiResponse::success_with_message(result, message)
    } else {
        ApiResponse::rejected("INSUFFICIENT_CREDITS", message, result)
    };

    Ok(Json(response))
}

/// 查询余额
///
/// GET /api/credits/{email}
pub async fn get_credits(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<CreditBalanceDto>>> {
    let credits = state.credit_service.get_current_credits(&email).await?;

    Ok(Json(ApiResponse::success(CreditBalanceDto {
        email: email.trim().to_string(),
        credits,
    })))
}

/// 存活探针
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "credit-service"
    }))
}

/// 就绪探针：检查积分存储是否可用
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_ok = match state.credit_service.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "积分存储健康检查失败");
            false
        }
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_ok { "ok" } else { "degraded" },
            "service": "credit-service",
            "checks": {
                "credit_store": if store_ok { "ok" } else { "fail" }
            }
        })),
    )
}
