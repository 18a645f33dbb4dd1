//! 积分服务错误类型
//!
//! 存储故障与"积分不足"严格区分：后者是正常业务结果，
//! 由 `CreditCheckResult.has_enough_credits = false` 表达，不走错误通道。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recflux_shared::error::RecfluxError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("用户不存在: {0}")]
    UserNotFound(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Infrastructure(#[from] RecfluxError),
}

impl CreditError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Infrastructure(e) => e.code(),
        }
    }
}

impl IntoResponse for CreditError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Infrastructure(e) => {
                tracing::error!(error = %e, code = e.code(), "基础设施错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, CreditError>;
