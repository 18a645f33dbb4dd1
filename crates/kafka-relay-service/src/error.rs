//! 中继服务错误类型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use recflux_shared::error::RecfluxError;
use serde_json::json;

use crate::lifecycle::RelayState;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// 发布失败，消息原样返回给调用方
    #[error("{0}")]
    Publish(String),

    #[error("连接 Kafka 失败: {0}")]
    Connect(String),

    #[error("非法的状态迁移: {from} -> {to}")]
    InvalidTransition { from: RelayState, to: RelayState },

    #[error("结果缓冲区容量必须大于 0")]
    InvalidCapacity,

    #[error(transparent)]
    Infrastructure(#[from] RecfluxError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Connect(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Publish(_) => "PUBLISH_FAILED",
            Self::Connect(_) => "KAFKA_UNAVAILABLE",
            Self::InvalidTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::InvalidCapacity => "INVALID_CAPACITY",
            Self::Infrastructure(e) => e.code(),
        }
    }
}

/// 响应体沿用中继对外的 `{status, message}` 格式
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, code = self.error_code(), "请求处理失败");

        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });

        (self.status_code(), axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
