//! 请求与响应 DTO

use serde::{Deserialize, Serialize};

/// 扣减积分请求
///
/// 邮箱在服务层先去除首尾空白再校验格式
#[derive(Debug, Deserialize)]
pub struct DeductCreditsRequest {
    pub email: String,
}

/// 余额响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditBalanceDto {
    pub email: String,
    pub credits: i32,
}

/// API 统一响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message(data, "操作成功")
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 业务未通过但请求本身有效，仍携带数据
    pub fn rejected(code: impl Into<String>, message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
            data: Some(data),
        }
    }
}
