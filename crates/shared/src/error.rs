//! 统一错误处理模块
//!
//! 定义基础设施层（数据库、Kafka、配置）共享的错误类型，
//! 业务服务在各自的错误枚举中通过 `#[from]` 透传。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum RecfluxError {
    // ==================== 数据库错误 ====================
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // ==================== Kafka 错误 ====================
    #[error("Kafka 错误: {0}")]
    Kafka(String),

    /// 投递失败，保留 librdkafka 的原始错误文本
    #[error(transparent)]
    Delivery(#[from] rdkafka::error::KafkaError),

    #[error("消息序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    // ==================== 配置错误 ====================
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    // ==================== 通用错误 ====================
    #[error("内部错误: {0}")]
    Internal(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, RecfluxError>;

impl RecfluxError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) => "DATABASE_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
            Self::Kafka(_) => "KAFKA_ERROR",
            Self::Delivery(_) => "KAFKA_DELIVERY_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
