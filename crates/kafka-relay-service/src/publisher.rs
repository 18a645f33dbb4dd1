//! 检测结果发布

use async_trait::async_trait;
use recflux_shared::kafka::KafkaProducer;
use recflux_shared::observability::metrics;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{RelayError, Result};

/// 发布接口，便于在无 broker 的环境下测试 HTTP 层
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    async fn publish(&self, payload: &Value) -> Result<()>;
}

/// 基于 Kafka 的发布实现
pub struct KafkaResultPublisher {
    producer: KafkaProducer,
    topic: String,
}

impl KafkaResultPublisher {
    pub fn new(producer: KafkaProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl ResultPublisher for KafkaResultPublisher {
    async fn publish(&self, payload: &Value) -> Result<()> {
        // 不依赖分区内顺序，key 仅用于日志关联
        let key = uuid::Uuid::new_v4().to_string();

        match self.producer.send_json(&self.topic, &key, payload).await {
            Ok((partition, offset)) => {
                metrics::record_relay_publish("success");
                info!(topic = %self.topic, key, partition, offset, "检测结果已发布");
                Ok(())
            }
            Err(e) => {
                metrics::record_relay_publish("error");
                warn!(topic = %self.topic, key, error = %e, "检测结果发布失败");
                // 对外返回 broker 的原始错误文本
                Err(RelayError::Publish(e.to_string()))
            }
        }
    }
}
