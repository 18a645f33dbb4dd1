//! Kafka 辅助工具
//!
//! 直接读写检测结果 topic，用于绕过 HTTP 验证中继两端。

use anyhow::Result;
use rdkafka::Message;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

pub const RESULTS_TOPIC: &str = "accessibility-test-results";

/// Kafka 辅助工具
pub struct KafkaHelper {
    producer: FutureProducer,
    brokers: String,
}

impl KafkaHelper {
    pub fn new(brokers: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            brokers: brokers.to_string(),
        })
    }

    /// 绕过中继直接写入 topic
    pub async fn send_result(&self, payload: &Value) -> Result<()> {
        let body = serde_json::to_string(payload)?;
        let key = Uuid::new_v4().to_string();
        self.producer
            .send(
                FutureRecord::to(RESULTS_TOPIC).key(&key).payload(&body),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| anyhow::anyhow!("发送消息失败: {e}"))?;
        Ok(())
    }

    /// 写入原始字节（用于非 JSON 消息）
    pub async fn send_raw(&self, body: &str) -> Result<()> {
        self.producer
            .send(
                FutureRecord::<(), _>::to(RESULTS_TOPIC).payload(body),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| anyhow::anyhow!("发送消息失败: {e}"))?;
        Ok(())
    }

    /// 用独立消费组从头读取 topic，直到找到满足条件的消息
    pub async fn find_in_topic<F>(&self, timeout: Duration, predicate: F) -> Result<Option<Value>>
    where
        F: Fn(&Value) -> bool,
    {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", format!("e2e-verifier-{}", Uuid::new_v4()))
            .set("enable.partition.eof", "false")
            .set("auto.offset.reset", "earliest")
            .create()?;
        consumer.subscribe(&[RESULTS_TOPIC])?;

        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            let msg = match tokio::time::timeout(Duration::from_millis(500), consumer.recv()).await
            {
                Ok(Ok(msg)) => msg,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => continue,
            };
            let Some(payload) = msg.payload() else {
                continue;
            };
            if let Ok(value) = serde_json::from_slice::<Value>(payload)
                && predicate(&value)
            {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}
