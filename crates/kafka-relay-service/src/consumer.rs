//! 检测结果消费者
//!
//! 从 topic 起始位置消费，把每条 JSON 消息追加到结果缓冲区。
//! 解析失败的消息记录日志后丢弃，不重试，也不投递死信队列。

use std::sync::Arc;

use recflux_shared::config::KafkaConfig;
use recflux_shared::kafka::{ConsumerMessage, KafkaConsumer};
use recflux_shared::observability::metrics;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::store::ResultStore;

/// 单条消息的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Stored { evicted: bool },
    Dropped,
}

/// 解析一条消息并写入缓冲区
pub fn ingest_message(store: &ResultStore, msg: &ConsumerMessage) -> IngestOutcome {
    let value: Value = match msg.deserialize_payload() {
        Ok(value) => value,
        Err(e) => {
            metrics::record_relay_dropped();
            warn!(
                error = %e,
                topic = %msg.topic,
                partition = msg.partition,
                offset = msg.offset,
                "检测结果不是合法 JSON，已丢弃"
            );
            return IngestOutcome::Dropped;
        }
    };

    let evicted = store.push(value).is_some();
    metrics::record_relay_consumed(store.len(), evicted);
    debug!(
        partition = msg.partition,
        offset = msg.offset,
        buffered = store.len(),
        evicted,
        "检测结果已缓存"
    );

    IngestOutcome::Stored { evicted }
}

pub struct ResultConsumer {
    consumer: KafkaConsumer,
    store: Arc<ResultStore>,
}

impl ResultConsumer {
    /// 创建消费者并订阅 topic
    pub fn new(config: &KafkaConfig, topic: &str, store: Arc<ResultStore>) -> Result<Self> {
        let consumer = KafkaConsumer::new(config)?;
        consumer.subscribe(&[topic])?;
        Ok(Self { consumer, store })
    }

    /// 运行消费循环，直到 shutdown 置为 true
    pub async fn run(self, shutdown: watch::Receiver<bool>) {
        let store = self.store;

        self.consumer
            .start(shutdown, |msg| {
                let store = store.clone();
                async move {
                    ingest_message(&store, &msg);
                    Ok(())
                }
            })
            .await;

        info!(buffered = store.len(), "检测结果消费者已停止");
    }
}
