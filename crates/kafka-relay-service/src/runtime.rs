//! 中继运行时：Kafka 客户端的连接与断开
//!
//! 连接阶段依次创建生产者、确认 broker 可达、创建并订阅消费者，
//! 全部成功后进入 running 并在后台启动消费循环。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use recflux_shared::config::AppConfig;
use recflux_shared::kafka::KafkaProducer;
use recflux_shared::shutdown::Shutdown;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::consumer::ResultConsumer;
use crate::error::{RelayError, Result};
use crate::lifecycle::{Lifecycle, RelayState};
use crate::publisher::KafkaResultPublisher;
use crate::store::ResultStore;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RelayRuntime {
    producer: KafkaProducer,
    consumer_task: JoinHandle<()>,
    stopper: RelayStopper,
    store: Arc<ResultStore>,
}

/// 触发关闭的句柄，可在 HTTP graceful shutdown 回调中使用
#[derive(Clone)]
pub struct RelayStopper {
    lifecycle: Arc<Lifecycle>,
    shutdown: Shutdown,
}

impl RelayStopper {
    /// running -> disconnecting，并通知消费循环退出；重复调用无副作用
    pub fn stop(&self) {
        if self.lifecycle.is_running()
            && let Err(e) = self.lifecycle.transition(RelayState::Disconnecting)
        {
            warn!(error = %e, "进入 disconnecting 失败");
        }
        self.shutdown.trigger();
    }
}

impl RelayRuntime {
    /// 连接 Kafka，返回运行时和发布器
    #[instrument(skip_all, fields(brokers = %config.kafka.brokers, topic = %config.relay.topic))]
    pub async fn connect(
        config: &AppConfig,
        store: Arc<ResultStore>,
        lifecycle: Arc<Lifecycle>,
    ) -> Result<(Self, KafkaResultPublisher)> {
        lifecycle.transition(RelayState::Connecting)?;

        let (producer, consumer) = match Self::connect_clients(config, store.clone()).await {
            Ok(clients) => clients,
            Err(e) => {
                error!(error = %e, "连接 Kafka 失败");
                lifecycle.transition(RelayState::Terminated)?;
                return Err(e);
            }
        };

        let shutdown = Shutdown::new();
        let consumer_task = tokio::spawn(consumer.run(shutdown.subscribe()));

        lifecycle.transition(RelayState::Running)?;
        info!("检测结果中继已启动");

        let publisher = KafkaResultPublisher::new(producer.clone(), config.relay.topic.clone());
        let runtime = Self {
            producer,
            consumer_task,
            stopper: RelayStopper {
                lifecycle,
                shutdown,
            },
            store,
        };

        Ok((runtime, publisher))
    }

    async fn connect_clients(
        config: &AppConfig,
        store: Arc<ResultStore>,
    ) -> Result<(KafkaProducer, ResultConsumer)> {
        let producer = KafkaProducer::new(&config.kafka)?;

        producer
            .verify_connection(
                &config.relay.topic,
                Duration::from_millis(config.kafka.message_timeout_ms),
            )
            .await
            .map_err(|e| RelayError::Connect(e.to_string()))?;

        let consumer = ResultConsumer::new(&config.kafka, &config.relay.topic, store)?;
        Ok((producer, consumer))
    }

    pub fn stopper(&self) -> RelayStopper {
        self.stopper.clone()
    }

    /// 等待消费循环退出、刷新生产者并进入 terminated
    ///
    /// 缓冲区中的结果随进程退出丢弃。
    pub async fn finish(self) -> Result<()> {
        self.stopper.stop();

        if let Err(e) = self.consumer_task.await {
            error!(error = %e, "消费任务异常退出");
        }

        if let Err(e) = self.producer.flush(FLUSH_TIMEOUT) {
            warn!(error = %e, "关闭前刷新生产者失败");
        }
        drop(self.producer);

        self.stopper.lifecycle.transition(RelayState::Terminated)?;
        info!(
            discarded = self.store.len(),
            "检测结果中继已关闭，缓冲结果已丢弃"
        );
        Ok(())
    }
}

/// HTTP 服务结束后总会执行关闭流程，再返回服务本身的错误
///
/// 两者都失败时以服务错误为准，关闭错误只记录日志。
pub async fn finish_after_serve<E, F>(
    served: std::result::Result<(), E>,
    finish: F,
) -> anyhow::Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
    F: Future<Output = Result<()>>,
{
    let finished = finish.await;

    match served {
        Ok(()) => Ok(finished?),
        Err(e) => {
            error!(error = %e, "HTTP 服务异常退出");
            if let Err(finish_err) = finished {
                warn!(error = %finish_err, "异常退出后关闭中继失败");
            }
            Err(e.into())
        }
    }
}
