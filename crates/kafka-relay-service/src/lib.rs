//! 无障碍检测结果中继服务
//!
//! 通过 HTTP 接收 JSON 检测结果并发布到 `accessibility-test-results` topic，
//! 同时从该 topic 起始位置消费，把结果保存在有界内存缓冲区中供 HTTP 查询。
//!
//! ## 模块结构
//!
//! - `store`: 有界结果缓冲区
//! - `lifecycle`: 连接状态机
//! - `publisher` / `consumer`: Kafka 发布与消费
//! - `runtime`: 启动连接与关闭流程
//! - `handlers` / `routes` / `state`: HTTP 接口
//!
//! 缓冲区不持久化，进程重启后 `/results` 为空数组。

pub mod consumer;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod publisher;
pub mod routes;
pub mod runtime;
pub mod state;
pub mod store;

pub use error::{RelayError, Result};
pub use lifecycle::{Lifecycle, RelayState};
pub use publisher::{KafkaResultPublisher, ResultPublisher};
pub use store::ResultStore;
