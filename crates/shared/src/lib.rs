//! 共享库
//!
//! 包含积分服务与检测结果中继服务共用的配置、错误处理、数据库连接、
//! Kafka 封装、可观测性和关闭信号等基础设施代码。

pub mod config;
pub mod database;
pub mod error;
pub mod kafka;
pub mod observability;
pub mod shutdown;
