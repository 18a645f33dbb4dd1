//! Recflux 端到端测试
//!
//! 针对已启动的服务运行，覆盖：
//! - 检测结果中继：HTTP 发布 -> Kafka -> 消费缓冲 -> HTTP 查询
//! - 积分计费：扣减、余额不足、并发扣减
//!
//! ```bash
//! cargo test --test e2e -- --ignored --test-threads=1
//! ```

pub mod helpers;
pub mod setup;
pub mod suites;

pub use setup::TestEnvironment;
