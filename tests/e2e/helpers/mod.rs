//! 测试辅助工具模块

mod api_client;
mod db_verifier;
mod kafka_helper;

pub use api_client::*;
pub use db_verifier::*;
pub use kafka_helper::*;
