//! 积分计费服务
//!
//! 每次计费动作固定扣除 10 积分，余额不足时拒绝且不修改余额。
//!
//! ## 模块结构
//!
//! - `models`: 计费结果与仓储扣减结果
//! - `repository`: 积分存储（PostgreSQL / 内存）
//! - `service`: 计费逻辑
//! - `handlers` / `routes` / `state`: HTTP 接口
//!
//! 扣减是单条条件 UPDATE，不存在先读后写的并发窗口。

pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

pub use error::{CreditError, Result};
pub use models::{CREDIT_COST, CreditCheckResult, DeductOutcome};
pub use repository::{CreditRepository, MemoryCreditRepository, PgCreditRepository};
pub use service::CreditService;
