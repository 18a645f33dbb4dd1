//! 积分仓储层
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 扣减必须是单次原子条件更新，不允许"先读后写"
//! - 定义 trait 接口以支持 mock 测试

mod memory_repo;
mod pg_repo;
mod traits;

pub use memory_repo::MemoryCreditRepository;
pub use pg_repo::PgCreditRepository;
pub use traits::*;
