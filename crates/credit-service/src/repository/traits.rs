//! 仓储 Trait 定义

use async_trait::async_trait;

use crate::error::Result;
use crate::models::DeductOutcome;

/// 积分仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreditRepository: Send + Sync {
    /// 查询余额，用户不存在返回 None
    async fn get_credits(&self, email: &str) -> Result<Option<i32>>;

    /// 余额充足时原子扣减 `cost`
    async fn try_deduct(&self, email: &str, cost: i32) -> Result<DeductOutcome>;

    async fn health_check(&self) -> Result<()>;
}
