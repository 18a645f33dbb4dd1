//! 内存积分仓储
//!
//! 基于 DashMap 的进程内实现，用于本地开发和测试。
//! 扣减在持有分片写锁时完成，与 PostgreSQL 的条件 UPDATE 语义一致。

use async_trait::async_trait;
use dashmap::DashMap;
use recflux_shared::config::SeedUser;
use tracing::{info, warn};

use super::traits::CreditRepository;
use crate::error::Result;
use crate::models::DeductOutcome;

#[derive(Debug, Default)]
pub struct MemoryCreditRepository {
    balances: DashMap<String, i32>,
}

impl MemoryCreditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始余额创建
    pub fn with_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let repo = Self::new();
        for (email, credits) in users {
            repo.set_credits(email, credits);
        }
        repo
    }

    /// 按配置的初始用户创建，跳过负余额
    pub fn from_seed(users: &[SeedUser]) -> Self {
        let repo = Self::new();
        for user in users {
            if user.credits < 0 {
                warn!(email = %user.email, credits = user.credits, "初始余额为负，已跳过");
                continue;
            }
            repo.set_credits(user.email.trim(), user.credits);
        }
        info!(users = repo.balances.len(), "内存积分存储已载入初始用户");
        repo
    }

    /// 插入或覆盖用户余额
    pub fn set_credits(&self, email: impl Into<String>, credits: i32) {
        self.balances.insert(email.into(), credits);
    }
}

#[async_trait]
impl CreditRepository for MemoryCreditRepository {
    async fn get_credits(&self, email: &str) -> Result<Option<i32>> {
        Ok(self.balances.get(email).map(|v| *v))
    }

    async fn try_deduct(&self, email: &str, cost: i32) -> Result<DeductOutcome> {
        let Some(mut balance) = self.balances.get_mut(email) else {
            return Ok(DeductOutcome::UserNotFound);
        };

        if *balance < cost {
            return Ok(DeductOutcome::Insufficient { current: *balance });
        }

        *balance -= cost;
        Ok(DeductOutcome::Deducted {
            remaining: *balance,
        })
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
