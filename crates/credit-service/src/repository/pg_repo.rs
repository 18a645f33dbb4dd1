//! PostgreSQL 积分仓储

use async_trait::async_trait;
use recflux_shared::database;
use sqlx::PgPool;
use tracing::debug;

use super::traits::CreditRepository;
use crate::error::Result;
use crate::models::DeductOutcome;

pub struct PgCreditRepository {
    pool: PgPool,
}

impl PgCreditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreditRepository for PgCreditRepository {
    async fn get_credits(&self, email: &str) -> Result<Option<i32>> {
        let credits = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT credits
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credits)
    }

    async fn try_deduct(&self, email: &str, cost: i32) -> Result<DeductOutcome> {
        // 条件写在 WHERE 中，由数据库保证并发下余额不会变为负数
        let remaining = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE users
            SET credits = credits - $2,
                updated_at = NOW()
            WHERE email = $1 AND credits >= $2
            RETURNING credits
            "#,
        )
        .bind(email)
        .bind(cost)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(remaining) = remaining {
            debug!(email, cost, remaining, "积分已扣减");
            return Ok(DeductOutcome::Deducted { remaining });
        }

        // 未命中更新：区分余额不足与用户不存在，这次读取只用于回报
        Ok(match self.get_credits(email).await? {
            Some(current) => DeductOutcome::Insufficient { current },
            None => DeductOutcome::UserNotFound,
        })
    }

    async fn health_check(&self) -> Result<()> {
        database::ping(&self.pool).await?;
        Ok(())
    }
}
