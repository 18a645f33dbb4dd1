//! 数据库工具
//!
//! 准备积分测试用户并读取余额。

use anyhow::Result;
use sqlx::PgPool;

pub struct DbVerifier {
    pool: PgPool,
}

impl DbVerifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 插入或重置用户余额
    pub async fn seed_user(&self, email: &str, credits: i32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (email, credits)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET credits = EXCLUDED.credits, updated_at = NOW()
            "#,
        )
        .bind(email)
        .bind(credits)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn credits_of(&self, email: &str) -> Result<Option<i32>> {
        let credits = sqlx::query_scalar::<_, i32>("SELECT credits FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(credits)
    }

    pub async fn delete_user(&self, email: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
