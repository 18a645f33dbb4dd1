//! PostgreSQL 连接池
//!
//! 积分余额是唯一落库的数据；迁移脚本位于 workspace 根目录 `migrations/`，
//! 编译期嵌入二进制。

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use crate::config::DatabaseConfig;
use crate::error::Result;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip_all, fields(url = %redact_url(&config.url)))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "数据库连接池已创建"
        );
        Ok(Self { pool })
    }

    /// 连接并按需执行迁移
    pub async fn connect_and_prepare(config: &DatabaseConfig, migrate: bool) -> Result<Self> {
        let db = Self::connect(config).await?;
        if migrate {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        info!("数据库迁移已完成");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("数据库连接池已关闭");
    }
}

/// `SELECT 1` 探活，返回往返耗时
pub async fn ping(pool: &PgPool) -> Result<Duration> {
    let started = Instant::now();
    sqlx::query("SELECT 1").execute(pool).await?;
    let elapsed = started.elapsed();
    debug!(elapsed_ms = elapsed.as_millis() as u64, "数据库探活成功");
    Ok(elapsed)
}

/// 隐去连接串中的密码，用于日志
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}
