//! 积分计费服务入口
//!
//! 提供积分扣减与余额查询 REST API。

use std::sync::Arc;

use anyhow::Context;
use credit_service::{
    CreditRepository, CreditService, MemoryCreditRepository, PgCreditRepository, routes,
    state::AppState,
};
use recflux_shared::{
    config::{AppConfig, CreditBackend},
    database::Database,
    observability,
    shutdown::shutdown_signal,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

const SERVICE_NAME: &str = "credit-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        AppConfig::fallback(SERVICE_NAME)
    });

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        backend = ?config.credits.backend,
        cost = config.credits.cost,
        "Starting credit-service on {}",
        config.server_addr()
    );

    let (repo, database): (Arc<dyn CreditRepository>, Option<Database>) =
        match config.credits.backend {
            CreditBackend::Postgres => {
                let db =
                    Database::connect_and_prepare(&config.database, config.credits.run_migrations)
                        .await?;
                (
                    Arc::new(PgCreditRepository::new(db.pool().clone())),
                    Some(db),
                )
            }
            CreditBackend::Memory => {
                if config.is_production() {
                    anyhow::bail!("内存积分存储不能用于生产环境");
                }
                warn!("Using in-memory credit store; balances are lost on restart");
                if config.credits.seed_users.is_empty() {
                    warn!("credits.seed_users 为空，所有请求都会返回用户不存在");
                }
                (
                    Arc::new(MemoryCreditRepository::from_seed(&config.credits.seed_users)),
                    None,
                )
            }
        };

    let credit_service =
        Arc::new(CreditService::new(repo, config.credits.cost).context("积分服务配置无效")?);
    let app = routes::build_router(AppState::new(credit_service), &config.server.cors_origins);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}
