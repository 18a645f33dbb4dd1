//! 检测结果中继服务入口

use std::sync::Arc;

use kafka_relay::{
    Lifecycle, ResultStore, routes,
    runtime::{RelayRuntime, finish_after_serve},
    state::AppState,
};
use recflux_shared::{config::AppConfig, observability, shutdown::shutdown_signal};
use tokio::net::TcpListener;
use tracing::info;

const SERVICE_NAME: &str = "kafka-relay-service";

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
        brokers = %config.kafka.brokers,
        topic = %config.relay.topic,
        capacity = config.relay.results_capacity,
        "Starting kafka-relay-service on {}",
        config.server_addr()
    );

    let store = Arc::new(ResultStore::new(config.relay.results_capacity)?);
    let lifecycle = Arc::new(Lifecycle::new());

    let (runtime, publisher) =
        RelayRuntime::connect(&config, store.clone(), lifecycle.clone()).await?;

    let state = AppState::new(store, Arc::new(publisher), lifecycle);
    let app = routes::build_router(state, &config.server.cors_origins);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到信号后先让消费循环退出，HTTP 层同时排空在途请求
    let stopper = runtime.stopper();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            stopper.stop();
        })
        .await;

    finish_after_serve(served, runtime.finish()).await?;

    info!("Server shutdown complete");
    Ok(())
}
