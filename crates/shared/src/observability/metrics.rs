//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    server_handle: tokio::task::JoinHandle<()>,
}

impl Drop for MetricsHandle {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

/// 初始化 Prometheus 指标导出
///
/// 在 `metrics_port` 上启动独立 HTTP 服务器，暴露 `/metrics`。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle { server_handle })
}

fn describe_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "credit_deductions_total",
        "Credit deduction attempts by outcome"
    );

    metrics::describe_counter!(
        "relay_messages_published_total",
        "Messages published to the relay topic by status"
    );
    metrics::describe_counter!(
        "relay_messages_consumed_total",
        "Messages consumed into the result buffer"
    );
    metrics::describe_counter!(
        "relay_messages_dropped_total",
        "Consumed messages dropped because the payload was not valid JSON"
    );
    metrics::describe_counter!(
        "relay_results_evicted_total",
        "Buffered results evicted to stay within capacity"
    );
    metrics::describe_gauge!("relay_results_buffered", "Results currently buffered");

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    }))
}

// ============================================================================
// 指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录积分扣减结果（deducted / insufficient / not_found / error）
#[inline]
pub fn record_credit_deduction(outcome: &str) {
    metrics::counter!("credit_deductions_total", "outcome" => outcome.to_string()).increment(1);
}

/// 记录中继发布结果（success / error）
#[inline]
pub fn record_relay_publish(status: &str) {
    metrics::counter!("relay_messages_published_total", "status" => status.to_string())
        .increment(1);
}

/// 记录一条被成功写入缓冲区的消息
#[inline]
pub fn record_relay_consumed(buffered: usize, evicted: bool) {
    metrics::counter!("relay_messages_consumed_total").increment(1);
    if evicted {
        metrics::counter!("relay_results_evicted_total").increment(1);
    }
    metrics::gauge!("relay_results_buffered").set(buffered as f64);
}

/// 记录一条因解析失败被丢弃的消息
#[inline]
pub fn record_relay_dropped() {
    metrics::counter!("relay_messages_dropped_total").increment(1);
}
