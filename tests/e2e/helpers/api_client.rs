//! REST API 客户端
//!
//! 封装对中继服务和积分服务的 HTTP 调用。

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;

/// API 客户端
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 轮询 `/ready` 直到返回 200
    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Ok(resp) = self.client.get(self.url("/ready")).send().await
                && resp.status().is_success()
            {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("服务未就绪: {}", self.base_url);
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    // ========== 中继 API ==========

    /// 发布检测结果，返回状态码与响应体
    pub async fn publish(&self, payload: &Value) -> Result<(StatusCode, Value)> {
        let resp = self
            .client
            .post(self.url("/publish"))
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }

    /// 发布非 JSON 请求体
    pub async fn publish_raw(&self, body: &str, content_type: &str) -> Result<StatusCode> {
        let resp = self
            .client
            .post(self.url("/publish"))
            .header("content-type", content_type)
            .body(body.to_string())
            .send()
            .await?;
        Ok(resp.status())
    }

    pub async fn results(&self) -> Result<Vec<Value>> {
        Ok(self
            .client
            .get(self.url("/results"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    // ========== 积分 API ==========

    pub async fn deduct_credits(&self, email: &str) -> Result<(StatusCode, Value)> {
        let resp = self
            .client
            .post(self.url("/api/credits/deduct"))
            .json(&json!({ "email": email }))
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }

    pub async fn get_credits(&self, email: &str) -> Result<(StatusCode, Value)> {
        let resp = self
            .client
            .get(self.url(&format!("/api/credits/{email}")))
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }
}
