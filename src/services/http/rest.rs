use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

use super::{Backend, Method, RequestSpec, TransportError};
use crate::config::AppConfig;
use crate::services::session::SessionContext;

/// `Backend` over the real REST API using reqwest.
pub struct RestBackend {
    base_url: String,
    slow_request: Duration,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()?;
        Ok(Self {
            base_url: config.api_base_url.clone(),
            slow_request: config.slow_request,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn send(
        &self,
        session: &dyn SessionContext,
        request: &RequestSpec,
    ) -> Result<Value, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, self.url(&request.path))
            .header("Accept", "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = session.token() {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let resp = builder.send().await.map_err(|e| {
            tracing::warn!(endpoint = %request, error = %e, "request failed");
            TransportError::Network(e.to_string())
        })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("failed to read body: {e}")))?;

        let elapsed = started.elapsed();
        if elapsed > self.slow_request {
            tracing::warn!(endpoint = %request, status = status.as_u16(), ms = elapsed.as_millis() as u64, "slow request");
        } else {
            tracing::debug!(endpoint = %request, status = status.as_u16(), ms = elapsed.as_millis() as u64, "request");
        }

        // Some endpoints answer plain text; keep it as a JSON string.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
