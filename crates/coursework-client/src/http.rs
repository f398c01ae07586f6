//! reqwest-backed implementation of [`ApiClient`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use coursework_core::error::ApiError;
use coursework_core::traits::{ApiClient, TokenStore};

/// HTTP client for the coursework backend.
///
/// The bearer token is read from the token store on every request, so a
/// login or logout elsewhere takes effect immediately.
pub struct HttpApiClient {
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    timeout_secs: Option<u64>,
    client: reqwest::Client,
}

impl HttpApiClient {
    /// Build a client. `timeout_secs = None` leaves requests unbounded.
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenStore>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.tokens.read() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_secs.unwrap_or_default())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status < 400 {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status, %body, "error response");
        Err(match status {
            401 | 403 => ApiError::Unauthorized(body),
            404 => ApiError::NotFound(body),
            _ => ApiError::Status {
                status,
                message: body,
            },
        })
    }
}

async fn json_body(response: reqwest::Response) -> Result<Value, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("invalid JSON body: {e}")))
}

#[async_trait]
impl ApiClient for HttpApiClient {
    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        json_body(response).await
    }

    #[instrument(skip(self, body))]
    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .send(self.client.post(self.url(path)).json(body))
            .await?;
        json_body(response).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }
}
