//! Upstream Client Module
//!
//! Thin HTTP client for the blockchain query API the cache fronts. Bodies
//! are relayed as raw JSON values; non-success upstream statuses are carried
//! back to the caller together with the upstream body so the proxy surface
//! mirrors the upstream one.

use axum::http::StatusCode;
use serde_json::Value;
use tracing::error;

use crate::error::ApiError;

// == Upstream Client ==
/// Client for the upstream blockchain API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // == GET ==
    /// Fetches `path` with the given query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(|err| {
                error!(path, error = %err, "upstream request failed");
                ApiError::Upstream(format!("failed to reach upstream: {}", err))
            })?;

        Self::relay(path, response).await
    }

    // == POST ==
    /// Posts a JSON body to `path`.
    pub async fn post<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|err| {
                error!(path, error = %err, "upstream request failed");
                ApiError::Upstream(format!("failed to reach upstream: {}", err))
            })?;

        Self::relay(path, response).await
    }

    /// Reads the upstream body and maps non-success statuses to errors that
    /// carry the status and body through to the client.
    async fn relay(path: &str, response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body: Value = response.json().await.map_err(|err| {
            error!(path, error = %err, "upstream returned an unreadable body");
            ApiError::Upstream(format!("unreadable upstream response: {}", err))
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::UpstreamStatus(
                StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            ))
        }
    }
}
