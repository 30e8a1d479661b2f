//! HTTP client for the replog backend.
//!
//! Stateless request plumbing: every call attaches a JSON content-type,
//! normalizes non-2xx responses into [`ApiError::Server`] carrying the raw
//! diagnostic body, and decodes success bodies as JSON. No retries here —
//! retry policy belongs to callers.

use async_trait::async_trait;
use replog_core::{
    FollowupResult, Hcp, HcpDraft, HcpReceipt, Interaction, InteractionDraft, InteractionReceipt,
    InteractionSummary, TrendSummary,
};
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::api::InteractionApi;

/// Environment variable selecting the backend base URL.
pub const BASE_URL_ENV: &str = "REPLOG_API_BASE";

/// Local development backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Connectivity failure: no response was obtained.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response; the body is diagnostic text, not parsed as JSON.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    /// A 2xx response whose body was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Response of `GET /v1/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub time: String,
}

/// HTTP client for the backend REST surface.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from `REPLOG_API_BASE`, falling back to the local
    /// development address.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub async fn health(&self) -> Result<Health, ApiError> {
        self.request(Method::GET, "/v1/health", None).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "backend request");

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl InteractionApi for ApiClient {
    async fn list_hcps(&self) -> Result<Vec<Hcp>, ApiError> {
        self.request(Method::GET, "/v1/hcps", None).await
    }

    async fn create_hcp(&self, draft: &HcpDraft) -> Result<HcpReceipt, ApiError> {
        self.request(Method::POST, "/v1/hcps", Some(serde_json::to_value(draft)?))
            .await
    }

    async fn create_interaction(
        &self,
        draft: &InteractionDraft,
    ) -> Result<InteractionReceipt, ApiError> {
        self.request(
            Method::POST,
            "/v1/interactions",
            Some(serde_json::to_value(draft)?),
        )
        .await
    }

    async fn get_interaction(&self, id: i64) -> Result<Interaction, ApiError> {
        self.request(Method::GET, &format!("/v1/interactions/{id}"), None)
            .await
    }

    async fn list_interactions(
        &self,
        hcp_id: Option<i64>,
    ) -> Result<Vec<InteractionSummary>, ApiError> {
        let path = match hcp_id {
            Some(id) => format!("/v1/interactions?hcp_id={id}"),
            None => "/v1/interactions".to_string(),
        };
        self.request(Method::GET, &path, None).await
    }

    async fn edit_interaction(
        &self,
        id: i64,
        updates: &serde_json::Value,
    ) -> Result<InteractionReceipt, ApiError> {
        self.request(
            Method::PUT,
            &format!("/v1/interactions/{id}"),
            Some(json!({ "updates": updates })),
        )
        .await
    }

    async fn process_now(&self, id: i64) -> Result<InteractionReceipt, ApiError> {
        self.request(Method::POST, &format!("/v1/interactions/{id}/process"), None)
            .await
    }

    async fn generate_followups(&self, id: i64) -> Result<FollowupResult, ApiError> {
        self.request(
            Method::POST,
            &format!("/v1/interactions/{id}/generate_followups"),
            None,
        )
        .await
    }

    async fn trend_summary(&self, hcp_id: i64) -> Result<TrendSummary, ApiError> {
        self.request(Method::POST, &format!("/v1/hcps/{hcp_id}/trend_summary"), None)
            .await
    }
}
