//! HTTP client for the provider REST API.

use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::gateway::classify::UpstreamError;
use crate::gateway::context::ProviderCredential;

const API_KEY_HEADER: &str = "x-goog-api-key";
const USER_AGENT: &str = concat!("wellspring-gateway/", env!("CARGO_PKG_VERSION"));

/// `{base}/models/{model}:{method}`
pub fn build_url(base_url: &str, model: &str, method: &str) -> String {
    format!("{}/models/{}:{}", base_url.trim_end_matches('/'), model, method)
}

/// Thin wrapper over `reqwest::Client` that knows the provider's URL layout.
///
/// Holds no credential; each call receives it from the gateway context.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> CoreResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(5)))
            .user_agent(USER_AGENT)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::HttpClient(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST models/{model}:generateContent`
    pub async fn generate_content<T: DeserializeOwned>(
        &self,
        model: &str,
        body: &Value,
        credential: &ProviderCredential,
    ) -> Result<T, UpstreamError> {
        self.post_json(&build_url(&self.base_url, model, "generateContent"), body, credential).await
    }

    /// `POST models/{model}:predictLongRunning`
    pub async fn predict_long_running<T: DeserializeOwned>(
        &self,
        model: &str,
        body: &Value,
        credential: &ProviderCredential,
    ) -> Result<T, UpstreamError> {
        self.post_json(&build_url(&self.base_url, model, "predictLongRunning"), body, credential)
            .await
    }

    /// `GET {operation}`
    pub async fn get_operation<T: DeserializeOwned>(
        &self,
        operation: &str,
        credential: &ProviderCredential,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, operation);
        debug!(%operation, "Checking provider operation");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, credential.expose())
            .send()
            .await?;
        decode(ensure_success(response).await?).await
    }

    /// `GET` a generated artifact. The response body is handed back unread for streaming.
    pub async fn download(
        &self,
        reference: &str,
        credential: &ProviderCredential,
    ) -> Result<Response, UpstreamError> {
        let response = self
            .http
            .get(reference)
            .header(API_KEY_HEADER, credential.expose())
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &Value,
        credential: &ProviderCredential,
    ) -> Result<T, UpstreamError> {
        debug!(%url, "Forwarding to provider");
        let response = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, credential.expose())
            .json(body)
            .send()
            .await?;
        decode(ensure_success(response).await?).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status { status: status.as_u16(), body })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode(e.to_string()))
}
