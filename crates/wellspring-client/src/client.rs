use crate::error::ClientError;
use crate::types::ClientConfig;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use wellspring_core::{InferenceTransport, JobTransport};
use wellspring_types::protocol::{
    CheckJobPayload, DownloadPayload, InferenceSuccess, JobCheck, JobStarted, MediaJobRequest,
    StartJobPayload,
};
use wellspring_types::{ErrorKind, GatewayError, InferenceRequest, InferenceResult, JobHandle};

/// HTTP client for the gateway's `/inference` and `/media-job` routes.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    config: ClientConfig,
}

impl GatewayClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self { client, config })
    }

    /// Call `GET /health`.
    pub async fn health(&self) -> Result<(), ClientError> {
        let resp = self
            .client
            .get(self.config.endpoint("/health"))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::Connection(format!("Health check failed: {}", resp.status())))
        }
    }

    /// `POST /inference`, returning the raw success envelope.
    pub async fn inference(&self, request: &InferenceRequest) -> Result<InferenceSuccess, ClientError> {
        let resp = self.client.post(self.config.endpoint("/inference")).json(request).send().await?;
        decode(ensure_success(resp).await?).await
    }

    pub async fn start_job(&self, payload: &StartJobPayload) -> Result<JobStarted, ClientError> {
        self.media_job(&MediaJobRequest::Start(payload.clone())).await
    }

    pub async fn check_job(&self, operation: &str) -> Result<JobCheck, ClientError> {
        self.media_job(&MediaJobRequest::Check(CheckJobPayload { operation: operation.to_string() }))
            .await
    }

    /// Download a finished artifact through the gateway.
    pub async fn download(&self, reference: &str) -> Result<Bytes, ClientError> {
        let body = MediaJobRequest::Download(DownloadPayload { reference: reference.to_string() });
        let resp = self.client.post(self.config.endpoint("/media-job")).json(&body).send().await?;
        Ok(ensure_success(resp).await?.bytes().await?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn media_job<T: DeserializeOwned>(&self, body: &MediaJobRequest) -> Result<T, ClientError> {
        let resp = self.client.post(self.config.endpoint("/media-job")).json(body).send().await?;
        decode(ensure_success(resp).await?).await
    }
}

#[async_trait]
impl InferenceTransport for GatewayClient {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResult, GatewayError> {
        let success = self.inference(request).await?;
        success.into_result().map_err(|e| {
            GatewayError::provider_unavailable(format!("undecodable media payload: {}", e))
        })
    }
}

#[async_trait]
impl JobTransport for GatewayClient {
    async fn submit(&self, payload: &StartJobPayload) -> Result<JobHandle, GatewayError> {
        let started = self.start_job(payload).await?;
        Ok(JobHandle::new(started.operation))
    }

    async fn check(&self, handle: &JobHandle) -> Result<JobCheck, GatewayError> {
        Ok(self.check_job(handle.as_str()).await?)
    }

    async fn fetch(&self, reference: &str) -> Result<Bytes, GatewayError> {
        Ok(self.download(reference).await?)
    }
}

/// Turn a non-success response into the gateway's error envelope.
async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<GatewayError>(&body) {
        Ok(envelope) => Err(ClientError::Gateway(envelope)),
        Err(_) => {
            tracing::debug!(status = status.as_u16(), "Gateway error without envelope");
            Err(ClientError::Gateway(
                GatewayError::new(kind_for_status(status)).with_detail(format!("HTTP {}", status)),
            ))
        },
    }
}

/// Classify a bare status (proxies in front of the gateway may answer without an envelope).
fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        429 => ErrorKind::RateLimited,
        504 => ErrorKind::Timeout,
        502 => ErrorKind::Network,
        400..=499 => ErrorKind::InvalidRequest,
        _ => ErrorKind::ProviderUnavailable,
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
