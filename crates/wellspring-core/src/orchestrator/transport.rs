//! Transport seams. The HTTP implementations live in `wellspring-client`; tests use
//! scripted in-memory transports.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use wellspring_types::protocol::{JobCheck, StartJobPayload};
use wellspring_types::{GatewayError, InferenceRequest, InferenceResult, JobHandle};

/// Sends one inference request to the gateway.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Returns the decoded success variant, or the gateway's classified failure.
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResult, GatewayError>;
}

/// Start, check, and fetch long-running synthesis jobs.
#[async_trait]
pub trait JobTransport: Send + Sync {
    async fn submit(&self, payload: &StartJobPayload) -> Result<JobHandle, GatewayError>;

    async fn check(&self, handle: &JobHandle) -> Result<JobCheck, GatewayError>;

    /// Fetch the finished artifact; the gateway reattaches the credential.
    async fn fetch(&self, reference: &str) -> Result<Bytes, GatewayError>;
}

#[async_trait]
impl<T: InferenceTransport + ?Sized> InferenceTransport for Arc<T> {
    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResult, GatewayError> {
        (**self).infer(request).await
    }
}
