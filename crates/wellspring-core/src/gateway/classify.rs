//! Upstream failure classification.
//!
//! Pattern: log the raw provider body server-side, hand the caller only the taxonomy
//! bucket plus a short detail (HTTP status and provider status code).

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, warn};
use wellspring_types::{ErrorKind, GatewayError};

/// Longest slice of a raw provider body written to logs.
const LOG_BODY_LIMIT: usize = 512;

/// Failure talking to the provider, before classification.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connect, timeout, or body-read failure
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    /// Success status but the body did not have the expected shape
    #[error("unexpected provider body: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    status: Option<String>,
}

/// Map an upstream HTTP status (and body) onto the taxonomy.
pub fn classify_status(status: u16, body: &str) -> ErrorKind {
    if status == 429 || body.contains("RESOURCE_EXHAUSTED") {
        return ErrorKind::RateLimited;
    }
    match status {
        400 | 404 | 413 | 422 => ErrorKind::InvalidRequest,
        // 401/403, 5xx, and anything unexpected
        _ => ErrorKind::ProviderUnavailable,
    }
}

/// Provider status code (`INVALID_ARGUMENT`, `RESOURCE_EXHAUSTED`, ...) if the body
/// is a provider error document.
fn provider_status(body: &str) -> Option<String> {
    serde_json::from_str::<ProviderErrorBody>(body).ok().and_then(|b| b.error.status)
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(LOG_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

impl From<UpstreamError> for GatewayError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport(e) => {
                warn!(error = %e, timeout = e.is_timeout(), "Provider transport failure");
                let detail =
                    if e.is_timeout() { "provider request timed out" } else { "provider unreachable" };
                GatewayError::network(detail)
            },
            UpstreamError::Status { status, body } => {
                let kind = classify_status(status, &body);
                warn!(status, kind = %kind, body = %truncate(&body), "Provider returned an error");
                let detail = match provider_status(&body) {
                    Some(code) => format!("HTTP {} {}", status, code),
                    None => format!("HTTP {}", status),
                };
                GatewayError::new(kind).with_detail(detail)
            },
            UpstreamError::Decode(message) => {
                error!(%message, "Provider body could not be decoded");
                GatewayError::provider_unavailable("unexpected provider response")
            },
        }
    }
}
