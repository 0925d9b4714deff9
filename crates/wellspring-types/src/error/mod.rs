//! Typed error definitions for Wellspring.
//!
//! The gateway surfaces failures through a small, fixed taxonomy ([`ErrorKind`]).
//! Every failure carries a short, non-technical `message` meant for end users and an
//! optional `detail` meant for diagnostics. Raw provider text only ever lands in `detail`.

mod config;
mod kind;

pub use config::ConfigError;
pub use kind::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure envelope returned by the gateway and propagated by callers.
///
/// Serializes as `{"error": KIND, "message": "...", "detail": "..."}`.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    /// Taxonomy bucket
    #[serde(rename = "error")]
    pub kind: ErrorKind,
    /// User-facing, non-technical message
    pub message: String,
    /// Optional diagnostic text (never shown as the primary signal)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl GatewayError {
    /// Create an error with the kind's default user message.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, message: kind.user_message().to_string(), detail: None }
    }

    /// Attach diagnostic detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Override the user-facing message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network).with_detail(detail)
    }

    pub fn rate_limited(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited).with_detail(detail)
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest).with_detail(detail)
    }

    pub fn provider_unavailable(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderUnavailable).with_detail(detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout).with_detail(detail)
    }

    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// HTTP status code for this error at the gateway boundary.
    pub fn http_status_code(&self) -> u16 {
        self.kind.http_status_code()
    }
}
