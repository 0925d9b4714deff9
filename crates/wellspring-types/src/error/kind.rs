//! Fixed failure taxonomy.

use serde::{Deserialize, Serialize};

/// The six failure buckets the gateway is allowed to surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Transport failure between caller, gateway, or provider
    Network,
    /// Provider capacity exhausted (429 / RESOURCE_EXHAUSTED)
    RateLimited,
    /// Malformed request or schema mismatch; indicates a builder defect
    InvalidRequest,
    /// Provider-side fault, try again later
    ProviderUnavailable,
    /// Structured output could not be parsed (recovered locally)
    MalformedResponse,
    /// Job poller ceiling exceeded
    Timeout,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::RateLimited => "RATE_LIMITED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::MalformedResponse => "MALFORMED_RESPONSE",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Check if a caller may retry after this failure.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::RateLimited | Self::ProviderUnavailable | Self::Timeout
        )
    }

    /// Get HTTP status code for this kind.
    pub const fn http_status_code(self) -> u16 {
        match self {
            Self::Network => 502,
            Self::RateLimited => 429,
            Self::InvalidRequest => 400,
            Self::ProviderUnavailable => 503,
            Self::MalformedResponse => 502,
            Self::Timeout => 504,
        }
    }

    /// Short, non-technical message suitable for showing to an end user.
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Network => "We couldn't reach the assistant. Check your connection and try again.",
            Self::RateLimited => "The assistant is busy right now. Please try again in a moment.",
            Self::InvalidRequest => "This request couldn't be processed.",
            Self::ProviderUnavailable => "The assistant is unavailable right now. Please try again later.",
            Self::MalformedResponse => "The answer came back in an unexpected format.",
            Self::Timeout => "This is taking longer than expected. Please try again later.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
