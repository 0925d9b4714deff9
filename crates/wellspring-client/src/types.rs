use bytes::Bytes;
use wellspring_types::{CodecConfig, GroundingCitation, PollerConfig};

/// Env var consulted by [`ClientConfig::from_env`].
pub const GATEWAY_URL_ENV: &str = "WELLSPRING_GATEWAY_URL";

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8787";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub poller: PollerConfig,
    pub codec: CodecConfig,
    /// Reasoning budget attached to elevated (DEEP) requests
    pub deep_budget: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: 120,
            poller: PollerConfig::default(),
            codec: CodecConfig::default(),
            deep_budget: wellspring_core::orchestrator::DEFAULT_DEEP_BUDGET,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Defaults, with the gateway URL taken from [`GATEWAY_URL_ENV`] when set.
    pub fn from_env() -> Self {
        match std::env::var(GATEWAY_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url.trim()),
            _ => Self::default(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// Text answer with the sources it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedAnswer {
    pub text: String,
    pub citations: Vec<GroundingCitation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// A finished video and the reference it was downloaded from.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub reference: String,
    pub data: Bytes,
}
