//! Gateway server configuration.
//!
//! The provider credential is deliberately NOT part of this struct: it is read once
//! from the environment at startup and lives only inside the gateway context.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::tier::ModelTier;

/// Provider model id behind each tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierModels {
    pub fast: String,
    pub standard: String,
    pub deep: String,
    pub image: String,
    pub video: String,
    pub audio: String,
}

impl Default for TierModels {
    fn default() -> Self {
        Self {
            fast: "gemini-2.5-flash-lite".to_string(),
            standard: "gemini-2.5-flash".to_string(),
            deep: "gemini-2.5-pro".to_string(),
            image: "gemini-2.5-flash-image".to_string(),
            video: "veo-3.0-fast-generate-001".to_string(),
            audio: "gemini-2.5-flash-preview-tts".to_string(),
        }
    }
}

impl TierModels {
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Standard => &self.standard,
            ModelTier::Deep => &self.deep,
            ModelTier::SynthesisImage => &self.image,
            ModelTier::SynthesisVideo => &self.video,
            ModelTier::SynthesisAudio => &self.audio,
        }
    }
}

/// Full gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct GatewayConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[validate(range(min = 1024_u16, max = 65535_u16))]
    #[serde(default = "default_port")]
    pub port: u16,
    /// Provider REST base, e.g. `https://generativelanguage.googleapis.com/v1beta`
    #[validate(url)]
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,
    /// Tier → model id table
    #[serde(default)]
    pub models: TierModels,
    /// Per-request upstream timeout in seconds
    #[validate(range(min = 5_u64, max = 3600_u64))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Maximum accepted request body
    #[validate(range(min = 1024_usize))]
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Prebuilt voice used for speech synthesis when the caller names none
    #[validate(length(min = 1_u64))]
    #[serde(default = "default_voice")]
    pub default_voice: String,
    /// Aspect ratio for video jobs when the caller names none
    #[serde(default = "default_video_aspect_ratio")]
    pub video_aspect_ratio: String,
    /// Browser origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8787
}

fn default_provider_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub const fn default_request_timeout() -> u64 {
    120
}

const fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_video_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string(), "http://127.0.0.1:5173".to_string()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            provider_base_url: default_provider_base_url(),
            models: TierModels::default(),
            request_timeout_secs: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            default_voice: default_voice(),
            video_aspect_ratio: default_video_aspect_ratio(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl GatewayConfig {
    /// Get the full bind socket address.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Provider base without a trailing slash.
    pub fn provider_base(&self) -> &str {
        self.provider_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GatewayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_privileged_port_rejected() {
        let config = GatewayConfig { port: 80, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"port": 9000, "models": {"fast": "a", "standard": "b", "deep": "c", "image": "d", "video": "e", "audio": "f"}}"#)
                .expect("deserialize");
        assert_eq!(config.port, 9000);
        assert_eq!(config.models.model_for(ModelTier::Deep), "c");
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_provider_base_trims_slash() {
        let config = GatewayConfig {
            provider_base_url: "http://localhost:9999/v1beta/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.provider_base(), "http://localhost:9999/v1beta");
    }

    #[test]
    fn test_every_tier_has_a_model() {
        let models = TierModels::default();
        for tier in ModelTier::ALL {
            assert!(!models.model_for(tier).is_empty());
        }
    }
}
