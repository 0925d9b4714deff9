//! Explicit gateway context shared by every handler.

use regex::Regex;
use std::fmt;
use std::sync::Arc;
use url::Url;
use wellspring_types::{ConfigError, GatewayConfig, ModelTier};

use super::upstream::UpstreamClient;
use crate::error::{CoreError, CoreResult};

/// Environment variable holding the provider API key.
pub const CREDENTIAL_ENV: &str = "WELLSPRING_PROVIDER_KEY";

/// Provider operation names accepted by `check`, e.g.
/// `models/veo-3.0-fast-generate-001/operations/abc123`.
const OPERATION_PATTERN: &str = r"^(models/[A-Za-z0-9._-]+/)?operations/[A-Za-z0-9_-]+$";

/// The provider API key. Never printed.
#[derive(Clone)]
pub struct ProviderCredential(Arc<str>);

impl ProviderCredential {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingCredential { var: CREDENTIAL_ENV.to_string() });
        }
        Ok(Self(Arc::from(key)))
    }

    /// Read the credential from [`CREDENTIAL_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let key = std::env::var(CREDENTIAL_ENV)
            .map_err(|_| ConfigError::MissingCredential { var: CREDENTIAL_ENV.to_string() })?;
        Self::new(key)
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProviderCredential(***)")
    }
}

impl fmt::Display for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Everything a handler needs: credential, configuration, upstream client.
#[derive(Debug)]
pub struct GatewayContext {
    credential: ProviderCredential,
    config: GatewayConfig,
    upstream: UpstreamClient,
    provider_host: String,
    operation_pattern: Regex,
}

impl GatewayContext {
    pub fn new(config: GatewayConfig, credential: ProviderCredential) -> CoreResult<Arc<Self>> {
        let provider_host = Url::parse(config.provider_base())
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| {
                CoreError::HttpClient(format!(
                    "provider base URL has no host: {}",
                    config.provider_base_url
                ))
            })?;
        let operation_pattern = Regex::new(OPERATION_PATTERN)
            .map_err(|e| CoreError::HttpClient(format!("operation pattern: {}", e)))?;
        let upstream = UpstreamClient::new(config.provider_base(), config.request_timeout_secs)?;

        Ok(Arc::new(Self { credential, config, upstream, provider_host, operation_pattern }))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) fn credential(&self) -> &ProviderCredential {
        &self.credential
    }

    pub(crate) fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        self.config.models.model_for(tier)
    }

    /// True when `name` looks like a provider operation handle.
    pub fn is_valid_operation(&self, name: &str) -> bool {
        self.operation_pattern.is_match(name)
    }

    /// True when `reference` points at the configured provider host.
    pub fn is_provider_reference(&self, reference: &Url) -> bool {
        matches!(reference.scheme(), "https" | "http")
            && reference.host_str() == Some(self.provider_host.as_str())
    }
}
