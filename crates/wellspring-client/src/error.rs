//! Error types for the Wellspring client.

use thiserror::Error;
use wellspring_core::codec::CodecError;
use wellspring_types::{ConfigError, ErrorKind, GatewayError};

/// Errors that can occur when using the Wellspring client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to reach the gateway at all.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// HTTP request failed.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with its failure envelope.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Gateway returned a body of the wrong shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Returned media could not be decoded.
    #[error("Media decode failed: {0}")]
    Codec(#[from] CodecError),

    /// Client configuration is out of range.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A video job was cancelled by its owner before it finished.
    #[error("Job cancelled")]
    Cancelled,
}

const CANCELLED_MESSAGE: &str = "The request was cancelled.";

impl ClientError {
    /// Taxonomy bucket for this failure. `None` for a cancellation, which is not a
    /// failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Connection(_) | Self::Request(_) => Some(ErrorKind::Network),
            Self::Gateway(err) => Some(err.kind),
            Self::InvalidResponse(_) => Some(ErrorKind::ProviderUnavailable),
            Self::Codec(_) => Some(ErrorKind::MalformedResponse),
            Self::Config(_) => Some(ErrorKind::InvalidRequest),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Short, non-technical message for the end user.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Gateway(err) => &err.message,
            other => other.kind().map_or(CANCELLED_MESSAGE, ErrorKind::user_message),
        }
    }
}

impl From<ClientError> for GatewayError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Gateway(err) => err,
            ClientError::Request(e) if e.is_timeout() => {
                GatewayError::network("gateway request timed out")
            },
            ClientError::Cancelled => {
                GatewayError::invalid_request("job cancelled by its owner")
            },
            other => GatewayError::new(other.kind().unwrap_or(ErrorKind::InvalidRequest))
                .with_detail(other.to_string()),
        }
    }
}
