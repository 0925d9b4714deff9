//! Error types for the core crate.

use thiserror::Error;
use wellspring_types::{ErrorKind, GatewayError};

use crate::codec::CodecError;

/// Failures raised by core components outside the gateway envelope.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// Image or audio payload could not be processed.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Classified gateway failure.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl CoreError {
    /// Taxonomy bucket for surfacing this failure to a caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Codec(_) => ErrorKind::InvalidRequest,
            Self::Gateway(err) => err.kind,
            Self::HttpClient(_) => ErrorKind::Network,
        }
    }
}

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
