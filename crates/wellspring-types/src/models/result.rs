//! Closed result union handed back to feature code.

use serde_json::Value;

use super::grounding::GroundingCitation;
use crate::error::{ErrorKind, GatewayError};

/// Outcome of one inference call. Exactly one variant, decided once.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResult {
    Text {
        text: String,
        citations: Vec<GroundingCitation>,
    },
    Json {
        value: Value,
        raw: String,
    },
    Audio {
        /// Raw little-endian PCM16 mono bytes
        pcm: Vec<u8>,
        sample_rate: u32,
    },
    Image {
        data: Vec<u8>,
        mime_type: String,
    },
    Error {
        kind: ErrorKind,
        message: String,
        retryable: bool,
    },
}

impl InferenceResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into(), citations: Vec::new() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<GatewayError> for InferenceResult {
    fn from(err: GatewayError) -> Self {
        Self::Error { kind: err.kind, retryable: err.kind.is_retryable(), message: err.message }
    }
}
