//! `/inference` success envelope.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::models::{Feature, GroundingCitation, InferenceResult};

/// Normalized provider output, decided once at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GatewayOutput {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Audio {
        /// Base64 PCM16 little-endian mono
        data: String,
        mime_type: String,
        sample_rate: u32,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        /// Base64 image bytes
        data: String,
        mime_type: String,
    },
}

/// `200` body of `POST /inference`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InferenceSuccess {
    pub feature: Feature,
    pub output: GatewayOutput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<Vec<GroundingCitation>>,
}

impl InferenceSuccess {
    /// Convert into the caller-side result union.
    ///
    /// Binary payloads are base64-decoded here; a payload that fails to decode is a
    /// gateway defect and is reported as `Err` with the decode message.
    pub fn into_result(self) -> Result<InferenceResult, String> {
        let citations = self.grounding_metadata.unwrap_or_default();
        match self.output {
            GatewayOutput::Text { text } => Ok(InferenceResult::Text { text, citations }),
            GatewayOutput::Audio { data, sample_rate, .. } => {
                let pcm = general_purpose::STANDARD.decode(data).map_err(|e| e.to_string())?;
                Ok(InferenceResult::Audio { pcm, sample_rate })
            },
            GatewayOutput::Image { data, mime_type } => {
                let data = general_purpose::STANDARD.decode(data).map_err(|e| e.to_string())?;
                Ok(InferenceResult::Image { data, mime_type })
            },
        }
    }
}
