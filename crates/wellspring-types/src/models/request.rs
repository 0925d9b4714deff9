//! Inference request model. Doubles as the `/inference` wire body.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feature::{Feature, GroundingTool};
use super::tier::{ModelTier, OutputModality};

/// Inline binary blob (base64 on the wire).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self { mime_type: mime_type.into(), data: general_purpose::STANDARD.encode(bytes) }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(self.data.as_bytes())
    }
}

/// One content part: text or an inline blob with a media type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn blob(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::InlineData { inline_data: InlineData::from_bytes(mime_type, bytes) }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::InlineData { .. } => None,
        }
    }
}

/// Speaker of a prior chat turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// A prior turn of a multi-turn conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Generation configuration attached to a request.
///
/// Every optional field is omitted from the wire when unset, so a builder that
/// strips an unsupported field produces a body the provider never sees it in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Tier the request targets; the gateway resolves it to a model id
    #[serde(default)]
    pub tier: ModelTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Reasoning-depth budget in tokens; `Some(0)` disables reasoning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_budget: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_modality: Option<OutputModality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding: Option<GroundingTool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ChatTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl GenerationConfig {
    /// True when the request asks for more than zero reasoning tokens.
    pub fn uses_elevated_reasoning(&self) -> bool {
        self.thinking_budget.is_some_and(|budget| budget > 0)
    }
}

/// A complete, ephemeral inference request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceRequest {
    pub feature: Feature,
    pub contents: Vec<ContentPart>,
    #[serde(default)]
    pub config: GenerationConfig,
}

impl InferenceRequest {
    pub fn tier(&self) -> ModelTier {
        self.config.tier
    }
}
