//! Feature tags and requested capabilities.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The application feature a request originates from.
///
/// Travels on the wire so the gateway can echo it back and tag its logs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Chat,
    DocumentAnalysis,
    SchemeExplainer,
    PlaceLookup,
    SymptomPatterns,
    SpeechSynthesis,
    ImageSynthesis,
    VideoSynthesis,
}

impl Feature {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::DocumentAnalysis => "document_analysis",
            Self::SchemeExplainer => "scheme_explainer",
            Self::PlaceLookup => "place_lookup",
            Self::SymptomPatterns => "symptom_patterns",
            Self::SpeechSynthesis => "speech_synthesis",
            Self::ImageSynthesis => "image_synthesis",
            Self::VideoSynthesis => "video_synthesis",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retrieval tool the provider may use to ground its answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroundingTool {
    Search,
    Maps,
}

/// What the caller wants back. Drives tier selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability {
    /// Free-form text
    Text,
    /// JSON constrained by the given schema
    Json { schema: Value },
    /// Text grounded by a retrieval tool
    Grounded(GroundingTool),
    /// Synthesized speech
    Audio,
    /// Synthesized image
    Image,
    /// Synthesized video (long-running job)
    Video,
}

impl Capability {
    /// Capabilities answered with text can make use of deeper reasoning.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Json { .. } | Self::Grounded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_tags_match_serde() {
        for feature in [Feature::Chat, Feature::SymptomPatterns, Feature::VideoSynthesis] {
            let json = serde_json::to_string(&feature).expect("serialize");
            assert_eq!(json, format!("\"{}\"", feature.as_str()));
        }
    }

    #[test]
    fn test_unknown_feature_is_rejected() {
        assert!(serde_json::from_str::<Feature>("\"crypto_trading\"").is_err());
    }
}
