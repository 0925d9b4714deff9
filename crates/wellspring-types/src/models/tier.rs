//! Model tiers: single point of truth for what each tier can do.

use serde::{Deserialize, Serialize};

/// Output modality a tier can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputModality {
    Text,
    Image,
    Audio,
    Video,
}

impl OutputModality {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
            Self::Audio => "AUDIO",
            Self::Video => "VIDEO",
        }
    }
}

/// Static capability flags of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCapabilities {
    /// Accepts a response schema (structured JSON output)
    pub schema: bool,
    /// Accepts a reasoning-depth (thinking) budget
    pub reasoning_budget: bool,
    /// Accepts a search / maps grounding tool
    pub grounding: bool,
    /// The modality this tier emits
    pub modality: OutputModality,
}

/// A named quality/latency/capability class among the provider's models.
///
/// The concrete model id behind each tier is gateway configuration
/// (see [`TierModels`](super::TierModels)); callers only ever name tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelTier {
    #[default]
    Fast,
    Standard,
    Deep,
    SynthesisImage,
    SynthesisVideo,
    SynthesisAudio,
}

impl ModelTier {
    pub const ALL: [ModelTier; 6] = [
        Self::Fast,
        Self::Standard,
        Self::Deep,
        Self::SynthesisImage,
        Self::SynthesisVideo,
        Self::SynthesisAudio,
    ];

    pub const fn capabilities(self) -> TierCapabilities {
        const fn text(reasoning_budget: bool) -> TierCapabilities {
            TierCapabilities {
                schema: true,
                reasoning_budget,
                grounding: true,
                modality: OutputModality::Text,
            }
        }
        const fn synthesis(modality: OutputModality) -> TierCapabilities {
            TierCapabilities { schema: false, reasoning_budget: false, grounding: false, modality }
        }

        match self {
            Self::Fast => text(false),
            Self::Standard | Self::Deep => text(true),
            Self::SynthesisImage => synthesis(OutputModality::Image),
            Self::SynthesisVideo => synthesis(OutputModality::Video),
            Self::SynthesisAudio => synthesis(OutputModality::Audio),
        }
    }

    /// Next lower tier for capacity fallback. Synthesis tiers have none.
    ///
    /// Strictly decreasing in [`rank`](Self::rank): fallback never upgrades.
    pub const fn downgrade(self) -> Option<Self> {
        match self {
            Self::Deep => Some(Self::Standard),
            Self::Standard => Some(Self::Fast),
            _ => None,
        }
    }

    /// Position on the text quality ladder (FAST = 0). Synthesis tiers sit off the ladder.
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Fast => Some(0),
            Self::Standard => Some(1),
            Self::Deep => Some(2),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "FAST",
            Self::Standard => "STANDARD",
            Self::Deep => "DEEP",
            Self::SynthesisImage => "SYNTHESIS_IMAGE",
            Self::SynthesisVideo => "SYNTHESIS_VIDEO",
            Self::SynthesisAudio => "SYNTHESIS_AUDIO",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downgrade_never_upgrades() {
        for tier in ModelTier::ALL {
            if let Some(lower) = tier.downgrade() {
                assert!(lower.rank() < tier.rank(), "{} -> {} is not a downgrade", tier, lower);
            }
        }
    }

    #[test]
    fn test_downgrade_chain_terminates_at_fast() {
        let mut tier = ModelTier::Deep;
        let mut steps = 0;
        while let Some(next) = tier.downgrade() {
            tier = next;
            steps += 1;
        }
        assert_eq!(tier, ModelTier::Fast);
        assert_eq!(steps, 2);
    }

    #[test]
    fn test_only_reasoning_tiers_accept_budget() {
        assert!(!ModelTier::Fast.capabilities().reasoning_budget);
        assert!(ModelTier::Standard.capabilities().reasoning_budget);
        assert!(ModelTier::Deep.capabilities().reasoning_budget);
        assert!(!ModelTier::SynthesisAudio.capabilities().reasoning_budget);
    }

    #[test]
    fn test_synthesis_tiers_emit_their_modality() {
        assert_eq!(ModelTier::SynthesisImage.capabilities().modality, OutputModality::Image);
        assert_eq!(ModelTier::SynthesisVideo.capabilities().modality, OutputModality::Video);
        assert_eq!(ModelTier::SynthesisAudio.capabilities().modality, OutputModality::Audio);
        assert!(ModelTier::SynthesisVideo.downgrade().is_none());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ModelTier::SynthesisAudio).expect("serialize");
        assert_eq!(json, "\"SYNTHESIS_AUDIO\"");
        let tier: ModelTier = serde_json::from_str("\"DEEP\"").expect("deserialize");
        assert_eq!(tier, ModelTier::Deep);
    }
}
