//! Request builder and model-tier selector.
//!
//! Pure: no I/O, no clock, no globals. The builder never emits a field the chosen
//! tier's capability flags deny; it drops the field instead.

use wellspring_types::models::{ChatTurn, OutputModality};
use wellspring_types::{
    Capability, ContentPart, Feature, GatewayError, GenerationConfig, InferenceRequest, ModelTier,
};

/// Reasoning budget (tokens) attached when elevated reasoning selects the DEEP tier.
pub const DEFAULT_DEEP_BUDGET: u32 = 32_768;

const JSON_MIME: &str = "application/json";

/// Per-call knobs a feature may set on top of its capability.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Ask for the DEEP tier with a reasoning budget (textual capabilities only)
    pub elevated_reasoning: bool,
    pub system_instruction: Option<String>,
    /// Prior turns for multi-turn chat
    pub history: Vec<ChatTurn>,
    /// Voice name for speech synthesis
    pub voice: Option<String>,
}

impl RequestOptions {
    pub fn elevated() -> Self {
        Self { elevated_reasoning: true, ..Default::default() }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Builds complete [`InferenceRequest`]s and picks their initial tier.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder {
    deep_budget: u32,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self { deep_budget: DEFAULT_DEEP_BUDGET }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deep_budget(mut self, budget: u32) -> Self {
        self.deep_budget = budget;
        self
    }

    /// Fastest tier able to serve `capability`; DEEP when elevated reasoning is asked
    /// for on a textual capability.
    pub fn select_tier(capability: &Capability, elevated_reasoning: bool) -> ModelTier {
        if capability.is_textual() {
            return if elevated_reasoning { ModelTier::Deep } else { ModelTier::Fast };
        }
        match capability {
            Capability::Audio => ModelTier::SynthesisAudio,
            Capability::Image => ModelTier::SynthesisImage,
            _ => ModelTier::SynthesisVideo,
        }
    }

    /// Build a request for `feature`.
    ///
    /// Fails with `INVALID_REQUEST` when `contents` is empty.
    pub fn build(
        &self,
        feature: Feature,
        capability: Capability,
        contents: Vec<ContentPart>,
        options: RequestOptions,
    ) -> Result<InferenceRequest, GatewayError> {
        if contents.is_empty() {
            return Err(GatewayError::invalid_request(format!(
                "request for {} has no content parts",
                feature
            )));
        }

        let tier = Self::select_tier(&capability, options.elevated_reasoning);
        let caps = tier.capabilities();
        let mut config = GenerationConfig { tier, ..Default::default() };

        match capability {
            Capability::Json { schema } if caps.schema => {
                config.response_schema = Some(schema);
                config.response_mime_type = Some(JSON_MIME.to_string());
            },
            Capability::Grounded(tool) if caps.grounding => config.grounding = Some(tool),
            _ => {},
        }

        if options.elevated_reasoning && caps.reasoning_budget {
            config.thinking_budget = Some(self.deep_budget);
        }

        if caps.modality == OutputModality::Text {
            config.system_instruction = options.system_instruction;
            config.history = options.history;
        } else {
            config.response_modality = Some(caps.modality);
        }

        if tier == ModelTier::SynthesisAudio {
            config.voice = options.voice;
        }

        Ok(InferenceRequest { feature, contents, config })
    }
}
