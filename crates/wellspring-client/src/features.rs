//! Feature facade: one method per application feature.
//!
//! Each method builds its request with [`RequestBuilder`], runs it through the
//! [`FallbackController`], and post-processes the result (JSON recovery, PCM decode,
//! image decode). Video synthesis goes through the [`JobPoller`].

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use wellspring_core::codec::{ImageCodec, PlaybackBuffer};
use wellspring_core::{
    extract_json, FallbackController, JobPoller, PollHandle, PollOutcome, RequestBuilder,
    RequestOptions, StructuredOutput,
};
use wellspring_types::models::{ChatTurn, InlineData};
use wellspring_types::protocol::StartJobPayload;
use wellspring_types::{
    Capability, ContentPart, Feature, GatewayError, GroundingTool, InferenceRequest,
    InferenceResult,
};

use crate::client::GatewayClient;
use crate::error::ClientError;
use crate::types::{ClientConfig, GeneratedImage, GeneratedVideo, GroundedAnswer};

const COMPANION_INSTRUCTION: &str = "You are a warm, concise wellness companion. \
    Offer general wellbeing guidance, never a diagnosis, and suggest seeing a professional \
    when something sounds serious.";

const DOCUMENT_INSTRUCTION: &str = "Read the attached document and explain it in plain \
    language. Highlight anything the reader should follow up on.";

const SYMPTOM_INSTRUCTION: &str = "Look for patterns across the logged symptoms. Describe \
    possible triggers and habits worth discussing with a clinician. Do not diagnose.";

/// Application features on top of a [`GatewayClient`].
pub struct Assistant {
    client: Arc<GatewayClient>,
    controller: FallbackController<Arc<GatewayClient>>,
    poller: JobPoller<GatewayClient>,
    builder: RequestBuilder,
    images: ImageCodec,
    playback_rate: u32,
}

impl Assistant {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let builder = RequestBuilder::new().with_deep_budget(config.deep_budget);
        let images = ImageCodec::new(config.codec.clone())?;
        let playback_rate = config.codec.sample_rate;
        let poller_config = config.poller;
        let client = Arc::new(GatewayClient::new(config)?);

        Ok(Self {
            controller: FallbackController::new(Arc::clone(&client)),
            poller: JobPoller::new(Arc::clone(&client), poller_config)?,
            client,
            builder,
            images,
            playback_rate,
        })
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// Multi-turn chat. `history` holds prior turns, oldest first.
    pub async fn chat(
        &self,
        message: &str,
        history: Vec<ChatTurn>,
        deep: bool,
    ) -> Result<String, ClientError> {
        let options = RequestOptions {
            elevated_reasoning: deep,
            history,
            ..RequestOptions::default().with_system_instruction(COMPANION_INSTRUCTION)
        };
        let request = self.builder.build(
            Feature::Chat,
            Capability::Text,
            vec![ContentPart::text(message)],
            options,
        )?;
        self.run_text(request).await.map(|answer| answer.text)
    }

    /// Analyze an uploaded document (image or PDF). Images are downscaled first.
    pub async fn analyze_document(
        &self,
        document: &[u8],
        mime_type: &str,
        question: Option<&str>,
    ) -> Result<StructuredOutput, ClientError> {
        let part = if mime_type.starts_with("image/") {
            let encoded = self.images.prepare(document)?;
            ContentPart::blob(encoded.mime_type, &encoded.bytes)
        } else {
            ContentPart::blob(mime_type, document)
        };
        let prompt = question.unwrap_or("Summarize this document.");
        let request = self.builder.build(
            Feature::DocumentAnalysis,
            Capability::Json { schema: document_schema() },
            vec![part, ContentPart::text(prompt)],
            RequestOptions::elevated().with_system_instruction(DOCUMENT_INSTRUCTION),
        )?;
        self.run_json(request).await
    }

    /// Explain a public health or benefit scheme: eligibility, benefits, how to apply.
    pub async fn explain_scheme(&self, scheme: &str) -> Result<StructuredOutput, ClientError> {
        let prompt = format!("Explain the scheme \"{}\" for someone considering applying.", scheme);
        let request = self.builder.build(
            Feature::SchemeExplainer,
            Capability::Json { schema: scheme_schema() },
            vec![ContentPart::text(prompt)],
            RequestOptions::default(),
        )?;
        self.run_json(request).await
    }

    /// Nearby places matching `query`, grounded on map data.
    pub async fn find_places(
        &self,
        query: &str,
        near: Option<(f64, f64)>,
    ) -> Result<GroundedAnswer, ClientError> {
        let prompt = match near {
            Some((lat, lng)) => format!("{} near latitude {:.4}, longitude {:.4}", query, lat, lng),
            None => query.to_string(),
        };
        let request = self.builder.build(
            Feature::PlaceLookup,
            Capability::Grounded(GroundingTool::Maps),
            vec![ContentPart::text(prompt)],
            RequestOptions::default(),
        )?;
        self.run_text(request).await
    }

    /// Look for patterns across symptom log entries.
    pub async fn analyze_symptoms(
        &self,
        entries: &[String],
    ) -> Result<StructuredOutput, ClientError> {
        if entries.is_empty() {
            return Err(GatewayError::invalid_request("no symptom entries to analyze").into());
        }
        let log = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {}", i + 1, entry))
            .collect::<Vec<_>>()
            .join("\n");
        let request = self.builder.build(
            Feature::SymptomPatterns,
            Capability::Json { schema: symptom_schema() },
            vec![ContentPart::text(log)],
            RequestOptions::elevated().with_system_instruction(SYMPTOM_INSTRUCTION),
        )?;
        self.run_json(request).await
    }

    /// Speak `text`, decoded into a buffer ready for playback.
    pub async fn synthesize_speech(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<PlaybackBuffer, ClientError> {
        let options = RequestOptions { voice: voice.map(str::to_string), ..Default::default() };
        let request = self.builder.build(
            Feature::SpeechSynthesis,
            Capability::Audio,
            vec![ContentPart::text(text)],
            options,
        )?;
        match self.controller.execute(request).await? {
            InferenceResult::Audio { pcm, sample_rate } => {
                Ok(PlaybackBuffer::from_pcm16(&pcm, sample_rate, self.playback_rate)?)
            },
            other => Err(unexpected("audio", &other)),
        }
    }

    pub async fn synthesize_image(&self, prompt: &str) -> Result<GeneratedImage, ClientError> {
        let request = self.builder.build(
            Feature::ImageSynthesis,
            Capability::Image,
            vec![ContentPart::text(prompt)],
            RequestOptions::default(),
        )?;
        match self.controller.execute(request).await? {
            InferenceResult::Image { data, mime_type } => Ok(GeneratedImage { data, mime_type }),
            other => Err(unexpected("image", &other)),
        }
    }

    /// Submit a video job and start polling it. An optional still is animated.
    pub async fn start_video(
        &self,
        prompt: &str,
        still: Option<&[u8]>,
    ) -> Result<PollHandle, ClientError> {
        let image = match still {
            Some(bytes) => {
                let encoded = self.images.prepare(bytes)?;
                Some(InlineData::from_bytes(encoded.mime_type, &encoded.bytes))
            },
            None => None,
        };
        let payload = StartJobPayload { prompt: prompt.to_string(), image, aspect_ratio: None };
        Ok(self.poller.start(&payload).await?)
    }

    pub async fn download_video(&self, reference: &str) -> Result<bytes::Bytes, ClientError> {
        Ok(self.poller.fetch(reference).await?)
    }

    /// Start a video job, wait for it, and download the result.
    pub async fn generate_video(
        &self,
        prompt: &str,
        still: Option<&[u8]>,
    ) -> Result<GeneratedVideo, ClientError> {
        let handle = self.start_video(prompt, still).await?;
        match handle.outcome().await {
            PollOutcome::Done(reference) => {
                let data = self.download_video(&reference).await?;
                info!(bytes = data.len(), "Video downloaded");
                Ok(GeneratedVideo { reference, data })
            },
            PollOutcome::Cancelled => Err(ClientError::Cancelled),
            failed => Err(failed
                .error()
                .unwrap_or_else(|| GatewayError::provider_unavailable("video job failed"))
                .into()),
        }
    }

    async fn run_text(&self, request: InferenceRequest) -> Result<GroundedAnswer, ClientError> {
        match self.controller.execute(request).await? {
            InferenceResult::Text { text, citations } => Ok(GroundedAnswer { text, citations }),
            other => Err(unexpected("text", &other)),
        }
    }

    async fn run_json(&self, request: InferenceRequest) -> Result<StructuredOutput, ClientError> {
        match self.controller.execute(request).await? {
            InferenceResult::Text { text, .. } => Ok(extract_json(&text)),
            other => Err(unexpected("text", &other)),
        }
    }
}

fn unexpected(expected: &str, got: &InferenceResult) -> ClientError {
    let variant = match got {
        InferenceResult::Text { .. } => "text",
        InferenceResult::Json { .. } => "json",
        InferenceResult::Audio { .. } => "audio",
        InferenceResult::Image { .. } => "image",
        InferenceResult::Error { .. } => "error",
    };
    ClientError::InvalidResponse(format!("expected {} output, got {}", expected, variant))
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn document_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "keyFindings": string_list(),
            "followUps": string_list()
        },
        "required": ["summary", "keyFindings"]
    })
}

fn scheme_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "eligibility": string_list(),
            "benefits": string_list(),
            "howToApply": string_list()
        },
        "required": ["name", "summary", "eligibility", "benefits", "howToApply"]
    })
}

fn symptom_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "patterns": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "pattern": { "type": "STRING" },
                        "possibleTriggers": string_list()
                    },
                    "required": ["pattern"]
                }
            },
            "suggestions": string_list(),
            "seeAProfessional": { "type": "BOOLEAN" }
        },
        "required": ["patterns", "suggestions"]
    })
}
