//! Provider wire format: request bodies out, typed responses in.
//!
//! Response decoding happens exactly once here, into [`GatewayOutput`].

use serde::Deserialize;
use serde_json::{json, Map, Value};
use wellspring_types::models::{ChatRole, InlineData};
use wellspring_types::protocol::{GatewayOutput, JobCheck, StartJobPayload};
use wellspring_types::{
    ContentPart, GatewayError, GenerationConfig, GroundingCitation, GroundingTool, InferenceRequest,
    JobStatus, ModelTier, OutputModality, PCM_SAMPLE_RATE,
};

use crate::grounding::{extract_citations, GroundingMetadata};

const PCM_MIME: &str = "audio/pcm";

// ---------------------------------------------------------------------------
// generateContent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
    /// Reasoning summary parts are not answer text
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Drop every field the tier's capability flags deny. Callers are untrusted, so the
/// gateway enforces the table again even though the builder already did.
pub fn effective_config(config: &GenerationConfig) -> GenerationConfig {
    let caps = config.tier.capabilities();
    let mut out = config.clone();
    if !caps.schema {
        out.response_schema = None;
        out.response_mime_type = None;
    }
    if !caps.reasoning_budget {
        out.thinking_budget = None;
    }
    if !caps.grounding {
        out.grounding = None;
    }
    if caps.modality == OutputModality::Text {
        out.response_modality = None;
        out.voice = None;
    } else {
        out.response_modality = Some(caps.modality);
        out.system_instruction = None;
        out.history.clear();
    }
    out
}

fn part_json(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text { text } => json!({ "text": text }),
        ContentPart::InlineData { inline_data } => json!({
            "inlineData": { "mimeType": inline_data.mime_type, "data": inline_data.data }
        }),
    }
}

/// Build the `generateContent` body for `request`.
pub fn generate_body(request: &InferenceRequest, default_voice: &str) -> Value {
    let config = effective_config(&request.config);

    let mut contents: Vec<Value> = config
        .history
        .iter()
        .map(|turn| {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            };
            json!({ "role": role, "parts": [{ "text": turn.text }] })
        })
        .collect();
    contents.push(json!({
        "role": "user",
        "parts": request.contents.iter().map(part_json).collect::<Vec<_>>(),
    }));

    let mut generation = Map::new();
    if let Some(mime) = &config.response_mime_type {
        generation.insert("responseMimeType".into(), json!(mime));
    }
    if let Some(schema) = &config.response_schema {
        generation.insert("responseSchema".into(), schema.clone());
    }
    if let Some(budget) = config.thinking_budget {
        generation.insert("thinkingConfig".into(), json!({ "thinkingBudget": budget }));
    }
    if let Some(modality) = config.response_modality {
        generation.insert("responseModalities".into(), json!([modality.as_str()]));
    }
    if config.tier == ModelTier::SynthesisAudio {
        let voice = config.voice.as_deref().unwrap_or(default_voice);
        generation.insert(
            "speechConfig".into(),
            json!({ "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } } }),
        );
    }

    let mut body = json!({ "contents": contents });
    if !generation.is_empty() {
        body["generationConfig"] = Value::Object(generation);
    }
    if let Some(instruction) = &config.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    if let Some(tool) = config.grounding {
        body["tools"] = match tool {
            GroundingTool::Search => json!([{ "googleSearch": {} }]),
            GroundingTool::Maps => json!([{ "googleMaps": {} }]),
        };
    }
    body
}

/// Sample rate from a mime like `audio/L16;codec=pcm;rate=24000`.
fn declared_rate(mime: &str) -> Option<u32> {
    mime.split(';').find_map(|p| p.trim().strip_prefix("rate=")).and_then(|r| r.parse().ok())
}

/// Decode a provider response for a request at `tier`.
pub fn decode_output(
    tier: ModelTier,
    response: GenerateContentResponse,
) -> Result<(GatewayOutput, Vec<GroundingCitation>), GatewayError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GatewayError::invalid_request(format!("prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::provider_unavailable("provider returned no candidates"))?;
    let citations = extract_citations(candidate.grounding_metadata.as_ref());
    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let output = match tier.capabilities().modality {
        OutputModality::Text => {
            let text: String = parts
                .iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text.as_deref())
                .collect();
            (!text.is_empty()).then_some(GatewayOutput::Text { text })
        },
        OutputModality::Audio => parts.into_iter().find_map(|p| p.inline_data).map(|data| {
            GatewayOutput::Audio {
                sample_rate: declared_rate(&data.mime_type).unwrap_or(PCM_SAMPLE_RATE),
                mime_type: PCM_MIME.to_string(),
                data: data.data,
            }
        }),
        OutputModality::Image => parts
            .into_iter()
            .filter_map(|p| p.inline_data)
            .find(|d| d.mime_type.starts_with("image/"))
            .map(|d| GatewayOutput::Image { data: d.data, mime_type: d.mime_type }),
        OutputModality::Video => {
            return Err(GatewayError::invalid_request("video synthesis runs through /media-job"));
        },
    };

    match output {
        Some(output) => Ok((output, citations)),
        None if matches!(finish_reason.as_str(), "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST") => {
            Err(GatewayError::invalid_request(format!("response blocked: {}", finish_reason)))
        },
        None => Err(GatewayError::provider_unavailable(format!(
            "provider returned no {} output (finish reason {})",
            tier.capabilities().modality.as_str(),
            if finish_reason.is_empty() { "unset" } else { finish_reason.as_str() }
        ))),
    }
}

// ---------------------------------------------------------------------------
// Long-running video operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
    #[serde(default)]
    pub rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedSample {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoRef {
    #[serde(default)]
    pub uri: Option<String>,
}

/// Build the `predictLongRunning` body for a video job.
pub fn video_body(payload: &StartJobPayload, default_aspect_ratio: &str) -> Value {
    let mut instance = json!({ "prompt": payload.prompt });
    if let Some(image) = &payload.image {
        instance["image"] = json!({ "bytesBase64Encoded": image.data, "mimeType": image.mime_type });
    }
    let aspect_ratio = payload.aspect_ratio.as_deref().unwrap_or(default_aspect_ratio);
    json!({ "instances": [instance], "parameters": { "aspectRatio": aspect_ratio } })
}

/// Fold a provider operation into a job status report.
pub fn job_check(operation: Operation) -> JobCheck {
    let name = operation.name;
    if !operation.done {
        return JobCheck {
            operation: name,
            status: JobStatus::Pending,
            result_ref: None,
            error: None,
        };
    }
    if let Some(error) = operation.error {
        return JobCheck {
            operation: name,
            status: JobStatus::Failed,
            result_ref: None,
            error: Some(error.message),
        };
    }

    let video = operation.response.and_then(|r| r.generate_video_response).unwrap_or_default();
    let uri = video
        .generated_samples
        .into_iter()
        .find_map(|s| s.video.and_then(|v| v.uri));

    match uri {
        Some(uri) => JobCheck {
            operation: name,
            status: JobStatus::Done,
            result_ref: Some(uri),
            error: None,
        },
        None => {
            let reason = if video.rai_media_filtered_reasons.is_empty() {
                "operation finished without a video".to_string()
            } else {
                video.rai_media_filtered_reasons.join("; ")
            };
            JobCheck {
                operation: name,
                status: JobStatus::Failed,
                result_ref: None,
                error: Some(reason),
            }
        },
    }
}
