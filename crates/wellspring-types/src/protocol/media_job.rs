//! `/media-job` protocol: start, check, and download of long-running synthesis jobs.

use serde::{Deserialize, Serialize};

use crate::models::{InlineData, JobStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartJobPayload {
    /// Text directive for the synthesis
    pub prompt: String,
    /// Optional reference image to animate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckJobPayload {
    pub operation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadPayload {
    pub reference: String,
}

/// Body of `POST /media-job`: `{"action": "...", "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", content = "payload", rename_all = "lowercase")]
pub enum MediaJobRequest {
    Start(StartJobPayload),
    Check(CheckJobPayload),
    Download(DownloadPayload),
}

/// Query of `GET /media-job?action=download&payload=<reference>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadQuery {
    pub action: String,
    pub payload: String,
}

/// Response to `start`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobStarted {
    pub operation: String,
}

/// Response to `check`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobCheck {
    pub operation: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_ref: Option<String>,
    /// Provider failure message when `status` is FAILED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
