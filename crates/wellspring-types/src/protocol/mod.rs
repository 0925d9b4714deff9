//! Gateway wire shapes.
//!
//! Request bodies for `/inference` are [`InferenceRequest`](crate::InferenceRequest)
//! itself; this module holds the response envelopes and the `/media-job` protocol.
//! Failures on every route are a [`GatewayError`](crate::GatewayError).

mod inference;
mod media_job;

pub use inference::{GatewayOutput, InferenceSuccess};
pub use media_job::{
    CheckJobPayload, DownloadPayload, DownloadQuery, JobCheck, JobStarted, MediaJobRequest,
    StartJobPayload,
};
