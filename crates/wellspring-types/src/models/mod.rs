//! Core domain models for the Wellspring AI core.
//!
//! This module contains the shared data structures that flow between feature code,
//! the orchestration layer, and the gateway.

pub mod config;
mod feature;
mod grounding;
mod job;
mod request;
mod result;
mod tier;

// Re-export all models
pub use config::{CodecConfig, GatewayConfig, PollerConfig, TierModels, PCM_SAMPLE_RATE};
pub use feature::{Capability, Feature, GroundingTool};
pub use grounding::{CitationKind, GroundingCitation};
pub use job::{AsyncJob, JobHandle, JobStatus, JobTransitionError};
pub use request::{ChatRole, ChatTurn, ContentPart, GenerationConfig, InferenceRequest, InlineData};
pub use result::InferenceResult;
pub use tier::{ModelTier, OutputModality, TierCapabilities};
