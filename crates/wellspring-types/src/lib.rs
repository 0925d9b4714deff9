//! # Wellspring Types
//!
//! Core types, wire envelopes, and error definitions for the Wellspring AI core.
//!
//! This crate provides the foundational type system shared by the gateway and its callers:
//!
//! - **`error`** - The fixed failure taxonomy and the gateway error envelope
//! - **`models`** - Domain models (tiers, requests, results, jobs, citations, config)
//! - **`protocol`** - Gateway wire shapes (`/inference`, `/media-job`)
//!
//! ## Architecture Role
//!
//! `wellspring-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                wellspring-types (this crate)
//!                        │
//!                        ▼
//!                 wellspring-core
//!                        │
//!            ┌───────────┴───────────┐
//!            ▼                       ▼
//!   wellspring-client        wellspring-server
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for the gateway wire format
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;
pub mod protocol;

// Re-export error types for convenience
pub use error::{ConfigError, ErrorKind, GatewayError};

// Re-export core model types
pub use models::{
    AsyncJob, Capability, CitationKind, CodecConfig, ContentPart, Feature, GatewayConfig,
    GenerationConfig, GroundingCitation, GroundingTool, InferenceRequest, InferenceResult,
    JobHandle, JobStatus, ModelTier, OutputModality, PollerConfig, PCM_SAMPLE_RATE,
};
