//! # Wellspring Core
//!
//! AI orchestration and media pipeline for Wellspring.
//!
//! ## Architecture
//!
//! ```text
//! wellspring-core/src/
//! ├── codec/          # image downscale + re-encode, PCM16 speech decode
//! ├── grounding.rs    # citation extraction from provider metadata
//! ├── structured.rs   # JSON recovery from free-form model text
//! ├── orchestrator/   # request builder, tier fallback, long-running job poller
//! └── gateway/        # (feature `gateway`) axum proxy holding the provider credential
//! ```
//!
//! Feature code calls [`RequestBuilder`] → [`FallbackController`] → gateway, then runs
//! the result through [`extract_json`] (JSON features), [`codec`] (audio/image features)
//! or [`JobPoller`] (video synthesis).

#![cfg_attr(test, allow(clippy::panic, clippy::float_cmp, clippy::unwrap_used))]

pub mod codec;
pub mod error;
#[cfg(feature = "gateway")]
pub mod gateway;
pub mod grounding;
pub mod orchestrator;
pub mod structured;

pub use error::{CoreError, CoreResult};
pub use orchestrator::{
    FallbackController, InferenceTransport, JobPoller, JobTransport, PollHandle, PollOutcome,
    RequestBuilder, RequestOptions,
};
pub use structured::{extract_json, StructuredOutput};
