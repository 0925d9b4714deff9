//! Request orchestration: tier selection, capacity fallback, and long-running jobs.
//!
//! ```text
//! feature ──▶ RequestBuilder ──▶ FallbackController ──▶ InferenceTransport (gateway)
//!                                                   └─▶ JobPoller ──▶ JobTransport
//! ```

mod builder;
mod fallback;
mod poller;
mod transport;

pub use builder::{RequestBuilder, RequestOptions, DEFAULT_DEEP_BUDGET};
pub use fallback::{FallbackController, MAX_DOWNGRADE_RETRIES};
pub use poller::{JobPoller, PollHandle, PollOutcome};
pub use transport::{InferenceTransport, JobTransport};
