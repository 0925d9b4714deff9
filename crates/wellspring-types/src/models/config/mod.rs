//! Configuration structs, split by concern.

mod codec;
mod gateway;
mod poller;

pub use codec::{CodecConfig, PCM_SAMPLE_RATE};
pub use gateway::{GatewayConfig, TierModels};
pub use poller::PollerConfig;
