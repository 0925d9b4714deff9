//! Provider-facing side of the gateway.

mod client;
pub mod wire;


pub use client::{build_url, UpstreamClient};
