//! Proxy gateway: the only component holding the provider credential.
//!
//! ```text
//! caller ──▶ /inference ──▶ wire::generate_body ──▶ provider generateContent
//!        ──▶ /media-job ──▶ start | check | download (credential reattached)
//!        ◀── {feature, output, groundingMetadata?} | {error, message, detail?}
//! ```

mod classify;
mod context;
pub mod handlers;
mod server;
pub mod upstream;


pub use classify::{classify_status, UpstreamError};
pub use context::{GatewayContext, ProviderCredential, CREDENTIAL_ENV};
pub use server::{build_router, cors_layer};
