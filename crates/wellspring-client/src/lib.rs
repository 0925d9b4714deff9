//! # Wellspring Client
//!
//! SDK for the Wellspring gateway. [`GatewayClient`] speaks the `/inference` and
//! `/media-job` wire protocol and implements the core transport traits;
//! [`Assistant`] layers the application features on top.
//!
//! ```no_run
//! # async fn demo() -> Result<(), wellspring_client::ClientError> {
//! use wellspring_client::{Assistant, ClientConfig};
//!
//! let assistant = Assistant::new(ClientConfig::from_env())?;
//! let reply = assistant.chat("How can I wind down before bed?", Vec::new(), false).await?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod features;
mod types;

pub use client::GatewayClient;
pub use error::ClientError;
pub use features::Assistant;
pub use types::*;
