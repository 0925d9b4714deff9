//! Media codec adapter.
//!
//! - [`ImageCodec`]: downscale + JPEG re-encode before upload
//! - [`decode_pcm16`] / [`PlaybackBuffer`]: provider speech (PCM16 LE mono, 24kHz) to floats

mod audio;
mod imaging;

pub use audio::{decode_base64_pcm, decode_pcm16, encode_pcm16, PlaybackBuffer};
pub use imaging::{fit_within, EncodedImage, ImageCodec};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty input")]
    EmptyInput,

    #[error("image could not be decoded: {0}")]
    Decode(String),

    #[error("image could not be encoded: {0}")]
    Encode(String),

    #[error("audio payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("playback buffer expects {expected}Hz, got {actual}Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },
}
