//! PCM16 speech decode for playback.
//!
//! Provider speech is little-endian signed 16-bit PCM, mono, at
//! [`wellspring_types::PCM_SAMPLE_RATE`]. Encode and decode must agree on the rate or
//! playback speed and pitch are wrong.

use base64::{engine::general_purpose, Engine as _};
use std::time::Duration;

use super::CodecError;

const I16_SCALE: f32 = 32768.0;

/// Reinterpret raw bytes as LE i16 samples scaled to `[-1.0, 1.0)`.
///
/// An odd trailing byte is dropped.
pub fn decode_pcm16(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / I16_SCALE)
        .collect()
}

/// Decode a base64 PCM16 payload as forwarded by the gateway.
pub fn decode_base64_pcm(data: &str) -> Result<Vec<f32>, CodecError> {
    let bytes = general_purpose::STANDARD.decode(data.trim())?;
    Ok(decode_pcm16(&bytes))
}

/// Inverse of [`decode_pcm16`]. Samples outside `[-1.0, 1.0]` are clamped.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|sample| {
            let scaled = (sample.clamp(-1.0, 1.0) * I16_SCALE).round();
            let value = scaled.clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
            value.to_le_bytes()
        })
        .collect()
}

/// Mono float samples ready for an audio sink.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl PlaybackBuffer {
    /// Build a buffer from raw provider bytes.
    ///
    /// `declared_rate` is the rate the payload arrived with and `playback_rate` the rate
    /// the sink is configured for. A mismatch is refused rather than played at the
    /// wrong speed.
    pub fn from_pcm16(
        bytes: &[u8],
        declared_rate: u32,
        playback_rate: u32,
    ) -> Result<Self, CodecError> {
        if declared_rate != playback_rate {
            return Err(CodecError::SampleRateMismatch {
                expected: playback_rate,
                actual: declared_rate,
            });
        }
        Ok(Self { samples: decode_pcm16(bytes), sample_rate: playback_rate })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }
}
