//! Media codec constants and limits.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sample rate of provider speech output. Must match on encode and decode sides,
/// otherwise playback speed and pitch are wrong.
pub const PCM_SAMPLE_RATE: u32 = 24_000;

/// Limits applied by the media codec adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct CodecConfig {
    /// Longest image side allowed before upload
    #[validate(range(min = 64_u32, max = 8192_u32))]
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
    /// Re-encode quality factor in (0, 1]
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    #[serde(default = "default_image_quality")]
    pub image_quality: f32,
    /// Playback rate decoded speech must be declared at
    #[validate(range(min = 8_000_u32, max = 48_000_u32))]
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

const fn default_max_image_dimension() -> u32 {
    1024
}

const fn default_image_quality() -> f32 {
    0.8
}

const fn default_sample_rate() -> u32 {
    PCM_SAMPLE_RATE
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: default_max_image_dimension(),
            image_quality: default_image_quality(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl CodecConfig {
    /// Quality as an encoder percentage (1..=100).
    pub fn quality_percent(&self) -> u8 {
        (self.image_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_image_dimension, 1024);
        assert_eq!(config.sample_rate, 24_000);
        assert_eq!(config.quality_percent(), 80);
    }

    #[test]
    fn test_quality_is_validated() {
        let config = CodecConfig { image_quality: 1.5, ..Default::default() };
        assert!(config.validate().is_err());
        assert!(CodecConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sample_rate_is_validated() {
        let config = CodecConfig { sample_rate: 0, ..Default::default() };
        let errors = config.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sample_rate"));
    }
}
