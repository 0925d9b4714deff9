//! Image downscale and re-encode.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;
use validator::Validate;
use wellspring_types::{CodecConfig, ConfigError};

use super::CodecError;

const JPEG_MIME: &str = "image/jpeg";

/// An upload-ready image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub mime_type: &'static str,
}

/// Target dimensions so the longer side is at most `max`, aspect ratio preserved.
///
/// The shorter side is `round(short * max / long)`, never below 1. Images already
/// within bounds keep their size.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= max || long == 0 {
        return (width, height);
    }
    let short = width.min(height);
    let scaled = ((u64::from(short) * u64::from(max)) as f64 / long as f64).round() as u32;
    let scaled = scaled.max(1);
    if width >= height {
        (max, scaled)
    } else {
        (scaled, max)
    }
}

/// Downscales and re-encodes images as JPEG per [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct ImageCodec {
    config: CodecConfig,
}

impl ImageCodec {
    /// Fails if the dimension or quality is out of range.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(|e| ConfigError::from_validation_errors(&e))?;
        Ok(Self { config })
    }

    /// Decode `input` (any supported format), fit it within the configured maximum and
    /// re-encode as JPEG. Transparent pixels are flattened onto white.
    pub fn prepare(&self, input: &[u8]) -> Result<EncodedImage, CodecError> {
        if input.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let decoded =
            image::load_from_memory(input).map_err(|e| CodecError::Decode(e.to_string()))?;
        self.prepare_image(&decoded)
    }

    pub fn prepare_image(&self, source: &DynamicImage) -> Result<EncodedImage, CodecError> {
        let (width, height) =
            fit_within(source.width(), source.height(), self.config.max_image_dimension);

        let rgb = flatten_alpha(source);
        let resized = if (width, height) == (rgb.width(), rgb.height()) {
            rgb
        } else {
            image::imageops::resize(&rgb, width, height, FilterType::Triangle)
        };

        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, self.config.quality_percent());
        encoder.encode_image(&resized).map_err(|e| CodecError::Encode(e.to_string()))?;

        debug!(
            from = %format!("{}x{}", source.width(), source.height()),
            to = %format!("{}x{}", width, height),
            bytes = bytes.len(),
            "Image prepared for upload"
        );

        Ok(EncodedImage { bytes, width, height, mime_type: JPEG_MIME })
    }
}

fn flatten_alpha(source: &DynamicImage) -> RgbImage {
    if !source.color().has_alpha() {
        return source.to_rgb8();
    }
    let rgba = source.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let blend =
            |channel: u8| (((u16::from(channel) * alpha) + (255 * (255 - alpha))) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(4000, 3000, 1024), (1024, 768));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(fit_within(3000, 4000, 1024), (768, 1024));
    }

    #[test]
    fn test_fit_within_keeps_small_images() {
        assert_eq!(fit_within(800, 600, 1024), (800, 600));
        assert_eq!(fit_within(1024, 10, 1024), (1024, 10));
    }

    #[test]
    fn test_fit_within_never_collapses_to_zero() {
        assert_eq!(fit_within(10_000, 2, 1024), (1024, 1));
    }

    #[test]
    fn test_prepare_downscales_and_reencodes() {
        let codec = ImageCodec::default();
        let out = codec.prepare(&png_bytes(2048, 1536)).unwrap();
        assert_eq!((out.width, out.height), (1024, 768));
        assert_eq!(out.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 768));
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_prepare_reencodes_small_images() {
        let out = ImageCodec::default().prepare(&png_bytes(40, 20)).unwrap();
        assert_eq!((out.width, out.height), (40, 20));
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let flat = flatten_alpha(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_garbage_input_is_decode_error() {
        let err = ImageCodec::default().prepare(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_out_of_range_config_rejected() {
        let zero_dimension = CodecConfig { max_image_dimension: 0, ..Default::default() };
        let err = ImageCodec::new(zero_dimension).unwrap_err();
        assert!(
            matches!(err, ConfigError::ValidationError { ref field, .. } if field == "max_image_dimension")
        );

        let over_quality = CodecConfig { image_quality: 1.5, ..Default::default() };
        let err = ImageCodec::new(over_quality).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "image_quality"));
    }

    #[test]
    fn test_custom_dimension_applied() {
        let config = CodecConfig { max_image_dimension: 256, ..Default::default() };
        let out = ImageCodec::new(config).unwrap().prepare(&png_bytes(1024, 512)).unwrap();
        assert_eq!((out.width, out.height), (256, 128));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(ImageCodec::default().prepare(&[]), Err(CodecError::EmptyInput)));
    }
}
