//! JPEG output.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};

use crate::compose::ComposeError;

/// Encode `canvas` as baseline JPEG at `quality` (clamped to 1..=100).
///
/// JPEG has no alpha channel; pixels are flattened over black.
pub fn encode_jpeg(canvas: &RgbaImage, quality: u8) -> Result<Vec<u8>, ComposeError> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(ComposeError::InvalidTargetSize { width, height });
    }

    let rgb_data = rgba_to_rgb(canvas.as_raw());
    let mut output = Vec::new();
    JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100))
        .write_image(&rgb_data, width, height, ColorType::Rgb8)
        .map_err(|e| ComposeError::encode_failed(format!("jpeg: {}", e)))?;

    Ok(output)
}

/// Flatten packed RGBA data over opaque black.
///
/// Each channel is premultiplied by its alpha, so transparent pixels come
/// out black rather than exposing their stored color.
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for chunk in rgba.chunks_exact(4) {
        let alpha = u32::from(chunk[3]);
        for &channel in &chunk[..3] {
            rgb.push(((u32::from(channel) * alpha + 127) / 255) as u8);
        }
    }
    rgb
}
