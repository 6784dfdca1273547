//! Source decoding
//!
//! Handles ordinary image files (format sniffed from the bytes, EXIF
//! orientation applied) and RAW containers such as DNG, from which the
//! largest embedded JPEG preview is used.

use image::io::Reader as ImageReader;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use super::orientation::{apply_orientation, read_exif_orientation};
use crate::compose::ComposeError;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// File extensions decoded through their embedded preview.
const RAW_EXTENSIONS: &[&str] = &["dng", "raw"];

/// Decode `data` into an upright RGBA image.
///
/// `filename_hint` is only used for its extension: `.dng`/`.raw` go straight
/// to preview extraction. Anything else is decoded normally and falls back to
/// preview extraction; if that fails too the original decode error is
/// reported.
pub fn decode_image(data: &[u8], filename_hint: &str) -> Result<RgbaImage, ComposeError> {
    if is_raw_filename(filename_hint) {
        return decode_embedded_preview(data).map(|img| img.to_rgba8());
    }

    match decode_oriented(data) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(err) => match decode_embedded_preview(data) {
            Ok(preview) => {
                tracing::debug!(
                    error = %err,
                    width = preview.width(),
                    height = preview.height(),
                    "Decoded embedded JPEG after direct decode failed"
                );
                Ok(preview.to_rgba8())
            }
            Err(_) => Err(err),
        },
    }
}

fn is_raw_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            RAW_EXTENSIONS
                .iter()
                .any(|raw| ext.eq_ignore_ascii_case(raw))
        })
        .unwrap_or(false)
}

/// Decode with a sniffed format and apply EXIF orientation.
fn decode_oriented(data: &[u8]) -> Result<DynamicImage, ComposeError> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ComposeError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| ComposeError::decode_failed(e.to_string()))?;

    let orientation = read_exif_orientation(data);
    Ok(apply_orientation(img, orientation))
}

/// Byte ranges that look like complete JPEG streams: from each `FF D8` to
/// the next `FF D9`. Scanning resumes after each match.
pub fn extract_jpegs(data: &[u8]) -> Vec<&[u8]> {
    let mut results = Vec::new();
    let mut i = 0;
    while i + 1 < data.len() {
        if data[i..i + 2] != JPEG_SOI {
            i += 1;
            continue;
        }
        let body = &data[i + 2..];
        match body.windows(2).position(|w| w == JPEG_EOI) {
            Some(j) => {
                let end = i + 2 + j + 2;
                results.push(&data[i..end]);
                i = end;
            }
            None => i += 1,
        }
    }
    results
}

/// Decode every embedded JPEG and keep the one with the largest pixel area.
pub fn decode_embedded_preview(data: &[u8]) -> Result<DynamicImage, ComposeError> {
    let candidates = extract_jpegs(data);
    if candidates.is_empty() {
        return Err(ComposeError::decode_failed(
            "no embedded JPEG preview found",
        ));
    }

    let mut best: Option<DynamicImage> = None;
    let mut best_area = 0u64;
    for candidate in &candidates {
        let Ok(img) = decode_oriented(candidate) else {
            continue;
        };
        let area = u64::from(img.width()) * u64::from(img.height());
        if area > best_area {
            best_area = area;
            best = Some(img);
        }
    }

    let best = best.ok_or_else(|| {
        ComposeError::decode_failed(format!(
            "none of {} embedded JPEG candidates could be decoded",
            candidates.len()
        ))
    })?;
    tracing::debug!(
        candidates = candidates.len(),
        width = best.width(),
        height = best.height(),
        "Selected embedded preview"
    );
    Ok(best)
}
