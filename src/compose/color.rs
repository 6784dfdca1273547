//! Color helpers: hex parsing and average color.

use image::{Rgba, RgbaImage};
use std::fmt;

use super::error::ComposeError;
use super::resize::{resize_exact, ResampleFilter};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Side length of the thumbnail the average color is computed from.
const AVERAGE_SAMPLE_SIZE: u32 = 32;

/// A hex color string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for InvalidColor {}

/// Parse a hex color string into an opaque color.
///
/// Supports both #RGB and #RRGGBB formats; surrounding whitespace is ignored.
///
/// ```
/// use canvasfit::compose::color::parse_hex_color;
/// use image::Rgba;
///
/// assert_eq!(parse_hex_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_hex_color(" #336699 ").unwrap(), Rgba([0x33, 0x66, 0x99, 255]));
/// ```
pub fn parse_hex_color(input: &str) -> Result<Rgba<u8>, InvalidColor> {
    let invalid = |reason| InvalidColor {
        input: input.to_string(),
        reason,
    };

    let hex = input
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| invalid("color must start with '#'"))?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("invalid hex digit"));
    }

    let digit = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid("invalid hex digit"))
    };

    match hex.len() {
        3 => {
            // Double each digit: 0xF -> 0xFF, 0xA -> 0xAA
            let r = digit(0..1)?;
            let g = digit(1..2)?;
            let b = digit(2..3)?;
            Ok(Rgba([r * 17, g * 17, b * 17, 255]))
        }
        6 => Ok(Rgba([digit(0..2)?, digit(2..4)?, digit(4..6)?, 255])),
        _ => Err(invalid("color must be #RGB or #RRGGBB")),
    }
}

/// Parse a configured color, falling back to opaque white when malformed.
pub fn color_or_white(input: &str) -> Rgba<u8> {
    match parse_hex_color(input) {
        Ok(color) => color,
        Err(err) => {
            tracing::debug!(error = %err, "Using white for unparseable color");
            WHITE
        }
    }
}

/// Average color of `img`, computed over a 32x32 Lanczos3 thumbnail with
/// alpha-premultiplied 16-bit channels. The result is always opaque.
pub fn average_color(img: &RgbaImage) -> Result<Rgba<u8>, ComposeError> {
    let sample = resize_exact(img, AVERAGE_SAMPLE_SIZE, AVERAGE_SAMPLE_SIZE, ResampleFilter::Lanczos3)?;

    let mut sums = [0u64; 3];
    for pixel in sample.pixels() {
        let alpha = u64::from(pixel[3]) * 0x101;
        for (sum, channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += u64::from(*channel) * 0x101 * alpha / 0xffff;
        }
    }

    let total = u64::from(sample.width()) * u64::from(sample.height());
    let [r, g, b] = sums.map(|sum| ((sum / total) >> 8) as u8);
    Ok(Rgba([r, g, b, 255]))
}
