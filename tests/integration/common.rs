//! Shared fixtures for the integration tests.

use canvasfit::config::Config;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const PROFILES: &str = r##"
settings:
  jpeg_quality: 88
  assets_path: "/nonexistent/canvasfit-assets"

backgrounds:
  black:
    type: solid
    color: "#000000"
  white:
    type: solid
    color: "#fff"
  mean:
    type: average
  soft:
    type: blur
    blur_radius: 8
    darken: 0.3
  edges:
    type: stretch

watermarks:
  missing_font:
    font: "Missing-Regular.ttf"
    size: 24
    align: bottom-right
    offset_x: 16
    offset_y: 16

formats:
  square: { type: fixed, width: 400, height: 400 }
  portrait: { type: fixed, width: 400, height: 500 }
  landscape: { type: fixed, width: 400, height: 210 }
  auto: { type: auto, from_list: [square, portrait, landscape], padding_percent: 5 }

profiles:
  default:
    background_ref: black
    format_ref: square
  framed:
    background_ref: white
    format_ref: square
    padding_percent: 10
    border_width: 3
    border_color: "#ff0000"
  adaptive:
    background_ref: soft
    format_ref: auto
    jpeg_quality: 70
  mean:
    background_ref: mean
    format_ref: portrait
  stretched:
    background_ref: edges
    format_ref: square
  small:
    background_ref: black
    format_ref: square
    no_upscale: true
  signed:
    background_ref: black
    format_ref: square
    watermark_ref: missing_font
"##;

pub fn config() -> Config {
    Config::from_yaml_with_env(PROFILES).expect("Failed to parse test profiles")
}

pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255]))
}

/// Left half red, right half blue.
pub fn split(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

pub fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let rgb = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut buffer, format)
        .expect("Failed to encode fixture");
    buffer.into_inner()
}

/// Channel distance small enough to absorb JPEG artifacts on flat areas.
pub fn close(actual: Rgba<u8>, expected: [u8; 3], tolerance: u8) -> bool {
    actual.0[..3]
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance)
}
