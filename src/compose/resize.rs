//! Resampling primitives
//!
//! Exact resize, cover-fit and Gaussian blur. Resizing goes through
//! `fast_image_resize`; Lanczos3 is used for anything the viewer sees as a
//! scaled photo, nearest-neighbor for edge sampling.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::{imageops, RgbaImage};
use std::num::NonZeroU32;

use super::error::ComposeError;

/// Resampling filter used by [`resize_exact`] and [`cover_fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleFilter {
    /// High quality convolution filter
    Lanczos3,
    /// Pixel replication, cheap and edge-accurate
    Nearest,
}

impl ResampleFilter {
    fn algorithm(self) -> ResizeAlg {
        match self {
            ResampleFilter::Lanczos3 => ResizeAlg::Convolution(FilterType::Lanczos3),
            ResampleFilter::Nearest => ResizeAlg::Nearest,
        }
    }
}

/// Resize to exactly `target_w` x `target_h`, ignoring aspect ratio.
pub fn resize_exact(
    img: &RgbaImage,
    target_w: u32,
    target_h: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, ComposeError> {
    if img.width() == target_w && img.height() == target_h {
        return Ok(img.clone());
    }

    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| ComposeError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ComposeError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ComposeError::resize_failed("Target width is 0"))?;
    let dst_height = NonZeroU32::new(target_h)
        .ok_or_else(|| ComposeError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x4)
        .map_err(|e| {
            ComposeError::resize_failed(format!("Failed to create source image: {:?}", e))
        })?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(filter.algorithm());
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ComposeError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ComposeError::resize_failed("Failed to create output image buffer"))
}

/// Scale to cover `target_w` x `target_h` completely, then crop the center.
pub fn cover_fit(
    img: &RgbaImage,
    target_w: u32,
    target_h: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, ComposeError> {
    let (src_w, src_h) = img.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ComposeError::resize_failed("Source image is empty"));
    }
    if target_w == 0 || target_h == 0 {
        return Err(ComposeError::resize_failed(format!(
            "Invalid cover size {}x{}",
            target_w, target_h
        )));
    }

    let src_aspect = src_w as f64 / src_h as f64;
    let dst_aspect = target_w as f64 / target_h as f64;

    // Scale the constraining side to the target, keep aspect on the other
    let (scaled_w, scaled_h) = if src_aspect < dst_aspect {
        let h = (target_w as f64 * src_h as f64 / src_w as f64).round() as u32;
        (target_w, h.max(target_h))
    } else {
        let w = (target_h as f64 * src_w as f64 / src_h as f64).round() as u32;
        (w.max(target_w), target_h)
    };

    let scaled = resize_exact(img, scaled_w, scaled_h, filter)?;
    let x = (scaled_w - target_w) / 2;
    let y = (scaled_h - target_h) / 2;
    Ok(imageops::crop_imm(&scaled, x, y, target_w, target_h).to_image())
}

/// Copy a sub-rectangle; the rectangle must lie inside the image.
pub fn crop(img: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
    imageops::crop_imm(img, x, y, width, height).to_image()
}

/// Gaussian blur with standard deviation `sigma`; non-positive sigma is a copy.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    if !sigma.is_finite() || sigma <= 0.0 {
        return img.clone();
    }
    imageops::blur(img, sigma)
}
