//! Photo fitting: scale into the padded area and center on the canvas.

use image::RgbaImage;

use super::error::ComposeError;
use super::resize::{resize_exact, ResampleFilter};

/// The scaled photo and its top-left position on the canvas.
#[derive(Debug, Clone)]
pub struct FittedPhoto {
    pub image: RgbaImage,
    /// Negative when the photo is larger than the canvas.
    pub offset_x: i64,
    pub offset_y: i64,
}

impl FittedPhoto {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Available area after removing `padding_percent` of the canvas on each side.
///
/// Never smaller than 1x1.
pub fn available_area(target_w: u32, target_h: u32, padding_percent: f64) -> (u32, u32) {
    let padding = if padding_percent.is_finite() {
        padding_percent.max(0.0)
    } else {
        0.0
    };
    let factor = 1.0 - padding * 2.0 / 100.0;
    let avail = |target: u32| (target as f64 * factor).max(1.0) as u32;
    (avail(target_w), avail(target_h))
}

/// Scale `src` into a `target_w` x `target_h` canvas and center it.
pub fn fit(
    src: &RgbaImage,
    target_w: u32,
    target_h: u32,
    padding_percent: f64,
    no_upscale: bool,
) -> Result<FittedPhoto, ComposeError> {
    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ComposeError::InvalidSourceDimensions {
            width: src_w,
            height: src_h,
        });
    }

    let (avail_w, avail_h) = available_area(target_w, target_h, padding_percent);
    let scale = (avail_w as f64 / src_w as f64).min(avail_h as f64 / src_h as f64);

    let image = if no_upscale && scale > 1.0 {
        tracing::debug!(
            width = src_w,
            height = src_h,
            scale,
            "Keeping source at native size"
        );
        src.clone()
    } else {
        let (fit_w, fit_h) = fit_dimensions(src_w, src_h, avail_w, avail_h);
        resize_exact(src, fit_w, fit_h, ResampleFilter::Lanczos3)?
    };

    let offset_x = (target_w as i64 - image.width() as i64) / 2;
    let offset_y = (target_h as i64 - image.height() as i64) / 2;

    Ok(FittedPhoto {
        image,
        offset_x,
        offset_y,
    })
}

/// Largest size with the source's aspect ratio that fits the box.
fn fit_dimensions(src_w: u32, src_h: u32, box_w: u32, box_h: u32) -> (u32, u32) {
    let src_aspect = src_w as f64 / src_h as f64;
    let box_aspect = box_w as f64 / box_h as f64;

    if src_aspect > box_aspect {
        let h = (box_w as f64 / src_aspect).floor() as u32;
        (box_w, h.max(1))
    } else {
        let w = (box_h as f64 * src_aspect).floor() as u32;
        (w.max(1), box_h)
    }
}
