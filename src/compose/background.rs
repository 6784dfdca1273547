//! Background synthesis.
//!
//! Every strategy produces a canvas-sized image that the photo is later
//! drawn onto:
//!
//! - **solid**: flat fill with a configured hex color
//! - **average**: flat fill with the source's average color
//! - **blur**: cover-fit of the source, Gaussian blurred, optionally darkened
//! - **stretch**: the fitted photo's outermost rows and columns smeared out
//!   to the canvas edges, corners filled from the photo's corner pixels

use image::{Rgba, RgbaImage};

use crate::config::Background;

use super::canvas::{blit, fill_rect, BlendMode, Rect};
use super::color::{average_color, color_or_white, BLACK};
use super::error::ComposeError;
use super::fit::FittedPhoto;
use super::resize::{cover_fit, crop, gaussian_blur, resize_exact, ResampleFilter};

/// Canvas side an edge strip is extended towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// One strip of the stretch background: a 1-pixel slice of the fitted photo
/// and the canvas rectangle it is stretched over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStrip {
    pub side: Side,
    /// Slice of the fitted photo, in photo coordinates: (x, y, width, height)
    pub source: (u32, u32, u32, u32),
    /// Gap between the photo and the canvas edge
    pub target: Rect,
}

/// Produce the background for a `canvas_w` x `canvas_h` canvas.
pub fn synthesize(
    background: &Background,
    src: &RgbaImage,
    canvas_w: u32,
    canvas_h: u32,
    fitted: &FittedPhoto,
) -> Result<RgbaImage, ComposeError> {
    if canvas_w == 0 || canvas_h == 0 {
        return Err(ComposeError::InvalidTargetSize {
            width: canvas_w,
            height: canvas_h,
        });
    }

    match background {
        Background::Solid { color } => Ok(RgbaImage::from_pixel(
            canvas_w,
            canvas_h,
            color_or_white(color),
        )),
        Background::Average => {
            let avg = average_color(src)?;
            Ok(RgbaImage::from_pixel(canvas_w, canvas_h, avg))
        }
        Background::Blur { radius, darken } => blur(src, canvas_w, canvas_h, *radius, *darken),
        Background::Stretch => stretch(src, canvas_w, canvas_h, fitted),
        Background::Unrecognized { kind } => {
            tracing::warn!(background = %kind, "Unknown background type, using black");
            Ok(RgbaImage::from_pixel(canvas_w, canvas_h, BLACK))
        }
    }
}

fn blur(
    src: &RgbaImage,
    canvas_w: u32,
    canvas_h: u32,
    radius: f32,
    darken: f32,
) -> Result<RgbaImage, ComposeError> {
    let filled = cover_fit(src, canvas_w, canvas_h, ResampleFilter::Lanczos3)?;
    let mut blurred = gaussian_blur(&filled, radius);

    if darken > 0.0 {
        let alpha = (darken.min(1.0) * 255.0).round() as u8;
        fill_rect(
            &mut blurred,
            Rect::from_origin(0, 0, canvas_w, canvas_h),
            Rgba([0, 0, 0, alpha]),
        );
    }
    Ok(blurred)
}

/// Which edge strips a stretch background needs.
///
/// A side gets a strip only when the gap between the photo and that canvas
/// edge is positive, so a photo spanning the full width yields no left or
/// right strips.
pub fn plan_edge_strips(
    canvas_w: u32,
    canvas_h: u32,
    fitted_w: u32,
    fitted_h: u32,
    offset_x: i64,
    offset_y: i64,
) -> Vec<EdgeStrip> {
    let mut strips = Vec::with_capacity(4);
    if fitted_w == 0 || fitted_h == 0 {
        return strips;
    }

    let right = offset_x + fitted_w as i64;
    let bottom = offset_y + fitted_h as i64;
    let canvas_w = canvas_w as i64;
    let canvas_h = canvas_h as i64;

    if offset_x > 0 {
        strips.push(EdgeStrip {
            side: Side::Left,
            source: (0, 0, 1, fitted_h),
            target: Rect::new(0, offset_y, offset_x, bottom),
        });
    }
    if canvas_w - right > 0 {
        strips.push(EdgeStrip {
            side: Side::Right,
            source: (fitted_w - 1, 0, 1, fitted_h),
            target: Rect::new(right, offset_y, canvas_w, bottom),
        });
    }
    if offset_y > 0 {
        strips.push(EdgeStrip {
            side: Side::Top,
            source: (0, 0, fitted_w, 1),
            target: Rect::new(offset_x, 0, right, offset_y),
        });
    }
    if canvas_h - bottom > 0 {
        strips.push(EdgeStrip {
            side: Side::Bottom,
            source: (0, fitted_h - 1, fitted_w, 1),
            target: Rect::new(offset_x, bottom, right, canvas_h),
        });
    }
    strips
}

fn stretch(
    src: &RgbaImage,
    canvas_w: u32,
    canvas_h: u32,
    fitted: &FittedPhoto,
) -> Result<RgbaImage, ComposeError> {
    let (fit_w, fit_h) = fitted.image.dimensions();
    if fit_w == 0 || fit_h == 0 {
        return Err(ComposeError::InvalidTargetSize {
            width: fit_w,
            height: fit_h,
        });
    }

    // Corner colors come from a nearest-neighbor sample of the source
    let edge_sample = cover_fit(src, fit_w, fit_h, ResampleFilter::Nearest)?;
    let top_left = *edge_sample.get_pixel(0, 0);
    let top_right = *edge_sample.get_pixel(fit_w - 1, 0);
    let bottom_left = *edge_sample.get_pixel(0, fit_h - 1);
    let bottom_right = *edge_sample.get_pixel(fit_w - 1, fit_h - 1);

    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, BLACK);
    blit(
        &mut canvas,
        &fitted.image,
        fitted.offset_x,
        fitted.offset_y,
        BlendMode::Over,
    );

    let strips = plan_edge_strips(
        canvas_w,
        canvas_h,
        fit_w,
        fit_h,
        fitted.offset_x,
        fitted.offset_y,
    );
    for strip in &strips {
        let (sx, sy, sw, sh) = strip.source;
        let slice = crop(&fitted.image, sx, sy, sw, sh);
        let fill = resize_exact(
            &slice,
            strip.target.width() as u32,
            strip.target.height() as u32,
            ResampleFilter::Nearest,
        )?;
        blit(
            &mut canvas,
            &fill,
            strip.target.x0,
            strip.target.y0,
            BlendMode::Replace,
        );
    }

    let right = fitted.offset_x + fit_w as i64;
    let bottom = fitted.offset_y + fit_h as i64;
    let (cw, ch) = (canvas_w as i64, canvas_h as i64);
    let corners = [
        (Rect::new(0, 0, fitted.offset_x, fitted.offset_y), top_left),
        (Rect::new(right, 0, cw, fitted.offset_y), top_right),
        (Rect::new(0, bottom, fitted.offset_x, ch), bottom_left),
        (Rect::new(right, bottom, cw, ch), bottom_right),
    ];
    for (rect, color) in corners {
        if !rect.is_empty() {
            fill_rect(&mut canvas, rect, color);
        }
    }

    tracing::debug!(
        strips = strips.len(),
        canvas_width = canvas_w,
        canvas_height = canvas_h,
        "Stretch background built"
    );
    Ok(canvas)
}
