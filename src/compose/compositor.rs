//! Composition orchestration
//!
//! Handles one request end to end: format → fit → background → border →
//! photo → watermark.

use image::RgbaImage;

use crate::codec::{decode_image, encode_jpeg};
use crate::config::{Config, ConfigError, ResolvedProfile};
use crate::watermark::render_watermark;

use super::background::synthesize;
use super::canvas::{blit, fill_rect, BlendMode, Rect};
use super::color::color_or_white;
use super::error::ComposeError;
use super::fit::fit;
use super::format::{select_format, CanvasSize};

/// Result of composing one photo
#[derive(Debug, Clone)]
pub struct Composition {
    /// The finished canvas
    pub image: RgbaImage,
    /// JPEG quality the profile asks for
    pub jpeg_quality: u8,
    /// Canvas dimensions chosen by the format
    pub canvas: CanvasSize,
}

/// Result of processing encoded bytes
#[derive(Debug)]
pub struct ProcessedImage {
    /// JPEG data
    pub data: Vec<u8>,
    /// Decoded source dimensions (width, height), after orientation
    pub original_size: (u32, u32),
    /// Canvas dimensions (width, height)
    pub output_size: (u32, u32),
    pub jpeg_quality: u8,
}

/// Composite `src` onto a new canvas as described by `profile`.
///
/// Nothing is drawn unless every precondition holds: non-empty
/// `watermark_text` requires the profile to carry a watermark style.
pub fn compose(
    profile: &ResolvedProfile,
    src: &RgbaImage,
    watermark_text: &str,
) -> Result<Composition, ComposeError> {
    let watermark = match (watermark_text.is_empty(), profile.watermark.as_ref()) {
        (true, _) => None,
        (false, Some(style)) => Some(style),
        (false, None) => {
            return Err(ComposeError::WatermarkStyleMissing {
                profile: profile.name.clone(),
            })
        }
    };

    let (src_w, src_h) = src.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ComposeError::InvalidSourceDimensions {
            width: src_w,
            height: src_h,
        });
    }

    // 1. Canvas size
    let canvas_size = select_format(&profile.format, src_w, src_h)?;
    if canvas_size.is_empty() {
        return Err(ComposeError::InvalidTargetSize {
            width: canvas_size.width,
            height: canvas_size.height,
        });
    }

    // 2. Fit the photo
    let fitted = fit(
        src,
        canvas_size.width,
        canvas_size.height,
        profile.padding_percent,
        profile.no_upscale,
    )?;

    // 3. Background
    let mut canvas = synthesize(
        &profile.background,
        src,
        canvas_size.width,
        canvas_size.height,
        &fitted,
    )?;

    // 4. Border
    if profile.border_width > 0 {
        let frame = Rect::from_origin(
            fitted.offset_x,
            fitted.offset_y,
            fitted.width(),
            fitted.height(),
        )
        .expand(profile.border_width as i64);
        fill_rect(&mut canvas, frame, color_or_white(&profile.border_color));
    }

    // 5. Photo
    blit(
        &mut canvas,
        &fitted.image,
        fitted.offset_x,
        fitted.offset_y,
        BlendMode::Over,
    );

    // 6. Watermark
    if let Some(style) = watermark {
        render_watermark(&mut canvas, watermark_text, style, &profile.assets_path)?;
    }

    tracing::debug!(
        profile = %profile.name,
        source_width = src_w,
        source_height = src_h,
        canvas_width = canvas_size.width,
        canvas_height = canvas_size.height,
        photo_width = fitted.width(),
        photo_height = fitted.height(),
        background = profile.background.kind(),
        watermark = watermark.is_some(),
        "Composed image"
    );

    Ok(Composition {
        image: canvas,
        jpeg_quality: profile.jpeg_quality,
        canvas: canvas_size,
    })
}

/// Composes photos against one validated configuration.
///
/// Holds no mutable state, so a single processor can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct Processor {
    config: Config,
}

impl Processor {
    /// Validate `config` and wrap it.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `profile_name` and compose `src` with it.
    pub fn process(
        &self,
        src: &RgbaImage,
        profile_name: &str,
        watermark_text: &str,
    ) -> Result<Composition, ComposeError> {
        let profile = self.config.resolve_profile(profile_name)?;
        compose(&profile, src, watermark_text)
    }

    /// Decode `data`, compose it and encode the canvas as JPEG.
    ///
    /// `filename_hint` selects RAW preview extraction for `.dng`/`.raw`.
    pub fn process_bytes(
        &self,
        data: &[u8],
        filename_hint: &str,
        profile_name: &str,
        watermark_text: &str,
    ) -> Result<ProcessedImage, ComposeError> {
        // Resolve first so a bad profile fails before decoding
        let profile = self.config.resolve_profile(profile_name)?;
        if !watermark_text.is_empty() && profile.watermark.is_none() {
            return Err(ComposeError::WatermarkStyleMissing {
                profile: profile.name,
            });
        }

        let src = decode_image(data, filename_hint)?;
        let composition = compose(&profile, &src, watermark_text)?;
        let encoded = encode_jpeg(&composition.image, composition.jpeg_quality)?;

        tracing::info!(
            profile = %profile.name,
            input_bytes = data.len(),
            output_bytes = encoded.len(),
            width = composition.canvas.width,
            height = composition.canvas.height,
            quality = composition.jpeg_quality,
            "Processed image"
        );

        Ok(ProcessedImage {
            data: encoded,
            original_size: src.dimensions(),
            output_size: (composition.canvas.width, composition.canvas.height),
            jpeg_quality: composition.jpeg_quality,
        })
    }
}
