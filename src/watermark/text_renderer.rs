//! Text watermark rendering.
//!
//! Text is drawn straight onto the canvas: each glyph's coverage, scaled by
//! the style's opacity, is alpha-blended over the existing pixels.
//!
//! # Features
//!
//! - Fonts loaded from TrueType/OpenType files, relative to the assets path
//! - Font size given as em size in pixels
//! - Anchored placement (see [`super::position`])
//! - Optional outline stamped around the text before it is drawn

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

use super::position::{anchor_for_align, Anchor};
use super::WatermarkError;
use crate::compose::canvas::blend_at;
use crate::compose::color::color_or_white;
use crate::config::WatermarkStyle;

/// Outline radius used when the style enables an outline without a width.
pub const DEFAULT_OUTLINE_WIDTH: f32 = 2.0;

/// Where a watermark font lives: absolute paths as given, relative paths
/// under `assets_path`.
pub fn resolve_font_path(font: &str, assets_path: &Path) -> PathBuf {
    let path = Path::new(font);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        assets_path.join(path)
    }
}

/// Read and parse a font file.
pub fn load_font(path: &Path) -> Result<FontVec, WatermarkError> {
    let font_error = |message: String| WatermarkError::FontError {
        path: path.display().to_string(),
        message,
    };
    let data = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
    FontVec::try_from_vec(data).map_err(|e| font_error(e.to_string()))
}

/// Scale at which one em is `size` pixels.
pub fn em_scale<F: Font>(font: &F, size: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size * font.height_unscaled() / units_per_em)
}

/// Extent of a line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width including kerning
    pub width: f32,
    /// Ascent minus descent
    pub height: f32,
    /// Distance from the top of the box to the baseline
    pub ascent: f32,
}

/// Measure `text` at `scale`.
pub fn measure_text<F: Font>(font: &F, scale: PxScale, text: &str) -> TextMetrics {
    let scaled_font = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;
    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }
        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    TextMetrics {
        width,
        height: scaled_font.ascent() - scaled_font.descent(),
        ascent: scaled_font.ascent(),
    }
}

/// Draw `text` so that the anchor's fraction of its box sits on the anchor
/// point.
pub fn draw_text_anchored<F: Font>(
    canvas: &mut RgbaImage,
    font: &F,
    scale: PxScale,
    text: &str,
    anchor: Anchor,
    color: Rgba<u8>,
    opacity: f32,
) {
    let metrics = measure_text(font, scale, text);
    let (left, top) = anchor.top_left(metrics.width, metrics.height);
    let baseline = top + metrics.ascent;

    let scaled_font = font.as_scaled(scale);
    let mut cursor_x = left;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = bounds.min.x as i64 + px as i64;
                let y = bounds.min.y as i64 + py as i64;
                blend_at(canvas, x, y, color, coverage * opacity);
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}

/// Integer offsets inside the open disc of radius `width`, row by row.
///
/// Non-positive widths use [`DEFAULT_OUTLINE_WIDTH`].
pub fn outline_offsets(width: f32) -> Vec<(i64, i64)> {
    let width = if width.is_finite() && width > 0.0 {
        width
    } else {
        DEFAULT_OUTLINE_WIDTH
    };
    let reach = width.ceil() as i64;
    let mut offsets = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if ((dx * dx + dy * dy) as f32) < width * width {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Draw `text` onto `canvas` using `style`.
///
/// The outline, when enabled, is stamped at every integer offset strictly
/// inside a disc of the outline radius; the text itself is drawn last at the
/// true anchor.
pub fn render_watermark(
    canvas: &mut RgbaImage,
    text: &str,
    style: &WatermarkStyle,
    assets_path: &Path,
) -> Result<(), WatermarkError> {
    if text.is_empty() {
        return Ok(());
    }
    if !style.size.is_finite() || style.size <= 0.0 {
        return Err(WatermarkError::RenderError(format!(
            "invalid font size {}",
            style.size
        )));
    }

    let font_path = resolve_font_path(&style.font, assets_path);
    let font = load_font(&font_path)?;
    let scale = em_scale(&font, style.size);
    let opacity = style.opacity.clamp(0.0, 1.0);

    let anchor = anchor_for_align(
        canvas.width(),
        canvas.height(),
        &style.align,
        style.offset_x,
        style.offset_y,
    );

    if style.outline {
        let outline_color = color_or_white(&style.outline_color);
        for (dx, dy) in outline_offsets(style.outline_width) {
            draw_text_anchored(
                canvas,
                &font,
                scale,
                text,
                anchor.shifted(dx as f32, dy as f32),
                outline_color,
                opacity,
            );
        }
    }

    draw_text_anchored(
        canvas,
        &font,
        scale,
        text,
        anchor,
        color_or_white(&style.color),
        opacity,
    );

    tracing::debug!(
        font = %font_path.display(),
        size = style.size,
        align = %style.align,
        outline = style.outline,
        "Rendered watermark"
    );
    Ok(())
}
