//! Canvas drawing primitives.
//!
//! Rectangles use signed coordinates so that photos overflowing the canvas
//! (no-upscale with large padding) can be described directly; every
//! operation clips to the canvas.

use image::{Rgba, RgbaImage};

/// Half-open rectangle `[x0, x1) x [y0, y1)` in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl Rect {
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_origin(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::new(x, y, x + width as i64, y + height as i64)
    }

    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Grow by `amount` on every side.
    pub fn expand(&self, amount: i64) -> Self {
        Self::new(
            self.x0 - amount,
            self.y0 - amount,
            self.x1 + amount,
            self.y1 + amount,
        )
    }

    /// Intersection with a `width` x `height` canvas, `None` when nothing is visible.
    pub fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        let clipped = Rect::new(
            self.x0.max(0),
            self.y0.max(0),
            self.x1.min(width as i64),
            self.y1.min(height as i64),
        );
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
}

/// How source pixels combine with the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Porter-Duff "over"
    Over,
    /// Overwrite the destination, alpha included
    Replace,
}

/// Fill a rectangle with `color`, blending when the color is translucent.
pub fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let Some(area) = rect.clip(canvas.width(), canvas.height()) else {
        return;
    };
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            *pixel = if color[3] == 255 {
                color
            } else {
                blend_pixels(*pixel, color, 1.0)
            };
        }
    }
}

/// Draw `image` with its top-left corner at `(x, y)`.
pub fn blit(canvas: &mut RgbaImage, image: &RgbaImage, x: i64, y: i64, mode: BlendMode) {
    let target = Rect::from_origin(x, y, image.width(), image.height());
    let Some(area) = target.clip(canvas.width(), canvas.height()) else {
        return;
    };
    for ty in area.y0..area.y1 {
        for tx in area.x0..area.x1 {
            let src = *image.get_pixel((tx - x) as u32, (ty - y) as u32);
            let dst = canvas.get_pixel_mut(tx as u32, ty as u32);
            *dst = match mode {
                BlendMode::Replace => src,
                BlendMode::Over => blend_pixels(*dst, src, 1.0),
            };
        }
    }
}

/// Blend a single pixel onto the canvas at `(x, y)`; out-of-bounds is ignored.
pub fn blend_at(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, opacity: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    *pixel = blend_pixels(*pixel, color, opacity);
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if fg_alpha >= 1.0 {
        return foreground;
    }
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_rect_clip_inside() {
        let rect = Rect::new(2, 3, 8, 9);
        assert_eq!(rect.clip(10, 10), Some(rect));
    }

    #[test]
    fn test_rect_clip_partially_outside() {
        let rect = Rect::new(-5, -5, 4, 20);
        assert_eq!(rect.clip(10, 10), Some(Rect::new(0, 0, 4, 10)));
    }

    #[test]
    fn test_rect_clip_fully_outside() {
        assert_eq!(Rect::new(12, 0, 20, 5).clip(10, 10), None);
        assert_eq!(Rect::new(-8, 0, 0, 5).clip(10, 10), None);
    }

    #[test]
    fn test_inverted_rect_is_empty() {
        assert!(Rect::new(5, 0, 2, 4).is_empty());
        assert_eq!(Rect::new(5, 0, 2, 4).clip(10, 10), None);
    }

    #[test]
    fn test_expand() {
        let rect = Rect::from_origin(10, 20, 30, 40).expand(5);
        assert_eq!(rect, Rect::new(5, 15, 45, 65));
        assert_eq!(rect.width(), 40);
        assert_eq!(rect.height(), 50);
    }

    #[test]
    fn test_fill_rect_opaque() {
        let mut canvas = RgbaImage::from_pixel(10, 10, BLACK);
        fill_rect(&mut canvas, Rect::new(2, 2, 4, 4), WHITE);
        assert_eq!(canvas.get_pixel(2, 2), &WHITE);
        assert_eq!(canvas.get_pixel(3, 3), &WHITE);
        assert_eq!(canvas.get_pixel(4, 4), &BLACK);
    }

    #[test]
    fn test_fill_rect_translucent_blends() {
        let mut canvas = RgbaImage::from_pixel(4, 4, WHITE);
        fill_rect(&mut canvas, Rect::new(0, 0, 4, 4), Rgba([0, 0, 0, 128]));
        let pixel = canvas.get_pixel(1, 1);
        assert!(pixel[0] > 110 && pixel[0] < 140);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_blit_clips_negative_offset() {
        let mut canvas = RgbaImage::from_pixel(4, 4, BLACK);
        let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        blit(&mut canvas, &img, -2, -1, BlendMode::Over);
        // canvas (0,0) shows source (2,1)
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([2, 1, 0, 255]));
        // outside the source footprint stays black
        assert_eq!(canvas.get_pixel(3, 3), &BLACK);
    }

    #[test]
    fn test_blit_replace_keeps_source_alpha() {
        let mut canvas = RgbaImage::from_pixel(2, 2, BLACK);
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0]));
        blit(&mut canvas, &img, 1, 1, BlendMode::Replace);
        assert_eq!(canvas.get_pixel(1, 1), &Rgba([10, 20, 30, 0]));
    }

    #[test]
    fn test_blit_over_transparent_source_keeps_canvas() {
        let mut canvas = RgbaImage::from_pixel(2, 2, BLACK);
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 0]));
        blit(&mut canvas, &img, 0, 0, BlendMode::Over);
        assert_eq!(canvas.get_pixel(0, 0), &BLACK);
    }

    #[test]
    fn test_blend_pixels_with_opacity() {
        let blended = blend_pixels(BLACK, WHITE, 0.5);
        assert!(blended[0] > 120 && blended[0] < 135);
        assert_eq!(blended[3], 255);
    }

    #[test]
    fn test_blend_at_ignores_out_of_bounds() {
        let mut canvas = RgbaImage::from_pixel(2, 2, BLACK);
        blend_at(&mut canvas, -1, 0, WHITE, 1.0);
        blend_at(&mut canvas, 2, 0, WHITE, 1.0);
        assert!(canvas.pixels().all(|p| *p == BLACK));
        blend_at(&mut canvas, 1, 1, WHITE, 1.0);
        assert_eq!(canvas.get_pixel(1, 1), &WHITE);
    }
}
