//! Anchor calculation for watermark placement.
//!
//! An alignment keyword such as `bottom-right` selects a reference point on
//! the canvas and the fraction of the text box that sits on it.
//!
//! # Example
//!
//! ```
//! use canvasfit::watermark::position::{anchor_for_align, Anchor};
//!
//! let anchor = anchor_for_align(800, 600, "bottom-right", 20.0, 10.0);
//! assert_eq!(anchor, Anchor { x: 780.0, y: 590.0, ax: 1.0, ay: 1.0 });
//! ```

/// Horizontal reference of the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

/// Vertical reference of the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

/// Parsed alignment keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAnchor::Center,
            vertical: VerticalAnchor::Bottom,
        }
    }
}

impl HorizontalAnchor {
    fn from_token(token: &str) -> Self {
        match token {
            "left" => HorizontalAnchor::Left,
            "right" => HorizontalAnchor::Right,
            _ => HorizontalAnchor::Center,
        }
    }
}

impl VerticalAnchor {
    fn from_token(token: &str) -> Self {
        match token {
            "top" => VerticalAnchor::Top,
            "center" | "middle" => VerticalAnchor::Middle,
            _ => VerticalAnchor::Bottom,
        }
    }
}

impl Alignment {
    /// Parse an alignment keyword. Never fails; unknown tokens fall back to
    /// bottom-center.
    ///
    /// Two-part keywords are `<vertical>-<horizontal>`. A single part names
    /// a side (`top`, `left`, ...) or `center`/`middle`.
    pub fn parse(align: &str) -> Self {
        let align = align.trim().to_lowercase();
        let align = if align.is_empty() {
            "bottom-center"
        } else {
            align.as_str()
        };

        let parts: Vec<&str> = align.split('-').collect();
        let parsed = match parts.as_slice() {
            [vertical, horizontal] => Alignment {
                horizontal: HorizontalAnchor::from_token(horizontal),
                vertical: VerticalAnchor::from_token(vertical),
            },
            [single] => match *single {
                "top" | "bottom" => Alignment {
                    horizontal: HorizontalAnchor::Center,
                    vertical: VerticalAnchor::from_token(single),
                },
                "left" | "right" => Alignment {
                    horizontal: HorizontalAnchor::from_token(single),
                    vertical: VerticalAnchor::Middle,
                },
                "center" | "middle" => Alignment {
                    horizontal: HorizontalAnchor::Center,
                    vertical: VerticalAnchor::Middle,
                },
                other => Alignment {
                    horizontal: HorizontalAnchor::from_token(other),
                    vertical: VerticalAnchor::Bottom,
                },
            },
            _ => Alignment::default(),
        };

        if parsed == Alignment::default() && align != "bottom-center" {
            tracing::debug!(align = %align, "Alignment resolved to bottom-center");
        }
        parsed
    }
}

/// Reference point `(x, y)` and the fraction `(ax, ay)` of the text box
/// placed on it: 0 = left/top edge, 0.5 = middle, 1 = right/bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
    pub ax: f32,
    pub ay: f32,
}

impl Anchor {
    /// Top-left corner of a `width` x `height` box anchored here.
    pub fn top_left(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x - self.ax * width, self.y - self.ay * height)
    }

    /// Same anchor moved by `(dx, dy)` pixels.
    pub fn shifted(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Anchor for `align` on a `width` x `height` canvas.
///
/// Offsets move the reference point inwards from the left, right, top and
/// bottom edges, and rightwards/downwards from the center.
pub fn anchor_for_align(
    width: u32,
    height: u32,
    align: &str,
    offset_x: f32,
    offset_y: f32,
) -> Anchor {
    let alignment = Alignment::parse(align);
    let w = width as f32;
    let h = height as f32;

    let (x, ax) = match alignment.horizontal {
        HorizontalAnchor::Left => (offset_x, 0.0),
        HorizontalAnchor::Right => (w - offset_x, 1.0),
        HorizontalAnchor::Center => (w / 2.0 + offset_x, 0.5),
    };
    let (y, ay) = match alignment.vertical {
        VerticalAnchor::Top => (offset_y, 0.0),
        VerticalAnchor::Middle => (h / 2.0 + offset_y, 0.5),
        VerticalAnchor::Bottom => (h - offset_y, 1.0),
    };

    Anchor { x, y, ax, ay }
}
