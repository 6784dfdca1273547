//! Text watermarks drawn onto finished canvases.
//!
//! A watermark style (see [`crate::config::WatermarkStyle`]) names a font,
//! its size and color, an alignment keyword with pixel offsets and an
//! optional outline.
//!
//! # Configuration Example
//!
//! ```yaml
//! watermarks:
//!   standard:
//!     font: Roboto-Medium.ttf
//!     size: 32
//!     color: "#FFFFFF"
//!     opacity: 0.85
//!     align: bottom-right
//!     offset_x: 40
//!     offset_y: 40
//!     outline: true
//!     outline_color: "#000000"
//!     outline_width: 2
//! ```
//!
//! # Alignment
//!
//! - `<vertical>-<horizontal>`: `top-left`, `center-right`, `bottom-center`, ...
//! - single sides: `top`, `bottom`, `left`, `right`
//! - `center` / `middle`
//! - empty or unrecognised: bottom-center

pub mod error;
pub mod position;
pub mod text_renderer;

pub use error::WatermarkError;
pub use position::{anchor_for_align, Alignment, Anchor, HorizontalAnchor, VerticalAnchor};
pub use text_renderer::{
    draw_text_anchored, load_font, measure_text, outline_offsets, render_watermark, resolve_font_path,
    TextMetrics,
};
