//! Image composition pipeline.
//!
//! A resolved profile and a decoded source go in, a finished canvas comes
//! out. The stages run strictly in order and each owns its intermediates:
//!
//! 1. [`format::select_format`] picks the canvas size
//! 2. [`fit::fit`] scales the photo into the padded area and centers it
//! 3. [`background::synthesize`] fills the canvas behind the photo
//! 4. border, photo and watermark are drawn by [`compositor::compose`]
//!
//! # Example
//!
//! ```ignore
//! use canvasfit::compose::Processor;
//! use canvasfit::config::Config;
//!
//! let processor = Processor::new(Config::load("profiles.yaml")?)?;
//! let composition = processor.process(&photo, "default", "© 2025")?;
//! ```

pub mod background;
pub mod canvas;
pub mod color;
pub mod compositor;
pub mod error;
pub mod fit;
pub mod format;
pub mod resize;

pub use background::{plan_edge_strips, synthesize, EdgeStrip, Side};
pub use canvas::{BlendMode, Rect};
pub use color::{average_color, parse_hex_color};
pub use compositor::{compose, Composition, ProcessedImage, Processor};
pub use error::ComposeError;
pub use fit::{fit, FittedPhoto};
pub use format::{select_format, CanvasSize};
pub use resize::ResampleFilter;
