//! Watermark error types.

use std::fmt;

/// Errors that can occur while drawing a watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkError {
    /// Font file could not be read or parsed
    FontError { path: String, message: String },

    /// Failed to render text watermark
    RenderError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontError { path, message } => {
                write!(f, "Failed to load font {}: {}", path, message)
            }
            Self::RenderError(msg) => write!(f, "Failed to render text watermark: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
