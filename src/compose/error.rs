//! Composition error types
//!
//! Errors are split into two classes so front ends can map them:
//! user errors (bad profile name, missing watermark style, unusable source)
//! and internal errors (font loading, resampling, invalid canvas size).

use std::fmt;

use crate::config::ConfigError;
use crate::watermark::WatermarkError;

/// Errors that can occur while composing an image
#[derive(Debug, Clone)]
pub enum ComposeError {
    // === User Errors ===
    /// The requested profile does not exist
    ProfileNotFound { profile: String },
    /// Watermark text was supplied but the profile has no watermark style
    WatermarkStyleMissing { profile: String },
    /// A profile reference could not be resolved
    InvalidConfiguration { message: String },
    /// Source image has a zero dimension
    InvalidSourceDimensions { width: u32, height: u32 },
    /// Source bytes could not be decoded
    DecodeFailed { message: String },

    // === Internal Errors ===
    /// Watermark font could not be loaded
    FontLoad { path: String, message: String },
    /// Watermark text could not be drawn
    RenderFailed { message: String },
    /// Resize or blur operation failed
    ResizeFailed { message: String },
    /// Canvas size is unusable
    InvalidTargetSize { width: u32, height: u32 },
    /// Encoding the final canvas failed
    EncodeFailed { message: String },
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::ProfileNotFound { profile } => {
                write!(f, "Profile not found: {}", profile)
            }
            ComposeError::WatermarkStyleMissing { profile } => {
                write!(
                    f,
                    "Watermark text provided, but profile '{}' has no watermark_ref",
                    profile
                )
            }
            ComposeError::InvalidConfiguration { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            ComposeError::InvalidSourceDimensions { width, height } => {
                write!(f, "Invalid source size: {}x{}", width, height)
            }
            ComposeError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ComposeError::FontLoad { path, message } => {
                write!(f, "Failed to load watermark font {}: {}", path, message)
            }
            ComposeError::RenderFailed { message } => {
                write!(f, "Failed to render watermark: {}", message)
            }
            ComposeError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            ComposeError::InvalidTargetSize { width, height } => {
                write!(f, "Invalid target size: {}x{}", width, height)
            }
            ComposeError::EncodeFailed { message } => {
                write!(f, "Failed to encode image: {}", message)
            }
        }
    }
}

impl std::error::Error for ComposeError {}

impl ComposeError {
    /// Whether the caller (rather than the server) is at fault.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ComposeError::ProfileNotFound { .. }
                | ComposeError::WatermarkStyleMissing { .. }
                | ComposeError::InvalidConfiguration { .. }
                | ComposeError::InvalidSourceDimensions { .. }
                | ComposeError::DecodeFailed { .. }
        )
    }

    /// Maps composition errors to HTTP status codes
    ///
    /// User errors → 400 (Bad Request), everything else → 500.
    pub fn to_http_status(&self) -> u16 {
        if self.is_user_error() {
            400
        } else {
            500
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ComposeError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ComposeError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(message: impl Into<String>) -> Self {
        ComposeError::EncodeFailed {
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        ComposeError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for ComposeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound(profile) => ComposeError::ProfileNotFound { profile },
            other => ComposeError::invalid_config(other.to_string()),
        }
    }
}

impl From<WatermarkError> for ComposeError {
    fn from(err: WatermarkError) -> Self {
        match err {
            WatermarkError::FontError { path, message } => ComposeError::FontLoad { path, message },
            WatermarkError::RenderError(message) => ComposeError::RenderFailed { message },
        }
    }
}
