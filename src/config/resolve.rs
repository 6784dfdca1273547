//! Profile resolution.
//!
//! Turns a profile name into a [`ResolvedProfile`]: every reference is
//! dereferenced, every override is merged, and format/background kinds are
//! lifted into enums that only carry the fields their kind needs. Resolution
//! either succeeds completely or fails before any image work starts.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{
    normalize_kind, validate_background, validate_format, validate_watermark, BackgroundConfig,
    Config, ConfigError, FormatConfig, WatermarkStyle, FORMAT_TYPE_AUTO, FORMAT_TYPE_FIXED,
};

const BACKGROUND_SOLID: &str = "solid";
const BACKGROUND_AVERAGE: &str = "average";
const BACKGROUND_BLUR: &str = "blur";
const BACKGROUND_STRETCH: &str = "stretch";

/// A fixed format that an auto format may pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCandidate {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Resolved output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    /// Explicit canvas size.
    Fixed { width: u32, height: u32 },
    /// Pick the candidate closest to the source aspect ratio (list order).
    Auto { candidates: Vec<FormatCandidate> },
}

impl FormatSpec {
    /// Resolve a named format, dereferencing auto candidates.
    pub fn resolve(
        name: &str,
        formats: &BTreeMap<String, FormatConfig>,
    ) -> Result<Self, ConfigError> {
        let format = formats
            .get(name)
            .ok_or_else(|| ConfigError::FormatNotFound(name.to_string()))?;
        validate_format(name, format)?;

        match normalize_kind(&format.format_type).as_str() {
            FORMAT_TYPE_FIXED => Ok(FormatSpec::Fixed {
                width: format.width.unwrap_or(0),
                height: format.height.unwrap_or(0),
            }),
            FORMAT_TYPE_AUTO => {
                let mut candidates = Vec::with_capacity(format.from_list.len());
                for reference in &format.from_list {
                    let candidate = formats.get(reference).ok_or_else(|| {
                        ConfigError::format(
                            name,
                            format!("auto format references unknown format: {}", reference),
                        )
                    })?;
                    if normalize_kind(&candidate.format_type) != FORMAT_TYPE_FIXED {
                        return Err(ConfigError::format(
                            name,
                            format!("auto format references non-fixed format: {}", reference),
                        ));
                    }
                    validate_format(reference, candidate)?;
                    candidates.push(FormatCandidate {
                        name: reference.clone(),
                        width: candidate.width.unwrap_or(0),
                        height: candidate.height.unwrap_or(0),
                    });
                }
                Ok(FormatSpec::Auto { candidates })
            }
            // validate_format already rejected every other kind
            other => Err(ConfigError::format(name, format!("unknown type: {}", other))),
        }
    }
}

/// Resolved background strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    /// Flat fill with a hex color (malformed colors render white).
    Solid { color: String },
    /// Flat fill with the source's average color.
    Average,
    /// Blurred cover-fit of the source, optionally darkened.
    Blur { radius: f32, darken: f32 },
    /// Edge pixels of the fitted photo extrapolated to the canvas borders.
    Stretch,
    /// Type keyword not recognised; renders as opaque black.
    Unrecognized { kind: String },
}

impl Background {
    pub fn from_config(config: &BackgroundConfig) -> Self {
        match normalize_kind(&config.background_type).as_str() {
            BACKGROUND_SOLID => Background::Solid {
                color: config.color.clone(),
            },
            BACKGROUND_AVERAGE => Background::Average,
            BACKGROUND_BLUR => Background::Blur {
                radius: config.blur_radius,
                darken: config.darken,
            },
            BACKGROUND_STRETCH => Background::Stretch,
            _ => Background::Unrecognized {
                kind: config.background_type.clone(),
            },
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Background::Solid { .. } => BACKGROUND_SOLID,
            Background::Average => BACKGROUND_AVERAGE,
            Background::Blur { .. } => BACKGROUND_BLUR,
            Background::Stretch => BACKGROUND_STRETCH,
            Background::Unrecognized { kind } => kind,
        }
    }
}

pub(crate) fn is_known_background_type(kind: &str) -> bool {
    matches!(
        normalize_kind(kind).as_str(),
        BACKGROUND_SOLID | BACKGROUND_AVERAGE | BACKGROUND_BLUR | BACKGROUND_STRETCH
    )
}

/// Fully dereferenced instructions for one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub name: String,
    pub background: Background,
    pub watermark: Option<WatermarkStyle>,
    pub format: FormatSpec,
    pub format_name: String,
    /// Profile override, else the format's padding
    pub padding_percent: f64,
    pub border_width: u32,
    pub border_color: String,
    pub no_upscale: bool,
    /// Profile override, else `settings.jpeg_quality`
    pub jpeg_quality: u8,
    /// Base directory for relative font paths
    pub assets_path: PathBuf,
}

impl Config {
    /// Merge a profile with its references and overrides.
    pub fn resolve_profile(&self, name: &str) -> Result<ResolvedProfile, ConfigError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        let format = FormatSpec::resolve(&profile.format_ref, &self.formats)?;
        let format_padding = self
            .formats
            .get(&profile.format_ref)
            .map(|f| f.padding_percent)
            .unwrap_or(0.0);

        let background_config = self
            .backgrounds
            .get(&profile.background_ref)
            .ok_or_else(|| ConfigError::BackgroundNotFound(profile.background_ref.clone()))?;
        validate_background(&profile.background_ref, background_config)?;

        let watermark = match profile.watermark_reference() {
            Some(reference) => {
                let style = self
                    .watermarks
                    .get(reference)
                    .ok_or_else(|| ConfigError::WatermarkNotFound(reference.to_string()))?;
                validate_watermark(reference, style)?;
                Some(style.clone())
            }
            None => None,
        };

        let default_quality = match self.settings.jpeg_quality {
            0 => 90,
            q => q,
        };
        let jpeg_quality = profile
            .jpeg_quality
            .filter(|q| *q != 0)
            .unwrap_or(default_quality)
            .clamp(1, 100) as u8;

        let assets_path = match self.settings.assets_path.trim() {
            "" => "assets",
            path => path,
        };

        let resolved = ResolvedProfile {
            name: name.to_string(),
            background: Background::from_config(background_config),
            watermark,
            format,
            format_name: profile.format_ref.clone(),
            padding_percent: profile.padding_percent.unwrap_or(format_padding),
            border_width: profile.border_width,
            border_color: profile.border_color.clone(),
            no_upscale: profile.no_upscale,
            jpeg_quality,
            assets_path: PathBuf::from(assets_path),
        };

        tracing::debug!(
            profile = %resolved.name,
            format = %resolved.format_name,
            background = resolved.background.kind(),
            watermark = resolved.watermark.is_some(),
            padding_percent = resolved.padding_percent,
            jpeg_quality = resolved.jpeg_quality,
            "Resolved profile"
        );

        Ok(resolved)
    }
}
