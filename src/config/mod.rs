// Configuration module
//
// Profiles are loaded from a YAML file with five tables: `settings`,
// `backgrounds`, `watermarks`, `formats` and `profiles`. Profiles reference
// the other tables by name and are resolved per request into an immutable
// `ResolvedProfile` (see `resolve`).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod error;
pub mod resolve;

pub use error::ConfigError;
pub use resolve::{Background, FormatCandidate, FormatSpec, ResolvedProfile};

/// Environment variable that points at an explicit profile file.
pub const CONFIG_ENV_VAR: &str = "CANVASFIT_CONFIG";

/// File name searched for when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "profiles.yaml";

pub const FORMAT_TYPE_FIXED: &str = "fixed";
pub const FORMAT_TYPE_AUTO: &str = "auto";

fn default_jpeg_quality() -> i64 {
    90
}

fn default_assets_path() -> String {
    "assets".to_string()
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub backgrounds: BTreeMap<String, BackgroundConfig>,
    #[serde(default)]
    pub watermarks: BTreeMap<String, WatermarkStyle>,
    #[serde(default)]
    pub formats: BTreeMap<String, FormatConfig>,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

/// Global settings shared by every profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default JPEG quality (1-100). Zero means "use the default" (90).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: i64,

    /// Base directory for relative font paths (default: "assets")
    #[serde(default = "default_assets_path")]
    pub assets_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            assets_path: default_assets_path(),
        }
    }
}

/// A named profile: references plus per-profile overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub background_ref: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_ref: Option<String>,

    pub format_ref: String,

    /// Overrides the format's padding when set (0-50)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_percent: Option<f64>,

    #[serde(default)]
    pub border_width: u32,

    #[serde(default)]
    pub border_color: String,

    /// Never enlarge sources smaller than the available area
    #[serde(default)]
    pub no_upscale: bool,

    /// Overrides `settings.jpeg_quality` when set to 1-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jpeg_quality: Option<i64>,
}

/// Output format definition, either `fixed` or `auto`.
///
/// ```yaml
/// formats:
///   square: { type: fixed, width: 1080, height: 1080 }
///   portrait: { type: fixed, width: 1080, height: 1350 }
///   auto: { type: auto, from_list: [square, portrait], padding_percent: 4 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(rename = "type")]
    pub format_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_list: Vec<String>,

    #[serde(default)]
    pub padding_percent: f64,
}

/// Background definition. `type` is one of solid, average, blur, stretch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(rename = "type")]
    pub background_type: String,

    /// Hex color for `solid` backgrounds
    #[serde(default)]
    pub color: String,

    /// Gaussian sigma for `blur` backgrounds
    #[serde(default)]
    pub blur_radius: f32,

    /// Black overlay opacity for `blur` backgrounds (0.0-1.0)
    #[serde(default)]
    pub darken: f32,
}

/// Text watermark style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkStyle {
    /// Font file; relative paths are resolved against `settings.assets_path`
    pub font: String,

    /// Font size (em size in pixels)
    pub size: f32,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Alignment keyword such as `bottom-right`, `top` or `center`
    #[serde(default)]
    pub align: String,

    #[serde(default)]
    pub offset_x: f32,

    #[serde(default)]
    pub offset_y: f32,

    #[serde(default)]
    pub outline: bool,

    #[serde(default)]
    pub outline_color: String,

    /// Outline radius in pixels; 0 renders as 2 when `outline` is on
    #[serde(default)]
    pub outline_width: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            font: String::new(),
            size: 0.0,
            color: default_color(),
            opacity: default_opacity(),
            align: String::new(),
            offset_x: 0.0,
            offset_y: 0.0,
            outline: false,
            outline_color: String::new(),
            outline_width: 0.0,
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;

        let mut substituted = String::with_capacity(yaml.len());
        let mut last = 0;
        for caps in re.captures_iter(yaml) {
            let (whole, var_name) = match (caps.get(0), caps.get(1)) {
                (Some(whole), Some(name)) => (whole, name.as_str()),
                _ => continue,
            };
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::MissingEnvVar(var_name.to_string()))?;
            substituted.push_str(&yaml[last..whole.start()]);
            substituted.push_str(&value);
            last = whole.end();
        }
        substituted.push_str(&yaml[last..]);

        let mut config: Config = serde_yaml::from_str(&substituted)?;
        config.apply_defaults();
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Read and validate a profile file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_file(path)?;
        config.validate()?;

        tracing::info!(
            config_file = %path.display(),
            profiles = config.profiles.len(),
            formats = config.formats.len(),
            backgrounds = config.backgrounds.len(),
            watermarks = config.watermarks.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Locate the default profile file and load it.
    pub fn load_default() -> Result<(Self, PathBuf), ConfigError> {
        let path = find_default_path()?;
        let config = Self::load(&path)?;
        Ok((config, path))
    }

    /// Zero quality and blank assets path mean "use the default".
    fn apply_defaults(&mut self) {
        if self.settings.jpeg_quality == 0 {
            self.settings.jpeg_quality = default_jpeg_quality();
        }
        if self.settings.assets_path.trim().is_empty() {
            self.settings.assets_path = default_assets_path();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.settings.jpeg_quality) {
            return Err(ConfigError::InvalidSetting {
                field: "jpeg_quality",
                reason: format!("out of range: {}", self.settings.jpeg_quality),
            });
        }

        for (name, format) in &self.formats {
            validate_format(name, format)?;
        }

        // Auto formats may only reference fixed formats, which also rules out cycles
        for (name, format) in &self.formats {
            if normalize_kind(&format.format_type) != FORMAT_TYPE_AUTO {
                continue;
            }
            for reference in &format.from_list {
                let candidate = self.formats.get(reference).ok_or_else(|| {
                    ConfigError::format(name, format!("references unknown format: {}", reference))
                })?;
                if normalize_kind(&candidate.format_type) != FORMAT_TYPE_FIXED {
                    return Err(ConfigError::format(
                        name,
                        format!("references non-fixed format: {}", reference),
                    ));
                }
            }
        }

        for (name, background) in &self.backgrounds {
            validate_background(name, background)?;
        }

        for (name, watermark) in &self.watermarks {
            validate_watermark(name, watermark)?;
        }

        for (name, profile) in &self.profiles {
            self.validate_profile(name, profile)?;
        }

        Ok(())
    }

    fn validate_profile(&self, name: &str, profile: &ProfileConfig) -> Result<(), ConfigError> {
        if profile.background_ref.trim().is_empty() {
            return Err(ConfigError::profile(name, "background_ref is required"));
        }
        if profile.format_ref.trim().is_empty() {
            return Err(ConfigError::profile(name, "format_ref is required"));
        }
        if !self.backgrounds.contains_key(&profile.background_ref) {
            return Err(ConfigError::profile(
                name,
                format!("background_ref not found: {}", profile.background_ref),
            ));
        }
        if !self.formats.contains_key(&profile.format_ref) {
            return Err(ConfigError::profile(
                name,
                format!("format_ref not found: {}", profile.format_ref),
            ));
        }
        if let Some(watermark_ref) = profile.watermark_reference() {
            if !self.watermarks.contains_key(watermark_ref) {
                return Err(ConfigError::profile(
                    name,
                    format!("watermark_ref not found: {}", watermark_ref),
                ));
            }
        }
        if let Some(quality) = profile.jpeg_quality {
            if quality != 0 && !(1..=100).contains(&quality) {
                return Err(ConfigError::profile(
                    name,
                    format!("jpeg_quality out of range: {}", quality),
                ));
            }
        }
        if let Some(padding) = profile.padding_percent {
            if !valid_padding(padding) {
                return Err(ConfigError::profile(name, "padding_percent must be 0..50"));
            }
        }
        Ok(())
    }
}

impl ProfileConfig {
    /// The watermark reference, treating an empty string as absent.
    pub fn watermark_reference(&self) -> Option<&str> {
        self.watermark_ref
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// Find a profile file without an explicit path.
///
/// Order: `$CANVASFIT_CONFIG`, `./profiles.yaml`, `./config/profiles.yaml`,
/// then `profiles.yaml` next to the running executable.
pub fn find_default_path() -> Result<PathBuf, ConfigError> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        let env_path = env_path.trim();
        if !env_path.is_empty() {
            let path = PathBuf::from(env_path);
            if path.is_file() {
                return Ok(path);
            }
            return Err(ConfigError::EnvPathNotFound(env_path.to_string()));
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        let candidates = [
            cwd.join(DEFAULT_CONFIG_FILE),
            cwd.join("config").join(DEFAULT_CONFIG_FILE),
        ];
        if let Some(found) = candidates.into_iter().find(|p| p.is_file()) {
            return Ok(found);
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let path = dir.join(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                return Ok(path);
            }
        }
    }

    Err(ConfigError::DefaultPathNotFound)
}

pub(crate) fn normalize_kind(kind: &str) -> String {
    kind.trim().to_lowercase()
}

fn valid_padding(padding: f64) -> bool {
    padding.is_finite() && (0.0..=50.0).contains(&padding)
}

pub(crate) fn validate_format(name: &str, format: &FormatConfig) -> Result<(), ConfigError> {
    let width = format.width.unwrap_or(0);
    let height = format.height.unwrap_or(0);

    match normalize_kind(&format.format_type).as_str() {
        FORMAT_TYPE_FIXED => {
            if width == 0 || height == 0 {
                return Err(ConfigError::format(
                    name,
                    "fixed format requires width and height",
                ));
            }
            if !format.from_list.is_empty() {
                return Err(ConfigError::format(name, "fixed format must not have from_list"));
            }
        }
        FORMAT_TYPE_AUTO => {
            if format.from_list.is_empty() {
                return Err(ConfigError::format(name, "auto format requires from_list"));
            }
            if width != 0 || height != 0 {
                return Err(ConfigError::format(
                    name,
                    "auto format must not have width/height",
                ));
            }
        }
        _ => {
            return Err(ConfigError::format(
                name,
                format!("unknown type: {}", format.format_type),
            ));
        }
    }

    if !valid_padding(format.padding_percent) {
        return Err(ConfigError::format(name, "padding_percent must be 0..50"));
    }
    Ok(())
}

pub(crate) fn validate_background(
    name: &str,
    background: &BackgroundConfig,
) -> Result<(), ConfigError> {
    if !resolve::is_known_background_type(&background.background_type) {
        // Unknown types degrade to a black canvas at render time
        tracing::warn!(
            background = name,
            background_type = %background.background_type,
            "Unknown background type, will render as black"
        );
    }
    if !background.darken.is_finite() || !(0.0..=1.0).contains(&background.darken) {
        return Err(ConfigError::background(name, "darken must be 0..1"));
    }
    if !background.blur_radius.is_finite() || background.blur_radius < 0.0 {
        return Err(ConfigError::background(name, "blur_radius must be >= 0"));
    }
    Ok(())
}

pub(crate) fn validate_watermark(name: &str, watermark: &WatermarkStyle) -> Result<(), ConfigError> {
    if watermark.font.trim().is_empty() {
        return Err(ConfigError::watermark(name, "font is required"));
    }
    if !watermark.size.is_finite() || watermark.size <= 0.0 {
        return Err(ConfigError::watermark(name, "size must be > 0"));
    }
    if !watermark.opacity.is_finite() || !(0.0..=1.0).contains(&watermark.opacity) {
        return Err(ConfigError::watermark(name, "opacity must be 0..1"));
    }
    if !watermark.outline_width.is_finite() || watermark.outline_width < 0.0 {
        return Err(ConfigError::watermark(name, "outline_width must be >= 0"));
    }
    Ok(())
}
