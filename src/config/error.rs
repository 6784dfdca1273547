//! Error types for configuration loading and profile resolution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Config path from CANVASFIT_CONFIG not found: {0}")]
    EnvPathNotFound(String),

    #[error("Default config not found (looked for profiles.yaml)")]
    DefaultPathNotFound,

    #[error("settings.{field}: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("formats.{name}: {reason}")]
    InvalidFormat { name: String, reason: String },

    #[error("backgrounds.{name}: {reason}")]
    InvalidBackground { name: String, reason: String },

    #[error("watermarks.{name}: {reason}")]
    InvalidWatermark { name: String, reason: String },

    #[error("profiles.{name}: {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Format not found: {0}")]
    FormatNotFound(String),

    #[error("Background not found: {0}")]
    BackgroundNotFound(String),

    #[error("Watermark not found: {0}")]
    WatermarkNotFound(String),
}

impl ConfigError {
    pub(crate) fn format(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidFormat {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn background(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidBackground {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn watermark(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidWatermark {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn profile(name: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidProfile {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_errors_name_the_missing_item() {
        let err = ConfigError::ProfileNotFound("story".to_string());
        assert_eq!(err.to_string(), "Profile not found: story");

        let err = ConfigError::FormatNotFound("portrait".to_string());
        assert_eq!(err.to_string(), "Format not found: portrait");
    }

    #[test]
    fn test_invalid_item_errors_carry_config_path() {
        let err = ConfigError::format("auto", "auto format requires from_list");
        assert_eq!(err.to_string(), "formats.auto: auto format requires from_list");

        let err = ConfigError::profile("default", "background_ref is required");
        assert_eq!(err.to_string(), "profiles.default: background_ref is required");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigError>();
    }
}
