//! Profile files on disk: loading, environment substitution, validation
//! and resolution.

use super::common::PROFILES;
use canvasfit::config::{Background, Config, ConfigError, FormatSpec};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_profiles(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_profiles(PROFILES);
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.profiles.len(), 7);
    assert_eq!(config.settings.jpeg_quality, 88);
}

#[test]
fn test_resolve_is_stable() {
    let file = write_profiles(PROFILES);
    let config = Config::load(file.path()).unwrap();

    let first = config.resolve_profile("adaptive").unwrap();
    let second = config.resolve_profile("adaptive").unwrap();
    assert_eq!(first, second);

    assert_eq!(first.padding_percent, 5.0);
    assert_eq!(first.jpeg_quality, 70);
    assert!(matches!(first.background, Background::Blur { .. }));
    match &first.format {
        FormatSpec::Auto { candidates } => {
            let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["square", "portrait", "landscape"]);
        }
        other => panic!("expected auto format, got {:?}", other),
    }
}

#[test]
fn test_profile_padding_overrides_format() {
    let config = Config::from_yaml_with_env(PROFILES).unwrap();
    let framed = config.resolve_profile("framed").unwrap();
    assert_eq!(framed.padding_percent, 10.0);
    assert_eq!(framed.border_width, 3);
    assert_eq!(framed.jpeg_quality, 88);
}

#[test]
fn test_env_substitution_in_file() {
    std::env::set_var("CANVASFIT_IT_ASSETS", "/opt/fonts");
    let file = write_profiles(
        "settings:\n  assets_path: \"${CANVASFIT_IT_ASSETS}\"\nprofiles: {}\n",
    );
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.settings.assets_path, "/opt/fonts");
}

#[test]
fn test_dangling_reference_rejected_on_load() {
    let file = write_profiles(
        r##"
backgrounds:
  black: { type: solid, color: "#000" }
formats:
  square: { type: fixed, width: 100, height: 100 }
profiles:
  broken:
    background_ref: black
    format_ref: widescreen
"##,
    );
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProfile { .. }));
}

#[test]
fn test_auto_format_referencing_auto_rejected() {
    let file = write_profiles(
        r##"
formats:
  square: { type: fixed, width: 100, height: 100 }
  inner: { type: auto, from_list: [square] }
  outer: { type: auto, from_list: [inner] }
"##,
    );
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidFormat { .. }));
}

#[test]
fn test_unknown_background_type_still_loads() {
    let file = write_profiles(
        r##"
backgrounds:
  odd: { type: plasma }
formats:
  square: { type: fixed, width: 100, height: 100 }
profiles:
  odd:
    background_ref: odd
    format_ref: square
"##,
    );
    let config = Config::load(file.path()).unwrap();
    let resolved = config.resolve_profile("odd").unwrap();
    assert!(matches!(resolved.background, Background::Unrecognized { .. }));
}
