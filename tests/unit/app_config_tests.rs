/*!
 * Tests for application configuration
 */

use std::fs;

use readalong::app_config::{Config, LogLevel};
use tempfile::TempDir;

/// Test default configuration values
#[test]
fn test_default_withNoOverrides_shouldUsePackageDefaults() {
    let config = Config::default();
    assert_eq!(config.active_class, "media-overlay-active");
    assert_eq!(config.output_suffix, "_readalong");
    assert_eq!(config.log_level, LogLevel::Info);
    config.validate().unwrap();
}

/// Test loading a full config file
#[test]
fn test_from_file_withFullConfig_shouldLoadAllFields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(
        &path,
        r#"{"active_class": "-epub-media-overlay-active", "output_suffix": "_sync", "log_level": "debug"}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.active_class, "-epub-media-overlay-active");
    assert_eq!(config.output_suffix, "_sync");
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test that omitted fields fall back to defaults
#[test]
fn test_from_file_withPartialConfig_shouldFillDefaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(&path, r#"{"output_suffix": "_audio"}"#).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.output_suffix, "_audio");
    assert_eq!(config.active_class, "media-overlay-active");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that a missing file is an error
#[test]
fn test_from_file_withMissingFile_shouldFail() {
    assert!(Config::from_file("/nonexistent/conf.json").is_err());
}

/// Test that malformed JSON is an error
#[test]
fn test_from_file_withMalformedJson_shouldFail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(&path, "{not json").unwrap();
    assert!(Config::from_file(&path).is_err());
}

/// Test validation of the active class
#[test]
fn test_validate_withInvalidActiveClass_shouldFail() {
    let mut config = Config::default();
    config.active_class = "  ".to_string();
    assert!(config.validate().is_err());

    config.active_class = "two words".to_string();
    assert!(config.validate().is_err());
}

/// Test validation of the output suffix
#[test]
fn test_validate_withEmptySuffix_shouldFail() {
    let mut config = Config::default();
    config.output_suffix = "".to_string();
    assert!(config.validate().is_err());
}

/// Test log level conversion to the log facade
#[test]
fn test_to_level_filter_withEachLevel_shouldMap() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
}
