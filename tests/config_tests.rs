//! Configuration tests for droid-doctor
//!
//! Tests for TOML parsing, validation, and configuration file handling.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use droid_doctor::config::CONFIG_FILE;
use droid_doctor::DoctorConfig;

/// Helper to set up a test directory
fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Helper to create a config file
fn create_config_file(dir: &TempDir, content: &str) {
    let path = dir.path().join(CONFIG_FILE);
    fs::write(path, content).expect("Failed to write config file");
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_full_config() {
    let dir = setup_test_dir();
    create_config_file(
        &dir,
        r#"
# Local SDK layout
[sdk]
manager = "/opt/android/cmdline-tools/latest/bin/sdkmanager"
home = "/opt/android"   # inline comment

[checks]
disabled = ["Android SDK"]
timeout_seconds = 45
"#,
    );

    let config = DoctorConfig::load_if_exists(dir.path()).unwrap().unwrap();

    assert_eq!(
        config.sdk.manager,
        Some(PathBuf::from("/opt/android/cmdline-tools/latest/bin/sdkmanager"))
    );
    assert_eq!(config.sdk.home, Some(PathBuf::from("/opt/android")));
    assert_eq!(config.command_timeout(), Duration::from_secs(45));
    assert!(config.is_check_disabled("android sdk"));
}

#[test]
fn test_parse_empty_config_uses_defaults() {
    let dir = setup_test_dir();
    create_config_file(&dir, "");

    let config = DoctorConfig::load_if_exists(dir.path()).unwrap().unwrap();

    assert_eq!(config.checks.timeout_seconds, 30);
    assert!(config.checks.disabled.is_empty());
    assert!(config.sdk.home.is_none());
}

#[test]
fn test_missing_config_file() {
    let dir = setup_test_dir();
    assert!(DoctorConfig::load_if_exists(dir.path()).unwrap().is_none());

    let config = DoctorConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
    assert_eq!(config.checks.timeout_seconds, 30);
}

#[test]
fn test_invalid_toml_reports_path() {
    let dir = setup_test_dir();
    create_config_file(&dir, "[checks\ntimeout_seconds = ");

    let err = DoctorConfig::load_if_exists(dir.path()).unwrap_err();
    assert!(format!("{:#}", err).contains(CONFIG_FILE));
}

#[test]
fn test_wrong_type_is_rejected() {
    let dir = setup_test_dir();
    create_config_file(&dir, "[checks]\ntimeout_seconds = \"soon\"\n");

    assert!(DoctorConfig::load_if_exists(dir.path()).is_err());
}

// ============================================================================
// Save / validate
// ============================================================================

#[test]
fn test_create_default_writes_loadable_file() {
    let dir = setup_test_dir();
    let path = dir.path().join(CONFIG_FILE);

    DoctorConfig::create_default(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# droid-doctor configuration"));

    let loaded = DoctorConfig::load_from(&path).unwrap();
    assert_eq!(loaded.checks.timeout_seconds, 30);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_validate_rejects_missing_sdk_manager() {
    let dir = setup_test_dir();
    let mut config = DoctorConfig::default();
    config.sdk.manager = Some(dir.path().join("no-such-sdkmanager"));

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("sdk.manager"));
}

#[test]
fn test_validate_accepts_existing_sdk_paths() {
    let dir = setup_test_dir();
    let manager = dir.path().join("sdkmanager");
    fs::write(&manager, "").unwrap();

    let mut config = DoctorConfig::default();
    config.sdk.manager = Some(manager);
    config.sdk.home = Some(dir.path().to_path_buf());

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_missing_sdk_home() {
    let dir = setup_test_dir();
    let mut config = DoctorConfig::default();
    config.sdk.home = Some(dir.path().join("android-sdk"));

    assert!(config.validate().is_err());
}
