//! Integration tests for option loading
//!
//! These tests verify:
//! - Defaults when no options are given
//! - camelCase wire names and the legacy aliases
//! - Rejection of non-mapping option values
//! - OptionsLoader file handling

use camino::Utf8PathBuf;
use serde_yaml_ng::Value;
use stalesweep::config::OPTIONS_FILE_NAME;
use stalesweep::{CleanError, CleanOptions, OptionsLoader, RawCleanOptions};
use std::fs;
use tempfile::TempDir;

fn create_loader() -> (OptionsLoader, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (OptionsLoader::new(dir), temp_dir)
}

#[test]
fn test_defaults() {
    let options = CleanOptions::from_value(&Value::Null).unwrap();

    assert!(!options.dry());
    assert!(!options.verbose());
    assert!(options.clean_stale_assets());
    assert!(options.protect_assets());
    assert_eq!(options.clean_once_before_patterns(), ["**/*".to_string()]);
    assert!(options.clean_after_every_build_patterns().is_empty());
    assert!(!options.allow_outside_project_root());
    assert_eq!(options, CleanOptions::default());
}

#[test]
fn test_camel_case_fields() {
    let options = CleanOptions::from_yaml_str(
        r#"
verbose: true
cleanStaleAssets: false
protectAssets: false
cleanOnceBeforePatterns: []
cleanAfterEveryBuildPatterns: ["*.map", "report.txt"]
"#,
    )
    .unwrap();

    assert!(options.verbose());
    assert!(!options.clean_stale_assets());
    assert!(!options.protect_assets());
    assert!(options.clean_once_before_patterns().is_empty());
    assert_eq!(
        options.clean_after_every_build_patterns(),
        ["*.map".to_string(), "report.txt".to_string()]
    );
}

#[test]
fn test_legacy_aliases() {
    let options = CleanOptions::from_yaml_str(
        r#"
cleanStaleWebpackAssets: false
protectWebpackAssets: false
cleanOnceBeforeBuildPatterns: ["**/*", "!static-files*"]
dangerouslyAllowCleanPatternsOutsideProject: true
"#,
    )
    .unwrap();

    assert!(!options.clean_stale_assets());
    assert!(!options.protect_assets());
    assert_eq!(
        options.clean_once_before_patterns(),
        ["**/*".to_string(), "!static-files*".to_string()]
    );
    assert!(options.allow_outside_project_root());
}

#[test]
fn test_json_options() {
    let options =
        CleanOptions::from_yaml_str(r#"{"dry": true, "cleanAfterEveryBuildPatterns": ["*.tmp"]}"#)
            .unwrap();

    assert!(options.dry());
    assert!(options.verbose());
    assert_eq!(options.clean_after_every_build_patterns(), ["*.tmp".to_string()]);
}

#[test]
fn test_allow_outside_makes_dry_unless_overridden() {
    let implied = CleanOptions::resolve(&RawCleanOptions {
        allow_outside_project_root: Some(true),
        ..Default::default()
    });
    assert!(implied.dry());
    assert!(implied.verbose());

    let explicit = CleanOptions::resolve(&RawCleanOptions {
        allow_outside_project_root: Some(true),
        dry: Some(false),
        ..Default::default()
    });
    assert!(!explicit.dry());
    assert!(!explicit.verbose());
}

#[test]
fn test_positional_list_is_rejected_with_hint() {
    let err = CleanOptions::from_yaml_str("[\"**/*\"]").unwrap_err();

    match err {
        CleanError::InvalidConfiguration(message) => {
            assert!(message.contains("cleanOnceBeforePatterns"));
        }
        other => panic!("Expected InvalidConfiguration, got: {:?}", other),
    }
}

#[test]
fn test_scalar_options_are_rejected() {
    for text in ["true", "42", "\"dist\""] {
        let result = CleanOptions::from_yaml_str(text);
        assert!(
            matches!(result, Err(CleanError::InvalidConfiguration(_))),
            "{} should be rejected",
            text
        );
    }
}

#[test]
fn test_wrong_field_type_is_rejected() {
    let result = CleanOptions::from_yaml_str("cleanOnceBeforePatterns: 5");
    assert!(matches!(result, Err(CleanError::InvalidConfiguration(_))));
}

#[test]
fn test_loader_missing_file_gives_defaults() {
    let (loader, _temp_dir) = create_loader();

    assert!(!loader.options_path().exists());
    assert_eq!(loader.load_options().unwrap(), CleanOptions::default());
}

#[test]
fn test_loader_reads_hand_written_file() {
    let (loader, _temp_dir) = create_loader();
    fs::write(
        loader.config_dir().join(OPTIONS_FILE_NAME),
        "protectWebpackAssets: false\ncleanAfterEveryBuildPatterns:\n  - '*.log'\n",
    )
    .unwrap();

    let options = loader.load_options().unwrap();

    assert!(!options.protect_assets());
    assert_eq!(options.clean_after_every_build_patterns(), ["*.log".to_string()]);
}

#[test]
fn test_loader_creates_missing_directory_on_save() {
    let temp_dir = TempDir::new().unwrap();
    let nested = Utf8PathBuf::try_from(temp_dir.path().join("nested/config")).unwrap();
    let loader = OptionsLoader::new(&nested);

    let raw = RawCleanOptions {
        clean_once_before_patterns: Some(vec!["**/*".to_string(), "!keep/**".to_string()]),
        ..Default::default()
    };
    loader.save_options(&raw).unwrap();

    assert!(nested.join(OPTIONS_FILE_NAME).exists());
    assert_eq!(loader.load_options().unwrap(), CleanOptions::resolve(&raw));
}

#[test]
fn test_loader_reports_invalid_file() {
    let (loader, _temp_dir) = create_loader();
    fs::write(loader.options_path(), "dry: [not, a, bool]\n").unwrap();

    let err = loader.load_options().unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Failed to parse options file"));
    assert!(message.contains(OPTIONS_FILE_NAME));
}
