use std::path::PathBuf;

use apilevels_config::{ApiLevelsConfig, ConfigError, ConfigWarning, LoggingConfig};
use apilevels_history::CleanupOptions;
use pretty_assertions::assert_eq;

#[test]
fn loads_full_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apilevels.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "debug"
json = true
stderr = false
file = "apilevels.log"

[versions]
min = 4
max = 34

[cleanup]
inline_hidden_super_classes = false
"#,
    )
    .unwrap();

    let config = ApiLevelsConfig::load_from_path(&path).unwrap();
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "debug".to_owned(),
            json: true,
            stderr: false,
            file: Some(PathBuf::from("apilevels.log")),
        }
    );
    assert_eq!(
        config.cleanup_options(),
        CleanupOptions {
            inline_hidden_super_classes: false,
            ..CleanupOptions::default()
        }
    );

    let api = config.new_api();
    assert_eq!((api.min(), api.max()), (4, 34));
    assert!(api.is_empty());
}

#[test]
fn empty_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apilevels.toml");
    std::fs::write(&path, "").unwrap();

    let (config, diagnostics) = ApiLevelsConfig::load_from_path_with_diagnostics(&path).unwrap();
    assert_eq!(config, ApiLevelsConfig::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn reports_unknown_keys_and_validation_errors() {
    let (config, diagnostics) = ApiLevelsConfig::load_from_str_with_diagnostics(
        r#"
[versions]
min = 30
max = 21

[cleanup]
prune_packge_private = false

[logging]
level = "apilevels=verbose"
"#,
    )
    .unwrap();

    assert!(config.cleanup.prune_package_private);
    assert_eq!(diagnostics.unknown_keys, vec!["cleanup.prune_packge_private"]);
    assert!(!diagnostics.is_ok());
    assert!(matches!(
        diagnostics.warnings.as_slice(),
        [ConfigWarning::LoggingLevelInvalid { .. }]
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ApiLevelsConfig::load_from_path(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn type_errors_do_not_echo_the_input() {
    let err = ApiLevelsConfig::load_from_str_with_diagnostics("[versions]\nmin = \"four\"\n")
        .unwrap_err();
    match err {
        ConfigError::Toml(message) => assert!(!message.contains("min = "), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}
