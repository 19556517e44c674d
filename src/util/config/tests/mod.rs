//! Configuration tests

use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, WriterConfig::default());
    assert!(config.writer.circular);
    assert_eq!(config.writer.default_mode, WriteMode::Write);
    assert_eq!(config.log.level, LogLevel::Info);
}

#[test]
fn test_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[writer]\ndefault_mode = \"display\"\n").unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.writer.default_mode, WriteMode::Display);
    assert!(config.writer.circular);
    assert_eq!(config.writer.width_limit, None);
    assert_eq!(config.log.level, LogLevel::Info);
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = WriterConfig::default();
    config.writer.width_limit = Some(40);
    config.writer.circular = false;
    config.log.level = LogLevel::Debug;

    save_config_to(&config, &path).unwrap();
    assert_eq!(load_config_from(&path).unwrap(), config);
}

#[test]
fn test_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[writer\n").unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().starts_with("Config parse error"));
}

#[test]
fn test_unknown_mode_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[writer]\ndefault_mode = \"pretty\"\n").unwrap();
    assert!(load_config_from(&path).is_err());
}
