/*!
 * Tests for application configuration functionality
 */

use crate::common;
use quizterm::app_config::{Config, LogLevel};

/// A missing config file is created with default values
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("quizterm.json");

    let config = Config::load_or_create(&path).expect("Failed to create config");

    assert_eq!(config, Config::default());
    assert!(path.exists());
    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded, config);
}

/// Values in an existing file override defaults
#[test]
fn test_loadOrCreate_withExistingFile_shouldReadValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "custom.json",
        r#"{
            "database_path": "/tmp/quiz.db",
            "questions_per_quiz": 3,
            "subjects": ["Rust", "Go"],
            "log_level": "info"
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.questions_per_quiz, 3);
    assert_eq!(config.subjects, vec!["Rust", "Go"]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.database_path().unwrap().to_string_lossy(), "/tmp/quiz.db");
    assert!(config.validate().is_ok());
}

/// Malformed JSON is reported, not replaced
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "broken.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

/// Empty subject list is rejected
#[test]
fn test_validate_withNoSubjects_shouldFail() {
    let config = Config {
        subjects: Vec::new(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}
