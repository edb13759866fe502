//! Integration tests for logging functionality
//!
//! The global subscriber can only be installed once per process, so this
//! file holds a single test that initializes it.

use piiflag::config::{LoggingConfig, ScoringConfig};
use piiflag::logging::init_logging;
use piiflag::scoring::{ModeSelector, ScoringMode};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "./logs");
}

#[test]
fn test_file_logging_records_mode_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    let guard = init_logging("info", &config).expect("Failed to initialize logging");
    assert!(log_path.is_dir());

    let engine = ModeSelector::new(&ScoringConfig::default(), temp_dir.path().join("absent.json"))
        .resolve(ScoringMode::Auto)
        .unwrap();
    assert_eq!(engine.mode_name(), "regex");

    // flushes the non-blocking writer
    drop(guard);

    let contents: String = fs::read_dir(&log_path)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("piiflag.log"))
        .map(|entry| fs::read_to_string(entry.path()).unwrap())
        .collect();

    let fallback = contents
        .lines()
        .find(|line| line.contains("falling back to regex-only"))
        .expect("fallback warning not logged");
    let event: serde_json::Value = serde_json::from_str(fallback).unwrap();
    assert_eq!(event["level"], "WARN");
}
