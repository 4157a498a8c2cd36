// =====
// TESTS: 4
// =====
//
// Loading engine config and scenarios from disk.

use feedline::config::{EngineConfig, KeyboardLeniency, ListOrientation, load_config};
use feedline::error::FeedError;
use feedline::scenario::load_scenario;
use pretty_assertions::assert_eq;
use std::io::Write;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn partial_config_keeps_defaults() {
    let file = write_temp(
        r#"{
            "at_bottom_threshold": 120,
            "orientation": "normal",
            "keyboard_leniency": {"kind": "fixed", "extra": 80},
            "swipe": {"trigger_threshold": 50}
        }"#,
    );
    let config = load_config(file.path()).unwrap();
    let defaults = EngineConfig::default();
    assert!((config.at_bottom_threshold - 120.0).abs() < f32::EPSILON);
    assert_eq!(config.orientation, ListOrientation::Normal);
    assert_eq!(config.keyboard_leniency, KeyboardLeniency::Fixed { extra: 80.0 });
    assert!((config.swipe.trigger_threshold - 50.0).abs() < f32::EPSILON);
    assert!((config.swipe.max_translation - defaults.swipe.max_translation).abs() < f32::EPSILON);
    assert_eq!(config.spring, defaults.spring);
    assert_eq!(config.scroll_retry_delay_ms, defaults.scroll_retry_delay_ms);
}

#[test]
fn missing_config_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FeedError::ConfigUnreadable { .. }));
    assert_eq!(err.exit_code(), FeedError::CONFIG_UNREADABLE_EXIT_CODE);
}

#[test]
fn negative_threshold_is_rejected() {
    let file = write_temp(r#"{"at_bottom_threshold": -5}"#);
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, FeedError::InvalidConfig(ref msg) if msg.contains("at_bottom_threshold")));
}

#[test]
fn malformed_scenario_is_invalid() {
    let file = write_temp(r#"{"steps": [{"at_ms": 0, "action": "teleport"}]}"#);
    let err = load_scenario(file.path()).unwrap_err();
    assert!(matches!(err, FeedError::InvalidScenario(_)));
    assert_eq!(err.exit_code(), FeedError::INVALID_SCENARIO_EXIT_CODE);
}
