//! Tests for resolving service settings the way a host does
//!
//! These tests verify:
//! - The exposed schemas serialize to the host-facing JSON shape
//! - Overrides read from a JSON settings file are applied and checked
//! - Values outside the declared bounds are rejected before any action runs

use retime_core::services::{slow_down, speed_up};
use retime_core::{ConfigStore, ConfigValue, CoreError, edit_services};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_slow_down_schema_json() {
    let json = serde_json::to_value(slow_down::schema()).unwrap();
    assert_eq!(
        json["slowDownPercent"],
        serde_json::json!({
            "title": "Slow Down Percentage",
            "description": "Slow down the video by the given percentage. For example, 0.5 means half speed and double the duration.",
            "type": "number",
            "minimum": 0.0,
            "maximum": 1.0,
            "default": 0.5,
            "required": true
        })
    );
    assert_eq!(json["slowDownAudio"]["type"], "boolean");
    assert_eq!(json["slowDownAudio"]["default"], true);
    assert!(json["slowDownAudio"].get("required").is_none());
}

#[test]
fn test_speed_up_schema_json() {
    let json = serde_json::to_value(speed_up::schema()).unwrap();
    assert_eq!(json["speedUpPercent"]["minimum"], 1.0);
    assert!(json["speedUpPercent"].get("maximum").is_none());
    assert_eq!(json["speedUpPercent"]["default"], 2.0);
    assert_eq!(json["speedUpPercent"]["required"], true);
    assert_eq!(json["speedUpAudio"]["default"], true);
}

#[test]
fn test_every_service_resolves_with_defaults() {
    for service in edit_services() {
        let store = ConfigStore::resolve(&service.config, Vec::new()).unwrap();
        assert_eq!(store.iter().count(), service.config.len(), "{}", service.title);
    }
}

#[test]
fn test_overrides_from_settings_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("slow-down.json");
    fs::write(&path, r#"{ "slowDownPercent": 0.25, "slowDownAudio": false }"#)?;

    let overrides = ConfigStore::overrides_from_json_file(&path)?;
    let store = ConfigStore::resolve(&slow_down::schema(), overrides)?;

    assert_eq!(store.number(slow_down::SLOW_DOWN_PERCENT)?, 0.25);
    assert!(!store.boolean(slow_down::SLOW_DOWN_AUDIO)?);
    Ok(())
}

#[test]
fn test_missing_settings_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let result = ConfigStore::overrides_from_json_file(&dir.path().join("nope.json"));
    assert!(matches!(result, Err(CoreError::Config(_))));
}

#[test]
fn test_out_of_bounds_values_rejected() {
    let too_fast = ConfigStore::resolve(
        &slow_down::schema(),
        vec![(slow_down::SLOW_DOWN_PERCENT.to_string(), ConfigValue::Number(1.5))],
    );
    assert!(matches!(too_fast, Err(CoreError::Config(_))));

    let too_slow = ConfigStore::resolve(
        &speed_up::schema(),
        vec![(speed_up::SPEED_UP_PERCENT.to_string(), ConfigValue::Number(0.5))],
    );
    assert!(matches!(too_slow, Err(CoreError::Config(_))));
}

#[test]
fn test_type_mismatch_rejected() {
    let result = ConfigStore::resolve(
        &speed_up::schema(),
        vec![(speed_up::SPEED_UP_AUDIO.to_string(), ConfigValue::Number(1.0))],
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("speedUpAudio: expected a boolean"));
}
