//! Config Validation Tests
//!
//! Typo detection and range validation for `quakefrac.toml`, exercised
//! independently from the rest of the dashboard.

use quakefrac::config::validation::{known_config_keys, suggest_correction, validate_unknown_keys};
use quakefrac::config::{ConfigError, DashboardConfig, DistanceMode};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_charts_section_warns_with_suggestion() {
    let toml_str = r#"
[charts]
histogram_bin_widht = 0.2
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("histogram_bin_widht"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("charts.histogram_bin_width"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn unknown_section_warns() {
    let warnings = validate_unknown_keys("[mapp]\nzoom_start = 4\n");
    assert!(!warnings.is_empty());
    assert!(warnings.iter().any(|w| w.field.starts_with("mapp")));
}

#[test]
fn valid_document_has_no_warnings() {
    let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[data]
distance_mode = "prejoined"

[map.bounds]
south = 24.0
west = -125.0
north = 50.0
east = -66.0
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
}

#[test]
fn suggestion_only_for_close_keys() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("map.zoom_strat", &known).as_deref(), Some("map.zoom_start"));
    assert_eq!(suggest_correction("completely.unrelated.key", &known), None);
}

#[test]
fn unknown_keys_do_not_break_loading() {
    let config = DashboardConfig::from_toml_str("[charts]\ncolour = \"blue\"\n").unwrap();
    assert_eq!(config, DashboardConfig::default());
}

// ============================================================================
// Range Validation
// ============================================================================

fn validation_errors(toml_str: &str) -> Vec<String> {
    match DashboardConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn zero_bin_width_is_rejected() {
    let errors = validation_errors("[charts]\nhistogram_bin_width = 0.0\n");
    assert!(errors.iter().any(|e| e.contains("histogram_bin_width")));
}

#[test]
fn pull_outside_unit_interval_is_rejected() {
    let errors = validation_errors("[charts]\npie_pull = 1.5\n");
    assert!(errors.iter().any(|e| e.contains("pie_pull")));
}

#[test]
fn zoom_above_max_is_rejected() {
    let errors = validation_errors("[map]\nzoom_start = 19\n");
    assert!(errors.iter().any(|e| e.contains("zoom_start")));
}

#[test]
fn empty_site_list_is_rejected() {
    let errors = validation_errors("[data]\nwell_sites = []\n");
    assert!(errors.iter().any(|e| e.contains("well_sites")));
}

#[test]
fn all_errors_are_reported_together() {
    let errors = validation_errors("[charts]\nhistogram_bin_width = -1.0\npie_pull = 2.0\n");
    assert!(errors.len() >= 2);
}

#[test]
fn distance_mode_parses() {
    let config = DashboardConfig::from_toml_str("[data]\ndistance_mode = \"prejoined\"\n").unwrap();
    assert_eq!(config.data.distance_mode, DistanceMode::Prejoined);
    assert!(DashboardConfig::from_toml_str("[data]\ndistance_mode = \"guess\"\n").is_err());
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quakefrac.toml");
    let mut config = DashboardConfig::default();
    config.charts.default_state = "OK".into();
    config.save_to_file(&path).unwrap();

    let loaded = DashboardConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DashboardConfig::load_from_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}
