//! Tests for types

use super::*;
use proptest::prelude::*;

#[test]
fn test_debounce_config_default() {
    let config = DebounceConfig::default();
    assert_eq!(config.wait_ms, 300);
    assert!(!config.leading);
    assert!(config.trailing);
    assert_eq!(config.max_wait_ms, None);
}

#[test]
fn test_missing_debounce_section_uses_default() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.debounce, DebounceConfig::default());
}

#[test]
fn test_empty_debounce_section_uses_default() {
    let toml = r#"
[debounce]
"#;
    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.debounce, DebounceConfig::default());
}

#[test]
fn test_parse_all_fields() {
    let toml = r#"
[debounce]
wait_ms = 2000
leading = true
trailing = false
max_wait_ms = 5000
"#;
    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(
        config.debounce,
        DebounceConfig {
            wait_ms: 2000,
            leading: true,
            trailing: false,
            max_wait_ms: Some(5000),
        }
    );
}

#[test]
fn test_to_options_converts_millis() {
    let config = DebounceConfig {
        wait_ms: 0,
        leading: true,
        trailing: false,
        max_wait_ms: Some(0),
    };
    let options = config.to_options().unwrap();
    assert_eq!(options.wait, Duration::ZERO);
    assert!(options.leading);
    assert!(!options.trailing);
    assert_eq!(options.max_wait, Some(Duration::ZERO));
}

#[test]
fn test_negative_wait_is_rejected() {
    let config = DebounceConfig {
        wait_ms: -1,
        ..DebounceConfig::default()
    };
    let err = config.to_options().unwrap_err();
    assert!(matches!(err, DebounceError::InvalidConfig(_)));
    assert!(err.to_string().contains("wait_ms"));
}

#[test]
fn test_negative_max_wait_is_rejected() {
    let config = DebounceConfig {
        max_wait_ms: Some(-250),
        ..DebounceConfig::default()
    };
    let err = config.to_options().unwrap_err();
    assert!(err.to_string().contains("max_wait_ms must not be negative, got -250"));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let toml = r#"
[debounce]
wait_ms = 10
color = "blue"
"#;
    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.debounce.wait_ms, 10);
}

// Any non-negative pair of durations converts without loss
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_non_negative_values_convert(wait in 0i64..1_000_000, max_wait in prop::option::of(0i64..1_000_000)) {
        let config = DebounceConfig {
            wait_ms: wait,
            max_wait_ms: max_wait,
            ..DebounceConfig::default()
        };
        let options = config.to_options().unwrap();
        prop_assert_eq!(options.wait.as_millis() as i64, wait);
        prop_assert_eq!(options.max_wait.map(|d| d.as_millis() as i64), max_wait);
    }

    #[test]
    fn prop_negative_values_rejected(wait in i64::MIN..0) {
        let config = DebounceConfig {
            wait_ms: wait,
            ..DebounceConfig::default()
        };
        prop_assert!(config.to_options().is_err());
    }
}
