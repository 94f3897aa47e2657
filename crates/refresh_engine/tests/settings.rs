use std::io::Write;

use pretty_assertions::assert_eq;
use refresh_core::{Endpoint, LabelStyle, LookupPolicy, RefreshConfig};
use refresh_engine::{load_config, parse_config, ConfigError};
use tempfile::NamedTempFile;

#[test]
fn empty_config_uses_defaults() {
    let config = parse_config("()").unwrap();
    assert_eq!(config, RefreshConfig::default());
    assert_eq!(config.control_selector, "button.refresh");
    assert_eq!(config.failure_prefix, "Couldn't refresh!");
}

#[test]
fn config_overrides_endpoint_lookup_and_label() {
    let config = parse_config(
        r#"(
            endpoint: Relative("go"),
            lookup: DescendantsOnly,
            label_style: Fixed(busy: "Refreshing..."),
        )"#,
    )
    .unwrap();

    assert_eq!(config.endpoint, Endpoint::Relative("go".to_string()));
    assert_eq!(config.lookup, LookupPolicy::DescendantsOnly);
    assert_eq!(
        config.label_style,
        LabelStyle::Fixed {
            busy: "Refreshing...".to_string()
        }
    );
    assert_eq!(config.control_selector, "button.refresh");
}

#[test]
fn config_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"(control_selector: "a.refresh-link")"#).unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.control_selector, "a.refresh-link");
}

#[test]
fn malformed_and_missing_configs_are_errors() {
    assert!(matches!(
        parse_config("(endpoint: Sideways)"),
        Err(ConfigError::Parse(_))
    ));
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_config(&dir.path().join("missing.ron")),
        Err(ConfigError::Io(_))
    ));
}
