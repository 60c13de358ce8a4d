use std::collections::HashMap;
use workq::config::{Config, EngineConfig};
use workq::error::Error;
use workq::queue::MAX_PRIORITY;

#[test]
fn engine_config_defaults() {
    let config = EngineConfig::from_toml_str("").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.priority_for("anything"), MAX_PRIORITY);
    assert!(!config.dedup_to_end_for("anything"));
    assert!(config.work_types().is_empty());
}

#[test]
fn engine_config_resolves_per_type_policy() {
    let config = EngineConfig::from_toml_str(
        r#"
        default_priority = 100

        [[work_type]]
        name = "sync"
        priority = 3

        [[work_type]]
        name = "reindex"
        dedup_to_end = true
        "#,
    )
    .unwrap();

    assert_eq!(config.priority_for("sync"), 3);
    assert_eq!(config.priority_for("reindex"), 100);
    assert_eq!(config.priority_for("unknown"), 100);
    assert!(!config.dedup_to_end_for("sync"));
    assert!(config.dedup_to_end_for("reindex"));

    let names: Vec<_> = config.work_types().iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["reindex", "sync"]);
}

#[test]
fn global_dedup_to_end_applies_to_every_type() {
    let config = EngineConfig::from_toml_str("dedup_to_end = true").unwrap();
    assert!(config.dedup_to_end_for("sync"));
}

#[test]
fn engine_config_rejects_bad_input() {
    for bad in [
        "default_priority = \"high\"",
        "unknown_key = 1",
        "[[work_type]]\nname = \"a\"\n[[work_type]]\nname = \"a\"",
    ] {
        let err = EngineConfig::from_toml_str(bad).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{bad}: {err:?}");
    }
}

#[test]
fn engine_config_load_reports_missing_file() {
    let err = EngineConfig::load(std::path::Path::new("/nonexistent/workq.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn config_defaults_when_unset() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.log_level, "info");
    assert!(config.engine_config.is_none());
    assert_eq!(config.load_engine_config().unwrap(), EngineConfig::default());
}

#[test]
fn config_reads_overrides() {
    let config = Config::from_lookup(lookup_from(&[
        ("WORKQ_LOG_LEVEL", "workq=debug"),
        ("WORKQ_CONFIG", "/etc/workq.toml"),
    ]))
    .unwrap();
    assert_eq!(config.log_level, "workq=debug");
    assert_eq!(
        config.engine_config.as_deref(),
        Some(std::path::Path::new("/etc/workq.toml"))
    );
}

#[test]
fn config_rejects_blank_config_path() {
    let result = Config::from_lookup(lookup_from(&[("WORKQ_CONFIG", "  ")]));
    assert!(matches!(result, Err(Error::Config(_))));
}
