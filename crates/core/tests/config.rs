use std::path::PathBuf;

use systract_core::config::{EngineConfig, DEFAULT_ENTRY_POINTS};

#[test]
fn defaults_target_go_executables() {
    let config = EngineConfig::default();
    assert_eq!(config.entry_points, DEFAULT_ENTRY_POINTS);
    assert_eq!(config.entry_points[0], "main.main");
    assert!(config.syscall_wrappers.iter().any(|w| w == "syscall.Syscall"));
    assert_eq!(config.jobs, None);
}

#[test]
fn loads_partial_yaml_keeping_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("systract.yaml");
    std::fs::write(&path, "jobs: 3\nentry_points:\n  - main.run\n").unwrap();

    let config = EngineConfig::load(&path).expect("load yaml");
    assert_eq!(config.jobs, Some(3));
    assert_eq!(config.entry_points, vec!["main.run"]);
    assert_eq!(config.syscall_wrappers, EngineConfig::default().syscall_wrappers);
}

#[test]
fn loads_json_by_extension() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("systract.json");
    let body = r#"{"syscall_wrappers":["runtime.rawsyscall"],"go_path":"/opt/go/bin/go"}"#;
    std::fs::write(&path, body).unwrap();

    let config = EngineConfig::load(&path).expect("load json");
    assert_eq!(config.syscall_wrappers, vec!["runtime.rawsyscall"]);
    assert_eq!(config.resolve_go_path(), PathBuf::from("/opt/go/bin/go"));
    assert_eq!(config.entry_points, EngineConfig::default().entry_points);
}

#[test]
fn empty_yaml_file_is_default_config() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("empty.yml");
    std::fs::write(&path, "\n").unwrap();
    assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
}

#[test]
fn malformed_config_reports_context() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse engine config JSON"));

    let missing = EngineConfig::load(&temp.path().join("nope.yaml")).unwrap_err();
    assert!(missing.to_string().contains("Failed to read engine config"));
}
