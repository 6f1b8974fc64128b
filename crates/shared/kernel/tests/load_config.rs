use bhub_kernel::config::load_config;
use serde::Deserialize;
use std::fs;

#[derive(Default, Deserialize)]
#[serde(default)]
struct TestConfig {
    port: u16,
    name: String,
}

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("server.toml");
    fs::write(&path, "port = 8080\nname = \"bundlehub\"\n").expect("write config");

    let cfg: TestConfig = load_config(Some(&path)).expect("load config");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.name, "bundlehub");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("does-not-exist.toml");

    let result = load_config::<TestConfig>(Some(&path));
    assert!(result.is_err());
}
