use girder_kernel::config::load_config;
use serde::Deserialize;
use std::io::Write;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TestConfig {
    name: String,
    port: u16,
}

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("server.toml");
    let mut file = std::fs::File::create(&path).expect("create config");
    writeln!(file, "name = \"girder\"\nport = 4690").expect("write config");

    let cfg: TestConfig = load_config(Some(dir.path().join("server"))).expect("load");
    assert_eq!(cfg.name, "girder");
    assert_eq!(cfg.port, 4690);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result: Result<TestConfig, _> = load_config(Some(dir.path().join("absent")));
    assert!(result.is_err());
}
