use std::time::Duration;

use spmtask_core::config::{Config, CONFIG_FILE};
use spmtask_core::error::Error;
use tempfile::TempDir;

#[test]
fn test_parse_config() {
    let toml = r#"
[discovery]
timeout_ms = 5000

[server]
enabled = true
path = "/usr/bin/sourcekit-lsp"
toolchain_path = "/Library/Developer/Toolchains/swift-latest.xctoolchain"
"#;

    let config: Config = toml::from_str(toml).unwrap();
    assert_eq!(config.discovery.timeout_ms, 5000);
    assert_eq!(config.describe_timeout(), Some(Duration::from_millis(5000)));
    assert!(config.server.enabled);
    assert_eq!(config.server.path, "/usr/bin/sourcekit-lsp");
    assert!(config.server.args.is_empty());
    assert_eq!(
        config.server.toolchain_path.as_deref(),
        Some("/Library/Developer/Toolchains/swift-latest.xctoolchain")
    );
}

#[test]
fn test_parse_config_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.describe_timeout(), Some(Duration::from_secs(60)));
    assert!(!config.server.enabled);
    assert_eq!(config.server.path, "sourcekit-lsp");
    assert!(config.server.toolchain_path.is_none());
}

#[test]
fn test_zero_timeout_disables_it() {
    let config = Config::new().with_timeout_ms(0);
    assert!(config.describe_timeout().is_none());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load(temp_dir.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_project_root() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE),
        "[discovery]\ntimeout_ms = 1500\n",
    )
    .unwrap();

    let config = Config::load(temp_dir.path()).unwrap();
    assert_eq!(config.discovery.timeout_ms, 1500);
    assert_eq!(config.server.path, "sourcekit-lsp");
}

#[test]
fn test_load_malformed_file_names_it() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE), "[discovery\n").unwrap();

    match Config::load(temp_dir.path()) {
        Err(Error::Toml { context, .. }) => assert!(context.ends_with(CONFIG_FILE)),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_builder_overrides() {
    let config = Config::new()
        .with_server_enabled(true)
        .with_server_path("sourcekit-lsp-nightly")
        .with_toolchain_path("");

    assert!(config.server.enabled);
    assert_eq!(config.server.path, "sourcekit-lsp-nightly");
    assert!(config.server.toolchain_path.is_none());

    let config = config.with_toolchain_path("/opt/swift");
    assert_eq!(config.server.toolchain_path.as_deref(), Some("/opt/swift"));
}
