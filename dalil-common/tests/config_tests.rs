//! Configuration resolution and graceful degradation tests
//!
//! Missing config files must not abort startup; priority order is
//! CLI argument → DALIL_CONFIG → per-user file → defaults.
//!
//! Tests that touch DALIL_CONFIG are marked #[serial] so they never run in
//! parallel with each other.

use dalil_common::config::{
    load_config, resolve_config_path, ConfigSource, TomlConfig, CONFIG_ENV_VAR,
};
use dalil_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[test]
fn test_load_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
records_path = "/srv/dalil/mosques.json"

[logging]
level = "debug"
file = "/var/log/dalil.log"

[location]
timeout_ms = 10000
maximum_age_ms = 0
high_accuracy = true

[audio]
static_prefix = "/assets/"
audio_base = "https://cdn.example.com/audio"
event_capacity = 16
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(
        config.records_path,
        Some(PathBuf::from("/srv/dalil/mosques.json"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/dalil.log")));
    assert_eq!(config.location.timeout_ms, 10_000);
    assert_eq!(config.location.maximum_age_ms, 0);
    assert!(config.location.high_accuracy);
    assert_eq!(config.audio.static_prefix, "/assets/");
    assert_eq!(config.audio.event_capacity, 16);
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[location\ntimeout_ms = ").unwrap();

    assert!(matches!(TomlConfig::load(&path), Err(Error::Toml(_))));
}

#[test]
fn test_missing_cli_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let (config, source) = load_config(Some(&missing)).unwrap();
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.location.timeout_ms, 30_000);
    assert_eq!(source, ConfigSource::Missing(missing));
}

/// Log sink shared with a scoped fmt subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_missing_config_warning_reaches_installed_subscriber() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");
    let (_, source) = load_config(Some(&missing)).unwrap();

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || source.log());

    let output = logs.contents();
    assert!(output.contains("WARN"), "got: {}", output);
    assert!(output.contains("not found, using built-in defaults"));
    assert!(output.contains("does-not-exist.toml"));
}

#[test]
fn test_invalid_log_level_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();

    assert!(matches!(load_config(Some(&path)), Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_env_var_used_when_no_cli_arg() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("env.toml");
    fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &path);
    let resolved = resolve_config_path(None);
    let (config, source) = load_config(None).unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(resolved, Some(path));
    assert_eq!(config.logging.level, "warn");
}

#[test]
#[serial]
fn test_cli_arg_overrides_env_var() {
    let dir = TempDir::new().unwrap();
    let cli_path = dir.path().join("cli.toml");
    fs::write(&cli_path, "[logging]\nlevel = \"trace\"\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, dir.path().join("env.toml"));
    let (config, _) = load_config(Some(&cli_path)).unwrap();
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.logging.level, "trace");
}
