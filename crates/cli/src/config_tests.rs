// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;
use yare::parameterized;

#[test]
fn test_init_and_load_config() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("kiosk");
    let config = Config::new(
        Some("Valley Clinic".into()),
        Some("ws://10.0.0.5:7890".into()),
        false,
    )
    .unwrap();

    init_data_dir(&dir, &config).unwrap();

    let loaded = Config::load(&dir).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.remote.unwrap().reconnect_delay_ms, 2000);
}

#[test]
fn test_already_initialized() {
    let temp = TempDir::new().unwrap();
    init_data_dir(temp.path(), &Config::default()).unwrap();

    let result = init_data_dir(temp.path(), &Config::default());
    assert!(matches!(result, Err(Error::AlreadyInitialized(_))));
}

#[test]
fn test_load_missing_config() {
    let temp = TempDir::new().unwrap();
    let result = Config::load(temp.path());
    assert!(matches!(result, Err(Error::NotInitialized(_))));
}

#[test]
fn test_defaults_fill_missing_fields() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        config_path(temp.path()),
        "[remote]\nurl = \"wss://clinic.example.org\"\nsync_delay_ms = 500\n",
    )
    .unwrap();

    let config = Config::load(temp.path()).unwrap();

    assert_eq!(config.station, "Rural Health Center");
    assert!(!config.demo);
    let remote = config.remote.unwrap();
    assert_eq!(remote.sync_delay_ms, 500);
    assert_eq!(remote.timing().reconnect_delay, Duration::from_millis(2000));
    assert_eq!(remote.request_timeout(), Duration::from_secs(10));
}

#[test]
fn test_unparseable_config() {
    let temp = TempDir::new().unwrap();
    std::fs::write(config_path(temp.path()), "demo = maybe").unwrap();
    let result = Config::load(temp.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[parameterized(
    ws = { "ws://localhost:7890", true },
    wss = { "wss://clinic.example.org", true },
    http = { "http://localhost:7890", false },
    bare = { "localhost:7890", false },
    no_host = { "ws://", false },
)]
fn test_validate_url(url: &str, valid: bool) {
    assert_eq!(RemoteConfig::new(url).validate_url().is_ok(), valid);
}

#[test]
fn test_blank_station_uses_default() {
    let config = Config::new(Some("   ".into()), None, true).unwrap();
    assert_eq!(config.station, "Rural Health Center");
    assert!(config.demo);
}

#[test]
fn test_timing_without_remote_is_default() {
    assert_eq!(Config::default().timing(), Timing::default());
}

#[test]
fn test_resolve_data_dir_prefers_flag() {
    let dir = resolve_data_dir(Some(PathBuf::from("/tmp/kiosk-flag"))).unwrap();
    assert_eq!(dir, PathBuf::from("/tmp/kiosk-flag"));
}

#[test]
fn test_paths() {
    let dir = Path::new("/data");
    assert_eq!(config_path(dir), PathBuf::from("/data/config.toml"));
    assert_eq!(db_path(dir), PathBuf::from("/data/kiosk.db"));
}
