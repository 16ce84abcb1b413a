// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Kiosk configuration management.
//!
//! Configuration is stored in `<data dir>/config.toml` and includes:
//! - `station`: label recorded as the location of captured records
//! - `demo`: whether records stay in the local demo sink
//! - `[remote]`: the remote store URL and connection timings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kiosk_core::record::DEFAULT_LOCATION;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::Timing;

const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "kiosk.db";
const APP_DIR_NAME: &str = "kiosk";

/// Kiosk configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Station label, used as the location of new records.
    #[serde(default = "default_station")]
    pub station: String,
    /// Demo mode keeps every record local and never syncs.
    #[serde(default)]
    pub demo: bool,
    /// Remote store (optional - if absent, every record is queued locally).
    pub remote: Option<RemoteConfig>,
}

/// Remote store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of the `kiosk-remote` server (`ws://` or `wss://`).
    pub url: String,
    /// Delay before retrying the handshake after the network returns (default: 2000).
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
    /// Delay before draining the queue after the network returns (default: 3000).
    #[serde(default = "default_sync_delay_ms")]
    pub sync_delay_ms: u64,
    /// Max time for the handshake in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Max time to wait for any reply in seconds (default: 10).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Reachability probe interval for `kiosk watch` in seconds (default: 5).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
}

fn default_station() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}

fn default_sync_delay_ms() -> u64 {
    3000
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_probe_interval_secs() -> u64 {
    5
}

impl RemoteConfig {
    /// Remote config with default timings.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            sync_delay_ms: default_sync_delay_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            probe_interval_secs: default_probe_interval_secs(),
        }
    }

    /// Validates that the URL is a WebSocket URL with a host.
    pub fn validate_url(&self) -> Result<()> {
        let url = &self.url;
        let scheme_ok = url.starts_with("ws://") || url.starts_with("wss://");
        if !scheme_ok || crate::sync::host_port(url).is_none() {
            return Err(Error::InvalidRemoteUrl(url.clone()));
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing {
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
            sync_delay: Duration::from_millis(self.sync_delay_ms),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: default_station(),
            demo: false,
            remote: None,
        }
    }
}

impl Config {
    /// Creates a configuration, validating the remote URL if any.
    pub fn new(station: Option<String>, remote_url: Option<String>, demo: bool) -> Result<Self> {
        let remote = remote_url.map(RemoteConfig::new);
        if let Some(remote) = &remote {
            remote.validate_url()?;
        }
        Ok(Config {
            station: station
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(default_station),
            demo,
            remote,
        })
    }

    /// Loads configuration from the given data directory.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = config_path(data_dir);
        if !config_path.exists() {
            return Err(Error::NotInitialized(config_path.display().to_string()));
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if let Some(remote) = &config.remote {
            remote.validate_url()?;
        }
        Ok(config)
    }

    /// Saves configuration to the given data directory.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(config_path(data_dir), content)?;
        Ok(())
    }

    /// The remote to use, with `KIOSK_REMOTE_URL` taking precedence over
    /// the configured URL.
    pub fn effective_remote(&self) -> Result<Option<RemoteConfig>> {
        let remote = match (env::remote_url(), &self.remote) {
            (Some(url), Some(remote)) => Some(RemoteConfig {
                url,
                ..remote.clone()
            }),
            (Some(url), None) => Some(RemoteConfig::new(url)),
            (None, remote) => remote.clone(),
        };
        if let Some(remote) = &remote {
            remote.validate_url()?;
        }
        Ok(remote)
    }

    /// Scheduling delays, defaulted when no remote is configured.
    pub fn timing(&self) -> Timing {
        self.remote
            .as_ref()
            .map(RemoteConfig::timing)
            .unwrap_or_default()
    }
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE_NAME)
}

/// Resolve the data directory: the `--data-dir` flag, then `KIOSK_DATA_DIR`,
/// then the platform's local data directory.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    flag.or_else(env::data_dir)
        .or_else(|| dirs::data_local_dir().map(|d| d.join(APP_DIR_NAME)))
        .ok_or(Error::NoDataDir)
}

/// Create the data directory and write its configuration.
pub fn init_data_dir(data_dir: &Path, config: &Config) -> Result<()> {
    let config_path = config_path(data_dir);
    if config_path.exists() {
        return Err(Error::AlreadyInitialized(data_dir.display().to_string()));
    }
    fs::create_dir_all(data_dir)?;
    config.save(data_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
