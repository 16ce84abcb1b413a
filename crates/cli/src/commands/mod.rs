// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod capture;
pub mod clear;
pub mod export;
pub mod init;
pub mod mode;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::path::PathBuf;

use kiosk_core::LocalStore;

use crate::config::{db_path, Config};
use crate::error::Result;
use crate::sync::{
    ConnectivityMonitor, NetworkProbe, NoRemote, RemoteStore, StaticProbe, Station, TcpProbe,
    WsRemote, APP_VERSION,
};

/// Station wired to whichever remote the configuration names.
pub type KioskStation = Station<Box<dyn RemoteStore>>;

/// Loaded data directory and configuration.
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn load(data_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&data_dir)?;
        Ok(Context { data_dir, config })
    }

    pub fn open_store(&self) -> Result<LocalStore> {
        Ok(LocalStore::open(&db_path(&self.data_dir))?)
    }

    /// Reachability probe for the configured remote. Without a remote the
    /// kiosk is always offline.
    pub fn probe(&self) -> Result<Box<dyn NetworkProbe>> {
        Ok(match self.config.effective_remote()? {
            Some(remote) => Box::new(TcpProbe::for_url(&remote.url, remote.connect_timeout())),
            None => Box::new(StaticProbe(false)),
        })
    }

    fn remote(&self) -> Result<Box<dyn RemoteStore>> {
        Ok(match self.config.effective_remote()? {
            Some(remote) => Box::new(WsRemote::new(
                remote.url.clone(),
                format!("kiosk {APP_VERSION} ({})", self.config.station),
                remote.connect_timeout(),
                remote.request_timeout(),
            )),
            None => Box::new(NoRemote),
        })
    }

    /// Open the station, probe the network and, outside demo mode, attempt
    /// the handshake.
    pub async fn open_station(&self) -> Result<KioskStation> {
        let monitor = ConnectivityMonitor::new(self.config.demo, self.config.timing());
        let mut station = Station::new(
            self.open_store()?,
            self.remote()?,
            monitor,
            self.config.station.clone(),
        )?;
        let online = self.probe()?.check().await;
        station.start(online).await;
        Ok(station)
    }
}
