// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use kiosk_core::LocalStore;

use crate::config::{db_path, init_data_dir, Config};
use crate::error::Result;

pub fn run(data_dir: &Path, station: Option<String>, remote: Option<String>, demo: bool) -> Result<()> {
    let config = run_impl(data_dir, station, remote, demo)?;

    println!(
        "Initialized kiosk '{}' at {}",
        config.station,
        data_dir.display()
    );
    match (&config.remote, config.demo) {
        (_, true) => println!("Demo mode: records stay on this device"),
        (Some(remote), false) => println!("Remote store: {}", remote.url),
        (None, false) => {
            println!("No remote store configured: records will be queued locally");
        }
    }
    Ok(())
}

/// Writes the config and creates the local queue database.
pub(crate) fn run_impl(
    data_dir: &Path,
    station: Option<String>,
    remote: Option<String>,
    demo: bool,
) -> Result<Config> {
    let config = Config::new(station, remote, demo)?;
    init_data_dir(data_dir, &config)?;
    LocalStore::open(&db_path(data_dir))?;
    Ok(config)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
