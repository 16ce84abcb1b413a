// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use super::Context;
use crate::cli::ModeArg;
use crate::config::Config;
use crate::error::Result;
use crate::sync::OperatingMode;

pub async fn run(ctx: Context, mode: ModeArg) -> Result<()> {
    let demo = mode == ModeArg::Demo;
    let config = run_impl(&ctx.data_dir, ctx.config, demo)?;

    if demo {
        println!("Demo mode enabled: records stay on this device");
        return Ok(());
    }

    let ctx = Context {
        data_dir: ctx.data_dir,
        config,
    };
    let station = ctx.open_station().await?;
    println!("Real mode enabled ({})", station.mode());
    let pending = station.store().pending_total()?;
    if pending > 0 && station.mode() == OperatingMode::Online {
        println!("{pending} record(s) pending\n  hint: run 'kiosk sync' to send them");
    }
    Ok(())
}

/// Persists the demo flag and returns the updated config.
pub(crate) fn run_impl(data_dir: &Path, mut config: Config, demo: bool) -> Result<Config> {
    if config.demo != demo {
        config.demo = demo;
        config.save(data_dir)?;
        tracing::info!(demo, "operating mode changed");
    }
    Ok(config)
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
