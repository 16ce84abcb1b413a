// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! kiosk - offline-first capture station for rural telemedicine.
//!
//! This crate provides the `kiosk` CLI: it records consultations,
//! appointments and emergency alerts, writing them to a remote store when
//! one is reachable and queueing them in a local SQLite database when not.
//!
//! # Main Components
//!
//! - [`sync`] - connectivity monitor, remote client, write router and queue reconciler
//! - [`Config`] - per-kiosk configuration (station label, remote URL, demo flag)
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use clap::Parser;
//! use kiosk::{run, Cli};
//!
//! run(Cli::parse())?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{ClinicalArgs, Cli, Command, ModeArg, OutputFormat, PatientArgs, VitalsArgs};
pub use config::{init_data_dir, resolve_data_dir, Config, RemoteConfig};
pub use error::{Error, Result};

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use commands::Context;

/// Execute a CLI invocation on a single-threaded tokio runtime.
pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    runtime.block_on(dispatch(data_dir, cli.command))
}

async fn dispatch(data_dir: PathBuf, command: Command) -> Result<()> {
    let load = || Context::load(data_dir.clone());
    match command {
        Command::Init {
            station,
            remote,
            demo,
        } => commands::init::run(&data_dir, station, remote, demo),
        Command::Consult {
            patient,
            vitals,
            clinical,
        } => commands::capture::consult(&load()?, patient, vitals, clinical).await,
        Command::Book {
            name,
            date,
            time,
            specialist,
            notes,
            urgency,
        } => commands::capture::book(&load()?, name, date, time, specialist, notes, urgency).await,
        Command::Alert { name, symptoms } => {
            commands::capture::alert(&load()?, name, symptoms).await
        }
        Command::Sync { kind } => commands::sync::run(&load()?, kind).await,
        Command::Status { output } => commands::status::run(&load()?, output).await,
        Command::Export { path } => commands::export::run(&load()?, path),
        Command::Mode { mode } => commands::mode::run(load()?, mode).await,
        Command::Clear { kind, demo, yes } => commands::clear::run(&load()?, kind, demo, yes),
        Command::Watch => commands::watch::run(&load()?).await,
    }
}

/// Install the stderr log subscriber. `KIOSK_LOG` takes an env-filter
/// directive; the default only shows warnings.
pub fn init_logging() {
    let filter = env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
