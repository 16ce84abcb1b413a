// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! kiosk-remote: WebSocket document and asset store for telemedicine kiosks.
//!
//! Kiosks write consultations, appointments and emergency alerts here when
//! they are online and drain their local queues into it when connectivity
//! returns. Everything is kept in one SQLite database.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// kiosk-remote: document store for telemedicine kiosks
#[derive(Parser, Debug)]
#[command(name = "kiosk-remote")]
#[command(about = "WebSocket document and asset store for telemedicine kiosks")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Directory for the database
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Prefix of the URLs returned for uploaded assets
    #[arg(long, default_value = "kiosk-remote://assets")]
    asset_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting kiosk-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    std::fs::create_dir_all(&args.data)?;
    let state = state::ServerState::new(&args.data, args.asset_url)?;

    server::run(args.bind, state).await?;

    Ok(())
}
