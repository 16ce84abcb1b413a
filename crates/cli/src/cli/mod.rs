// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use kiosk_core::{RecordKind, Urgency};

pub use args::{ClinicalArgs, PatientArgs, VitalsArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn parse_urgency(s: &str) -> Result<Urgency, String> {
    s.parse().map_err(|e: kiosk_core::Error| e.to_string())
}

fn parse_kind(s: &str) -> Result<RecordKind, String> {
    s.parse().map_err(|e: kiosk_core::Error| e.to_string())
}

/// Parse `TYPE=PATH`.
fn parse_photo(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((category, path)) if !category.trim().is_empty() && !path.trim().is_empty() => {
            Ok((category.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(crate::error::Error::InvalidPhotoArg(s.to_string()).to_string()),
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Target of `kiosk mode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Keep records in the local demo sink
    Demo,
    /// Write to the remote store, queueing when offline
    Real,
}

#[derive(Parser)]
#[command(name = "kiosk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first capture station for rural telemedicine")]
#[command(
    long_about = "Offline-first capture station for rural telemedicine.\n\n\
    Records consultations, appointments and emergency alerts. Records are written to the \
    remote store when it is reachable and queued locally when it is not."
)]
pub struct Cli {
    /// Data directory (default: $KIOSK_DATA_DIR or the platform data dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize the kiosk data directory
    #[command(after_help = "\
Examples:
  kiosk init --remote ws://10.0.0.5:7890        Sync with a remote store
  kiosk init --station \"Valley Clinic\" --demo   Training kiosk, nothing leaves the device")]
    Init {
        /// Station label recorded as the location of new records
        #[arg(long, value_parser = non_empty_string)]
        station: Option<String>,

        /// Remote store URL (ws:// or wss://)
        #[arg(long)]
        remote: Option<String>,

        /// Start in demo mode
        #[arg(long)]
        demo: bool,
    },

    /// Record a consultation
    #[command(after_help = "\
Examples:
  kiosk consult -n \"Ana Lima\" --age 34 --bp 120/80 --symptoms \"fever\"
  kiosk consult -n \"Ana Lima\" -u high --photo wound=./leg.jpg")]
    Consult {
        #[command(flatten)]
        patient: PatientArgs,

        #[command(flatten)]
        vitals: VitalsArgs,

        #[command(flatten)]
        clinical: ClinicalArgs,
    },

    /// Book an appointment with a specialist
    Book {
        /// Patient full name
        #[arg(long, short = 'n')]
        name: String,

        /// Date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Time, HH:MM
        #[arg(long)]
        time: String,

        /// Specialist or service
        #[arg(long, short = 's', value_parser = non_empty_string)]
        specialist: String,

        /// Notes for the specialist
        #[arg(long, default_value = "")]
        notes: String,

        /// Urgency: low, medium or high
        #[arg(long, short = 'u', default_value = "low", value_parser = parse_urgency)]
        urgency: Urgency,
    },

    /// Raise an emergency alert
    Alert {
        /// Patient name, if known
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Symptoms, if known
        #[arg(long)]
        symptoms: Option<String>,
    },

    /// Send queued records to the remote store
    Sync {
        /// Only sync this kind (repeatable): consultation, appointment, alert
        #[arg(long, short = 'k', value_parser = parse_kind)]
        kind: Vec<RecordKind>,
    },

    /// Show connectivity and queue counts
    Status {
        #[arg(long, short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Export local records to a JSON file
    Export {
        /// Output path (default: telemedicine_export_<date>.json)
        path: Option<PathBuf>,
    },

    /// Switch between demo and real mode
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Discard local records of one kind
    Clear {
        /// consultation, appointment or alert
        #[arg(value_parser = parse_kind)]
        kind: RecordKind,

        /// Clear the demo sink instead of the pending queue
        #[arg(long)]
        demo: bool,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Watch connectivity and sync automatically when it returns
    Watch,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
