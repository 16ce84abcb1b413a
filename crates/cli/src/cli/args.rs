// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to keep the capture
//! commands readable.

use std::path::PathBuf;

use clap::Args;
use kiosk_core::Urgency;

use super::{parse_photo, parse_urgency};

/// Patient identity.
#[derive(Args, Clone, Debug, Default)]
pub struct PatientArgs {
    /// Patient full name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Patient age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Patient gender
    #[arg(long)]
    pub gender: Option<String>,
}

/// Vital signs, free text as read from the devices.
#[derive(Args, Clone, Debug, Default)]
pub struct VitalsArgs {
    /// Blood pressure (e.g. 120/80)
    #[arg(long = "bp", value_name = "BP")]
    pub blood_pressure: Option<String>,

    /// Temperature in °C
    #[arg(long = "temp", value_name = "TEMP")]
    pub temperature: Option<String>,

    /// Heart rate in bpm
    #[arg(long = "hr", value_name = "BPM")]
    pub heart_rate: Option<String>,

    /// Oxygen saturation in %
    #[arg(long = "spo2", value_name = "PCT")]
    pub oxygen_sat: Option<String>,
}

/// Clinical notes shared by consultations.
#[derive(Args, Clone, Debug, Default)]
pub struct ClinicalArgs {
    /// Reported symptoms
    #[arg(long, default_value = "")]
    pub symptoms: String,

    /// Observations by the health worker
    #[arg(long, default_value = "")]
    pub observations: String,

    /// Urgency: low, medium or high
    #[arg(long, short = 'u', default_value = "low", value_parser = parse_urgency)]
    pub urgency: Urgency,

    /// Attach a photo, as TYPE=PATH (repeatable)
    #[arg(long = "photo", value_name = "TYPE=PATH", value_parser = parse_photo)]
    pub photos: Vec<(String, PathBuf)>,
}
