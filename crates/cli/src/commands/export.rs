// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use kiosk_core::{Area, LocalStore, Record, RecordKind};
use serde::Serialize;

use super::Context;
use crate::error::Result;

/// Snapshot written by `kiosk export`.
#[derive(Debug, Serialize)]
pub(crate) struct Export {
    pub consultations: Vec<Record>,
    pub appointments: Vec<Record>,
    pub emergency_alerts: Vec<Record>,
    pub export_date: DateTime<Utc>,
    pub mode: &'static str,
}

impl Export {
    pub fn len(&self) -> usize {
        self.consultations.len() + self.appointments.len() + self.emergency_alerts.len()
    }
}

pub fn run(ctx: &Context, path: Option<PathBuf>) -> Result<()> {
    let store = ctx.open_store()?;
    let now = Utc::now();
    let path = path.unwrap_or_else(|| PathBuf::from(default_file_name(now.date_naive())));

    let count = run_impl(&store, ctx.config.demo, now, &path)?;

    println!("Exported {} record(s) to {}", count, path.display());
    Ok(())
}

pub(crate) fn run_impl(
    store: &LocalStore,
    demo: bool,
    now: DateTime<Utc>,
    path: &Path,
) -> Result<usize> {
    let export = build(store, demo, now)?;
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(path, json)?;
    Ok(export.len())
}

/// Demo kiosks export the demo sink; real ones export what is still queued.
pub(crate) fn build(store: &LocalStore, demo: bool, now: DateTime<Utc>) -> Result<Export> {
    let area = if demo { Area::Demo } else { Area::Pending };
    Ok(Export {
        consultations: store.load(area, RecordKind::Consultation)?,
        appointments: store.load(area, RecordKind::Appointment)?,
        emergency_alerts: store.load(area, RecordKind::EmergencyAlert)?,
        export_date: now,
        mode: if demo { "demo" } else { "real" },
    })
}

pub(crate) fn default_file_name(date: NaiveDate) -> String {
    format!("telemedicine_export_{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
