// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use kiosk_core::{Area, RecordKind};
use serde::Serialize;

use super::Context;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{RemoteStore, Station, APP_VERSION};

/// Snapshot of connectivity and local queue sizes.
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub station: String,
    pub version: &'static str,
    pub mode: String,
    pub network_online: bool,
    pub remote_ready: bool,
    pub remote_url: Option<String>,
    pub pending: BTreeMap<&'static str, usize>,
    pub demo: BTreeMap<&'static str, usize>,
}

impl StatusReport {
    fn pending_total(&self) -> usize {
        self.pending.values().sum()
    }

    fn pending_alerts(&self) -> usize {
        self.pending
            .get(RecordKind::EmergencyAlert.as_str())
            .copied()
            .unwrap_or(0)
    }
}

pub async fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let station = ctx.open_station().await?;
    let remote_url = ctx.config.effective_remote()?.map(|r| r.url);
    let report = gather(&station, remote_url)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render(&report)),
    }
    Ok(())
}

pub(crate) fn gather<R: RemoteStore>(
    station: &Station<R>,
    remote_url: Option<String>,
) -> Result<StatusReport> {
    let mut pending = BTreeMap::new();
    let mut demo = BTreeMap::new();
    for kind in RecordKind::ALL {
        pending.insert(kind.as_str(), station.store().count(Area::Pending, kind)?);
        demo.insert(kind.as_str(), station.store().count(Area::Demo, kind)?);
    }
    let state = station.monitor().state();
    Ok(StatusReport {
        station: station.location().to_string(),
        version: APP_VERSION,
        mode: station.mode().to_string(),
        network_online: state.network_online,
        remote_ready: state.remote_ready,
        remote_url,
        pending,
        demo,
    })
}

pub(crate) fn render(report: &StatusReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Station:  {}\n", report.station));
    out.push_str(&format!("Mode:     {}\n", report.mode));
    out.push_str(&format!(
        "Network:  {}\n",
        if report.network_online { "online" } else { "offline" }
    ));
    let remote = match (&report.remote_url, report.remote_ready) {
        (None, _) => "not configured".to_string(),
        (Some(url), true) => format!("ready ({url})"),
        (Some(url), false) => format!("not ready ({url})"),
    };
    out.push_str(&format!("Remote:   {remote}\n"));

    out.push_str(&format!("\nPending sync: {}\n", report.pending_total()));
    for (kind, count) in &report.pending {
        out.push_str(&format!("  {kind}: {count}\n"));
    }
    let demo_total: usize = report.demo.values().sum();
    if demo_total > 0 {
        out.push_str(&format!("Demo records: {demo_total}\n"));
    }
    let alerts = report.pending_alerts();
    if alerts > 0 {
        out.push_str(&format!(
            "\nWarning: {alerts} emergency alert(s) not yet delivered\n"
        ));
    }
    out.push_str(&format!("\nkiosk {}\n", report.version));
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
