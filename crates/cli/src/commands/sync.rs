// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use kiosk_core::RecordKind;

use super::Context;
use crate::error::Result;
use crate::sync::{RemoteStore, Station, SyncReport};

pub async fn run(ctx: &Context, kinds: Vec<RecordKind>) -> Result<()> {
    let mut station = ctx.open_station().await?;
    let report = run_impl(&mut station, &kinds).await?;

    println!("{report}");
    if let SyncReport::Completed(tallies) = &report {
        for tally in tallies.iter().filter(|t| t.failed > 0) {
            println!(
                "  {}: {} synced, {} still pending",
                tally.kind.plural(),
                tally.synced,
                tally.failed
            );
        }
    }
    Ok(())
}

/// Reconciles the requested kinds, or every kind when none are given.
pub(crate) async fn run_impl<R: RemoteStore>(
    station: &mut Station<R>,
    kinds: &[RecordKind],
) -> Result<SyncReport> {
    let kinds = if kinds.is_empty() {
        &RecordKind::ALL[..]
    } else {
        kinds
    };
    Ok(station.reconcile(kinds).await?)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
