// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Draining the local queue into the remote store.
//!
//! Items are sent one at a time. A failed item is kept for the next pass and
//! never stops the items after it.

use std::fmt;

use tracing::{info, warn};

use kiosk_core::{Area, RecordKind};

use super::client::SyncResult;
use super::remote::RemoteStore;
use super::station::Station;

/// Per-kind counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTally {
    pub kind: RecordKind,
    pub synced: usize,
    pub failed: usize,
}

/// Outcome of [`Station::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    /// Demo mode never syncs.
    DemoMode,
    /// The network is down.
    NoConnection,
    /// Every requested queue is empty.
    NothingPending,
    /// The remote store could not be reached.
    CouldNotConnect,
    /// A pass ran.
    Completed(Vec<KindTally>),
}

impl SyncReport {
    /// Records written during the pass.
    pub fn synced(&self) -> usize {
        match self {
            SyncReport::Completed(tallies) => tallies.iter().map(|t| t.synced).sum(),
            _ => 0,
        }
    }

    /// Records kept in the queue after failing.
    pub fn failed(&self) -> usize {
        match self {
            SyncReport::Completed(tallies) => tallies.iter().map(|t| t.failed).sum(),
            _ => 0,
        }
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncReport::DemoMode => write!(f, "Demo mode: nothing to sync"),
            SyncReport::NoConnection => write!(f, "No connection: cannot sync"),
            SyncReport::NothingPending => write!(f, "No pending data to sync"),
            SyncReport::CouldNotConnect => write!(f, "Could not connect to the remote store"),
            SyncReport::Completed(_) => {
                let (synced, failed) = (self.synced(), self.failed());
                if failed == 0 {
                    write!(f, "{synced} record(s) synced")
                } else if synced == 0 {
                    write!(f, "Sync failed: {failed} record(s) could not be sent")
                } else {
                    write!(f, "{synced} record(s) synced, {failed} failed")
                }
            }
        }
    }
}

impl<R: RemoteStore> Station<R> {
    /// Push the pending queues of `kinds` to the remote store.
    ///
    /// For each kind with at least one success, the stored queue is replaced
    /// by exactly the items that failed. A kind with no success is left as is.
    /// Each kind gets at most one pass, in [`RecordKind::ALL`] order, however
    /// often it appears in `kinds`.
    pub async fn reconcile(&mut self, kinds: &[RecordKind]) -> SyncResult<SyncReport> {
        let kinds: Vec<RecordKind> = RecordKind::ALL
            .into_iter()
            .filter(|kind| kinds.contains(kind))
            .collect();

        if self.monitor.is_demo() {
            return Ok(SyncReport::DemoMode);
        }
        if !self.monitor.network_online() {
            return Ok(SyncReport::NoConnection);
        }

        let mut pending = 0;
        for kind in &kinds {
            pending += self.store.count(Area::Pending, *kind)?;
        }
        if pending == 0 {
            return Ok(SyncReport::NothingPending);
        }

        self.refresh_ready();
        if !self.monitor.remote_ready() && !self.try_connect().await {
            return Ok(SyncReport::CouldNotConnect);
        }

        let mut tallies = Vec::new();
        for kind in &kinds {
            let items = self.store.load(Area::Pending, *kind)?;
            if items.is_empty() {
                continue;
            }

            let mut synced = 0;
            let mut failed = Vec::new();
            for item in items {
                match self.client.persist(&item).await {
                    Ok(_) => synced += 1,
                    Err(e) => {
                        warn!(id = %item.id, %kind, error = %e, "sync failed, keeping in queue");
                        failed.push(item);
                    }
                }
            }
            self.refresh_ready();

            if synced > 0 {
                self.store.save(Area::Pending, *kind, &failed)?;
            }
            info!(%kind, synced, failed = failed.len(), "sync pass");
            tallies.push(KindTally {
                kind: *kind,
                synced,
                failed: failed.len(),
            });
        }

        Ok(SyncReport::Completed(tallies))
    }
}
