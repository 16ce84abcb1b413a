// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Write routing: every new record lands in exactly one place.
//!
//! | Mode      | Destination                                  |
//! |-----------|----------------------------------------------|
//! | Demo      | local demo sink                              |
//! | Online    | remote store, local queue if the write fails |
//! | Degraded  | local queue                                  |
//! | Offline   | local queue                                  |

use std::fmt;

use tracing::{info, warn};

use kiosk_core::{Area, Record, RecordId, RecordKind};

use super::client::{slot_error, SyncError, SyncResult};
use super::monitor::OperatingMode;
use super::remote::RemoteStore;
use super::station::Station;

/// Why a record was queued instead of written remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueReason {
    /// The network is down.
    NoConnection,
    /// The network is up but the remote store never became ready.
    RemoteNotReady,
    /// The remote write was attempted and failed.
    RemoteFailed(String),
}

impl fmt::Display for QueueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueReason::NoConnection => write!(f, "no connection"),
            QueueReason::RemoteNotReady => write!(f, "remote store unavailable"),
            QueueReason::RemoteFailed(reason) => write!(f, "remote write failed: {reason}"),
        }
    }
}

/// Where [`Station::route`] put a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Demo {
        kind: RecordKind,
        id: RecordId,
    },
    Remote {
        kind: RecordKind,
        id: RecordId,
        /// Photos written inline because their upload failed.
        inline_photos: usize,
    },
    Queued {
        kind: RecordKind,
        id: RecordId,
        reason: QueueReason,
        /// Queue length for the kind after the append.
        pending: usize,
    },
}

impl RouteOutcome {
    pub fn id(&self) -> RecordId {
        match self {
            RouteOutcome::Demo { id, .. }
            | RouteOutcome::Remote { id, .. }
            | RouteOutcome::Queued { id, .. } => *id,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, RouteOutcome::Queued { .. })
    }
}

impl fmt::Display for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteOutcome::Demo { kind, .. } => write!(f, "{} saved (demo mode)", title(*kind)),
            RouteOutcome::Remote {
                kind,
                inline_photos,
                ..
            } => {
                write!(f, "{} saved to remote store", title(*kind))?;
                match inline_photos {
                    0 => Ok(()),
                    1 => write!(f, " (1 photo kept inline)"),
                    n => write!(f, " ({n} photos kept inline)"),
                }
            }
            RouteOutcome::Queued {
                kind,
                reason,
                pending,
                ..
            } => write!(
                f,
                "{} saved locally ({reason}); {pending} pending {}",
                title(*kind),
                kind.plural()
            ),
        }
    }
}

/// Capitalized kind label.
pub(crate) fn title(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Consultation => "Consultation",
        RecordKind::Appointment => "Appointment",
        RecordKind::EmergencyAlert => "Emergency alert",
    }
}

impl<R: RemoteStore> Station<R> {
    /// Route one freshly captured record.
    ///
    /// The record ends up in exactly one of the demo sink, the remote store
    /// or the local queue. An appointment whose slot is already held is
    /// rejected with [`SyncError::SlotTaken`] and written nowhere. Any other
    /// remote failure falls back to the local queue.
    pub async fn route(&mut self, record: Record) -> SyncResult<RouteOutcome> {
        let kind = record.kind();
        let id = record.id;

        match self.monitor.mode() {
            OperatingMode::Demo => {
                self.check_local_slot(Area::Demo, &record)?;
                let record = Record {
                    synced: true,
                    ..record
                };
                self.store.append(Area::Demo, &record)?;
                info!(%id, %kind, "saved to demo sink");
                Ok(RouteOutcome::Demo { kind, id })
            }
            OperatingMode::Offline => self.enqueue(record, QueueReason::NoConnection),
            OperatingMode::Degraded => self.enqueue(record, QueueReason::RemoteNotReady),
            OperatingMode::Online => {
                // A queued appointment holds its slot too.
                self.check_local_slot(Area::Pending, &record)?;
                let result = self.client.persist(&record).await;
                self.refresh_ready();
                match result {
                    Ok(persisted) => {
                        info!(%id, %kind, remote_id = %persisted.remote_id, "saved to remote store");
                        Ok(RouteOutcome::Remote {
                            kind,
                            id,
                            inline_photos: persisted.inline_photos,
                        })
                    }
                    Err(e @ SyncError::SlotTaken { .. }) => Err(e),
                    Err(e) => {
                        warn!(%id, %kind, error = %e, "remote write failed, queueing");
                        self.enqueue(record, QueueReason::RemoteFailed(e.to_string()))
                    }
                }
            }
        }
    }

    fn enqueue(&mut self, record: Record, reason: QueueReason) -> SyncResult<RouteOutcome> {
        let kind = record.kind();
        let id = record.id;
        self.check_local_slot(Area::Pending, &record)?;
        self.store.append(Area::Pending, &record)?;
        let pending = self.store.count(Area::Pending, kind)?;
        info!(%id, %kind, %reason, pending, "queued locally");
        Ok(RouteOutcome::Queued {
            kind,
            id,
            reason,
            pending,
        })
    }

    /// Reject an appointment whose slot is held by another record in `area`.
    fn check_local_slot(&self, area: Area, record: &Record) -> SyncResult<()> {
        let Some((date, time)) = record.slot() else {
            return Ok(());
        };
        let taken = self
            .store
            .load(area, RecordKind::Appointment)?
            .iter()
            .any(|other| other.id != record.id && other.occupies(date, time));
        if taken {
            return Err(slot_error(date, time));
        }
        Ok(())
    }
}
