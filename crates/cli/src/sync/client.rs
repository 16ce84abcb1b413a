// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sync client: writes one record to the remote store.
//!
//! Provides a high-level interface for:
//! - Connecting (the handshake that makes the remote ready)
//! - Persisting a record, uploading its photos first
//! - Appointment slot lookups
//! - Best-effort usage counters

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use kiosk_core::protocol::Filter;
use kiosk_core::record::hh_mm;
use kiosk_core::{InlinePhoto, Payload, Photo, Record, RecordId, RecordKind};

use super::remote::{RemoteError, RemoteStore};

/// Application version reported in the usage counters document.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collection and document holding usage counters.
pub const STATS_COLLECTION: &str = "system_config";
pub const STATS_DOC: &str = "app_info";

/// Error type for sync client operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The remote store has not completed its handshake.
    #[error("remote store is not ready\n  hint: run `kiosk sync` once the connection is back")]
    RemoteUnavailable,

    /// Handshake failed.
    #[error("could not connect to remote store: {0}")]
    Connect(#[source] RemoteError),

    /// The document write failed.
    #[error("remote write failed: {0}")]
    Write(#[source] RemoteError),

    /// A lookup against the remote store failed.
    #[error("remote query failed: {0}")]
    Query(#[source] RemoteError),

    /// One photo could not be stored.
    #[error("upload of photo {photo_id} failed: {reason}")]
    AssetUpload { photo_id: u64, reason: String },

    /// The usage counters could not be updated.
    #[error("usage counter update failed: {0}")]
    StatUpdate(#[source] RemoteError),

    /// Another scheduled appointment holds the slot.
    #[error("slot {date} {time} is already booked\n  hint: pick another time or date")]
    SlotTaken { date: String, time: String },

    /// The record could not be encoded as a document.
    #[error("could not encode record {id}: {reason}")]
    Encode { id: RecordId, reason: String },

    /// Local storage failed.
    #[error(transparent)]
    Local(#[from] kiosk_core::Error),
}

/// Result type for sync client operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Outcome of a successful remote write.
#[derive(Debug, Clone)]
pub struct Persisted {
    /// The record as written: `synced` set, uploaded photos replaced by
    /// references.
    pub record: Record,
    /// Document id in the remote collection.
    pub remote_id: String,
    /// Photos that failed to upload and were written inline.
    pub inline_photos: usize,
}

/// Remote storage path of a consultation photo.
pub fn photo_path(record: RecordId, photo_id: u64) -> String {
    format!("photos/consultation_{record}_photo_{photo_id}.jpg")
}

/// Writes records to a [`RemoteStore`].
pub struct RemoteSyncClient<R: RemoteStore> {
    remote: R,
}

impl<R: RemoteStore> RemoteSyncClient<R> {
    pub fn new(remote: R) -> Self {
        RemoteSyncClient { remote }
    }

    /// Get a reference to the remote store (for testing).
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Get a mutable reference to the remote store (for testing).
    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    /// True once the handshake has completed.
    pub fn is_ready(&self) -> bool {
        self.remote.is_ready()
    }

    /// Perform the handshake.
    pub async fn connect(&mut self) -> SyncResult<()> {
        self.remote.connect().await.map_err(SyncError::Connect)
    }

    /// Persist one record remotely.
    ///
    /// Appointments are checked against the scheduled appointments first; a
    /// taken slot fails with [`SyncError::SlotTaken`] before anything is
    /// written. Photos are uploaded one at a time, and a photo whose upload
    /// fails is written inline instead of failing the record. Only the
    /// document write itself decides success. Counter updates afterwards are
    /// best effort.
    ///
    /// `record` is left untouched so the caller can queue it as it was.
    pub async fn persist(&mut self, record: &Record) -> SyncResult<Persisted> {
        if !self.remote.is_ready() {
            return Err(SyncError::RemoteUnavailable);
        }

        if let Some((date, time)) = record.slot() {
            if self.slot_taken(date, time, Some(record.id)).await? {
                return Err(slot_error(date, time));
            }
        }

        let mut written = record.clone();
        written.synced = true;

        let inline_photos = match &mut written.payload {
            Payload::Consultation(consultation) => {
                self.upload_photos(record.id, &mut consultation.photos).await
            }
            _ => 0,
        };

        let kind = written.kind();
        let doc = to_document(&written)?;
        let remote_id = match kind {
            RecordKind::EmergencyAlert => self
                .remote
                .add(kind.collection(), doc)
                .await
                .map_err(SyncError::Write)?,
            _ => {
                let key = written.id.key();
                self.remote
                    .put(kind.collection(), &key, doc)
                    .await
                    .map_err(SyncError::Write)?;
                key
            }
        };
        debug!(id = %written.id, %kind, %remote_id, "record persisted");

        if let Err(e) = self.bump_stats(kind).await {
            warn!(id = %written.id, error = %e, "record saved but usage counters not updated");
        }

        Ok(Persisted {
            record: written,
            remote_id,
            inline_photos,
        })
    }

    /// Returns true if a scheduled appointment other than `except` holds the
    /// slot.
    pub async fn slot_taken(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        except: Option<RecordId>,
    ) -> SyncResult<bool> {
        let filters = vec![
            Filter::eq("date", date.to_string()),
            Filter::eq("time", time.format(hh_mm::FORMAT).to_string()),
            Filter::eq("status", "scheduled"),
        ];
        let docs = self
            .remote
            .query(RecordKind::Appointment.collection(), filters)
            .await
            .map_err(SyncError::Query)?;

        let own_id = except.map(|id| Value::from(id.0));
        Ok(docs
            .iter()
            .any(|doc| own_id.is_none() || doc.get("id") != own_id.as_ref()))
    }

    /// Upload a single photo; returns its download URL.
    pub async fn upload_photo(&mut self, record: RecordId, photo: &InlinePhoto) -> SyncResult<String> {
        let (content_type, bytes) = photo.decode().map_err(|e| SyncError::AssetUpload {
            photo_id: photo.id,
            reason: e.to_string(),
        })?;
        self.remote
            .upload(&photo_path(record, photo.id), &content_type, bytes)
            .await
            .map_err(|e| SyncError::AssetUpload {
                photo_id: photo.id,
                reason: e.to_string(),
            })
    }

    /// Replace each inline photo by a reference once its upload succeeds.
    /// Returns the number of photos left inline.
    async fn upload_photos(&mut self, record: RecordId, photos: &mut [Photo]) -> usize {
        let mut inline = 0;
        for photo in photos.iter_mut() {
            let Photo::Inline(pending) = photo else {
                continue;
            };
            match self.upload_photo(record, pending).await {
                Ok(url) => {
                    let uploaded = pending.clone().into_uploaded(url);
                    *photo = Photo::Uploaded(uploaded);
                }
                Err(e) => {
                    warn!(id = %record, error = %e, "keeping photo inline");
                    inline += 1;
                }
            }
        }
        inline
    }

    /// Bump the usage counters for a kind.
    async fn bump_stats(&mut self, kind: RecordKind) -> SyncResult<()> {
        let (counter, last) = match kind {
            RecordKind::Consultation => ("total_consultations", "last_consultation"),
            RecordKind::Appointment => ("total_appointments", "last_appointment"),
            RecordKind::EmergencyAlert => return Ok(()),
        };

        let increments = BTreeMap::from([(counter.to_string(), 1)]);
        let mut set = Map::new();
        set.insert(last.to_string(), Value::from(Utc::now().to_rfc3339()));
        set.insert("version".to_string(), Value::from(APP_VERSION));

        self.remote
            .increment(STATS_COLLECTION, STATS_DOC, increments, set)
            .await
            .map_err(SyncError::StatUpdate)
    }
}

pub(crate) fn slot_error(date: NaiveDate, time: NaiveTime) -> SyncError {
    SyncError::SlotTaken {
        date: date.to_string(),
        time: time.format(hh_mm::FORMAT).to_string(),
    }
}

/// Remote document for a record. Alerts are flagged critical.
fn to_document(record: &Record) -> SyncResult<Value> {
    let mut doc = serde_json::to_value(record).map_err(|e| SyncError::Encode {
        id: record.id,
        reason: e.to_string(),
    })?;
    if record.kind() == RecordKind::EmergencyAlert {
        if let Value::Object(map) = &mut doc {
            map.insert("priority".to_string(), Value::from("critical"));
        }
    }
    Ok(doc)
}
