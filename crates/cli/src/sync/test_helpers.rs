// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};

use kiosk_core::photo::JPEG;
use kiosk_core::protocol::Filter;
use kiosk_core::{
    Appointment, Consultation, EmergencyAlert, InlinePhoto, LocalStore, Patient, Payload, Photo,
    Record, RecordId,
};

use super::monitor::{ConnectivityMonitor, Timing};
use super::remote::{RemoteError, RemoteFuture, RemoteStore};
use super::station::Station;

/// In-memory remote store with fault injection.
#[derive(Debug, Default)]
pub struct MockRemote {
    ready: bool,
    /// Handshakes fail while set.
    pub refuse_connect: bool,
    pub connect_attempts: usize,
    /// collection -> id -> document
    pub collections: HashMap<String, BTreeMap<String, Value>>,
    /// path -> bytes
    pub assets: BTreeMap<String, Vec<u8>>,
    pub stats: Map<String, Value>,
    /// Record ids whose document write fails.
    pub fail_records: HashSet<u64>,
    /// Photo ids whose upload fails.
    pub fail_photos: HashSet<u64>,
    pub fail_stats: bool,
    /// Queries fail while set.
    pub fail_queries: bool,
    next_auto_id: u64,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A remote whose handshake has already completed.
    pub fn ready() -> Self {
        MockRemote {
            ready: true,
            ..Self::default()
        }
    }

    /// Drop the session, as a lost connection would.
    pub fn disconnect(&mut self) {
        self.ready = false;
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }

    /// First document whose `id` field equals `id`.
    pub fn find(&self, collection: &str, id: u64) -> Option<&Value> {
        self.collections
            .get(collection)?
            .values()
            .find(|doc| doc.get("id") == Some(&Value::from(id)))
    }

    fn fails(&self, doc: &Value) -> bool {
        doc.get("id")
            .and_then(Value::as_u64)
            .is_some_and(|id| self.fail_records.contains(&id))
    }

    fn check_ready(&self) -> Result<(), RemoteError> {
        if self.ready {
            Ok(())
        } else {
            Err(RemoteError::NotConnected)
        }
    }
}

impl RemoteStore for MockRemote {
    fn connect(&mut self) -> RemoteFuture<'_, ()> {
        self.connect_attempts += 1;
        let result = if self.refuse_connect {
            Err(RemoteError::ConnectionFailed("refused".into()))
        } else {
            self.ready = true;
            Ok(())
        };
        Box::pin(async move { result })
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn put(&mut self, collection: &str, id: &str, doc: Value) -> RemoteFuture<'_, ()> {
        let result = self.check_ready().and_then(|()| {
            if self.fails(&doc) {
                return Err(RemoteError::Rejected("injected write failure".into()));
            }
            self.collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), doc);
            Ok(())
        });
        Box::pin(async move { result })
    }

    fn add(&mut self, collection: &str, doc: Value) -> RemoteFuture<'_, String> {
        let result = self.check_ready().and_then(|()| {
            if self.fails(&doc) {
                return Err(RemoteError::Rejected("injected write failure".into()));
            }
            self.next_auto_id += 1;
            let id = format!("auto-{}", self.next_auto_id);
            self.collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), doc);
            Ok(id)
        });
        Box::pin(async move { result })
    }

    fn query(&mut self, collection: &str, filters: Vec<Filter>) -> RemoteFuture<'_, Vec<Value>> {
        let result = self.check_ready().and_then(|()| {
            if self.fail_queries {
                return Err(RemoteError::Timeout(std::time::Duration::from_secs(10)));
            }
            Ok(self
                .collections
                .get(collection)
                .map(|docs| {
                    docs.values()
                        .filter(|doc| filters.iter().all(|f| f.matches(doc)))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        });
        Box::pin(async move { result })
    }

    fn upload(
        &mut self,
        path: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> RemoteFuture<'_, String> {
        let result = self.check_ready().and_then(|()| {
            let failing = self
                .fail_photos
                .iter()
                .any(|id| path.ends_with(&format!("_photo_{id}.jpg")));
            if failing {
                return Err(RemoteError::Rejected("injected upload failure".into()));
            }
            self.assets.insert(path.to_string(), bytes);
            Ok(format!("mock://{path}"))
        });
        Box::pin(async move { result })
    }

    fn increment(
        &mut self,
        _collection: &str,
        _id: &str,
        increments: BTreeMap<String, i64>,
        set: Map<String, Value>,
    ) -> RemoteFuture<'_, ()> {
        let result = self.check_ready().and_then(|()| {
            if self.fail_stats {
                return Err(RemoteError::Rejected("injected stats failure".into()));
            }
            for (field, by) in increments {
                let current = self.stats.get(&field).and_then(Value::as_i64).unwrap_or(0);
                self.stats.insert(field, Value::from(current + by));
            }
            self.stats.extend(set);
            Ok(())
        });
        Box::pin(async move { result })
    }
}

/// A station over an in-memory store.
pub async fn station(remote: MockRemote, network_online: bool, demo: bool) -> Station<MockRemote> {
    let store = LocalStore::open_in_memory().unwrap();
    let monitor = ConnectivityMonitor::new(demo, Timing::default());
    let mut station = Station::new(store, remote, monitor, "Test Clinic").unwrap();
    station.start(network_online).await;
    station
}

/// Station with the network up and the remote ready.
pub async fn online_station() -> Station<MockRemote> {
    station(MockRemote::new(), true, false).await
}

pub fn consultation(id: u64) -> Record {
    let patient = Patient {
        name: format!("Patient {id}"),
        age: Some(40),
        gender: None,
    };
    Record::new(
        RecordId(id),
        Utc::now(),
        Payload::Consultation(Consultation::new(patient, "Test Clinic").unwrap()),
    )
}

/// Consultation carrying inline photos with ids `photo_ids`.
pub fn consultation_with_photos(id: u64, photo_ids: &[u64]) -> Record {
    let mut record = consultation(id);
    if let Payload::Consultation(c) = &mut record.payload {
        for pid in photo_ids {
            c.photos.push(Photo::Inline(InlinePhoto::from_bytes(
                *pid,
                "wound",
                JPEG,
                &[0xFF, 0xD8, 0xFF, *pid as u8],
                Utc::now(),
            )));
        }
    }
    record
}

/// Appointment on `date` (YYYY-MM-DD) at `time` (HH:MM).
pub fn appointment(id: u64, date: &str, time: &str) -> Record {
    let now = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Record::new(
        RecordId(id),
        Utc::now(),
        Payload::Appointment(
            Appointment::new(&format!("Patient {id}"), date, time, "cardiology", now).unwrap(),
        ),
    )
}

pub fn alert(id: u64) -> Record {
    Record::new(
        RecordId(id),
        Utc::now(),
        Payload::EmergencyAlert(EmergencyAlert::new(
            Some(&format!("Patient {id}")),
            Some("chest pain"),
            "Test Clinic",
        )),
    )
}
