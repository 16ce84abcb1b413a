// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for queue reconciliation.

#![allow(clippy::unwrap_used)]

use kiosk_core::{Area, Record, RecordKind};

use super::reconcile::{KindTally, SyncReport};
use super::station::Station;
use super::test_helpers::{appointment, consultation, consultation_with_photos, station, MockRemote};

const CONSULTATIONS: [RecordKind; 1] = [RecordKind::Consultation];

/// Offline station with `records` queued, then brought online with `remote`.
async fn queued_station(remote: MockRemote, records: Vec<Record>) -> Station<MockRemote> {
    let mut st = station(remote, false, false).await;
    for record in records {
        st.route(record).await.unwrap();
    }
    st.on_network(true).unwrap();
    st
}

fn queued_ids(st: &Station<MockRemote>, kind: RecordKind) -> Vec<u64> {
    st.store()
        .load(Area::Pending, kind)
        .unwrap()
        .iter()
        .map(|r| r.id.0)
        .collect()
}

#[tokio::test]
async fn demo_mode_is_noop() {
    let mut st = station(MockRemote::new(), true, true).await;
    let report = st.reconcile(&RecordKind::ALL).await.unwrap();
    assert_eq!(report, SyncReport::DemoMode);
    assert_eq!(report.to_string(), "Demo mode: nothing to sync");
}

#[tokio::test]
async fn offline_is_noop() {
    let mut st = station(MockRemote::new(), false, false).await;
    st.route(consultation(1)).await.unwrap();

    let report = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(report, SyncReport::NoConnection);
    assert_eq!(queued_ids(&st, RecordKind::Consultation), vec![1]);
}

#[tokio::test]
async fn empty_queue_is_noop() {
    let mut st = station(MockRemote::new(), true, false).await;
    let report = st.reconcile(&RecordKind::ALL).await.unwrap();
    assert_eq!(report, SyncReport::NothingPending);
}

#[tokio::test]
async fn reconnects_once_before_syncing() {
    let mut st = queued_station(MockRemote::new(), vec![consultation(1)]).await;
    assert!(!st.monitor().remote_ready());

    let report = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(st.client().remote().connect_attempts, 1);
    assert_eq!(report.synced(), 1);
    assert!(queued_ids(&st, RecordKind::Consultation).is_empty());
}

#[tokio::test]
async fn failed_reconnect_aborts() {
    let mut remote = MockRemote::new();
    remote.refuse_connect = true;
    let mut st = queued_station(remote, vec![consultation(1)]).await;

    let report = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(report, SyncReport::CouldNotConnect);
    assert_eq!(st.client().remote().connect_attempts, 1);
    assert_eq!(queued_ids(&st, RecordKind::Consultation), vec![1]);
}

#[tokio::test]
async fn partial_failure_keeps_only_failed_items() {
    let mut remote = MockRemote::new();
    remote.fail_records.extend([2, 4]);
    let records = (1..=5).map(consultation).collect();
    let mut st = queued_station(remote, records).await;

    let report = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(
        report,
        SyncReport::Completed(vec![KindTally {
            kind: RecordKind::Consultation,
            synced: 3,
            failed: 2,
        }])
    );
    assert_eq!(report.to_string(), "3 record(s) synced, 2 failed");
    assert_eq!(queued_ids(&st, RecordKind::Consultation), vec![2, 4]);
    for id in [1, 3, 5] {
        assert!(st.client().remote().find("consultations", id).is_some());
    }
}

#[tokio::test]
async fn failed_items_are_kept_verbatim() {
    let mut remote = MockRemote::new();
    remote.fail_records.insert(2);
    let original = consultation_with_photos(2, &[20]);
    let mut st = queued_station(remote, vec![consultation(1), original.clone()]).await;

    st.reconcile(&CONSULTATIONS).await.unwrap();

    let kept = st.store().load(Area::Pending, RecordKind::Consultation).unwrap();
    assert_eq!(kept, vec![original]);
}

#[tokio::test]
async fn all_failed_leaves_store_untouched() {
    let mut remote = MockRemote::new();
    remote.fail_records.extend([1, 2]);
    let mut st = queued_station(remote, vec![consultation(1), consultation(2)]).await;

    let report = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(report.synced(), 0);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.to_string(), "Sync failed: 2 record(s) could not be sent");
    assert_eq!(queued_ids(&st, RecordKind::Consultation), vec![1, 2]);
}

#[tokio::test]
async fn second_pass_retries_and_is_idempotent() {
    let mut remote = MockRemote::new();
    remote.fail_records.insert(2);
    let records = (1..=3).map(consultation).collect();
    let mut st = queued_station(remote, records).await;

    st.reconcile(&CONSULTATIONS).await.unwrap();
    st.client_mut().remote_mut().fail_records.clear();
    let second = st.reconcile(&CONSULTATIONS).await.unwrap();
    let third = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(second.synced(), 1);
    assert_eq!(second.to_string(), "1 record(s) synced");
    assert_eq!(third, SyncReport::NothingPending);
    assert_eq!(st.client().remote().count("consultations"), 3);
}

#[tokio::test]
async fn early_failure_does_not_stop_later_items() {
    let mut remote = MockRemote::new();
    remote.fail_records.insert(1);
    let records = (1..=3).map(consultation).collect();
    let mut st = queued_station(remote, records).await;

    let report = st.reconcile(&CONSULTATIONS).await.unwrap();

    assert_eq!(report.synced(), 2);
    assert_eq!(report.failed(), 1);
}

#[tokio::test]
async fn taken_slot_stays_queued() {
    let mut st = queued_station(
        MockRemote::new(),
        vec![appointment(2, "2030-05-01", "10:00")],
    )
    .await;
    assert!(st.try_connect().await);
    // Someone else booked the slot while this kiosk was offline.
    st.client_mut()
        .persist(&appointment(1, "2030-05-01", "10:00"))
        .await
        .unwrap();

    let report = st.reconcile(&[RecordKind::Appointment]).await.unwrap();

    assert_eq!(report.failed(), 1);
    assert_eq!(queued_ids(&st, RecordKind::Appointment), vec![2]);
}

#[tokio::test]
async fn kinds_reconciled_independently() {
    let mut remote = MockRemote::new();
    remote.fail_records.insert(10);
    let records = vec![
        consultation(1),
        appointment(10, "2030-05-01", "09:00"),
        appointment(11, "2030-05-01", "09:30"),
    ];
    let mut st = queued_station(remote, records).await;

    let report = st.reconcile(&RecordKind::ALL).await.unwrap();

    assert_eq!(report.synced(), 2);
    assert!(queued_ids(&st, RecordKind::Consultation).is_empty());
    assert_eq!(queued_ids(&st, RecordKind::Appointment), vec![10]);

    let only_consultations = st.reconcile(&CONSULTATIONS).await.unwrap();
    assert_eq!(only_consultations, SyncReport::NothingPending);
}

#[tokio::test]
async fn repeated_kind_runs_a_single_pass() {
    let mut remote = MockRemote::new();
    remote.fail_records.insert(2);
    let records = (1..=3).map(consultation).collect();
    let mut st = queued_station(remote, records).await;

    let kinds = [RecordKind::Consultation, RecordKind::Consultation];
    let report = st.reconcile(&kinds).await.unwrap();

    assert_eq!(
        report,
        SyncReport::Completed(vec![KindTally {
            kind: RecordKind::Consultation,
            synced: 2,
            failed: 1,
        }])
    );
    assert_eq!(report.to_string(), "2 record(s) synced, 1 failed");
    assert_eq!(queued_ids(&st, RecordKind::Consultation), vec![2]);
}
