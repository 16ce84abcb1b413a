// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use chrono::TimeZone;
use serde_json::Value;

use super::*;
use crate::commands::testing::TestContext;
use crate::sync::test_helpers::{alert, appointment, consultation};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 9, 14, 30, 0).unwrap()
}

#[test]
fn default_name_carries_the_date() {
    assert_eq!(
        default_file_name(now().date_naive()),
        "telemedicine_export_2026-03-09.json"
    );
}

#[test]
fn real_mode_exports_pending_queues() {
    let ctx = TestContext::new();
    ctx.seed(
        Area::Pending,
        &[consultation(1), appointment(2, "2099-01-01", "08:00"), alert(3)],
    )
    .seed(Area::Demo, &[consultation(9)]);
    let path = ctx.data_dir().join("out.json");

    let count = run_impl(&ctx.store(), false, now(), &path).unwrap();

    assert_eq!(count, 3);
    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["mode"], "real");
    assert_eq!(json["consultations"].as_array().unwrap().len(), 1);
    assert_eq!(json["consultations"][0]["id"], 1);
    assert_eq!(json["appointments"].as_array().unwrap().len(), 1);
    assert_eq!(json["emergency_alerts"].as_array().unwrap().len(), 1);
    assert_eq!(json["export_date"], "2026-03-09T14:30:00Z");
}

#[test]
fn demo_mode_exports_demo_sink() {
    let ctx = TestContext::demo();
    ctx.seed(Area::Pending, &[consultation(1)])
        .seed(Area::Demo, &[consultation(2), consultation(3)]);

    let export = build(&ctx.store(), true, now()).unwrap();

    assert_eq!(export.mode, "demo");
    let ids: Vec<u64> = export.consultations.iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(export.appointments.is_empty());
}

#[test]
fn empty_store_exports_empty_arrays() {
    let ctx = TestContext::new();

    let export = build(&ctx.store(), false, now()).unwrap();

    assert_eq!(export.len(), 0);
    let json = serde_json::to_value(&export).unwrap();
    assert_eq!(json["emergency_alerts"], Value::Array(vec![]));
}
