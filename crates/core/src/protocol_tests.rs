// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

#[parameterized(
    hello = { ClientMessage::hello("kiosk-test") },
    put = { ClientMessage::Put { req: 1, collection: "consultations".into(), id: "42".into(), doc: json!({"id": 42}) } },
    query = { ClientMessage::Query { req: 2, collection: "appointments".into(), filters: vec![Filter::eq("time", "10:00")] } },
    ping = { ClientMessage::Ping { id: 12345 } },
)]
fn client_message_roundtrip(msg: ClientMessage) {
    let json = msg.to_json().unwrap();
    let parsed = ClientMessage::from_json(&json).unwrap();
    assert_eq!(msg, parsed);
}

#[test]
fn client_message_tagged_by_type() {
    let msg = ClientMessage::Upload {
        req: 3,
        path: "photos/a.jpg".into(),
        content_type: "image/jpeg".into(),
        data: "AAEC".into(),
    };
    let value: Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
    assert_eq!(value["type"], "upload");
    assert_eq!(value["req"], 3);
}

#[test]
fn server_message_error_roundtrip() {
    let msg = ServerMessage::error(Some(9), "disk full");
    let parsed = ServerMessage::from_json(&msg.to_json().unwrap()).unwrap();
    assert_eq!(parsed, msg);
    assert_eq!(parsed.req(), Some(9));
}

#[parameterized(
    ack = { ServerMessage::Ack { req: 4 }, Some(4) },
    created = { ServerMessage::Created { req: 5, id: "x".into() }, Some(5) },
    uploaded = { ServerMessage::Uploaded { req: 6, url: "u".into() }, Some(6) },
    welcome = { ServerMessage::welcome("remote"), None },
    pong = { ServerMessage::Pong { id: 1 }, None },
)]
fn server_message_req(msg: ServerMessage, expected: Option<u64>) {
    assert_eq!(msg.req(), expected);
}

#[test]
fn client_message_req() {
    assert_eq!(ClientMessage::hello("k").req(), None);
    let add = ClientMessage::Add {
        req: 8,
        collection: "emergency_alerts".into(),
        doc: json!({}),
    };
    assert_eq!(add.req(), Some(8));
}

#[test]
fn filter_matches_exact_value() {
    let doc = json!({"date": "2025-03-01", "time": "10:00", "status": "scheduled"});
    assert!(Filter::eq("time", "10:00").matches(&doc));
    assert!(!Filter::eq("time", "11:00").matches(&doc));
    assert!(!Filter::eq("missing", "x").matches(&doc));
}
