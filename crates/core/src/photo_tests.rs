// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
}

#[test]
fn from_bytes_builds_data_url() {
    let photo = InlinePhoto::from_bytes(7, "wound", JPEG, b"\xff\xd8\xff", ts());
    assert!(photo.data.starts_with("data:image/jpeg;base64,"));
    assert_eq!(photo.size, (photo.data.len() as u64 * 3) / 4);
}

#[test]
fn decode_returns_original_bytes() {
    let bytes = vec![0xff, 0xd8, 0xff, 0xe0, 1, 2, 3];
    let photo = InlinePhoto::from_bytes(7, "wound", JPEG, &bytes, ts());

    let (mime, decoded) = photo.decode().unwrap();
    assert_eq!(mime, JPEG);
    assert_eq!(decoded, bytes);
}

#[test]
fn decode_rejects_non_data_url() {
    let mut photo = InlinePhoto::from_bytes(7, "wound", JPEG, b"abc", ts());
    photo.data = "https://example.org/x.jpg".to_string();
    assert!(matches!(photo.decode(), Err(Error::InvalidPhoto(_))));
}

#[test]
fn decode_rejects_bad_base64() {
    let mut photo = InlinePhoto::from_bytes(7, "wound", JPEG, b"abc", ts());
    photo.data = "data:image/jpeg;base64,***".to_string();
    assert!(matches!(photo.decode(), Err(Error::InvalidPhoto(_))));
}

#[test]
fn into_uploaded_keeps_metadata() {
    let photo = InlinePhoto::from_bytes(7, "rash", JPEG, b"abc", ts());
    let size = photo.size;
    let uploaded = photo.into_uploaded("http://store/photos/a.jpg".to_string());

    assert_eq!(uploaded.id, 7);
    assert_eq!(uploaded.category, "rash");
    assert_eq!(uploaded.size, size);
    assert_eq!(uploaded.timestamp, ts());
}

#[test]
fn untagged_photo_deserializes_both_shapes() {
    let inline = Photo::Inline(InlinePhoto::from_bytes(1, "wound", JPEG, b"abc", ts()));
    let uploaded = Photo::Uploaded(PhotoRef {
        id: 2,
        category: "rash".into(),
        url: "http://store/photos/b.jpg".into(),
        timestamp: ts(),
        size: 10,
    });

    let json = serde_json::to_string(&vec![inline.clone(), uploaded.clone()]).unwrap();
    assert!(json.contains("\"type\":\"wound\""));

    let parsed: Vec<Photo> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, vec![inline, uploaded]);
    assert!(!parsed[0].is_uploaded());
    assert!(parsed[1].is_uploaded());
}
