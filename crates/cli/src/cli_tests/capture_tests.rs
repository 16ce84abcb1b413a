// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests for the capture commands: `consult`, `book`
//! and `alert`.

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_consult_full() {
    let cli = parse(&[
        "kiosk", "consult", "-n", "Ana Lima", "--age", "34", "--gender", "female", "--bp",
        "120/80", "--temp", "38.2", "--hr", "88", "--spo2", "97", "--symptoms", "fever",
        "-u", "high", "--photo", "wound=./leg.jpg", "--photo", "rash=/tmp/arm.png",
    ])
    .unwrap();

    let Command::Consult {
        patient,
        vitals,
        clinical,
    } = cli.command
    else {
        unreachable!("expected consult");
    };
    assert_eq!(patient.name, "Ana Lima");
    assert_eq!(patient.age, Some(34));
    assert_eq!(vitals.blood_pressure.as_deref(), Some("120/80"));
    assert_eq!(vitals.oxygen_sat.as_deref(), Some("97"));
    assert_eq!(clinical.urgency, Urgency::High);
    assert_eq!(
        clinical.photos,
        vec![
            ("wound".to_string(), PathBuf::from("./leg.jpg")),
            ("rash".to_string(), PathBuf::from("/tmp/arm.png")),
        ]
    );
}

#[test]
fn test_consult_defaults() {
    let cli = parse(&["kiosk", "consult", "--name", "Ana"]).unwrap();
    let Command::Consult { clinical, .. } = cli.command else {
        unreachable!("expected consult");
    };
    assert_eq!(clinical.urgency, Urgency::Low);
    assert!(clinical.photos.is_empty());
    assert_eq!(clinical.symptoms, "");
}

#[test]
fn test_consult_requires_name() {
    assert!(parse(&["kiosk", "consult"]).is_err());
}

#[parameterized(
    no_equals = { "wound" },
    empty_type = { "=./leg.jpg" },
    empty_path = { "wound=" },
)]
fn test_invalid_photo_arg(arg: &str) {
    assert!(parse(&["kiosk", "consult", "-n", "Ana", "--photo", arg]).is_err());
}

#[test]
fn test_invalid_urgency() {
    assert!(parse(&["kiosk", "consult", "-n", "Ana", "-u", "extreme"]).is_err());
}

#[test]
fn test_book() {
    let cli = parse(&[
        "kiosk", "book", "-n", "Ana", "--date", "2030-05-01", "--time", "10:00", "-s",
        "cardiology",
    ])
    .unwrap();
    let Command::Book {
        name,
        date,
        time,
        specialist,
        urgency,
        ..
    } = cli.command
    else {
        unreachable!("expected book");
    };
    assert_eq!(name, "Ana");
    assert_eq!(date, "2030-05-01");
    assert_eq!(time, "10:00");
    assert_eq!(specialist, "cardiology");
    assert_eq!(urgency, Urgency::Low);
}

#[test]
fn test_book_requires_specialist() {
    assert!(parse(&["kiosk", "book", "-n", "Ana", "--date", "2030-05-01", "--time", "10:00"]).is_err());
}

#[test]
fn test_alert_without_fields() {
    let cli = parse(&["kiosk", "alert"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Alert {
            name: None,
            symptoms: None
        }
    ));
}

#[test]
fn test_global_data_dir() {
    let cli = parse(&["kiosk", "alert", "--data-dir", "/srv/kiosk"]).unwrap();
    assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/kiosk")));
}
