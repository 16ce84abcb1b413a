// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! kiosk-core: Shared library for the telemedicine kiosk.
//!
//! This crate provides the record model, the local queue storage and the
//! wire protocol used by both the `kiosk` CLI and the `kiosk-remote` store.

pub mod error;
pub mod id;
pub mod local_store;
pub mod photo;
pub mod protocol;
pub mod record;

pub use error::{Error, Result};
pub use id::{ClockSource, IdGenerator, RecordId, SystemClock};
pub use local_store::{Area, LocalStore};
pub use photo::{InlinePhoto, Photo, PhotoRef};
pub use record::{
    AlertStatus, Appointment, AppointmentStatus, Consultation, EmergencyAlert, Patient, Payload,
    Record, RecordKind, Urgency, Vitals,
};
