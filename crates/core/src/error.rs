// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for kiosk-core operations.

use thiserror::Error;

/// All possible errors that can occur in kiosk-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("patient name is required\n  hint: pass the patient's full name")]
    MissingPatientName,

    #[error("appointment date and time are required")]
    MissingSchedule,

    #[error("cannot schedule an appointment in the past: {date} {time}")]
    AppointmentInPast { date: String, time: String },

    #[error("invalid time '{0}'\n  hint: use 24-hour HH:MM, e.g. 10:00")]
    InvalidTime(String),

    #[error("invalid date '{0}'\n  hint: use YYYY-MM-DD, e.g. 2025-03-01")]
    InvalidDate(String),

    #[error("invalid urgency: '{0}'\n  hint: valid levels are: low, medium, high")]
    InvalidUrgency(String),

    #[error("invalid record kind: '{0}'\n  hint: valid kinds are: consultation, appointment, alert")]
    InvalidKind(String),

    #[error("invalid photo data: {0}")]
    InvalidPhoto(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for kiosk-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
