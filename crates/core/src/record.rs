// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured records: consultations, appointments and emergency alerts.
//!
//! A [`Record`] carries the fields shared by every kind (id, capture time,
//! sync flag) and a kind-specific [`Payload`]. Records serialize as flat JSON
//! objects tagged by `kind`, which is also the shape written to the remote
//! store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::id::RecordId;
use crate::photo::Photo;

/// Default station label when none is configured.
pub const DEFAULT_LOCATION: &str = "Rural Health Center";

/// Kind of record, which scopes queues and remote collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Consultation,
    Appointment,
    EmergencyAlert,
}

impl RecordKind {
    /// Every kind, in sync order.
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Consultation,
        RecordKind::Appointment,
        RecordKind::EmergencyAlert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Consultation => "consultation",
            RecordKind::Appointment => "appointment",
            RecordKind::EmergencyAlert => "emergency_alert",
        }
    }

    /// Plural label for status messages.
    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Consultation => "consultations",
            RecordKind::Appointment => "appointments",
            RecordKind::EmergencyAlert => "emergency alerts",
        }
    }

    /// Local storage key of the pending queue.
    pub fn pending_key(&self) -> &'static str {
        match self {
            RecordKind::Consultation => "pendingConsultations",
            RecordKind::Appointment => "pendingAppointments",
            RecordKind::EmergencyAlert => "pendingEmergencyAlerts",
        }
    }

    /// Local storage key of the demo sink.
    pub fn demo_key(&self) -> &'static str {
        match self {
            RecordKind::Consultation => "demoConsultations",
            RecordKind::Appointment => "demoAppointments",
            RecordKind::EmergencyAlert => "demoEmergencyAlerts",
        }
    }

    /// Remote collection holding records of this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Consultation => "consultations",
            RecordKind::Appointment => "appointments",
            RecordKind::EmergencyAlert => "emergency_alerts",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "consultation" | "consultations" => Ok(RecordKind::Consultation),
            "appointment" | "appointments" => Ok(RecordKind::Appointment),
            "alert" | "alerts" | "emergency" | "emergency_alert" => {
                Ok(RecordKind::EmergencyAlert)
            }
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// Triage urgency recorded with consultations and appointments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            _ => Err(Error::InvalidUrgency(s.to_string())),
        }
    }
}

/// Identity of the patient being seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

/// Vital signs as typed at the kiosk. Free text, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub heart_rate: Option<String>,
    pub oxygen_sat: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub patient: Patient,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub urgency: Urgency,
    pub location: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Consultation {
    /// Creates a consultation for the named patient.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingPatientName`] if the name is blank.
    pub fn new(patient: Patient, location: impl Into<String>) -> Result<Self> {
        let name = patient.name.trim();
        if name.is_empty() {
            return Err(Error::MissingPatientName);
        }
        Ok(Consultation {
            patient: Patient {
                name: name.to_string(),
                ..patient
            },
            vitals: Vitals::default(),
            symptoms: String::new(),
            observations: String::new(),
            urgency: Urgency::Low,
            location: location.into(),
            photos: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub time: NaiveTime,
    pub specialist: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Creates a scheduled appointment.
    ///
    /// `date` is `YYYY-MM-DD`, `time` is `HH:MM`. Slots before `now` are
    /// rejected.
    pub fn new(
        patient_name: &str,
        date: &str,
        time: &str,
        specialist: impl Into<String>,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let patient_name = patient_name.trim();
        if patient_name.is_empty() {
            return Err(Error::MissingPatientName);
        }
        if date.trim().is_empty() || time.trim().is_empty() {
            return Err(Error::MissingSchedule);
        }
        let date = parse_date(date)?;
        let time = parse_time(time)?;
        if date.and_time(time) < now {
            return Err(Error::AppointmentInPast {
                date: date.to_string(),
                time: time.format(hh_mm::FORMAT).to_string(),
            });
        }
        Ok(Appointment {
            patient_name: patient_name.to_string(),
            date,
            time,
            specialist: specialist.into(),
            notes: String::new(),
            urgency: Urgency::Low,
            status: AppointmentStatus::Scheduled,
        })
    }

    /// Returns true if this appointment holds the given slot.
    pub fn occupies(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.status == AppointmentStatus::Scheduled && self.date == date && self.time == time
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Active,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub patient_name: String,
    pub symptoms: String,
    pub location: String,
    #[serde(default)]
    pub status: AlertStatus,
}

impl EmergencyAlert {
    /// Creates an active alert. Blank fields fall back to placeholders so an
    /// alert can always be raised.
    pub fn new(patient_name: Option<&str>, symptoms: Option<&str>, location: &str) -> Self {
        let or_default = |v: Option<&str>, default: &str| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        EmergencyAlert {
            patient_name: or_default(patient_name, "Unidentified patient"),
            symptoms: or_default(symptoms, "Not specified"),
            location: location.to_string(),
            status: AlertStatus::Active,
        }
    }
}

/// Kind-specific record content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Consultation(Consultation),
    Appointment(Appointment),
    EmergencyAlert(EmergencyAlert),
}

/// One unit of captured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub synced: bool,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Record {
    /// Creates an unsynced record.
    pub fn new(id: RecordId, timestamp: DateTime<Utc>, payload: Payload) -> Self {
        Record {
            id,
            timestamp,
            synced: false,
            payload,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self.payload {
            Payload::Consultation(_) => RecordKind::Consultation,
            Payload::Appointment(_) => RecordKind::Appointment,
            Payload::EmergencyAlert(_) => RecordKind::EmergencyAlert,
        }
    }

    /// Photos attached to the record; empty for non-consultations.
    pub fn photos(&self) -> &[Photo] {
        match &self.payload {
            Payload::Consultation(c) => &c.photos,
            _ => &[],
        }
    }

    /// The appointment slot, if this record is an appointment.
    pub fn slot(&self) -> Option<(NaiveDate, NaiveTime)> {
        match &self.payload {
            Payload::Appointment(a) => Some((a.date, a.time)),
            _ => None,
        }
    }

    /// Returns true if this is a scheduled appointment holding the slot.
    pub fn occupies(&self, date: NaiveDate, time: NaiveTime) -> bool {
        match &self.payload {
            Payload::Appointment(a) => a.occupies(date, time),
            _ => false,
        }
    }

    /// Patient name for display.
    pub fn patient_name(&self) -> &str {
        match &self.payload {
            Payload::Consultation(c) => &c.patient.name,
            Payload::Appointment(a) => &a.patient_name,
            Payload::EmergencyAlert(e) => &e.patient_name,
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parses an `HH:MM` time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), hh_mm::FORMAT).map_err(|_| Error::InvalidTime(s.to_string()))
}

/// Serializes appointment times as `HH:MM`, the slot format used in queries.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
