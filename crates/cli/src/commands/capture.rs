// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capture commands: `consult`, `book` and `alert`.
//!
//! Each builds a record from its arguments and hands it to the station's
//! write router, which decides between the remote store, the local queue
//! and the demo sink.

use std::path::Path;

use chrono::{Local, Utc};
use kiosk_core::photo::JPEG;
use kiosk_core::{
    Appointment, Consultation, EmergencyAlert, InlinePhoto, Patient, Payload, Photo, Record,
    Urgency, Vitals,
};

use super::Context;
use crate::cli::{ClinicalArgs, PatientArgs, VitalsArgs};
use crate::error::{Error, Result};
use crate::sync::{RemoteStore, RouteOutcome, Station};

pub async fn consult(
    ctx: &Context,
    patient: PatientArgs,
    vitals: VitalsArgs,
    clinical: ClinicalArgs,
) -> Result<()> {
    let mut station = ctx.open_station().await?;
    let outcome = consult_impl(&mut station, patient, vitals, clinical).await?;
    println!("{outcome}");
    Ok(())
}

pub(crate) async fn consult_impl<R: RemoteStore>(
    station: &mut Station<R>,
    patient: PatientArgs,
    vitals: VitalsArgs,
    clinical: ClinicalArgs,
) -> Result<RouteOutcome> {
    let mut consultation = Consultation::new(
        Patient {
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
        },
        station.location(),
    )?;
    consultation.vitals = Vitals {
        blood_pressure: vitals.blood_pressure,
        temperature: vitals.temperature,
        heart_rate: vitals.heart_rate,
        oxygen_sat: vitals.oxygen_sat,
    };
    consultation.symptoms = clinical.symptoms;
    consultation.observations = clinical.observations;
    consultation.urgency = clinical.urgency;

    let id = station.next_id();
    for (category, path) in &clinical.photos {
        let photo = read_photo(station.next_id().0, category, path)?;
        consultation.photos.push(Photo::Inline(photo));
    }

    let record = Record::new(id, Utc::now(), Payload::Consultation(consultation));
    Ok(station.route(record).await?)
}

pub async fn book(
    ctx: &Context,
    name: String,
    date: String,
    time: String,
    specialist: String,
    notes: String,
    urgency: Urgency,
) -> Result<()> {
    let mut station = ctx.open_station().await?;
    let outcome = book_impl(&mut station, &name, &date, &time, specialist, notes, urgency).await?;
    println!("{outcome}");
    Ok(())
}

pub(crate) async fn book_impl<R: RemoteStore>(
    station: &mut Station<R>,
    name: &str,
    date: &str,
    time: &str,
    specialist: String,
    notes: String,
    urgency: Urgency,
) -> Result<RouteOutcome> {
    let mut appointment = Appointment::new(name, date, time, specialist, Local::now().naive_local())?;
    appointment.notes = notes;
    appointment.urgency = urgency;

    let record = Record::new(station.next_id(), Utc::now(), Payload::Appointment(appointment));
    Ok(station.route(record).await?)
}

pub async fn alert(ctx: &Context, name: Option<String>, symptoms: Option<String>) -> Result<()> {
    let mut station = ctx.open_station().await?;
    let outcome = alert_impl(&mut station, name.as_deref(), symptoms.as_deref()).await?;
    println!("{outcome}");
    Ok(())
}

pub(crate) async fn alert_impl<R: RemoteStore>(
    station: &mut Station<R>,
    name: Option<&str>,
    symptoms: Option<&str>,
) -> Result<RouteOutcome> {
    let alert = EmergencyAlert::new(name, symptoms, station.location());
    let record = Record::new(station.next_id(), Utc::now(), Payload::EmergencyAlert(alert));
    Ok(station.route(record).await?)
}

/// Content type guessed from the file extension.
pub(crate) fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => JPEG,
    }
}

fn read_photo(id: u64, category: &str, path: &Path) -> Result<InlinePhoto> {
    let bytes = std::fs::read(path).map_err(|source| Error::PhotoRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(InlinePhoto::from_bytes(
        id,
        category,
        mime_for(path),
        &bytes,
        Utc::now(),
    ))
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
