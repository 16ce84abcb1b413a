// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record and photo identifiers.
//!
//! Identifiers are millisecond timestamps taken at capture time. The
//! generator never hands out the same value twice: when the wall clock has not
//! advanced (or went backwards) since the previous id, the next id is the
//! previous one plus one.
//!
//! The stringified id is the remote document key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Unique, immutable identifier of a captured record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Returns the document key used by the remote store.
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| Error::CorruptedData(format!("invalid record id '{s}'")))
    }
}

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

/// Generates strictly increasing timestamp ids.
pub struct IdGenerator<C: ClockSource = SystemClock> {
    clock: C,
    last: Mutex<u64>,
}

impl IdGenerator<SystemClock> {
    /// Creates a generator backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for IdGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> IdGenerator<C> {
    /// Creates a generator with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        IdGenerator {
            clock,
            last: Mutex::new(0),
        }
    }

    /// Raises the floor so that every future id is greater than `seen`.
    ///
    /// Called at startup with the largest id found in local storage.
    pub fn observe(&self, seen: u64) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if seen > *last {
            *last = seen;
        }
    }

    /// Returns the next raw id value.
    pub fn next_raw(&self) -> u64 {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let next = if physical > *last { physical } else { *last + 1 };
        *last = next;
        next
    }

    /// Returns the next record id.
    pub fn next_record(&self) -> RecordId {
        RecordId(self.next_raw())
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
