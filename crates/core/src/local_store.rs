// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable local key-value storage for pending and demo records.
//!
//! Each key holds a JSON array of [`Record`]s of one kind (for example
//! `pendingConsultations`). Arrays are always read and written whole: `save`
//! replaces the stored array in a single transaction, and `append` performs
//! its load/push/save inside one write transaction, so another process on the
//! same data directory never observes or clobbers a half-applied update.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::{Record, RecordKind};

/// SQL schema for the local state database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS local_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Which family of keys a record array lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// Records waiting for remote persistence.
    Pending,
    /// Records written in demo mode; never synced.
    Demo,
}

impl Area {
    /// Storage key for the given kind.
    pub fn key(self, kind: RecordKind) -> &'static str {
        match self {
            Area::Pending => kind.pending_key(),
            Area::Demo => kind.demo_key(),
        }
    }
}

/// SQLite-backed local store.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open the store at the given path, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(LocalStore { conn })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(LocalStore { conn })
    }

    /// Load the record array for a kind. Missing or empty keys load as empty.
    pub fn load(&self, area: Area, kind: RecordKind) -> Result<Vec<Record>> {
        read_records(&self.conn, area.key(kind))
    }

    /// Replace the whole record array for a kind.
    pub fn save(&mut self, area: Area, kind: RecordKind, records: &[Record]) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        write_records(&tx, area.key(kind), records)?;
        tx.commit()?;
        Ok(())
    }

    /// Append one record to the array for its kind.
    pub fn append(&mut self, area: Area, record: &Record) -> Result<()> {
        let key = area.key(record.kind());
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut records = read_records(&tx, key)?;
        records.push(record.clone());
        write_records(&tx, key, &records)?;
        tx.commit()?;
        Ok(())
    }

    /// Number of records stored for a kind.
    pub fn count(&self, area: Area, kind: RecordKind) -> Result<usize> {
        Ok(self.load(area, kind)?.len())
    }

    /// Total pending records across all kinds.
    pub fn pending_total(&self) -> Result<usize> {
        let mut total = 0;
        for kind in RecordKind::ALL {
            total += self.count(Area::Pending, kind)?;
        }
        Ok(total)
    }

    /// Largest record id stored anywhere, used to seed the id generator.
    pub fn max_record_id(&self) -> Result<Option<u64>> {
        let mut max = None;
        for area in [Area::Pending, Area::Demo] {
            for kind in RecordKind::ALL {
                for record in self.load(area, kind)? {
                    max = max.max(Some(record.id.0));
                }
            }
        }
        Ok(max)
    }
}

fn read_records(conn: &Connection, key: &str) -> Result<Vec<Record>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM local_state WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(Vec::new()),
        Some(v) if v.trim().is_empty() => Ok(Vec::new()),
        Some(v) => serde_json::from_str(&v)
            .map_err(|e| Error::CorruptedData(format!("{key}: {e}"))),
    }
}

fn write_records(conn: &Connection, key: &str, records: &[Record]) -> Result<()> {
    let json = serde_json::to_string(records)?;
    conn.execute(
        "INSERT OR REPLACE INTO local_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
        params![key, json, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "local_store_tests.rs"]
mod tests;
