// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! Documents and assets live in one SQLite database guarded by an async
//! mutex; every request is a short transaction.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;

use kiosk_core::protocol::Filter;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
CREATE TABLE IF NOT EXISTS assets (
    path TEXT PRIMARY KEY,
    content_type TEXT NOT NULL,
    data BLOB NOT NULL
);
"#;

/// Field stamped on every written document.
pub const CREATED_AT: &str = "created_at";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("invalid asset path '{0}'")]
    InvalidPath(String),

    #[error("asset data is not valid base64: {0}")]
    InvalidAsset(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, StateError>;

/// Shared server state: the document database and the asset URL prefix.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    db: Mutex<Connection>,
    asset_url_prefix: String,
}

impl ServerState {
    /// Opens (or creates) `remote.db` in the given directory.
    pub fn new(data_dir: &Path, asset_url_prefix: impl Into<String>) -> Result<Self> {
        let conn = Connection::open(data_dir.join("remote.db"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn, asset_url_prefix.into())
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, "mem://assets".into())
    }

    fn with_connection(conn: Connection, asset_url_prefix: String) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(ServerState {
            inner: Arc::new(ServerStateInner {
                db: Mutex::new(conn),
                asset_url_prefix: asset_url_prefix.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Writes `doc` under `id`, replacing any previous version.
    pub async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<()> {
        let body = stamp(doc)?;
        let db = self.inner.db.lock().await;
        write_doc(&db, collection, id, &body)
    }

    /// Appends `doc` under a fresh server-chosen id.
    pub async fn add(&self, collection: &str, doc: Value) -> Result<String> {
        let body = stamp(doc)?;
        let db = self.inner.db.lock().await;
        let next: i64 = db.query_row(
            "SELECT COALESCE(MAX(rowid), 0) + 1 FROM documents",
            [],
            |row| row.get(0),
        )?;
        let id = format!("doc-{next}");
        write_doc(&db, collection, &id, &body)?;
        Ok(id)
    }

    /// Every document in `collection` matching all filters, in write order.
    pub async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Value>> {
        let db = self.inner.db.lock().await;
        let mut stmt =
            db.prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY rowid")?;
        let bodies = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut docs = Vec::new();
        for body in bodies {
            let doc: Value = serde_json::from_str(&body)?;
            if filters.iter().all(|f| f.matches(&doc)) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    /// Fetches one document.
    #[cfg(test)]
    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let db = self.inner.db.lock().await;
        read_doc(&db, collection, id)
    }

    /// Stores base64 `data` at `path`; returns the asset URL.
    pub async fn upload(&self, path: &str, content_type: &str, data: &str) -> Result<String> {
        if path.is_empty() || path.starts_with('/') || path.split('/').any(|s| s == "..") {
            return Err(StateError::InvalidPath(path.to_string()));
        }
        let bytes = STANDARD.decode(data)?;
        let db = self.inner.db.lock().await;
        db.execute(
            "INSERT OR REPLACE INTO assets (path, content_type, data) VALUES (?1, ?2, ?3)",
            params![path, content_type, bytes],
        )?;
        Ok(format!("{}/{}", self.inner.asset_url_prefix, path))
    }

    /// Content type and bytes of a stored asset.
    #[cfg(test)]
    pub async fn asset(&self, path: &str) -> Result<Option<(String, Vec<u8>)>> {
        let db = self.inner.db.lock().await;
        Ok(db
            .query_row(
                "SELECT content_type, data FROM assets WHERE path = ?1",
                params![path],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?)
    }

    /// Adds `increments` to numeric fields (missing or non-numeric count as
    /// zero) and overwrites the `set` fields, creating the document if needed.
    pub async fn increment(
        &self,
        collection: &str,
        id: &str,
        increments: &BTreeMap<String, i64>,
        set: Map<String, Value>,
    ) -> Result<()> {
        let mut db = self.inner.db.lock().await;
        let tx = db.transaction()?;
        let mut doc = match read_doc(&tx, collection, id)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (field, delta) in increments {
            let current = doc.get(field).and_then(Value::as_i64).unwrap_or(0);
            doc.insert(field.clone(), Value::from(current + delta));
        }
        doc.extend(set);
        write_doc(&tx, collection, id, &Value::Object(doc))?;
        tx.commit()?;
        Ok(())
    }
}

/// Adds the server timestamp to a document.
fn stamp(doc: Value) -> Result<Value> {
    let Value::Object(mut map) = doc else {
        return Err(StateError::NotAnObject);
    };
    map.insert(
        CREATED_AT.to_string(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Ok(Value::Object(map))
}

fn read_doc(conn: &Connection, collection: &str, id: &str) -> Result<Option<Value>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
}

fn write_doc(conn: &Connection, collection: &str, id: &str, doc: &Value) -> Result<()> {
    conn.execute(
        "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)
         ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
        params![collection, id, serde_json::to_string(doc)?],
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
