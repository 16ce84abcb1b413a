// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::SyncError;

/// All possible errors that can occur in the kiosk CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: no config at {0}\n  hint: run 'kiosk init' first")]
    NotInitialized(String),

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no data directory\n  hint: pass --data-dir or set KIOSK_DATA_DIR")]
    NoDataDir,

    #[error("invalid remote URL '{0}'\n  hint: use ws://host:port or wss://host:port")]
    InvalidRemoteUrl(String),

    #[error("invalid photo argument '{0}'\n  hint: use --photo TYPE=PATH, e.g. --photo wound=./leg.jpg")]
    InvalidPhotoArg(String),

    #[error("cannot read photo {path}: {source}")]
    PhotoRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("{0}")]
    Record(#[from] kiosk_core::Error),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("config error: {0}")]
    Config(String),

    #[error("cannot start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
