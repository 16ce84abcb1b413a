// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `KIOSK_DATA_DIR` if set and non-empty.
pub fn data_dir() -> Option<PathBuf> {
    std::env::var(vars::KIOSK_DATA_DIR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns the `KIOSK_LOG` filter directive if set.
pub fn log_filter() -> Option<String> {
    std::env::var(vars::KIOSK_LOG).ok().filter(|v| !v.is_empty())
}

/// Returns `KIOSK_REMOTE_URL` if set; it overrides the configured remote URL.
pub fn remote_url() -> Option<String> {
    std::env::var(vars::KIOSK_REMOTE_URL)
        .ok()
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
