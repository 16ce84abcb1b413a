// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Photos attached to consultations.
//!
//! A photo starts life inline: its image bytes are carried inside the record as
//! a base64 data URL. Once the remote store has accepted the bytes the photo is
//! replaced by a reference descriptor holding the download URL. The
//! replacement is one-way; a [`PhotoRef`] never turns back into an inline photo.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Content type used for captured photos.
pub const JPEG: &str = "image/jpeg";

/// A photo whose bytes are still embedded in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlinePhoto {
    pub id: u64,
    /// Category label (e.g. "wound", "rash", "document").
    #[serde(rename = "type")]
    pub category: String,
    /// `data:<mime>;base64,<payload>` encoded image.
    pub data: String,
    pub timestamp: DateTime<Utc>,
    /// Approximate decoded size in bytes.
    pub size: u64,
}

/// Reference to a photo that has been uploaded to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: u64,
    #[serde(rename = "type")]
    pub category: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
}

/// A consultation photo, either inline or uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Photo {
    Inline(InlinePhoto),
    Uploaded(PhotoRef),
}

impl InlinePhoto {
    /// Encodes raw image bytes as an inline photo.
    pub fn from_bytes(
        id: u64,
        category: impl Into<String>,
        mime: &str,
        bytes: &[u8],
        timestamp: DateTime<Utc>,
    ) -> Self {
        let data = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
        let size = approximate_size(&data);
        InlinePhoto {
            id,
            category: category.into(),
            data,
            timestamp,
            size,
        }
    }

    /// Decodes the data URL into its content type and raw bytes.
    pub fn decode(&self) -> Result<(String, Vec<u8>)> {
        let rest = self
            .data
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidPhoto(format!("photo {} is not a data URL", self.id)))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidPhoto(format!("photo {} has no payload", self.id)))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidPhoto(format!("photo {} is not base64", self.id)))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidPhoto(format!("photo {}: {}", self.id, e)))?;
        Ok((mime.to_string(), bytes))
    }

    /// Replaces the inline bytes by a reference to the uploaded asset.
    pub fn into_uploaded(self, url: String) -> PhotoRef {
        PhotoRef {
            id: self.id,
            category: self.category,
            url,
            timestamp: self.timestamp,
            size: self.size,
        }
    }
}

impl Photo {
    pub fn id(&self) -> u64 {
        match self {
            Photo::Inline(p) => p.id,
            Photo::Uploaded(p) => p.id,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Photo::Inline(p) => p.size,
            Photo::Uploaded(p) => p.size,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Photo::Uploaded(_))
    }
}

/// Three quarters of the data URL length, the usual base64 overhead.
fn approximate_size(data_url: &str) -> u64 {
    (data_url.len() as u64 * 3) / 4
}

#[cfg(test)]
#[path = "photo_tests.rs"]
mod tests;
