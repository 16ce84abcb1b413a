// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between a kiosk and the remote document store.
//!
//! The protocol is request/response:
//! - The client opens with `Hello`, the server answers `Welcome` (the handshake)
//! - Every other request carries a client-chosen `req` number echoed by the
//!   server in its reply, or in an `Error` if the request failed

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version exchanged during the handshake.
pub const PROTOCOL_VERSION: &str = "1";

/// Equality filter used by `Query`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if the document has `field == value`.
    pub fn matches(&self, doc: &Value) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens a session.
    Hello {
        /// Free-form client name, logged by the server.
        client: String,
        version: String,
    },

    /// Write a document under a caller-chosen id, replacing any previous one.
    Put {
        req: u64,
        collection: String,
        id: String,
        doc: Value,
    },

    /// Append a document; the server picks the id.
    Add {
        req: u64,
        collection: String,
        doc: Value,
    },

    /// Fetch every document in a collection matching all filters.
    Query {
        req: u64,
        collection: String,
        filters: Vec<Filter>,
    },

    /// Store a binary asset at `path`.
    Upload {
        req: u64,
        path: String,
        content_type: String,
        /// Base64-encoded bytes.
        data: String,
    },

    /// Merge into a document: add to numeric fields, overwrite others.
    Increment {
        req: u64,
        collection: String,
        id: String,
        increments: BTreeMap<String, i64>,
        set: Map<String, Value>,
    },

    /// Ping message for keepalive.
    Ping { id: u64 },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Handshake accepted.
    Welcome { server: String, version: String },

    /// Request applied (`Put`, `Increment`).
    Ack { req: u64 },

    /// Document appended (`Add`).
    Created { req: u64, id: String },

    /// Query result.
    Documents { req: u64, docs: Vec<Value> },

    /// Asset stored; `url` is its download location.
    Uploaded { req: u64, url: String },

    /// Pong response to client Ping.
    Pong { id: u64 },

    /// Error message.
    Error {
        /// Request that failed, if the server could parse one.
        req: Option<u64>,
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    pub fn hello(client: impl Into<String>) -> Self {
        ClientMessage::Hello {
            client: client.into(),
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Request number, if the message carries one.
    pub fn req(&self) -> Option<u64> {
        match self {
            ClientMessage::Put { req, .. }
            | ClientMessage::Add { req, .. }
            | ClientMessage::Query { req, .. }
            | ClientMessage::Upload { req, .. }
            | ClientMessage::Increment { req, .. } => Some(*req),
            ClientMessage::Hello { .. } | ClientMessage::Ping { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    pub fn welcome(server: impl Into<String>) -> Self {
        ServerMessage::Welcome {
            server: server.into(),
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Creates an Error message.
    pub fn error(req: Option<u64>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            req,
            message: message.into(),
        }
    }

    /// Request number this message answers, if any.
    pub fn req(&self) -> Option<u64> {
        match self {
            ServerMessage::Ack { req }
            | ServerMessage::Created { req, .. }
            | ServerMessage::Documents { req, .. }
            | ServerMessage::Uploaded { req, .. } => Some(*req),
            ServerMessage::Error { req, .. } => *req,
            ServerMessage::Welcome { .. } | ServerMessage::Pong { .. } => None,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
