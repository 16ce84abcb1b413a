// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document store abstraction.
//!
//! Provides a trait-based seam over the remote store that enables:
//! - A WebSocket client for the `kiosk-remote` server in production
//! - In-memory fault-injecting stores for unit testing
//!
//! The store only knows documents, assets and counters; what a record looks
//! like on the wire is decided by [`RemoteSyncClient`](super::RemoteSyncClient).

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Map, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use kiosk_core::protocol::{ClientMessage, Filter, ServerMessage, PROTOCOL_VERSION};

/// Error type for remote store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// No remote store is configured for this kiosk.
    #[error("no remote store configured")]
    NotConfigured,

    /// Connection or handshake failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// A request was made before the handshake completed.
    #[error("not connected")]
    NotConnected,

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// The server did not answer in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The server refused the request.
    #[error("rejected by remote store: {0}")]
    Rejected(String),

    /// The server answered with something other than the expected reply.
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Capabilities the kiosk needs from the remote store.
///
/// Calls are issued one at a time by a single owner; implementations do not
/// need to support concurrent requests.
pub trait RemoteStore: Send {
    /// Perform the handshake. Success makes the store ready.
    fn connect(&mut self) -> RemoteFuture<'_, ()>;

    /// True once a handshake has completed and the session is still open.
    fn is_ready(&self) -> bool;

    /// Write `doc` under `id`, replacing any previous document.
    fn put(&mut self, collection: &str, id: &str, doc: Value) -> RemoteFuture<'_, ()>;

    /// Append `doc`; returns the id chosen by the store.
    fn add(&mut self, collection: &str, doc: Value) -> RemoteFuture<'_, String>;

    /// Documents matching every filter.
    fn query(&mut self, collection: &str, filters: Vec<Filter>) -> RemoteFuture<'_, Vec<Value>>;

    /// Store binary bytes at `path`; returns the download URL.
    fn upload(&mut self, path: &str, content_type: &str, bytes: Vec<u8>)
        -> RemoteFuture<'_, String>;

    /// Merge counters and fields into a document.
    fn increment(
        &mut self,
        collection: &str,
        id: &str,
        increments: BTreeMap<String, i64>,
        set: Map<String, Value>,
    ) -> RemoteFuture<'_, ()>;
}

impl RemoteStore for Box<dyn RemoteStore> {
    fn connect(&mut self) -> RemoteFuture<'_, ()> {
        (**self).connect()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn put(&mut self, collection: &str, id: &str, doc: Value) -> RemoteFuture<'_, ()> {
        (**self).put(collection, id, doc)
    }

    fn add(&mut self, collection: &str, doc: Value) -> RemoteFuture<'_, String> {
        (**self).add(collection, doc)
    }

    fn query(&mut self, collection: &str, filters: Vec<Filter>) -> RemoteFuture<'_, Vec<Value>> {
        (**self).query(collection, filters)
    }

    fn upload(
        &mut self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> RemoteFuture<'_, String> {
        (**self).upload(path, content_type, bytes)
    }

    fn increment(
        &mut self,
        collection: &str,
        id: &str,
        increments: BTreeMap<String, i64>,
        set: Map<String, Value>,
    ) -> RemoteFuture<'_, ()> {
        (**self).increment(collection, id, increments, set)
    }
}

/// Stand-in used when no `[remote]` section is configured. Never ready.
#[derive(Debug, Default)]
pub struct NoRemote;

impl RemoteStore for NoRemote {
    fn connect(&mut self) -> RemoteFuture<'_, ()> {
        Box::pin(async { Err(RemoteError::NotConfigured) })
    }

    fn is_ready(&self) -> bool {
        false
    }

    fn put(&mut self, _collection: &str, _id: &str, _doc: Value) -> RemoteFuture<'_, ()> {
        Box::pin(async { Err(RemoteError::NotConfigured) })
    }

    fn add(&mut self, _collection: &str, _doc: Value) -> RemoteFuture<'_, String> {
        Box::pin(async { Err(RemoteError::NotConfigured) })
    }

    fn query(&mut self, _collection: &str, _filters: Vec<Filter>) -> RemoteFuture<'_, Vec<Value>> {
        Box::pin(async { Err(RemoteError::NotConfigured) })
    }

    fn upload(
        &mut self,
        _path: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> RemoteFuture<'_, String> {
        Box::pin(async { Err(RemoteError::NotConfigured) })
    }

    fn increment(
        &mut self,
        _collection: &str,
        _id: &str,
        _increments: BTreeMap<String, i64>,
        _set: Map<String, Value>,
    ) -> RemoteFuture<'_, ()> {
        Box::pin(async { Err(RemoteError::NotConfigured) })
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Remote store reached over WebSocket, using tokio-tungstenite.
pub struct WsRemote {
    url: String,
    client_name: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    /// The WebSocket connection, if the handshake succeeded.
    ws: Option<WsStream>,
    next_req: u64,
}

impl WsRemote {
    /// Create a client for the server at `url`. Nothing is opened until
    /// [`RemoteStore::connect`].
    pub fn new(
        url: impl Into<String>,
        client_name: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        WsRemote {
            url: url.into(),
            client_name: client_name.into(),
            connect_timeout,
            request_timeout,
            ws: None,
            next_req: 1,
        }
    }

    fn next_req(&mut self) -> u64 {
        let req = self.next_req;
        self.next_req += 1;
        req
    }

    async fn handshake(&mut self) -> RemoteResult<()> {
        let (mut ws, _) = tokio::time::timeout(
            self.connect_timeout,
            tokio_tungstenite::connect_async(self.url.as_str()),
        )
        .await
        .map_err(|_| RemoteError::Timeout(self.connect_timeout))?
        .map_err(|e| RemoteError::ConnectionFailed(e.to_string()))?;

        send(&mut ws, &ClientMessage::hello(&self.client_name)).await?;

        let reply = tokio::time::timeout(self.connect_timeout, next_message(&mut ws))
            .await
            .map_err(|_| RemoteError::Timeout(self.connect_timeout))??;

        match reply {
            ServerMessage::Welcome { version, .. } if version == PROTOCOL_VERSION => {
                self.ws = Some(ws);
                Ok(())
            }
            ServerMessage::Welcome { version, .. } => Err(RemoteError::ConnectionFailed(format!(
                "protocol version mismatch: server {version}, client {PROTOCOL_VERSION}"
            ))),
            ServerMessage::Error { message, .. } => Err(RemoteError::Rejected(message)),
            other => Err(RemoteError::UnexpectedReply(format!("{other:?}"))),
        }
    }

    /// Send one request and wait for the reply carrying the same `req`.
    ///
    /// Any failure drops the connection; the store is no longer ready until
    /// the next successful handshake.
    async fn round_trip(&mut self, msg: ClientMessage) -> RemoteResult<ServerMessage> {
        let req = msg.req();
        let timeout = self.request_timeout;
        let ws = self.ws.as_mut().ok_or(RemoteError::NotConnected)?;

        let result = tokio::time::timeout(timeout, async {
            send(ws, &msg).await?;
            loop {
                let reply = next_message(ws).await?;
                if reply.req() == req {
                    return Ok(reply);
                }
                // Stale replies and pongs are skipped
                tracing::debug!(?reply, "skipping unrelated message");
            }
        })
        .await
        .unwrap_or(Err(RemoteError::Timeout(timeout)));

        match result {
            Ok(ServerMessage::Error { message, .. }) => Err(RemoteError::Rejected(message)),
            Ok(reply) => Ok(reply),
            Err(e) => {
                self.ws = None;
                Err(e)
            }
        }
    }
}

async fn send(ws: &mut WsStream, msg: &ClientMessage) -> RemoteResult<()> {
    let json = msg
        .to_json()
        .map_err(|e| RemoteError::Serialization(e.to_string()))?;
    ws.send(Message::Text(json.into()))
        .await
        .map_err(|e| RemoteError::ConnectionFailed(e.to_string()))
}

async fn next_message(ws: &mut WsStream) -> RemoteResult<ServerMessage> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                return ServerMessage::from_json(&text)
                    .map_err(|e| RemoteError::Serialization(e.to_string()));
            }
            Some(Ok(Message::Close(_))) | None => return Err(RemoteError::ConnectionClosed),
            Some(Ok(_)) => {
                // Ignore ping/pong and binary frames
                continue;
            }
            Some(Err(e)) => return Err(RemoteError::ConnectionFailed(e.to_string())),
        }
    }
}

fn unexpected<T>(reply: ServerMessage) -> RemoteResult<T> {
    Err(RemoteError::UnexpectedReply(format!("{reply:?}")))
}

impl RemoteStore for WsRemote {
    fn connect(&mut self) -> RemoteFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                let _ = ws.close(None).await;
            }
            self.handshake().await
        })
    }

    fn is_ready(&self) -> bool {
        self.ws.is_some()
    }

    fn put(&mut self, collection: &str, id: &str, doc: Value) -> RemoteFuture<'_, ()> {
        let collection = collection.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let req = self.next_req();
            let msg = ClientMessage::Put {
                req,
                collection,
                id,
                doc,
            };
            match self.round_trip(msg).await? {
                ServerMessage::Ack { .. } => Ok(()),
                other => unexpected(other),
            }
        })
    }

    fn add(&mut self, collection: &str, doc: Value) -> RemoteFuture<'_, String> {
        let collection = collection.to_string();
        Box::pin(async move {
            let req = self.next_req();
            let msg = ClientMessage::Add {
                req,
                collection,
                doc,
            };
            match self.round_trip(msg).await? {
                ServerMessage::Created { id, .. } => Ok(id),
                other => unexpected(other),
            }
        })
    }

    fn query(&mut self, collection: &str, filters: Vec<Filter>) -> RemoteFuture<'_, Vec<Value>> {
        let collection = collection.to_string();
        Box::pin(async move {
            let req = self.next_req();
            let msg = ClientMessage::Query {
                req,
                collection,
                filters,
            };
            match self.round_trip(msg).await? {
                ServerMessage::Documents { docs, .. } => Ok(docs),
                other => unexpected(other),
            }
        })
    }

    fn upload(
        &mut self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> RemoteFuture<'_, String> {
        let path = path.to_string();
        let content_type = content_type.to_string();
        Box::pin(async move {
            let req = self.next_req();
            let msg = ClientMessage::Upload {
                req,
                path,
                content_type,
                data: STANDARD.encode(&bytes),
            };
            match self.round_trip(msg).await? {
                ServerMessage::Uploaded { url, .. } => Ok(url),
                other => unexpected(other),
            }
        })
    }

    fn increment(
        &mut self,
        collection: &str,
        id: &str,
        increments: BTreeMap<String, i64>,
        set: Map<String, Value>,
    ) -> RemoteFuture<'_, ()> {
        let collection = collection.to_string();
        let id = id.to_string();
        Box::pin(async move {
            let req = self.next_req();
            let msg = ClientMessage::Increment {
                req,
                collection,
                id,
                increments,
                set,
            };
            match self.round_trip(msg).await? {
                ServerMessage::Ack { .. } => Ok(()),
                other => unexpected(other),
            }
        })
    }
}
