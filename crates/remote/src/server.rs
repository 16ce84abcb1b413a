// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection must open with `hello`; every later request is answered
//! with the reply variant for its kind, or an `error` carrying its `req`.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use kiosk_core::protocol::{ClientMessage, ServerMessage, PROTOCOL_VERSION};

use crate::state::ServerState;

/// Name announced in `welcome`.
pub const SERVER_NAME: &str = concat!("kiosk-remote ", env!("CARGO_PKG_VERSION"));

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let mut session = Session::default();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(&text, &mut session, &state).await;
                let json = response.to_json()?;
                ws_sink.send(Message::Text(json.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!(client = ?session.client, "Connection closed: {}", peer_addr);
    Ok(())
}

/// Per-connection handshake state.
#[derive(Debug, Default)]
pub(crate) struct Session {
    /// Client name, set once `hello` succeeds.
    pub client: Option<String>,
}

/// Process one client message and build its reply.
pub(crate) async fn handle_client_message(
    text: &str,
    session: &mut Session,
    state: &ServerState,
) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => return ServerMessage::error(None, format!("malformed message: {e}")),
    };
    debug!(?msg, "received");

    let req = msg.req();
    let result = match msg {
        ClientMessage::Hello { client, version } => {
            if version != PROTOCOL_VERSION {
                warn!(%client, %version, "refusing client with unsupported protocol version");
                return ServerMessage::error(
                    None,
                    format!("unsupported protocol version {version}, server speaks {PROTOCOL_VERSION}"),
                );
            }
            info!(%client, "handshake");
            session.client = Some(client);
            return ServerMessage::welcome(SERVER_NAME);
        }
        ClientMessage::Ping { id } => return ServerMessage::Pong { id },
        _ if session.client.is_none() => {
            return ServerMessage::error(req, "handshake required: send hello first");
        }
        ClientMessage::Put {
            req,
            collection,
            id,
            doc,
        } => state
            .put(&collection, &id, doc)
            .await
            .map(|()| ServerMessage::Ack { req }),
        ClientMessage::Add {
            req,
            collection,
            doc,
        } => state
            .add(&collection, doc)
            .await
            .map(|id| ServerMessage::Created { req, id }),
        ClientMessage::Query {
            req,
            collection,
            filters,
        } => state
            .query(&collection, &filters)
            .await
            .map(|docs| ServerMessage::Documents { req, docs }),
        ClientMessage::Upload {
            req,
            path,
            content_type,
            data,
        } => state
            .upload(&path, &content_type, &data)
            .await
            .map(|url| ServerMessage::Uploaded { req, url }),
        ClientMessage::Increment {
            req,
            collection,
            id,
            increments,
            set,
        } => state
            .increment(&collection, &id, &increments, set)
            .await
            .map(|()| ServerMessage::Ack { req }),
    };

    result.unwrap_or_else(|e| {
        warn!(?req, "request failed: {}", e);
        ServerMessage::error(req, e.to_string())
    })
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
