// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the kiosk-remote server binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper to spawn a server process and clean it up on drop.
struct ServerProcess {
    child: Child,
    port: u16,
}

impl ServerProcess {
    fn spawn(data_dir: &Path, port: u16) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_kiosk-remote"))
            .arg("--bind")
            .arg(format!("127.0.0.1:{}", port))
            .arg("--data")
            .arg(data_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn server process");

        ServerProcess { child, port }
    }

    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Connects, retrying while the process starts up.
    async fn connect(&self) -> Client {
        for _ in 0..20 {
            if let Ok(Ok((stream, _))) =
                tokio::time::timeout(Duration::from_millis(500), connect_async(self.ws_url()))
                    .await
            {
                return stream;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        unreachable!("server did not accept connections");
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A port less likely to collide with parallel test runs.
fn test_port() -> u16 {
    49152 + (std::process::id() % 1000) as u16
}

async fn request(ws: &mut Client, msg: Value) -> Value {
    ws.send(Message::Text(msg.to_string().into()))
        .await
        .expect("send");
    let reply = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("reply in time");
    let Some(Ok(Message::Text(text))) = reply else {
        unreachable!("expected a text frame");
    };
    serde_json::from_str(&text).unwrap()
}

#[tokio::test]
async fn documents_survive_restart() {
    let data = tempfile::tempdir().unwrap();
    let port = test_port();

    {
        let server = ServerProcess::spawn(data.path(), port);
        let mut ws = server.connect().await;

        let welcome = request(&mut ws, json!({"type": "hello", "client": "it", "version": "1"})).await;
        assert_eq!(welcome["type"], "welcome");

        let ack = request(
            &mut ws,
            json!({
                "type": "put", "req": 1, "collection": "consultations", "id": "7",
                "doc": {"id": 7, "synced": true}
            }),
        )
        .await;
        assert_eq!(ack, json!({"type": "ack", "req": 1}));
    }

    let server = ServerProcess::spawn(data.path(), port);
    let mut ws = server.connect().await;
    request(&mut ws, json!({"type": "hello", "client": "it", "version": "1"})).await;

    let docs = request(
        &mut ws,
        json!({"type": "query", "req": 2, "collection": "consultations", "filters": []}),
    )
    .await;

    assert_eq!(docs["type"], "documents");
    assert_eq!(docs["docs"][0]["id"], 7);
    assert!(docs["docs"][0]["created_at"].is_string());
}

#[tokio::test]
async fn ping_is_answered_before_handshake() {
    let data = tempfile::tempdir().unwrap();
    let server = ServerProcess::spawn(data.path(), test_port() + 1000);
    let mut ws = server.connect().await;

    let pong = request(&mut ws, json!({"type": "ping", "id": 12345})).await;

    assert_eq!(pong, json!({"type": "pong", "id": 12345}));
}
