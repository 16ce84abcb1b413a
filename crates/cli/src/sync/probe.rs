// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability probes.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::http::Uri;

/// Answers "is the network up right now?".
pub trait NetworkProbe: Send {
    fn check(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Probe that opens (and drops) a TCP connection to the remote host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: Option<(String, u16)>,
    timeout: Duration,
}

impl TcpProbe {
    /// Probe the host of a `ws://` or `wss://` URL. An unparseable URL yields
    /// a probe that always reports offline.
    pub fn for_url(url: &str, timeout: Duration) -> Self {
        TcpProbe {
            addr: host_port(url),
            timeout,
        }
    }
}

impl NetworkProbe for TcpProbe {
    fn check(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            let Some((host, port)) = &self.addr else {
                return false;
            };
            matches!(
                tokio::time::timeout(self.timeout, TcpStream::connect((host.as_str(), *port))).await,
                Ok(Ok(_))
            )
        })
    }
}

/// Probe with a fixed answer, used when no remote is configured.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub bool);

impl NetworkProbe for StaticProbe {
    fn check(&mut self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        let online = self.0;
        Box::pin(async move { online })
    }
}

/// Host and port of a WebSocket URL, defaulting the port by scheme.
pub fn host_port(url: &str) -> Option<(String, u16)> {
    let uri: Uri = url.parse().ok()?;
    let host = uri.host()?.trim_matches(|c| c == '[' || c == ']').to_string();
    let port = match uri.port_u16() {
        Some(port) => port,
        None => match uri.scheme_str()? {
            "wss" | "https" => 443,
            _ => 80,
        },
    };
    Some((host, port))
}
