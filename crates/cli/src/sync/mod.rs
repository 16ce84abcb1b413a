// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first storage of captured records.
//!
//! Records go to the remote store when it is reachable and to a local queue
//! when it is not; the queue is drained once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//!                ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//!  record ──────►│   Station   │────►│ RemoteSyncClient │────►│ RemoteStore │
//!   (route)      │ (router +   │     └──────────────────┘     │   (trait)   │
//!                │ reconciler) │                              └─────────────┘
//!                └─────────────┘
//!                  │        ▲
//!                  ▼        │ network events
//!           ┌────────────┐ ┌─────────────────────┐
//!           │ LocalStore │ │ ConnectivityMonitor │
//!           │ (pending)  │ │   + Scheduler       │
//!           └────────────┘ └─────────────────────┘
//! ```
//!
//! # Features
//!
//! - Demo mode writing to a separate local sink
//! - Photo upload with inline fallback per photo
//! - Appointment slot collision checks
//! - Delayed reconnect and sync after the network comes back
//! - Injectable remote store and network probe for testing

mod client;
mod monitor;
mod probe;
mod reconcile;
mod remote;
mod router;
mod station;

pub use client::{photo_path, Persisted, RemoteSyncClient, SyncError, SyncResult, APP_VERSION};
pub use monitor::{
    ConnectivityMonitor, ConnectivityState, NetworkEvent, OperatingMode, ScheduledAction,
    Scheduler, Timing,
};
pub use probe::{host_port, NetworkProbe, StaticProbe, TcpProbe};
pub use reconcile::{KindTally, SyncReport};
pub use remote::{NoRemote, RemoteError, RemoteFuture, RemoteResult, RemoteStore, WsRemote};
pub use router::{QueueReason, RouteOutcome};
pub use station::{Station, StationEvent};

#[cfg(test)]
pub(crate) mod test_helpers;





#[cfg(test)]
mod reconcile_tests;
