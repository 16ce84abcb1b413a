// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The kiosk station: sole owner of the local queue, the remote client and
//! the connectivity monitor.
//!
//! Routing ([`Station::route`]) and reconciliation ([`Station::reconcile`])
//! both take `&mut self`, so queue mutations are serialized through this one
//! value without a lock.

use std::fmt;

use tokio::time::Instant;
use tracing::{info, warn};

use kiosk_core::{Area, IdGenerator, LocalStore, RecordId, RecordKind};

use super::client::{RemoteSyncClient, SyncResult};
use super::monitor::{ConnectivityMonitor, NetworkEvent, OperatingMode, ScheduledAction, Scheduler};
use super::reconcile::SyncReport;
use super::remote::RemoteStore;

/// Result of running one scheduled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationEvent {
    Reconnected,
    ReconnectFailed,
    Synced(SyncReport),
}

impl fmt::Display for StationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationEvent::Reconnected => write!(f, "Connected to remote store"),
            StationEvent::ReconnectFailed => write!(f, "Remote store still unavailable"),
            StationEvent::Synced(report) => write!(f, "{report}"),
        }
    }
}

pub struct Station<R: RemoteStore> {
    pub(crate) monitor: ConnectivityMonitor,
    pub(crate) store: LocalStore,
    pub(crate) client: RemoteSyncClient<R>,
    scheduler: Scheduler,
    ids: IdGenerator,
    location: String,
}

impl<R: RemoteStore> Station<R> {
    /// Assemble a station. Ids are seeded past every id already stored.
    pub fn new(
        store: LocalStore,
        remote: R,
        monitor: ConnectivityMonitor,
        location: impl Into<String>,
    ) -> SyncResult<Self> {
        let ids = IdGenerator::new();
        if let Some(max) = store.max_record_id()? {
            ids.observe(max);
        }
        Ok(Station {
            monitor,
            store,
            client: RemoteSyncClient::new(remote),
            scheduler: Scheduler::new(),
            ids,
            location: location.into(),
        })
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LocalStore {
        &mut self.store
    }

    pub fn client(&self) -> &RemoteSyncClient<R> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut RemoteSyncClient<R> {
        &mut self.client
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn mode(&self) -> OperatingMode {
        self.monitor.mode()
    }

    /// Fresh id for a record or photo.
    pub fn next_id(&self) -> RecordId {
        self.ids.next_record()
    }

    /// Pending record count for one kind.
    pub fn pending(&self, kind: RecordKind) -> SyncResult<usize> {
        Ok(self.store.count(Area::Pending, kind)?)
    }

    /// Set the initial network reading and, outside demo mode, try the
    /// handshake when the network is up.
    pub async fn start(&mut self, network_online: bool) {
        self.monitor.observe_network(network_online);
        if network_online && !self.monitor.is_demo() {
            self.try_connect().await;
        }
    }

    /// One handshake attempt. Returns the resulting readiness.
    pub async fn try_connect(&mut self) -> bool {
        match self.client.connect().await {
            Ok(()) => info!("remote store ready"),
            Err(e) => warn!(error = %e, "remote store unavailable"),
        }
        self.refresh_ready();
        self.monitor.remote_ready()
    }

    /// Mirror the client's readiness into the monitor.
    pub(crate) fn refresh_ready(&mut self) {
        self.monitor.set_remote_ready(self.client.is_ready());
    }

    /// Feed a reachability reading; on a transition, schedule the follow-up
    /// actions and return the event.
    pub fn on_network(&mut self, online: bool) -> SyncResult<Option<NetworkEvent>> {
        let Some(event) = self.monitor.observe_network(online) else {
            return Ok(None);
        };
        let pending = self.store.pending_total()?;
        let now = Instant::now();
        for (delay, action) in self.monitor.plan(event, pending) {
            self.scheduler.schedule(now, delay, action);
        }
        info!(?event, pending, "network changed");
        Ok(Some(event))
    }

    /// Earliest scheduled deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Run every scheduled action that is due.
    pub async fn run_due(&mut self) -> SyncResult<Vec<StationEvent>> {
        let mut events = Vec::new();
        for action in self.scheduler.take_due(Instant::now()) {
            events.push(self.run_action(action).await?);
        }
        Ok(events)
    }

    /// Sleep through the schedule, running each action at its deadline,
    /// until nothing is left.
    pub async fn run_scheduled(&mut self) -> SyncResult<Vec<StationEvent>> {
        let mut events = Vec::new();
        while let Some(deadline) = self.scheduler.next_deadline() {
            tokio::time::sleep_until(deadline).await;
            events.extend(self.run_due().await?);
        }
        Ok(events)
    }

    async fn run_action(&mut self, action: ScheduledAction) -> SyncResult<StationEvent> {
        match action {
            ScheduledAction::Reconnect => {
                // The network may have dropped again or the remote may have
                // come up meanwhile.
                if self.monitor.is_demo() || !self.monitor.network_online() {
                    return Ok(StationEvent::ReconnectFailed);
                }
                if self.client.is_ready() || self.try_connect().await {
                    Ok(StationEvent::Reconnected)
                } else {
                    Ok(StationEvent::ReconnectFailed)
                }
            }
            ScheduledAction::Sync => {
                let report = self.reconcile(&RecordKind::ALL).await?;
                Ok(StationEvent::Synced(report))
            }
        }
    }
}
