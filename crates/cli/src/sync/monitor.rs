// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking and deferred follow-up actions.
//!
//! Network reachability and remote readiness are two independent flags: the
//! network can be up while the remote store has not finished its handshake.
//! Together with the demo flag they decide the [`OperatingMode`].

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// Delays applied after the network comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait before retrying the handshake.
    pub reconnect_delay: Duration,
    /// Wait before draining the local queue.
    pub sync_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            reconnect_delay: Duration::from_millis(2000),
            sync_delay: Duration::from_millis(3000),
        }
    }
}

/// Observed connectivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectivityState {
    pub network_online: bool,
    pub remote_ready: bool,
}

/// Where new records go, derived from connectivity and the demo flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Demo mode: records stay in the local demo sink.
    Demo,
    /// Network up and remote ready: records are written remotely.
    Online,
    /// Network up but remote not ready: records are queued.
    Degraded,
    /// No network: records are queued.
    Offline,
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperatingMode::Demo => "demo",
            OperatingMode::Online => "online",
            OperatingMode::Degraded => "online, remote unavailable",
            OperatingMode::Offline => "offline",
        };
        write!(f, "{label}")
    }
}

/// A change in network reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkEvent {
    Restored,
    Lost,
}

impl fmt::Display for NetworkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkEvent::Restored => write!(f, "Connection restored"),
            NetworkEvent::Lost => write!(f, "Offline mode: data will be saved locally"),
        }
    }
}

/// Work deferred until a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Retry the remote handshake.
    Reconnect,
    /// Drain every pending queue.
    Sync,
}

/// Tracks connectivity and decides the follow-up to network changes.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    state: ConnectivityState,
    demo: bool,
    timing: Timing,
}

impl ConnectivityMonitor {
    pub fn new(demo: bool, timing: Timing) -> Self {
        ConnectivityMonitor {
            state: ConnectivityState::default(),
            demo,
            timing,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
    }

    pub fn network_online(&self) -> bool {
        self.state.network_online
    }

    pub fn remote_ready(&self) -> bool {
        self.state.remote_ready
    }

    pub fn set_remote_ready(&mut self, ready: bool) {
        self.state.remote_ready = ready;
    }

    /// Current operating mode. Demo wins over everything else.
    pub fn mode(&self) -> OperatingMode {
        match (self.demo, self.state.network_online, self.state.remote_ready) {
            (true, _, _) => OperatingMode::Demo,
            (false, true, true) => OperatingMode::Online,
            (false, true, false) => OperatingMode::Degraded,
            (false, false, _) => OperatingMode::Offline,
        }
    }

    /// Record the latest reachability reading. Returns an event only when the
    /// reading differs from the previous one.
    pub fn observe_network(&mut self, online: bool) -> Option<NetworkEvent> {
        if self.state.network_online == online {
            return None;
        }
        self.state.network_online = online;
        Some(if online {
            NetworkEvent::Restored
        } else {
            NetworkEvent::Lost
        })
    }

    /// Follow-up actions for an event, with their delays.
    ///
    /// A restored network schedules a handshake retry when the remote is not
    /// ready (outside demo mode) and a queue drain when anything is pending.
    /// A lost network schedules nothing.
    pub fn plan(&self, event: NetworkEvent, pending: usize) -> Vec<(Duration, ScheduledAction)> {
        let mut actions = Vec::new();
        if event == NetworkEvent::Restored {
            if !self.state.remote_ready && !self.demo {
                actions.push((self.timing.reconnect_delay, ScheduledAction::Reconnect));
            }
            if pending > 0 {
                actions.push((self.timing.sync_delay, ScheduledAction::Sync));
            }
        }
        actions
    }
}

/// Deadline-ordered list of deferred actions.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<(Instant, ScheduledAction)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, action: ScheduledAction) {
        let at = now + delay;
        let pos = self.entries.partition_point(|(deadline, _)| *deadline <= at);
        self.entries.insert(pos, (at, action));
    }

    /// Earliest deadline, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.first().map(|(at, _)| *at)
    }

    /// Remove and return every action due at `now`, in deadline order.
    pub fn take_due(&mut self, now: Instant) -> Vec<ScheduledAction> {
        let due = self.entries.partition_point(|(deadline, _)| *deadline <= now);
        self.entries.drain(..due).map(|(_, action)| action).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
