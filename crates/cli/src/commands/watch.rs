// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `kiosk watch`: a long-running loop that probes the network and lets the
//! station reconnect and drain the queue when connectivity returns.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::time::{sleep_until, Instant, MissedTickBehavior};

use super::Context;
use crate::error::Result;
use crate::sync::{NetworkProbe, RemoteStore, Station};

const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

pub async fn run(ctx: &Context) -> Result<()> {
    let mut station = ctx.open_station().await?;
    let mut probe = ctx.probe()?;
    let interval = ctx
        .config
        .effective_remote()?
        .map_or(DEFAULT_PROBE_INTERVAL, |r| r.probe_interval());

    println!(
        "Watching connectivity ({}); press Ctrl-C to stop",
        station.mode()
    );
    let shutdown = until_signal(tokio::signal::ctrl_c());
    run_impl(&mut station, probe.as_mut(), interval, shutdown, |line| {
        println!("{line}")
    })
    .await?;
    println!("Stopped ({} record(s) pending)", station.store().pending_total()?);
    Ok(())
}

/// Resolves when `signal` fires. If the handler could not be installed the
/// error is logged and this never resolves, so the loop keeps running.
pub(crate) async fn until_signal(signal: impl Future<Output = io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C, stop the process to exit");
        std::future::pending::<()>().await;
    }
}

/// Drives the station until `shutdown` resolves. Every probe result goes to
/// [`Station::on_network`]; scheduled reconnects and syncs run as their
/// deadlines pass. Each transition and action is reported through `emit`.
pub(crate) async fn run_impl<R, P, F>(
    station: &mut Station<R>,
    probe: &mut P,
    interval: Duration,
    shutdown: F,
    mut emit: impl FnMut(String),
) -> Result<()>
where
    R: RemoteStore,
    P: NetworkProbe + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let deadline = station.next_deadline();
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                let online = probe.check().await;
                if let Some(event) = station.on_network(online)? {
                    tracing::info!(%event, "network transition");
                    emit(event.to_string());
                }
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                for event in station.run_due().await? {
                    emit(event.to_string());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
