//! Polling scheduler.
//!
//! Owns the three repeating cadences of the dashboard: the 1-second
//! clock tick, the silent live-status refresh, and the site-check
//! refresh. Each cadence runs on its own tokio interval for the lifetime
//! of the process; nothing is cancellable and nothing prevents overlap.
//! If a fetch outlives its period the next tick still fires and the
//! last-arriving snapshot wins.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

use crate::config::VigilConfig;

/// One scheduled action falling due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEvent {
    /// 1-second clock tick: advances the header clock and countdowns
    Tick,
    /// Live-status refresh; silent refreshes repaint in place without
    /// loading placeholders
    RefreshBots { silent: bool },
    /// Site-check refresh
    RefreshSites,
}

/// Cadence configuration for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Clock tick period
    pub tick: Duration,
    /// Live-status refresh period
    pub status_refresh: Duration,
    /// Site-check refresh period
    pub history_refresh: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            status_refresh: Duration::from_secs(60),
            history_refresh: Duration::from_secs(300),
        }
    }
}

impl From<&VigilConfig> for SchedulerConfig {
    fn from(config: &VigilConfig) -> Self {
        Self {
            tick: Duration::from_secs(1),
            status_refresh: config.status_refresh(),
            history_refresh: config.history_refresh(),
        }
    }
}

/// Spawns the repeating poll cadences.
pub struct Scheduler;

impl Scheduler {
    /// Launch the three cadence tasks, publishing into `tx`.
    ///
    /// Every interval starts one full period in the future: the caller
    /// performs the initial combined fetch itself, so the first scheduled
    /// refresh must not double-fire at startup. Tasks end quietly when
    /// the receiver is dropped.
    pub fn spawn(config: SchedulerConfig, tx: mpsc::UnboundedSender<PollEvent>) {
        Self::spawn_cadence(config.tick, PollEvent::Tick, tx.clone());
        Self::spawn_cadence(
            config.status_refresh,
            PollEvent::RefreshBots { silent: true },
            tx.clone(),
        );
        Self::spawn_cadence(config.history_refresh, PollEvent::RefreshSites, tx);
    }

    fn spawn_cadence(period: Duration, event: PollEvent, tx: mpsc::UnboundedSender<PollEvent>) {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }
}
