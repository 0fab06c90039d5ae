//! Ping-history construction from fetched snapshots.
//!
//! Each successful snapshot appends one [`HistoryPoint`] per entity to
//! that entity's series, capped at the most recent 30 points, then the
//! full mapping is persisted to the local cache (best-effort). Neither
//! backend reports a latency figure yet, so the ping value comes from an
//! injected [`PingSynth`] strategy; the production strategy draws a
//! bounded pseudo-random placeholder pending a real backend field.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::warn;

use crate::cache::HistoryCache;
use crate::clock::SharedClock;
use crate::state::DashState;
use crate::types::{Entity, EntityId, HistoryPoint};

/// Ping value source for captured history points.
pub trait PingSynth: Send {
    /// Ping in milliseconds for this entity's next history point.
    fn ping_for(&mut self, entity: &Entity) -> u32;
}

/// Placeholder synthesis: a pseudo-random value in [150, 400] ms for
/// healthy entities, 0 (unknown/down) otherwise.
#[derive(Debug, Default)]
pub struct RandomPingSynth;

impl PingSynth for RandomPingSynth {
    fn ping_for(&mut self, entity: &Entity) -> u32 {
        if entity.bucket().is_healthy() {
            rand::rng().random_range(150..=400)
        } else {
            0
        }
    }
}

/// Fixed synthesis for deterministic tests.
#[derive(Debug)]
pub struct FixedPingSynth(pub u32);

impl PingSynth for FixedPingSynth {
    fn ping_for(&mut self, entity: &Entity) -> u32 {
        if entity.bucket().is_healthy() { self.0 } else { 0 }
    }
}

/// Appends per-entity history points and persists the mapping.
pub struct HistoryBuilder {
    synth: Box<dyn PingSynth>,
    cache: HistoryCache,
    clock: SharedClock,
}

impl HistoryBuilder {
    /// Create a builder with the given synthesis strategy, cache, and clock.
    pub fn new(synth: Box<dyn PingSynth>, cache: HistoryCache, clock: SharedClock) -> Self {
        Self {
            synth,
            cache,
            clock,
        }
    }

    /// Record one history point per entity of a freshly fetched snapshot.
    ///
    /// The cap is enforced per entity by the state; afterwards the whole
    /// mapping is written through the cache. A persistence failure is
    /// logged at warn and otherwise ignored.
    pub fn record_snapshot(&mut self, snapshot: &BTreeMap<EntityId, Entity>, state: &mut DashState) {
        if snapshot.is_empty() {
            return;
        }

        let label = self.clock.display();
        for entity in snapshot.values() {
            let point = HistoryPoint {
                label: label.clone(),
                ping_ms: self.synth.ping_for(entity),
                status: entity.status.clone(),
            };
            state.append_history(&entity.id, point);
        }

        if let Err(e) = self.cache.store(state.history()) {
            warn!(error = %e, "history cache persist failed");
        }
    }
}
