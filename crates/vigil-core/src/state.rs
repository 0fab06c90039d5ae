//! Owned dashboard state.
//!
//! [`DashState`] is the single explicitly-owned state struct of the app:
//! the bot and site entity slices (each replaced wholesale by its own
//! fetcher, never merged field-by-field), the per-entity ping history,
//! and the active route. All mutation goes through named operations; no
//! component holds ambient globals.

use std::collections::{BTreeMap, VecDeque};

use crate::route::Route;
use crate::types::{average_ping, Entity, EntityId, HistoryPoint, HISTORY_CAP};

/// Per-entity history mapping, as persisted to the local cache.
pub type HistoryMap = BTreeMap<EntityId, VecDeque<HistoryPoint>>;

/// Aggregate figures shown on the list view's stats row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetStats {
    /// Total monitored entities across both slices
    pub total: usize,
    /// Entities currently in the unhealthy bucket
    pub unhealthy: usize,
    /// Global mean ping over all points with ping > 0, if any exist
    pub avg_ping_ms: Option<u32>,
}

/// In-memory dashboard state.
#[derive(Debug, Default)]
pub struct DashState {
    bots: BTreeMap<EntityId, Entity>,
    sites: BTreeMap<EntityId, Entity>,
    history: HistoryMap,
    route: Route,
    last_sync: Option<String>,
}

impl DashState {
    /// Create state seeded with a previously cached history mapping.
    pub fn with_history(history: HistoryMap) -> Self {
        Self {
            history,
            ..Default::default()
        }
    }

    /// Replace the bot slice wholesale with a fresh snapshot.
    ///
    /// Bots absent from the new snapshot disappear; nothing is merged.
    pub fn replace_bots(&mut self, snapshot: BTreeMap<EntityId, Entity>) {
        self.bots = snapshot;
    }

    /// Replace the site slice wholesale with a fresh snapshot.
    pub fn replace_sites(&mut self, snapshot: BTreeMap<EntityId, Entity>) {
        self.sites = snapshot;
    }

    /// Append a history point for an entity, evicting the oldest past the cap.
    pub fn append_history(&mut self, id: &str, point: HistoryPoint) {
        let series = self.history.entry(id.to_string()).or_default();
        series.push_back(point);
        while series.len() > HISTORY_CAP {
            series.pop_front();
        }
    }

    /// Set the active route.
    pub fn set_route(&mut self, route: Route) {
        self.route = route;
    }

    /// Record the display label of the last successful sync.
    pub fn set_last_sync(&mut self, label: String) {
        self.last_sync = Some(label);
    }

    /// Active route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Last successful sync label, if any fetch has succeeded yet.
    pub fn last_sync(&self) -> Option<&str> {
        self.last_sync.as_deref()
    }

    /// Look up an entity by id across both slices.
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.bots.get(id).or_else(|| self.sites.get(id))
    }

    /// All entities in display order: bots first, then sites.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.bots.values().chain(self.sites.values())
    }

    /// Bot slice.
    pub fn bots(&self) -> &BTreeMap<EntityId, Entity> {
        &self.bots
    }

    /// Site slice.
    pub fn sites(&self) -> &BTreeMap<EntityId, Entity> {
        &self.sites
    }

    /// Full history mapping (for cache persistence).
    pub fn history(&self) -> &HistoryMap {
        &self.history
    }

    /// History series for one entity.
    pub fn entity_history(&self, id: &str) -> Option<&VecDeque<HistoryPoint>> {
        self.history.get(id)
    }

    /// True before any successful fetch has populated either slice.
    pub fn is_empty(&self) -> bool {
        self.bots.is_empty() && self.sites.is_empty()
    }

    /// Aggregate stats for the list view, recomputed from current state.
    pub fn fleet_stats(&self) -> FleetStats {
        let total = self.bots.len() + self.sites.len();
        let unhealthy = self
            .entities()
            .filter(|e| e.bucket() == crate::types::HealthBucket::Unhealthy)
            .count();
        let avg_ping_ms = average_ping(self.history.values().flatten());

        FleetStats {
            total,
            unhealthy,
            avg_ping_ms,
        }
    }

    /// Mean ping scoped to a single entity's own history.
    pub fn entity_avg_ping(&self, id: &str) -> Option<u32> {
        average_ping(self.history.get(id)?.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityKind;

    fn bot(id: &str, status: &str) -> Entity {
        Entity {
            id: id.to_string(),
            kind: EntityKind::Bot,
            status: status.to_string(),
            balance: Some("0.1 BNB".into()),
            level: None,
            url: None,
            uptime: None,
            next_action: None,
            last_checked: None,
        }
    }

    fn point(ping: u32) -> HistoryPoint {
        HistoryPoint {
            label: "12:00:00".into(),
            ping_ms: ping,
            status: "UP".into(),
        }
    }

    #[test]
    fn test_replace_bots_drops_stale_ids() {
        let mut state = DashState::default();
        state.replace_bots(
            [
                ("alpha".to_string(), bot("alpha", "ONLINE")),
                ("beta".to_string(), bot("beta", "ONLINE")),
            ]
            .into(),
        );
        assert_eq!(state.bots().len(), 2);

        // Next snapshot no longer contains beta.
        state.replace_bots([("alpha".to_string(), bot("alpha", "SLEEPING"))].into());
        assert_eq!(state.bots().len(), 1);
        assert!(state.entity("beta").is_none());
        assert_eq!(state.entity("alpha").unwrap().status, "SLEEPING");
    }

    #[test]
    fn test_replace_bots_leaves_sites_untouched() {
        let mut state = DashState::default();
        let mut site = bot("my-site", "UP");
        site.kind = EntityKind::Site;
        state.replace_sites([("my-site".to_string(), site)].into());

        state.replace_bots([("alpha".to_string(), bot("alpha", "ONLINE"))].into());
        assert!(state.entity("my-site").is_some());
        assert_eq!(state.fleet_stats().total, 2);
    }

    #[test]
    fn test_history_cap_is_fifo() {
        let mut state = DashState::default();
        for i in 0..=HISTORY_CAP as u32 {
            state.append_history("alpha", point(100 + i));
        }

        let series = state.entity_history("alpha").unwrap();
        assert_eq!(series.len(), HISTORY_CAP);
        // The very first append (ping 100) was evicted.
        assert_eq!(series.front().unwrap().ping_ms, 101);
        assert_eq!(series.back().unwrap().ping_ms, 100 + HISTORY_CAP as u32);
    }

    #[test]
    fn test_history_survives_snapshot_replacement() {
        let mut state = DashState::default();
        state.replace_bots([("alpha".to_string(), bot("alpha", "ONLINE"))].into());
        state.append_history("alpha", point(200));

        // alpha vanishes from the next snapshot; its history stays.
        state.replace_bots(BTreeMap::new());
        assert!(state.entity("alpha").is_none());
        assert_eq!(state.entity_history("alpha").unwrap().len(), 1);
    }

    #[test]
    fn test_fleet_stats() {
        let mut state = DashState::default();
        state.replace_bots(
            [
                ("alpha".to_string(), bot("alpha", "ONLINE")),
                ("beta".to_string(), bot("beta", "CRASH detected")),
                ("gamma".to_string(), bot("gamma", "Booting")),
            ]
            .into(),
        );
        state.append_history("alpha", point(100));
        state.append_history("beta", point(0));
        state.append_history("gamma", point(200));

        let stats = state.fleet_stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.unhealthy, 1);
        assert_eq!(stats.avg_ping_ms, Some(150));
    }

    #[test]
    fn test_fleet_stats_empty() {
        let stats = DashState::default().fleet_stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.unhealthy, 0);
        assert_eq!(stats.avg_ping_ms, None);
    }

    #[test]
    fn test_entity_avg_ping_is_scoped() {
        let mut state = DashState::default();
        state.append_history("alpha", point(100));
        state.append_history("beta", point(300));

        assert_eq!(state.entity_avg_ping("alpha"), Some(100));
        assert_eq!(state.entity_avg_ping("beta"), Some(300));
        assert_eq!(state.entity_avg_ping("gamma"), None);
    }
}
