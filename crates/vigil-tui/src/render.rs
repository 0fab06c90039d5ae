//! Pure view-model construction.
//!
//! `build_list` and `build_detail` are pure functions of the dashboard
//! state: they decide everything that will appear on screen (cards,
//! buckets, stats, countdown slots, chart series) without touching the
//! terminal, so the whole screen contents are testable without one. The
//! widgets apply the result.

use vigil_core::state::{DashState, FleetStats};
use vigil_core::types::{Entity, EntityId, EntityKind, HealthBucket, HistoryPoint};
use vigil_core::Route;

/// A countdown slot a view wants driven by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSpec {
    /// Display-slot identifier checked by the engine's failsafe
    pub element_key: String,
    /// Registry key (one live timer per key)
    pub timer_key: String,
    /// Target in epoch seconds (`<= 0` means ready now)
    pub target_epoch: i64,
}

/// One card on the fleet list.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: EntityId,
    pub title: String,
    pub bucket: HealthBucket,
    pub status: String,
    /// "BALANCE" for bots, "UPTIME" for sites
    pub metric_label: &'static str,
    pub metric: String,
    /// Countdown slot, for entities with a next-action target
    pub timer: Option<TimerSpec>,
    /// Fragment navigated to when the card is opened
    pub fragment: String,
}

/// Everything the list screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel {
    pub cards: Vec<CardView>,
    pub stats: FleetStats,
    pub clock: String,
    pub last_sync: Option<String>,
    /// True before the first successful fetch: show placeholder rows
    pub loading: bool,
}

/// Everything the detail screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailViewModel {
    pub id: EntityId,
    pub title: String,
    pub bucket: HealthBucket,
    pub status: String,
    pub fields: Vec<(&'static str, String)>,
    /// Mean ping over this entity's own history
    pub avg_ping_ms: Option<u32>,
    pub timer: Option<TimerSpec>,
    /// Chart series (oldest first)
    pub series: Vec<HistoryPoint>,
    pub clock: String,
}

fn timer_spec_for(entity: &Entity, element_key: String) -> Option<TimerSpec> {
    entity.next_action.map(|target_epoch| TimerSpec {
        element_key,
        timer_key: entity.id.clone(),
        target_epoch,
    })
}

fn card_for(entity: &Entity) -> CardView {
    let (metric_label, metric) = match entity.kind {
        EntityKind::Bot => (
            "BALANCE",
            entity.balance.clone().unwrap_or_else(|| "--".to_string()),
        ),
        EntityKind::Site => (
            "UPTIME",
            entity.uptime.clone().unwrap_or_else(|| "--".to_string()),
        ),
    };

    CardView {
        id: entity.id.clone(),
        title: entity.title(),
        bucket: entity.bucket(),
        status: entity.status.to_uppercase(),
        metric_label,
        metric,
        timer: timer_spec_for(entity, format!("timer-dash-{}", entity.id)),
        fragment: Route::fragment_for(entity),
    }
}

/// Build the fleet-list view model.
pub fn build_list(state: &DashState, clock: &str) -> ListViewModel {
    ListViewModel {
        cards: state.entities().map(card_for).collect(),
        stats: state.fleet_stats(),
        clock: clock.to_string(),
        last_sync: state.last_sync().map(str::to_string),
        loading: state.is_empty(),
    }
}

/// Build the detail view model for one entity.
///
/// Returns `None` when the id is unknown; the router normally resolves
/// that away before a render is attempted.
pub fn build_detail(state: &DashState, id: &str, clock: &str) -> Option<DetailViewModel> {
    let entity = state.entity(id)?;

    let mut fields: Vec<(&'static str, String)> = Vec::new();
    if let Some(level) = entity.level {
        fields.push(("Level", level.to_string()));
    }
    if let Some(balance) = &entity.balance {
        fields.push(("Balance", balance.clone()));
    }
    if let Some(url) = &entity.url {
        fields.push(("URL", url.clone()));
    }
    if let Some(uptime) = &entity.uptime {
        fields.push(("Uptime", uptime.clone()));
    }
    if let Some(last_checked) = &entity.last_checked {
        fields.push(("Last Check", last_checked.clone()));
    }

    let timer = timer_spec_for(entity, "detail-timer".to_string()).map(|mut spec| {
        // Detail timers use their own registry key, separate from the
        // list card's.
        spec.timer_key = format!("detail_{}", entity.id);
        spec
    });

    Some(DetailViewModel {
        id: entity.id.clone(),
        title: entity.title(),
        bucket: entity.bucket(),
        status: entity.status.to_uppercase(),
        fields,
        avg_ping_ms: state.entity_avg_ping(id),
        timer,
        series: state
            .entity_history(id)
            .map(|series| series.iter().cloned().collect())
            .unwrap_or_default(),
        clock: clock.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn bot(id: &str, status: &str, next_action: Option<i64>) -> Entity {
        Entity {
            id: id.to_string(),
            kind: EntityKind::Bot,
            status: status.to_string(),
            balance: Some("0.42 BNB".into()),
            level: Some(3),
            url: None,
            uptime: None,
            next_action,
            last_checked: Some("2026-08-06 10:15:00".into()),
        }
    }

    fn site(name: &str, status: &str) -> Entity {
        let id = vigil_core::types::slugify(name);
        Entity {
            id: id.clone(),
            kind: EntityKind::Site,
            status: status.to_string(),
            balance: None,
            level: None,
            url: Some(format!("https://{id}.example.com")),
            uptime: Some("99.9%".into()),
            next_action: None,
            last_checked: None,
        }
    }

    fn seeded_state() -> DashState {
        let mut state = DashState::default();
        let bots: BTreeMap<_, _> = [
            ("alpha".to_string(), bot("alpha", "ONLINE", Some(1_790_000_100))),
            ("beta".to_string(), bot("beta", "CRASH detected", Some(0))),
        ]
        .into();
        state.replace_bots(bots);
        state.replace_sites([("my-site".to_string(), site("My Site", "UP"))].into());
        state.append_history(
            "alpha",
            HistoryPoint {
                label: "10:00:00".into(),
                ping_ms: 180,
                status: "ONLINE".into(),
            },
        );
        state
    }

    #[test]
    fn test_build_list_cards_and_stats() {
        let state = seeded_state();
        let vm = build_list(&state, "10:30:00");

        assert_eq!(vm.cards.len(), 3);
        assert!(!vm.loading);
        assert_eq!(vm.stats.total, 3);
        assert_eq!(vm.stats.unhealthy, 1);
        assert_eq!(vm.stats.avg_ping_ms, Some(180));

        let alpha = vm.cards.iter().find(|c| c.id == "alpha").unwrap();
        assert_eq!(alpha.bucket, HealthBucket::Healthy);
        assert_eq!(alpha.metric_label, "BALANCE");
        assert_eq!(alpha.fragment, "#bot-alpha");
        let timer = alpha.timer.as_ref().unwrap();
        assert_eq!(timer.element_key, "timer-dash-alpha");
        assert_eq!(timer.timer_key, "alpha");

        let site_card = vm.cards.iter().find(|c| c.id == "my-site").unwrap();
        assert_eq!(site_card.metric_label, "UPTIME");
        assert!(site_card.timer.is_none());
        assert_eq!(site_card.fragment, "#site-my-site");
    }

    #[test]
    fn test_build_list_empty_state_is_loading() {
        let vm = build_list(&DashState::default(), "10:30:00");
        assert!(vm.loading);
        assert!(vm.cards.is_empty());
        assert_eq!(vm.stats.avg_ping_ms, None);
    }

    #[test]
    fn test_build_detail_known_entity() {
        let state = seeded_state();
        let vm = build_detail(&state, "alpha", "10:30:00").unwrap();

        assert_eq!(vm.title, "ALPHA");
        assert_eq!(vm.bucket, HealthBucket::Healthy);
        assert_eq!(vm.avg_ping_ms, Some(180));
        assert_eq!(vm.series.len(), 1);

        let timer = vm.timer.unwrap();
        assert_eq!(timer.element_key, "detail-timer");
        assert_eq!(timer.timer_key, "detail_alpha");

        assert!(vm.fields.iter().any(|(label, value)| *label == "Level" && value == "3"));
    }

    #[test]
    fn test_build_detail_unknown_entity() {
        assert!(build_detail(&DashState::default(), "ghost", "10:30:00").is_none());
    }

    #[test]
    fn test_detail_avg_ping_is_entity_scoped() {
        let mut state = seeded_state();
        state.append_history(
            "my-site",
            HistoryPoint {
                label: "10:00:00".into(),
                ping_ms: 400,
                status: "UP".into(),
            },
        );

        // Global mean mixes both entities; the detail screen must not.
        assert_eq!(state.fleet_stats().avg_ping_ms, Some(290));
        let vm = build_detail(&state, "alpha", "10:30:00").unwrap();
        assert_eq!(vm.avg_ping_ms, Some(180));
    }
}
