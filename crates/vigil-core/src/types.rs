//! Shared type definitions used across VIGIL crates.
//!
//! This module provides the entity model (a monitored bot or site), the
//! health classification applied to free-text status strings, history
//! points for the ping series, and the small formatting helpers shared by
//! the renderer and the countdown engine.

use serde::{Deserialize, Serialize};

/// Unique identifier for a monitored entity.
pub type EntityId = String;

/// Maximum number of history points retained per entity (FIFO).
pub const HISTORY_CAP: usize = 30;

/// Which backend an entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Live-status API (claim bots with balance/level/next-claim)
    Bot,
    /// Uptime API (site checks with url/uptime/last-checked)
    Site,
}

impl EntityKind {
    /// Fragment prefix used by the router for this kind.
    pub fn fragment_prefix(&self) -> &'static str {
        match self {
            Self::Bot => "#bot-",
            Self::Site => "#site-",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bot => write!(f, "bot"),
            Self::Site => write!(f, "site"),
        }
    }
}

/// A monitored bot or site.
///
/// Status is free text from the backend and is classified by substring
/// match at render time, never cached. Optional fields depend on the
/// entity kind: bots carry balance/level/next-action, sites carry
/// url/uptime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier (provided for bots, slugified site name for sites)
    pub id: EntityId,

    /// Which backend this entity came from
    pub kind: EntityKind,

    /// Free-text status as reported by the backend
    #[serde(default)]
    pub status: String,

    /// Display balance (bots)
    #[serde(default)]
    pub balance: Option<String>,

    /// Account level (bots)
    #[serde(default)]
    pub level: Option<u32>,

    /// Monitored URL (sites)
    #[serde(default)]
    pub url: Option<String>,

    /// Uptime display string (sites)
    #[serde(default)]
    pub uptime: Option<String>,

    /// Next-action target in epoch seconds; `<= 0` means "ready now"
    #[serde(default)]
    pub next_action: Option<i64>,

    /// Last-checked display string
    #[serde(default)]
    pub last_checked: Option<String>,
}

impl Entity {
    /// Human-readable title derived from the id.
    pub fn title(&self) -> String {
        self.id.replace(['_', '-'], " ").to_uppercase()
    }

    /// Health bucket for the current status text (recomputed, never cached).
    pub fn bucket(&self) -> HealthBucket {
        HealthBucket::classify(&self.status)
    }
}

/// Health classification buckets for status badges and aggregate stats.
///
/// Classification is case-insensitive substring matching in a fixed
/// evaluation order: the healthy check first, then the unhealthy check,
/// else the default bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthBucket {
    /// Status mentions SLEEPING, ONLINE, or UP
    Healthy,
    /// Status mentions ERROR, FAIL, or CRASH
    Unhealthy,
    /// Anything else (booting, pending, unknown)
    #[default]
    Pending,
}

impl HealthBucket {
    /// Classify a free-text status string.
    pub fn classify(status: &str) -> Self {
        let status = status.to_uppercase();
        if ["SLEEPING", "ONLINE", "UP"].iter().any(|s| status.contains(s)) {
            Self::Healthy
        } else if ["ERROR", "FAIL", "CRASH"].iter().any(|s| status.contains(s)) {
            Self::Unhealthy
        } else {
            Self::Pending
        }
    }

    /// Returns true for the healthy bucket.
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Status indicator for TUI display.
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Healthy => "●",
            Self::Unhealthy => "✖",
            Self::Pending => "◌",
        }
    }
}

impl std::fmt::Display for HealthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// One captured sample of an entity's ping series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Capture time label (`HH:MM:SS`)
    pub label: String,

    /// Ping latency in milliseconds; 0 means unknown/down
    pub ping_ms: u32,

    /// Status text at capture time
    #[serde(default)]
    pub status: String,
}

/// Deterministic transform of a display name into a URL-safe identifier.
///
/// Lowercases, maps runs of non-alphanumeric characters to single dashes,
/// and trims leading/trailing dashes. Idempotent on its own output.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Format remaining seconds as zero-padded `mm:ss`.
pub fn format_countdown(remaining_secs: i64) -> String {
    let remaining = remaining_secs.max(0);
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

/// Arithmetic mean of all pings > 0, rounded to the nearest integer.
///
/// Returns `None` when no valid points exist (the renderer shows a
/// placeholder instead of a zero).
pub fn average_ping<'a, I>(points: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a HistoryPoint>,
{
    let valid: Vec<u32> = points
        .into_iter()
        .map(|p| p.ping_ms)
        .filter(|&p| p > 0)
        .collect();

    if valid.is_empty() {
        return None;
    }

    let sum: u64 = valid.iter().map(|&p| u64::from(p)).sum();
    Some((sum as f64 / valid.len() as f64).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_healthy_variants() {
        assert_eq!(HealthBucket::classify("Bot is SLEEPING"), HealthBucket::Healthy);
        assert_eq!(HealthBucket::classify("online"), HealthBucket::Healthy);
        assert_eq!(HealthBucket::classify("UP 99.9%"), HealthBucket::Healthy);
    }

    #[test]
    fn test_classify_unhealthy_variants() {
        assert_eq!(HealthBucket::classify("CRASH detected"), HealthBucket::Unhealthy);
        assert_eq!(HealthBucket::classify("login FAILED"), HealthBucket::Unhealthy);
        assert_eq!(HealthBucket::classify("Error: captcha"), HealthBucket::Unhealthy);
    }

    #[test]
    fn test_classify_default_bucket() {
        assert_eq!(HealthBucket::classify("Booting"), HealthBucket::Pending);
        assert_eq!(HealthBucket::classify(""), HealthBucket::Pending);
    }

    #[test]
    fn test_classify_healthy_wins_over_unhealthy() {
        // Fixed evaluation order: the healthy check runs first.
        assert_eq!(
            HealthBucket::classify("ONLINE after ERROR recovery"),
            HealthBucket::Healthy
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Site (EU) #2"), "my-site-eu-2");
        assert_eq!(slugify("BNB Faucet"), "bnb-faucet");
        assert_eq!(slugify("--already--slugged--"), "already-slugged");
    }

    #[test]
    fn test_slugify_idempotent() {
        let once = slugify("My Site (EU) #2");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(59), "00:59");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(3599), "59:59");
        assert_eq!(format_countdown(-5), "00:00");
    }

    #[test]
    fn test_average_ping_excludes_zero() {
        let points = [
            HistoryPoint {
                label: "10:00:00".into(),
                ping_ms: 100,
                status: "UP".into(),
            },
            HistoryPoint {
                label: "10:00:30".into(),
                ping_ms: 0,
                status: "DOWN".into(),
            },
            HistoryPoint {
                label: "10:01:00".into(),
                ping_ms: 200,
                status: "UP".into(),
            },
        ];
        assert_eq!(average_ping(points.iter()), Some(150));
    }

    #[test]
    fn test_average_ping_empty() {
        assert_eq!(average_ping(std::iter::empty()), None);

        let all_zero = [HistoryPoint {
            label: "10:00:00".into(),
            ping_ms: 0,
            status: "DOWN".into(),
        }];
        assert_eq!(average_ping(all_zero.iter()), None);
    }

    #[test]
    fn test_average_ping_rounds_to_nearest() {
        let points = [
            HistoryPoint {
                label: "a".into(),
                ping_ms: 100,
                status: String::new(),
            },
            HistoryPoint {
                label: "b".into(),
                ping_ms: 101,
                status: String::new(),
            },
        ];
        // 100.5 rounds away from zero
        assert_eq!(average_ping(points.iter()), Some(101));
    }

    #[test]
    fn test_entity_title() {
        let entity = Entity {
            id: "bnb_faucet".into(),
            kind: EntityKind::Bot,
            status: "ONLINE".into(),
            balance: None,
            level: None,
            url: None,
            uptime: None,
            next_action: None,
            last_checked: None,
        };
        assert_eq!(entity.title(), "BNB FAUCET");
    }
}
