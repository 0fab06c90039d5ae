//! Wall-clock capability for VIGIL.
//!
//! Every component that reads time (the header clock, countdown timers,
//! history capture labels) does so through the [`Clock`] trait rather than
//! calling into the system directly, so tests can drive time by hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, Utc};

/// Wall-clock reader.
pub trait Clock: Send + Sync {
    /// Current time as UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current time as whole epoch seconds.
    fn epoch(&self) -> i64 {
        self.now().timestamp()
    }

    /// Current local time formatted `HH:MM:SS` for display.
    fn display(&self) -> String {
        self.now()
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    epoch: AtomicI64,
}

impl ManualClock {
    /// Create a manual clock at the given epoch second.
    pub fn at(epoch: i64) -> Self {
        Self {
            epoch: AtomicI64::new(epoch),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: i64) {
        self.epoch.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set the clock to an absolute epoch second.
    pub fn set(&self, epoch: i64) {
        self.epoch.store(epoch, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.epoch.load(Ordering::SeqCst), 0)
            .unwrap_or_else(|| DateTime::from_timestamp(0, 0).expect("epoch zero is valid"))
    }
}
