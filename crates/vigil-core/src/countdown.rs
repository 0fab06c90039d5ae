//! Per-element countdown timers with leak-proof restart.
//!
//! Every card with a next-action timestamp gets a countdown display slot
//! driven by the scheduler's 1-second tick. The engine owns an explicit
//! registry of logical timers keyed by display slot; at most one live
//! timer per key exists at any instant, enforced by cancelling before
//! (re)creating. A timer whose render target has disappeared (the view
//! changed) removes itself on its next tick rather than at navigation
//! time, an accepted one-tick cleanup window.
//!
//! The engine never touches the screen directly; it talks to a
//! [`CountdownSurface`] that knows whether a display slot still exists
//! and how to write into it.

use std::collections::HashMap;

use crate::types::format_countdown;

/// Key identifying a logical timer (one per display slot).
pub type TimerKey = String;

/// What a countdown slot should currently show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownDisplay {
    /// Counting down, zero-padded `mm:ss`
    Counting(String),
    /// Target was already `<= 0` at start: ready now (terminal)
    Ready,
    /// Countdown reached zero while running: action in progress (terminal)
    Claiming,
}

impl CountdownDisplay {
    /// Text rendered into the slot.
    pub fn text(&self) -> &str {
        match self {
            Self::Counting(s) => s,
            Self::Ready => "READY",
            Self::Claiming => "CLAIMING...",
        }
    }
}

/// Render-target abstraction the engine writes through.
pub trait CountdownSurface {
    /// Whether the display slot still exists in the active view.
    fn target_exists(&self, element_key: &str) -> bool;

    /// Write a display into the slot.
    fn set_display(&mut self, element_key: &str, display: CountdownDisplay);
}

/// A registered, still-running countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CountdownTimer {
    element_key: String,
    target_epoch: i64,
}

/// Registry of live countdown timers.
#[derive(Debug, Default)]
pub struct CountdownEngine {
    timers: HashMap<TimerKey, CountdownTimer>,
}

impl CountdownEngine {
    /// Create an engine with no live timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown for one display slot.
    ///
    /// Any prior timer under `timer_key` is cancelled first, so calling
    /// this on every render pass cannot stack intervals. If the slot is
    /// missing no timer is created; if the target is already `<= 0` the
    /// slot is set to the terminal ready state immediately, again with no
    /// timer.
    pub fn start(
        &mut self,
        target_epoch: i64,
        element_key: &str,
        timer_key: &str,
        surface: &mut dyn CountdownSurface,
    ) {
        self.timers.remove(timer_key);

        if !surface.target_exists(element_key) {
            return;
        }

        if target_epoch <= 0 {
            surface.set_display(element_key, CountdownDisplay::Ready);
            return;
        }

        self.timers.insert(
            timer_key.to_string(),
            CountdownTimer {
                element_key: element_key.to_string(),
                target_epoch,
            },
        );
    }

    /// Cancel one timer, if present.
    pub fn cancel(&mut self, timer_key: &str) {
        self.timers.remove(timer_key);
    }

    /// Advance every live timer by one tick at `now_epoch`.
    ///
    /// A timer whose slot vanished self-cancels without touching any
    /// display. A timer that reached its target writes the terminal
    /// claiming state and self-cancels. Everything else renders the
    /// remaining `mm:ss` and keeps running.
    pub fn tick(&mut self, now_epoch: i64, surface: &mut dyn CountdownSurface) {
        self.timers.retain(|_, timer| {
            if !surface.target_exists(&timer.element_key) {
                return false;
            }

            let remaining = timer.target_epoch - now_epoch;
            if remaining <= 0 {
                surface.set_display(&timer.element_key, CountdownDisplay::Claiming);
                false
            } else {
                surface.set_display(
                    &timer.element_key,
                    CountdownDisplay::Counting(format_countdown(remaining)),
                );
                true
            }
        });
    }

    /// Number of live timers.
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether a timer is live under this key.
    pub fn is_live(&self, timer_key: &str) -> bool {
        self.timers.contains_key(timer_key)
    }
}
