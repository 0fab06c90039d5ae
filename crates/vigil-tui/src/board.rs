//! Countdown display board.
//!
//! The terminal analogue of the countdown elements the engine writes
//! into: each render pass declares which display slots the active view
//! contains, the engine checks existence and writes displays through the
//! [`CountdownSurface`] impl, and the widgets read the text back out.

use std::collections::{HashMap, HashSet};

use vigil_core::countdown::{CountdownDisplay, CountdownSurface};

/// Placeholder shown in a slot the engine has not written yet.
pub const TIMER_PLACEHOLDER: &str = "--:--";

/// Display slots of the active view and their current contents.
#[derive(Debug, Default)]
pub struct TimerBoard {
    present: HashSet<String>,
    displays: HashMap<String, CountdownDisplay>,
}

impl TimerBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the slots of the active view.
    ///
    /// Displays for slots that are no longer present are dropped so a
    /// returning view starts from the placeholder instead of stale text.
    pub fn sync_slots<I, S>(&mut self, slots: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.present = slots.into_iter().map(Into::into).collect();
        self.displays.retain(|key, _| self.present.contains(key));
    }

    /// Text to render for a slot.
    pub fn text(&self, element_key: &str) -> &str {
        self.displays
            .get(element_key)
            .map(CountdownDisplay::text)
            .unwrap_or(TIMER_PLACEHOLDER)
    }

    /// Current display for a slot, if the engine has written one.
    pub fn display(&self, element_key: &str) -> Option<&CountdownDisplay> {
        self.displays.get(element_key)
    }
}

impl CountdownSurface for TimerBoard {
    fn target_exists(&self, element_key: &str) -> bool {
        self.present.contains(element_key)
    }

    fn set_display(&mut self, element_key: &str, display: CountdownDisplay) {
        self.displays.insert(element_key.to_string(), display);
    }
}
