//! Keyboard input handling for the VIGIL TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// Manually re-run both fetches
    Refresh,
    /// Navigate up in the fleet list
    NavigateUp,
    /// Navigate down in the fleet list
    NavigateDown,
    /// Jump to the top of the list
    GoToTop,
    /// Jump to the bottom of the list
    GoToBottom,
    /// Open the selected entity's detail screen
    Select,
    /// Return to the fleet list
    Back,
    /// No action needed
    None,
}

/// Converts key events to app events.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Create a new input handler.
    pub fn new() -> Self {
        Self
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => AppEvent::Refresh,

            KeyCode::Up | KeyCode::Char('k') => AppEvent::NavigateUp,
            KeyCode::Down | KeyCode::Char('j') => AppEvent::NavigateDown,
            KeyCode::Home | KeyCode::Char('g') => AppEvent::GoToTop,
            KeyCode::End | KeyCode::Char('G') => AppEvent::GoToBottom,

            KeyCode::Enter => AppEvent::Select,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => AppEvent::Back,

            _ => AppEvent::None,
        }
    }
}
