//! TUI Event System
//!
//! Terminal input, ticks and background task results all arrive on one
//! channel so the app loop handles them in order.

use crate::error::Result;
use crate::onboarding::SubmissionReport;
use crate::services::CatalogItem;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

/// Interval between tick events
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Events that can occur in the TUI
#[derive(Debug)]
pub enum TuiEvent {
    /// User pressed a key
    Key(KeyEvent),

    /// Terminal was resized
    Resize(u16, u16),

    /// Tick event for the close-to-reset timer
    Tick,

    /// Catalog fetch for a dialog session finished
    CatalogLoaded {
        session: u64,
        items: Vec<CatalogItem>,
    },

    /// Submission for a dialog session finished
    SubmissionFinished {
        session: u64,
        result: Result<SubmissionReport>,
    },

    /// Request to quit
    Quit,
}

/// Event handler for the TUI
pub struct EventHandler {
    tx: mpsc::UnboundedSender<TuiEvent>,
    rx: mpsc::UnboundedReceiver<TuiEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Get a sender for sending events
    pub fn sender(&self) -> mpsc::UnboundedSender<TuiEvent> {
        self.tx.clone()
    }

    /// Receive the next event (waits until available)
    pub async fn next(&mut self) -> Option<TuiEvent> {
        self.rx.recv().await
    }

    /// Start listening for terminal events
    ///
    /// Uses crossterm's async EventStream raced against a tick timer so
    /// background task results are never starved.
    pub fn start_terminal_listener(tx: mpsc::UnboundedSender<TuiEvent>) {
        use crossterm::event::{Event, EventStream, KeyEventKind};
        use futures::StreamExt;

        tokio::spawn(async move {
            let mut reader = EventStream::new();

            loop {
                let event = tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(event)) => Some(event),
                            Some(Err(_)) => None,
                            None => break,
                        }
                    }
                    _ = tokio::time::sleep(TICK_INTERVAL) => None,
                };

                let should_break = match event {
                    // Only key presses; repeats and releases would double-type
                    Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        tx.send(TuiEvent::Key(key)).is_err()
                    }
                    Some(Event::Resize(w, h)) => tx.send(TuiEvent::Resize(w, h)).is_err(),
                    _ => false,
                };
                if should_break || tx.send(TuiEvent::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to check if a key event matches
pub fn key_matches(event: &KeyEvent, code: KeyCode, modifiers: KeyModifiers) -> bool {
    event.code == code && event.modifiers == modifiers
}

/// Common key bindings
pub mod keys {
    use super::*;

    /// Ctrl+C - Quit
    pub fn is_quit(event: &KeyEvent) -> bool {
        key_matches(event, KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    /// Escape - Back/Close
    pub fn is_cancel(event: &KeyEvent) -> bool {
        event.code == KeyCode::Esc
    }

    /// Enter - primary action
    pub fn is_enter(event: &KeyEvent) -> bool {
        event.code == KeyCode::Enter && event.modifiers.is_empty()
    }

    pub fn is_next_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::Tab && !event.modifiers.contains(KeyModifiers::SHIFT)
    }

    /// Shift+Tab (reported as BackTab by most terminals)
    pub fn is_prev_field(event: &KeyEvent) -> bool {
        event.code == KeyCode::BackTab
            || (event.code == KeyCode::Tab && event.modifiers.contains(KeyModifiers::SHIFT))
    }

    pub fn is_up(event: &KeyEvent) -> bool {
        event.code == KeyCode::Up && event.modifiers.is_empty()
    }

    pub fn is_down(event: &KeyEvent) -> bool {
        event.code == KeyCode::Down && event.modifiers.is_empty()
    }

    pub fn is_toggle(event: &KeyEvent) -> bool {
        event.code == KeyCode::Char(' ') && event.modifiers.is_empty()
    }

    pub fn is_backspace(event: &KeyEvent) -> bool {
        event.code == KeyCode::Backspace
    }

    /// A character that should be typed into a text field
    pub fn typed_char(event: &KeyEvent) -> Option<char> {
        match event.code {
            KeyCode::Char(c)
                if !event
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}
