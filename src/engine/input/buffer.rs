// Time-windowed buffer of recent action transitions

use super::event::{ActionEvent, ActionEventKind};
use std::collections::VecDeque;

/// Default window during which a transition counts as "recent" (milliseconds)
pub const DEFAULT_BUFFER_WINDOW_MS: u64 = 150;

/// Events are kept for this many windows before they are aged out
const RETENTION_WINDOWS: u64 = 2;

/// Buffer of recent press/release events
///
/// Lets gameplay code accept an input that arrived slightly before it could
/// be acted on (a jump pressed just before landing). Events are kept in the
/// order they were detected, which is also timestamp order.
#[derive(Debug)]
pub struct InputBuffer {
    events: VecDeque<ActionEvent>,
    window_ms: u64,
}

impl InputBuffer {
    /// Create a buffer with the given window
    pub fn new(window_ms: u64) -> Self {
        Self {
            events: VecDeque::new(),
            window_ms,
        }
    }

    /// Window used when a query doesn't supply its own
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn set_window_ms(&mut self, window_ms: u64) {
        self.window_ms = window_ms;
    }

    /// How long an event stays in the buffer
    pub fn retention_ms(&self) -> u64 {
        self.window_ms.saturating_mul(RETENTION_WINDOWS)
    }

    /// Append an event
    pub fn push(&mut self, event: ActionEvent) {
        self.events.push_back(event);
    }

    /// Check if a `kind` event for `action_name` is no older than `window_ms`
    pub fn contains(
        &self,
        action_name: &str,
        kind: ActionEventKind,
        now_ms: u64,
        window_ms: u64,
    ) -> bool {
        self.events
            .iter()
            .any(|event| event.matches(action_name, kind, now_ms, window_ms))
    }

    /// Remove the oldest press of `action_name` no older than `window_ms`
    /// Returns true if one was found and removed
    pub fn consume_press(&mut self, action_name: &str, now_ms: u64, window_ms: u64) -> bool {
        let found = self.events.iter().position(|event| {
            event.matches(action_name, ActionEventKind::Pressed, now_ms, window_ms)
        });

        match found {
            Some(pos) => {
                self.events.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every event that has reached the retention age
    /// Call this once per tick
    pub fn age_out(&mut self, now_ms: u64) {
        let retention = self.retention_ms();
        self.events.retain(|event| event.age_ms(now_ms) < retention);
    }

    /// Clear all buffered events
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Iterate buffered events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ActionEvent> {
        self.events.iter()
    }

    /// Get the number of buffered events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_WINDOW_MS)
    }
}
