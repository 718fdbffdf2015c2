// Timestamped action and mouse events

use super::action::Input;
use glam::Vec2;

/// Direction of an action transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionEventKind {
    Pressed,
    Released,
}

/// An action press or release detected during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    action_name: String,
    timestamp_ms: u64,
    kind: ActionEventKind,
    triggering_input: Option<Input>,
}

impl ActionEvent {
    pub fn new(
        action_name: impl Into<String>,
        timestamp_ms: u64,
        kind: ActionEventKind,
        triggering_input: Option<Input>,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            timestamp_ms,
            kind,
            triggering_input,
        }
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn kind(&self) -> ActionEventKind {
        self.kind
    }

    /// The bound input whose edge caused this transition, if one could be identified
    pub fn triggering_input(&self) -> Option<Input> {
        self.triggering_input
    }

    pub fn is_pressed(&self) -> bool {
        self.kind == ActionEventKind::Pressed
    }

    /// Milliseconds elapsed between this event and `now_ms`
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }

    /// Check whether this event is a `kind` transition of `action_name`
    /// no older than `window_ms`
    pub(crate) fn matches(
        &self,
        action_name: &str,
        kind: ActionEventKind,
        now_ms: u64,
        window_ms: u64,
    ) -> bool {
        self.kind == kind && self.action_name == action_name && self.age_ms(now_ms) <= window_ms
    }
}

/// Mouse motion and scroll observed during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    position: Vec2,
    delta: Vec2,
    scroll_delta: i32,
    timestamp_ms: u64,
}

impl MouseEvent {
    pub fn new(position: Vec2, delta: Vec2, scroll_delta: i32, timestamp_ms: u64) -> Self {
        Self {
            position,
            delta,
            scroll_delta,
            timestamp_ms,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    pub fn scroll_delta(&self) -> i32 {
        self.scroll_delta
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// True when the cursor moved during the tick
    pub fn has_motion(&self) -> bool {
        self.delta.length_squared() > 0.0
    }

    /// True when the wheel turned during the tick
    pub fn has_scroll(&self) -> bool {
        self.scroll_delta != 0
    }
}
