// Listener capabilities for action and mouse notifications

use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives action notifications
///
/// Every method has an empty default, so implementors only override the
/// notifications they care about.
pub trait ActionListener {
    /// The action went from released to pressed
    fn on_action_triggered(&mut self, _action: &str) {}

    /// The action went from pressed to released
    fn on_action_released(&mut self, _action: &str) {}

    /// The action is still held. Fired at most once per hold interval.
    fn on_action_held(&mut self, _action: &str, _hold_ms: u64) {}
}

/// Receives mouse motion and wheel notifications
pub trait MouseListener {
    fn on_mouse_moved(&mut self, _position: Vec2, _delta: Vec2) {}

    fn on_mouse_scrolled(&mut self, _scroll_delta: i32) {}
}

/// Shared handle to an action listener. The caller keeps its own clone.
pub type SharedActionListener = Rc<RefCell<dyn ActionListener>>;

/// Shared handle to a mouse listener
pub type SharedMouseListener = Rc<RefCell<dyn MouseListener>>;

/// Handle returned on registration, used to unregister a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);
