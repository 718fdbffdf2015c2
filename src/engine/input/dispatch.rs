// Listener registries and the deferred event queue

use super::event::{ActionEvent, ActionEventKind, MouseEvent};
use super::listener::{ActionListener, ListenerId, SharedActionListener, SharedMouseListener};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, VecDeque};

/// Category name -> names of its member actions
pub(crate) type Categories = IndexMap<String, IndexSet<String>>;

type ActionListeners = Vec<(ListenerId, SharedActionListener)>;

/// Routes action and mouse notifications to registered listeners
///
/// Action notifications go to three tiers in order: global listeners, the
/// listeners of that action, then the listeners of every category the action
/// belongs to. Within a tier listeners run in registration order.
///
/// Press and release notifications can be deferred into a queue that is only
/// delivered by [`Dispatcher::take_queued`]. Hold notifications never are.
#[derive(Default)]
pub(crate) struct Dispatcher {
    next_id: u64,
    global: ActionListeners,
    by_action: HashMap<String, ActionListeners>,
    by_category: HashMap<String, ActionListeners>,
    mouse: Vec<(ListenerId, SharedMouseListener)>,
    deferred: bool,
    queue: VecDeque<ActionEvent>,
}

impl Dispatcher {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub fn add_global(&mut self, listener: SharedActionListener) -> ListenerId {
        let id = self.next_id();
        self.global.push((id, listener));
        id
    }

    pub fn remove_global(&mut self, id: ListenerId) -> bool {
        remove_listener(&mut self.global, id)
    }

    pub fn add_for_action(&mut self, action: &str, listener: SharedActionListener) -> ListenerId {
        let id = self.next_id();
        self.by_action
            .entry(action.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    pub fn remove_for_action(&mut self, action: &str, id: ListenerId) -> bool {
        remove_keyed_listener(&mut self.by_action, action, id)
    }

    pub fn add_for_category(
        &mut self,
        category: &str,
        listener: SharedActionListener,
    ) -> ListenerId {
        let id = self.next_id();
        self.by_category
            .entry(category.to_string())
            .or_default()
            .push((id, listener));
        id
    }

    pub fn remove_for_category(&mut self, category: &str, id: ListenerId) -> bool {
        remove_keyed_listener(&mut self.by_category, category, id)
    }

    pub fn add_mouse(&mut self, listener: SharedMouseListener) -> ListenerId {
        let id = self.next_id();
        self.mouse.push((id, listener));
        id
    }

    pub fn remove_mouse(&mut self, id: ListenerId) -> bool {
        let before = self.mouse.len();
        self.mouse.retain(|(listener_id, _)| *listener_id != id);
        self.mouse.len() != before
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    /// Switch deferred delivery on or off
    /// Turning it off drops anything still queued
    pub fn set_deferred(&mut self, deferred: bool) {
        self.deferred = deferred;
        if !deferred && !self.queue.is_empty() {
            log::debug!("Dropping {} undelivered action events", self.queue.len());
            self.queue.clear();
        }
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Take every queued event, oldest first
    pub fn take_queued(&mut self) -> VecDeque<ActionEvent> {
        std::mem::take(&mut self.queue)
    }

    /// Deliver a press or release now, or queue it when deferred
    pub fn submit(&mut self, event: ActionEvent, categories: &Categories) {
        if self.deferred {
            self.queue.push_back(event);
        } else {
            self.deliver(&event, categories);
        }
    }

    /// Deliver a press or release to all three tiers
    pub fn deliver(&self, event: &ActionEvent, categories: &Categories) {
        let action = event.action_name();
        match event.kind() {
            ActionEventKind::Pressed => {
                self.notify(action, categories, |l| l.on_action_triggered(action))
            }
            ActionEventKind::Released => {
                self.notify(action, categories, |l| l.on_action_released(action))
            }
        }
    }

    /// Deliver a hold notification to all three tiers, always immediately
    pub fn deliver_held(&self, action: &str, hold_ms: u64, categories: &Categories) {
        self.notify(action, categories, |l| l.on_action_held(action, hold_ms));
    }

    /// Deliver mouse motion and scroll to every mouse listener
    pub fn deliver_mouse(&self, event: &MouseEvent) {
        for (_, listener) in &self.mouse {
            let mut listener = listener.borrow_mut();
            if event.has_motion() {
                listener.on_mouse_moved(event.position(), event.delta());
            }
            if event.has_scroll() {
                listener.on_mouse_scrolled(event.scroll_delta());
            }
        }
    }

    fn notify(
        &self,
        action: &str,
        categories: &Categories,
        mut call: impl FnMut(&mut dyn ActionListener),
    ) {
        for (_, listener) in &self.global {
            call(&mut *listener.borrow_mut());
        }

        if let Some(listeners) = self.by_action.get(action) {
            for (_, listener) in listeners {
                call(&mut *listener.borrow_mut());
            }
        }

        for (category, members) in categories {
            if !members.contains(action) {
                continue;
            }
            if let Some(listeners) = self.by_category.get(category) {
                for (_, listener) in listeners {
                    call(&mut *listener.borrow_mut());
                }
            }
        }
    }
}

fn remove_listener(listeners: &mut ActionListeners, id: ListenerId) -> bool {
    let before = listeners.len();
    listeners.retain(|(listener_id, _)| *listener_id != id);
    listeners.len() != before
}

fn remove_keyed_listener(
    registry: &mut HashMap<String, ActionListeners>,
    key: &str,
    id: ListenerId,
) -> bool {
    let Some(listeners) = registry.get_mut(key) else {
        return false;
    };
    let removed = remove_listener(listeners, id);
    if listeners.is_empty() {
        registry.remove(key);
    }
    removed
}
