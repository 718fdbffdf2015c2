// Input manager - Main coordination system for all input

use super::action::{Input, InputAction};
use super::buffer::InputBuffer;
use super::config::InputSettings;
use super::device::{DeviceFrame, DeviceSink};
use super::dispatch::{Categories, Dispatcher};
use super::event::{ActionEvent, ActionEventKind, MouseEvent};
use super::listener::{ListenerId, SharedActionListener, SharedMouseListener};
use crate::core::clock::{Clock, MonotonicClock};
use glam::Vec2;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Category name -> action name -> bound inputs, in registry order
pub type ActionMappings = IndexMap<String, IndexMap<String, Vec<Input>>>;

/// Per-action state carried between ticks
#[derive(Debug, Clone, Copy, Default)]
struct ActionTiming {
    /// Set while the action is held
    pressed_at: Option<u64>,
    /// Set while held, once the first hold notification has fired
    last_hold_notify: Option<u64>,
    /// Held state seen by the previous tick
    was_held: bool,
}

#[derive(Debug)]
struct ActionSlot {
    action: InputAction,
    timing: ActionTiming,
}

/// Turns raw device samples into named actions
///
/// Owns the action registry, categories, the reverse index from inputs to
/// actions, the previous-frame device state, the event buffer and the
/// listeners. Device callbacks write through a [`DeviceSink`] obtained from
/// [`InputManager::device_sink`]; everything else happens on the thread that
/// calls [`InputManager::update`] once per fixed step.
///
/// Unknown action names are never an error: mutations return `false` and
/// queries report the action as inactive.
pub struct InputManager {
    actions: IndexMap<String, ActionSlot>,
    categories: Categories,
    /// Input -> names of every action bound to it. Never holds empty sets.
    input_index: HashMap<Input, IndexSet<String>>,

    devices: DeviceSink,
    previous: DeviceFrame,

    buffer: InputBuffer,
    buffering_enabled: bool,
    hold_interval_ms: u64,

    dispatcher: Dispatcher,
    clock: Box<dyn Clock>,
}

impl InputManager {
    /// Create an input manager with default settings and a wall clock
    pub fn new() -> Self {
        Self::with_settings(InputSettings::default())
    }

    pub fn with_settings(settings: InputSettings) -> Self {
        Self::with_clock(settings, MonotonicClock::new())
    }

    /// Create an input manager reading time from `clock`
    pub fn with_clock(settings: InputSettings, clock: impl Clock + 'static) -> Self {
        let mut dispatcher = Dispatcher::default();
        dispatcher.set_deferred(settings.deferred_dispatch);

        Self {
            actions: IndexMap::new(),
            categories: Categories::new(),
            input_index: HashMap::new(),
            devices: DeviceSink::new(),
            previous: DeviceFrame::default(),
            buffer: InputBuffer::new(settings.buffer_window_ms),
            buffering_enabled: settings.buffering_enabled,
            hold_interval_ms: settings.hold_notify_interval_ms,
            dispatcher,
            clock: Box::new(clock),
        }
    }

    /// Handle for feeding raw device samples, usable from any thread
    pub fn device_sink(&self) -> DeviceSink {
        self.devices.clone()
    }

    /// Current settings
    pub fn settings(&self) -> InputSettings {
        InputSettings {
            buffer_window_ms: self.buffer.window_ms(),
            hold_notify_interval_ms: self.hold_interval_ms,
            buffering_enabled: self.buffering_enabled,
            deferred_dispatch: self.dispatcher.is_deferred(),
        }
    }

    // Categories & bindings

    /// Create an empty category. Existing categories are left alone.
    pub fn create_category(&mut self, name: &str) {
        if !self.categories.contains_key(name) {
            self.categories.insert(name.to_string(), IndexSet::new());
        }
    }

    /// Remove a category. Its actions stay registered.
    pub fn remove_category(&mut self, name: &str) -> bool {
        self.categories.shift_remove(name).is_some()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    /// Create or replace an action bound to `inputs`
    ///
    /// Replacing an action unbinds all of its previous inputs first. With a
    /// category, the action also joins it (creating the category if needed).
    pub fn bind(&mut self, category: Option<&str>, action: &str, inputs: &[Input]) -> &InputAction {
        self.clear_action_inputs(action);

        let timing = self
            .actions
            .get(action)
            .map(|slot| slot.timing)
            .unwrap_or_default();
        self.actions.insert(
            action.to_string(),
            ActionSlot {
                action: InputAction::new(action),
                timing,
            },
        );

        if let Some(category) = category {
            self.categories
                .entry(category.to_string())
                .or_default()
                .insert(action.to_string());
        }

        for &input in inputs {
            self.add_input_to_action(action, input);
        }

        log::debug!(
            "Bound action {action} ({} inputs, category {:?})",
            inputs.len(),
            category
        );

        &self.actions[action].action
    }

    /// Create or replace an action bound to keyboard codes
    pub fn bind_keys(&mut self, category: Option<&str>, action: &str, codes: &[u32]) -> &InputAction {
        let inputs: Vec<Input> = codes.iter().copied().map(Input::keyboard).collect();
        self.bind(category, action, &inputs)
    }

    /// Bind one more input to an existing action
    pub fn add_input_to_action(&mut self, action: &str, input: Input) -> bool {
        let Some(slot) = self.actions.get_mut(action) else {
            return false;
        };
        slot.action.add_input(input);
        self.input_index
            .entry(input)
            .or_default()
            .insert(action.to_string());
        true
    }

    /// Unbind an input from an existing action
    pub fn remove_input_from_action(&mut self, action: &str, input: Input) -> bool {
        let Some(slot) = self.actions.get_mut(action) else {
            return false;
        };
        slot.action.remove_input(input);
        unindex(&mut self.input_index, input, action);
        true
    }

    pub fn add_key_code_to_action(&mut self, action: &str, code: u32) -> bool {
        self.add_input_to_action(action, Input::keyboard(code))
    }

    pub fn add_mouse_button_to_action(&mut self, action: &str, code: u32) -> bool {
        self.add_input_to_action(action, Input::mouse(code))
    }

    pub fn remove_key_code_from_action(&mut self, action: &str, code: u32) -> bool {
        self.remove_input_from_action(action, Input::keyboard(code))
    }

    pub fn remove_mouse_button_from_action(&mut self, action: &str, code: u32) -> bool {
        self.remove_input_from_action(action, Input::mouse(code))
    }

    /// Unbind every input of an action. The action stays registered.
    pub fn clear_action_inputs(&mut self, action: &str) -> bool {
        let Some(slot) = self.actions.get_mut(action) else {
            return false;
        };
        for &input in slot.action.bound_inputs() {
            unindex(&mut self.input_index, input, action);
        }
        slot.action.clear_inputs();
        true
    }

    /// Unbind every input of every action
    pub fn clear_all_action_inputs(&mut self) {
        for slot in self.actions.values_mut() {
            slot.action.clear_inputs();
        }
        self.input_index.clear();
    }

    /// Replace all bindings of an action with `inputs`
    pub fn reassign_action(&mut self, action: &str, inputs: &[Input]) -> bool {
        if !self.clear_action_inputs(action) {
            return false;
        }
        for &input in inputs {
            self.add_input_to_action(action, input);
        }
        log::debug!("Reassigned action {action} to {} inputs", inputs.len());
        true
    }

    pub fn action(&self, name: &str) -> Option<&InputAction> {
        self.actions.get(name).map(|slot| &slot.action)
    }

    /// Names of all registered actions, in registration order
    pub fn action_names(&self) -> Vec<String> {
        self.actions.keys().cloned().collect()
    }

    /// Names of the actions bound to an input
    pub fn actions_for_input(&self, input: Input) -> Vec<String> {
        self.input_index
            .get(&input)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn actions_for_key_code(&self, code: u32) -> Vec<String> {
        self.actions_for_input(Input::keyboard(code))
    }

    pub fn actions_for_mouse_button(&self, code: u32) -> Vec<String> {
        self.actions_for_input(Input::mouse(code))
    }

    /// Actions belonging to a category
    pub fn actions_for_category(&self, category: &str) -> Vec<&InputAction> {
        self.categories
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(|name| self.action(name))
            .collect()
    }

    /// Actions bound to `input` when more than one is, otherwise empty
    pub fn conflicting_actions(&self, input: Input) -> Vec<String> {
        let actions = self.actions_for_input(input);
        if actions.len() > 1 {
            actions
        } else {
            Vec::new()
        }
    }

    /// Actions the last tick saw as held
    pub fn currently_held_actions(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter(|(_, slot)| slot.timing.pressed_at.is_some())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Export category -> action -> inputs for an external writer
    pub fn action_mappings(&self) -> ActionMappings {
        let mut mappings = ActionMappings::new();
        for (category, members) in &self.categories {
            let actions = mappings.entry(category.clone()).or_default();
            for name in members {
                if let Some(slot) = self.actions.get(name) {
                    actions.insert(
                        name.clone(),
                        slot.action.bound_inputs().iter().copied().collect(),
                    );
                }
            }
        }
        mappings
    }

    /// Replace every action and category with `mappings`
    pub fn load_action_mappings(&mut self, mappings: &ActionMappings) {
        let old_actions = std::mem::take(&mut self.actions);
        self.categories.clear();
        self.input_index.clear();

        for (category, actions) in mappings {
            self.create_category(category);
            for (name, inputs) in actions {
                self.bind(Some(category.as_str()), name, inputs);
            }
        }

        // Keep held state for actions that survived, so a held key doesn't re-trigger
        for (name, old) in old_actions {
            if let Some(slot) = self.actions.get_mut(&name) {
                slot.timing = old.timing;
            }
        }

        log::info!(
            "Loaded {} actions in {} categories",
            self.actions.len(),
            self.categories.len()
        );
    }

    // Listeners

    /// Listen to every action
    pub fn add_global_listener(&mut self, listener: SharedActionListener) -> ListenerId {
        self.dispatcher.add_global(listener)
    }

    pub fn remove_global_listener(&mut self, id: ListenerId) -> bool {
        self.dispatcher.remove_global(id)
    }

    /// Listen to one action by name
    pub fn add_action_listener(&mut self, action: &str, listener: SharedActionListener) -> ListenerId {
        self.dispatcher.add_for_action(action, listener)
    }

    pub fn remove_action_listener(&mut self, action: &str, id: ListenerId) -> bool {
        self.dispatcher.remove_for_action(action, id)
    }

    /// Listen to every action in a category
    pub fn add_category_listener(
        &mut self,
        category: &str,
        listener: SharedActionListener,
    ) -> ListenerId {
        self.dispatcher.add_for_category(category, listener)
    }

    pub fn remove_category_listener(&mut self, category: &str, id: ListenerId) -> bool {
        self.dispatcher.remove_for_category(category, id)
    }

    pub fn add_mouse_listener(&mut self, listener: SharedMouseListener) -> ListenerId {
        self.dispatcher.add_mouse(listener)
    }

    pub fn remove_mouse_listener(&mut self, id: ListenerId) -> bool {
        self.dispatcher.remove_mouse(id)
    }

    /// Queue press/release notifications until [`InputManager::process_queued_events`]
    ///
    /// Hold notifications are always delivered immediately. Turning deferred
    /// dispatch off drops queued notifications instead of delivering them.
    pub fn set_deferred_dispatch(&mut self, deferred: bool) {
        self.dispatcher.set_deferred(deferred);
    }

    pub fn is_deferred_dispatch(&self) -> bool {
        self.dispatcher.is_deferred()
    }

    pub fn queued_event_count(&self) -> usize {
        self.dispatcher.queued_len()
    }

    /// Deliver queued notifications in the order they were detected
    /// Returns how many were delivered
    pub fn process_queued_events(&mut self) -> usize {
        let queued = self.dispatcher.take_queued();
        for event in &queued {
            self.dispatcher.deliver(event, &self.categories);
        }
        queued.len()
    }

    // Buffer

    pub fn buffer_window(&self) -> u64 {
        self.buffer.window_ms()
    }

    /// Set the default "recent" window. Events are kept for twice as long.
    pub fn set_buffer_window(&mut self, window_ms: u64) {
        self.buffer.set_window_ms(window_ms);
    }

    pub fn is_buffering_enabled(&self) -> bool {
        self.buffering_enabled
    }

    /// While disabled nothing is buffered and buffer queries report false
    pub fn set_buffering_enabled(&mut self, enabled: bool) {
        self.buffering_enabled = enabled;
        if !enabled {
            self.buffer.clear();
        }
    }

    pub fn clear_input_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Copy of the buffered events, oldest first
    pub fn buffered_events(&self) -> Vec<ActionEvent> {
        self.buffer.iter().cloned().collect()
    }

    // Action queries

    /// Check if any input bound to the action is down
    pub fn is_action_held(&self, name: &str) -> bool {
        let Some(slot) = self.actions.get(name) else {
            return false;
        };
        self.devices.with_frame(|current| any_down(&slot.action, current))
    }

    /// Check if the action went from released to held since the last tick
    pub fn is_action_triggered(&self, name: &str) -> bool {
        let Some(slot) = self.actions.get(name) else {
            return false;
        };
        self.devices.with_frame(|current| {
            any_down(&slot.action, current) && !any_down(&slot.action, &self.previous)
        })
    }

    /// Check if the action went from held to released since the last tick
    pub fn is_action_released(&self, name: &str) -> bool {
        let Some(slot) = self.actions.get(name) else {
            return false;
        };
        self.devices.with_frame(|current| {
            !any_down(&slot.action, current) && any_down(&slot.action, &self.previous)
        })
    }

    /// Milliseconds since the action was pressed, or 0 if it isn't held
    pub fn action_hold_duration(&self, name: &str) -> u64 {
        self.actions
            .get(name)
            .and_then(|slot| slot.timing.pressed_at)
            .map_or(0, |pressed_at| self.clock.now_ms().saturating_sub(pressed_at))
    }

    pub fn is_action_held_for(&self, name: &str, ms: u64) -> bool {
        self.action_hold_duration(name) >= ms
    }

    /// Check for a buffered press within the default window
    pub fn was_action_triggered_recently(&self, name: &str) -> bool {
        self.was_action_triggered_within(name, self.buffer.window_ms())
    }

    pub fn was_action_triggered_within(&self, name: &str, window_ms: u64) -> bool {
        self.buffered(name, ActionEventKind::Pressed, window_ms)
    }

    /// Check for a buffered release within the default window
    pub fn was_action_released_recently(&self, name: &str) -> bool {
        self.was_action_released_within(name, self.buffer.window_ms())
    }

    pub fn was_action_released_within(&self, name: &str, window_ms: u64) -> bool {
        self.buffered(name, ActionEventKind::Released, window_ms)
    }

    /// Consume the oldest buffered press within the default window
    /// Returns true if there was one
    pub fn consume_buffered_action(&mut self, name: &str) -> bool {
        let window = self.buffer.window_ms();
        self.consume_buffered_action_within(name, window)
    }

    pub fn consume_buffered_action_within(&mut self, name: &str, window_ms: u64) -> bool {
        if !self.buffering_enabled {
            return false;
        }
        let now = self.clock.now_ms();
        self.buffer.consume_press(name, now, window_ms)
    }

    fn buffered(&self, name: &str, kind: ActionEventKind, window_ms: u64) -> bool {
        self.buffering_enabled
            && self
                .buffer
                .contains(name, kind, self.clock.now_ms(), window_ms)
    }

    // Raw device queries

    pub fn is_input_held(&self, input: Input) -> bool {
        self.devices.with_frame(|current| current.is_down(input))
    }

    pub fn is_input_triggered(&self, input: Input) -> bool {
        self.devices
            .with_frame(|current| current.is_down(input) && !self.previous.is_down(input))
    }

    pub fn is_input_released(&self, input: Input) -> bool {
        self.devices
            .with_frame(|current| !current.is_down(input) && self.previous.is_down(input))
    }

    pub fn is_key_held(&self, code: u32) -> bool {
        self.is_input_held(Input::keyboard(code))
    }

    pub fn is_key_triggered(&self, code: u32) -> bool {
        self.is_input_triggered(Input::keyboard(code))
    }

    pub fn is_key_released(&self, code: u32) -> bool {
        self.is_input_released(Input::keyboard(code))
    }

    pub fn is_mouse_button_held(&self, code: u32) -> bool {
        self.is_input_held(Input::mouse(code))
    }

    pub fn is_mouse_button_triggered(&self, code: u32) -> bool {
        self.is_input_triggered(Input::mouse(code))
    }

    pub fn is_mouse_button_released(&self, code: u32) -> bool {
        self.is_input_released(Input::mouse(code))
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.devices.with_frame(DeviceFrame::mouse_position)
    }

    /// Cursor movement since the last tick
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_position() - self.previous.mouse_position()
    }

    /// Wheel rotation since the last tick
    pub fn scroll_delta(&self) -> i32 {
        self.devices.pending_scroll()
    }

    /// Check if the cursor lies in the rectangle at (`x`, `y`) of the given size
    pub fn is_mouse_in_area(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let pos = self.mouse_position();
        pos.x >= x && pos.x < x + width && pos.y >= y && pos.y < y + height
    }

    // Tick

    /// Advance one fixed step
    ///
    /// Detects press, release and hold transitions for every action, buffers
    /// and dispatches them, ages out old buffered events, dispatches mouse
    /// motion, then makes the sampled frame the new "previous" frame.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        let (current, scroll) = self.devices.snapshot();

        for slot in self.actions.values_mut() {
            let action = &slot.action;
            let timing = &mut slot.timing;
            let held = any_down(action, &current);

            match (timing.was_held, held) {
                (false, true) => {
                    let trigger = first_edge(action, &current, &self.previous, true);
                    timing.pressed_at = Some(now);
                    timing.last_hold_notify = None;
                    log::trace!("{} pressed at {now} by {trigger:?}", action.name());

                    let event =
                        ActionEvent::new(action.name(), now, ActionEventKind::Pressed, trigger);
                    if self.buffering_enabled {
                        self.buffer.push(event.clone());
                    }
                    self.dispatcher.submit(event, &self.categories);
                }
                (true, false) => {
                    let trigger = first_edge(action, &current, &self.previous, false);
                    timing.pressed_at = None;
                    timing.last_hold_notify = None;
                    log::trace!("{} released at {now} by {trigger:?}", action.name());

                    let event =
                        ActionEvent::new(action.name(), now, ActionEventKind::Released, trigger);
                    if self.buffering_enabled {
                        self.buffer.push(event.clone());
                    }
                    self.dispatcher.submit(event, &self.categories);
                }
                (true, true) => {
                    let pressed_at = *timing.pressed_at.get_or_insert(now);
                    let since = timing.last_hold_notify.unwrap_or(pressed_at);
                    if now.saturating_sub(since) >= self.hold_interval_ms {
                        let hold_ms = now.saturating_sub(pressed_at);
                        self.dispatcher
                            .deliver_held(action.name(), hold_ms, &self.categories);
                        timing.last_hold_notify = Some(now);
                    }
                }
                (false, false) => {
                    timing.last_hold_notify = None;
                }
            }

            timing.was_held = held;
        }

        self.buffer.age_out(now);

        let delta = current.mouse_position() - self.previous.mouse_position();
        if delta != Vec2::ZERO || scroll != 0 {
            let event = MouseEvent::new(current.mouse_position(), delta, scroll, now);
            self.dispatcher.deliver_mouse(&event);
        }

        self.previous = current;
    }

    /// Release everything and forget all transient state
    ///
    /// Bindings, categories and listeners are kept.
    pub fn reset(&mut self) {
        self.devices.reset();
        self.previous = DeviceFrame::default();
        self.buffer.clear();
        for slot in self.actions.values_mut() {
            slot.timing = ActionTiming::default();
        }
        let dropped = self.dispatcher.take_queued().len();
        if dropped > 0 {
            log::debug!("Reset dropped {dropped} queued action events");
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

fn any_down(action: &InputAction, frame: &DeviceFrame) -> bool {
    action
        .bound_inputs()
        .iter()
        .any(|&input| frame.is_down(input))
}

/// First bound input whose state changed to `down` between the two frames
fn first_edge(
    action: &InputAction,
    current: &DeviceFrame,
    previous: &DeviceFrame,
    down: bool,
) -> Option<Input> {
    action
        .bound_inputs()
        .iter()
        .copied()
        .find(|&input| current.is_down(input) == down && previous.is_down(input) != down)
}

fn unindex(index: &mut HashMap<Input, IndexSet<String>>, input: Input, action: &str) {
    if let Some(names) = index.get_mut(&input) {
        names.shift_remove(action);
        if names.is_empty() {
            index.remove(&input);
        }
    }
}
