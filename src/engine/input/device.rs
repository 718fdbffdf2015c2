// Raw device state shared between the window thread and the simulation

use super::action::{DeviceClass, Input};
use super::keys;
use glam::Vec2;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Number of key codes tracked
pub const MAX_KEYS: usize = 512;

/// Number of mouse button codes tracked
pub const MAX_MOUSE_BUTTONS: usize = 10;

/// One frame of raw device samples
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFrame {
    keys: [bool; MAX_KEYS],
    buttons: [bool; MAX_MOUSE_BUTTONS],
    mouse_position: Vec2,
}

impl DeviceFrame {
    /// Check if a key is down. Out-of-range codes are never down.
    pub fn key_down(&self, code: u32) -> bool {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.keys.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Check if a mouse button is down. Out-of-range codes are never down.
    pub fn button_down(&self, code: u32) -> bool {
        usize::try_from(code)
            .ok()
            .and_then(|i| self.buttons.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Check if a physical input is down
    pub fn is_down(&self, input: Input) -> bool {
        match input.device() {
            DeviceClass::Keyboard => self.key_down(input.code()),
            DeviceClass::Mouse => self.button_down(input.code()),
        }
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    fn set(&mut self, input: Input, down: bool) -> bool {
        let Ok(index) = usize::try_from(input.code()) else {
            return false;
        };
        let slot = match input.device() {
            DeviceClass::Keyboard => self.keys.get_mut(index),
            DeviceClass::Mouse => self.buttons.get_mut(index),
        };
        match slot {
            Some(slot) => {
                *slot = down;
                true
            }
            None => false,
        }
    }
}

impl Default for DeviceFrame {
    fn default() -> Self {
        Self {
            keys: [false; MAX_KEYS],
            buttons: [false; MAX_MOUSE_BUTTONS],
            mouse_position: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct SharedDevices {
    frame: DeviceFrame,
    scroll_delta: i32,
}

/// Writer handle for raw device samples
///
/// Cheap to clone and safe to hand to the thread that owns the OS event
/// source. Callbacks only ever write the current frame; the manager takes a
/// consistent snapshot of it once per tick.
#[derive(Debug, Clone, Default)]
pub struct DeviceSink {
    shared: Arc<Mutex<SharedDevices>>,
}

impl DeviceSink {
    /// Create an empty device state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_pressed(&self, code: u32) {
        self.set(Input::keyboard(code), true);
    }

    pub fn key_released(&self, code: u32) {
        self.set(Input::keyboard(code), false);
    }

    pub fn button_pressed(&self, code: u32) {
        self.set(Input::mouse(code), true);
    }

    pub fn button_released(&self, code: u32) {
        self.set(Input::mouse(code), false);
    }

    /// Record the absolute cursor position
    pub fn mouse_moved(&self, position: Vec2) {
        self.lock().frame.mouse_position = position;
    }

    /// Record wheel rotation. Several events within one tick accumulate.
    pub fn mouse_scrolled(&self, rotation: i32) {
        let mut shared = self.lock();
        shared.scroll_delta = shared.scroll_delta.saturating_add(rotation);
    }

    /// Feed a winit window event into the device state
    /// Returns true if the event carried input the manager tracks
    pub fn handle_window_event(&self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key_code) = event.physical_key else {
                    return false;
                };
                let Some(code) = keys::from_winit_key(key_code) else {
                    return false;
                };
                match event.state {
                    // Auto-repeat doesn't change the held state
                    ElementState::Pressed if event.repeat => {}
                    ElementState::Pressed => self.key_pressed(code),
                    ElementState::Released => self.key_released(code),
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(code) = keys::from_winit_button(*button) else {
                    return false;
                };
                match state {
                    ElementState::Pressed => self.button_pressed(code),
                    ElementState::Released => self.button_released(code),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_moved(Vec2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let rotation = wheel_rotation(*delta);
                if rotation != 0 {
                    self.mouse_scrolled(rotation);
                }
                true
            }
            _ => false,
        }
    }

    /// Release every key and button and forget pending scroll
    pub fn reset(&self) {
        *self.lock() = SharedDevices::default();
    }

    /// Copy the current frame and drain the pending scroll in one critical section
    pub(crate) fn snapshot(&self) -> (DeviceFrame, i32) {
        let mut shared = self.lock();
        let scroll = std::mem::take(&mut shared.scroll_delta);
        (shared.frame.clone(), scroll)
    }

    /// Read the live current frame
    pub(crate) fn with_frame<R>(&self, f: impl FnOnce(&DeviceFrame) -> R) -> R {
        f(&self.lock().frame)
    }

    /// Scroll accumulated since the last snapshot
    pub(crate) fn pending_scroll(&self) -> i32 {
        self.lock().scroll_delta
    }

    fn set(&self, input: Input, down: bool) {
        if !self.lock().frame.set(input, down) {
            log::trace!("Ignoring out-of-range {input:?}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedDevices> {
        // The state is plain data, so a panic mid-write can't leave it unusable
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Convert a wheel delta to whole rotation steps, positive towards the user
fn wheel_rotation(delta: MouseScrollDelta) -> i32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -(y.round() as i32),
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                -1
            } else if position.y < 0.0 {
                1
            } else {
                0
            }
        }
    }
}
