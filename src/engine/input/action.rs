// Physical inputs and the named actions bound to them

use super::keys;
use indexmap::IndexSet;
use std::fmt;

/// Class of device a physical input belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyboard => write!(f, "keyboard"),
            Self::Mouse => write!(f, "mouse"),
        }
    }
}

/// One physical control: a keyboard key or a mouse button
///
/// Codes are not validated here. Codes outside the range the manager tracks
/// are simply never reported as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Input {
    device: DeviceClass,
    code: u32,
}

impl Input {
    /// Create a keyboard input from a virtual key code
    pub const fn keyboard(code: u32) -> Self {
        Self {
            device: DeviceClass::Keyboard,
            code,
        }
    }

    /// Create a mouse input from a button code
    pub const fn mouse(code: u32) -> Self {
        Self {
            device: DeviceClass::Mouse,
            code,
        }
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn is_keyboard(&self) -> bool {
        self.device == DeviceClass::Keyboard
    }

    pub fn is_mouse(&self) -> bool {
        self.device == DeviceClass::Mouse
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.device {
            DeviceClass::Keyboard => keys::key_name(self.code),
            DeviceClass::Mouse => keys::mouse_button_name(self.code),
        };
        write!(f, "{}[{}]", self.device, name)
    }
}

/// A named logical action bound to any number of physical inputs
///
/// The action is held while any of its inputs is held. Inputs keep the order
/// they were bound in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAction {
    name: String,
    bound_inputs: IndexSet<Input>,
}

impl InputAction {
    /// Create an action with no bound inputs
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bound_inputs: IndexSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound inputs in binding order
    pub fn bound_inputs(&self) -> &IndexSet<Input> {
        &self.bound_inputs
    }

    /// Bind an input. Returns false if it was already bound.
    pub fn add_input(&mut self, input: Input) -> bool {
        self.bound_inputs.insert(input)
    }

    pub fn add_key_code(&mut self, code: u32) -> bool {
        self.add_input(Input::keyboard(code))
    }

    pub fn add_mouse_button(&mut self, code: u32) -> bool {
        self.add_input(Input::mouse(code))
    }

    /// Unbind an input. Returns false if it was not bound.
    pub fn remove_input(&mut self, input: Input) -> bool {
        self.bound_inputs.shift_remove(&input)
    }

    pub fn remove_key_code(&mut self, code: u32) -> bool {
        self.remove_input(Input::keyboard(code))
    }

    pub fn remove_mouse_button(&mut self, code: u32) -> bool {
        self.remove_input(Input::mouse(code))
    }

    pub fn clear_inputs(&mut self) {
        self.bound_inputs.clear();
    }

    pub fn has_input(&self, input: Input) -> bool {
        self.bound_inputs.contains(&input)
    }

    pub fn has_key_code(&self, code: u32) -> bool {
        self.has_input(Input::keyboard(code))
    }

    pub fn has_mouse_button(&self, code: u32) -> bool {
        self.has_input(Input::mouse(code))
    }

    /// True when no input is bound
    pub fn is_empty(&self) -> bool {
        self.bound_inputs.is_empty()
    }

    /// Codes of all bound keyboard inputs
    pub fn key_codes(&self) -> Vec<u32> {
        self.bound_inputs
            .iter()
            .filter(|input| input.is_keyboard())
            .map(Input::code)
            .collect()
    }

    /// Codes of all bound mouse buttons
    pub fn mouse_buttons(&self) -> Vec<u32> {
        self.bound_inputs
            .iter()
            .filter(|input| input.is_mouse())
            .map(Input::code)
            .collect()
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, input) in self.bound_inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{input}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::keys::{button, key};

    #[test]
    fn test_input_equality() {
        assert_eq!(Input::keyboard(key::SPACE), Input::keyboard(key::SPACE));
        assert_ne!(Input::keyboard(1), Input::mouse(1));
    }

    #[test]
    fn test_input_device_class() {
        let input = Input::mouse(button::LEFT);
        assert!(input.is_mouse());
        assert!(!input.is_keyboard());
        assert_eq!(input.device(), DeviceClass::Mouse);
        assert_eq!(input.code(), button::LEFT);
    }

    #[test]
    fn test_input_display() {
        assert_eq!(Input::keyboard(key::SPACE).to_string(), "keyboard[SPACE]");
        assert_eq!(Input::mouse(button::RIGHT).to_string(), "mouse[RIGHT]");
    }

    #[test]
    fn test_action_creation() {
        let action = InputAction::new("jump");
        assert_eq!(action.name(), "jump");
        assert!(action.is_empty());
    }

    #[test]
    fn test_add_and_remove_inputs() {
        let mut action = InputAction::new("jump");
        assert!(action.add_key_code(key::SPACE));
        assert!(!action.add_key_code(key::SPACE), "Duplicate bind should be ignored");
        assert!(action.add_mouse_button(button::LEFT));
        assert_eq!(action.bound_inputs().len(), 2);

        assert!(action.remove_key_code(key::SPACE));
        assert!(!action.has_key_code(key::SPACE));
        assert!(action.has_mouse_button(button::LEFT));
        assert!(!action.remove_mouse_button(button::RIGHT));
    }

    #[test]
    fn test_bound_inputs_keep_binding_order() {
        let mut action = InputAction::new("move_left");
        action.add_key_code(key::A);
        action.add_key_code(key::LEFT);
        action.add_mouse_button(button::BACK);
        action.remove_key_code(key::A);
        action.add_key_code(key::A);

        let order: Vec<Input> = action.bound_inputs().iter().copied().collect();
        assert_eq!(
            order,
            vec![
                Input::keyboard(key::LEFT),
                Input::mouse(button::BACK),
                Input::keyboard(key::A)
            ]
        );
    }

    #[test]
    fn test_device_projections() {
        let mut action = InputAction::new("fire");
        action.add_key_code(key::CONTROL);
        action.add_mouse_button(button::LEFT);
        action.add_mouse_button(button::MIDDLE);

        assert_eq!(action.key_codes(), vec![key::CONTROL]);
        assert_eq!(action.mouse_buttons(), vec![button::LEFT, button::MIDDLE]);
    }

    #[test]
    fn test_clear_inputs() {
        let mut action = InputAction::new("fire");
        action.add_key_code(key::CONTROL);
        action.add_mouse_button(button::LEFT);
        action.clear_inputs();
        assert!(action.is_empty());
        assert_eq!(action.name(), "fire");
    }

    #[test]
    fn test_action_display() {
        let mut action = InputAction::new("jump");
        action.add_key_code(key::SPACE);
        action.add_key_code(key::W);
        assert_eq!(action.to_string(), "jump [keyboard[SPACE], keyboard[W]]");
    }
}
