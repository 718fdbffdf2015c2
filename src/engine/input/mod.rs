// Input handling system
//
// Turns raw keyboard and mouse samples into named, rebindable actions.
//
// ## Architecture
//
// - `keys`: Key and mouse button codes, names, and winit translation
// - `action`: Physical inputs and the actions they are bound to
// - `device`: Raw device state written by the window thread
// - `event`: Timestamped action and mouse events
// - `buffer`: Recent-event buffer for lenient "was pressed" checks
// - `listener`: Callback traits for action and mouse notifications
// - `dispatch`: Listener registries and the deferred event queue
// - `config`: Settings and JSON binding files
// - `manager`: Main input manager coordinating everything
//
// ## Usage Example
//
// ```rust
// use input_actions::engine::input::{key, Input, InputManager};
//
// let mut input = InputManager::new();
// input.bind(Some("movement"), "jump", &[Input::keyboard(key::SPACE)]);
//
// // Hand this to whatever receives window events
// let devices = input.device_sink();
// devices.key_pressed(key::SPACE);
//
// // Once per fixed step
// input.update();
//
// if input.consume_buffered_action("jump") {
//     // Jump, even if the press landed a few frames early
// }
// ```

pub mod action;
pub mod buffer;
pub mod config;
pub mod device;
mod dispatch;
pub mod event;
pub mod keys;
pub mod listener;
pub mod manager;

// Re-export commonly used types
pub use action::{DeviceClass, Input, InputAction};
pub use config::{default_bindings, BindingConfig, InputSettings};
pub use device::DeviceSink;
pub use event::{ActionEvent, ActionEventKind, MouseEvent};
pub use keys::{button, key};
pub use listener::{
    ActionListener, ListenerId, MouseListener, SharedActionListener, SharedMouseListener,
};
pub use manager::{ActionMappings, InputManager};

/// Errors from resolving and loading input bindings
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown input type: {0}")]
    UnknownDeviceType(String),

    #[error("unknown key name: {0}")]
    UnknownKeyName(String),

    #[error("unknown mouse button name: {0}")]
    UnknownMouseButton(String),

    #[error("{0} input needs a key name or a code")]
    MissingCode(DeviceClass),

    #[error("{device} code {code} is out of range")]
    CodeOutOfRange { device: DeviceClass, code: u32 },

    #[error("invalid input for action {action} in category {category}")]
    InvalidBinding {
        category: String,
        action: String,
        #[source]
        source: Box<InputError>,
    },

    #[error("malformed binding JSON")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
