//! Action-based input handling for fixed-step applications.
//!
//! Raw keyboard and mouse samples are mapped to named, rebindable actions
//! with edge detection, hold tracking, a short input buffer and listener
//! callbacks. See [`engine::input`] for the entry point.

pub mod core;
pub mod engine;

pub use engine::input::{InputError, InputManager, InputSettings};
