// Core utilities shared across the engine

pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};
