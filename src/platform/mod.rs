//! Platform abstraction layer
//!
//! Handles the parts of a frame that touch the outside world:
//! - Time: millisecond clocks and frame pacing
//! - Input: raw key/mouse events folded into a per-tick [`TickInput`](crate::sim::TickInput)

pub mod clock;
pub mod input;

pub use clock::{Clock, FramePacer, ManualClock, SystemClock};
pub use input::{InputEvent, InputState, KeyCode, MouseButton};
