//! Input and platform events.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Event sources translate platform events into `Event`s; the scheduler only
//! interprets `Event::Quit` and `Event::Resized`, everything else is forwarded
//! to the state stack untouched.

mod event;
mod types;

pub use event::Event;
pub use types::{
    ButtonState,
    InputEvent,
    Key,
    KeyInput,
    Modifiers,
    MouseButton,
    Point,
    PointerInput,
    WheelDelta,
};
