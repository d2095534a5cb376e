//! Window + platform event source.
//!
//! Owns the winit `EventLoop` and `Window`. Instead of handing control to
//! winit's `run_app`, events are pumped once per frame so the frame scheduler
//! keeps ownership of the loop.

mod config;
mod source;
mod translate;
mod winit_events;

pub use config::WindowConfig;
pub use source::EventSource;
pub use winit_events::WinitEvents;
