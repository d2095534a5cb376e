//! Layered application states.
//!
//! A `StateStack` holds one `State` per layer. Which layers receive events,
//! simulation time, and render time on a frame is decided by the topmost modal
//! layer. Structural changes are queued and only applied at commit points
//! between frames, so the layer sequence never changes during a fan-out.

mod ctx;
mod stack;

pub use ctx::StateCtx;
pub use stack::{LayerFlags, StateStack};

use crate::device::RenderFrame;
use crate::input::Event;

/// One logical mode of the application (menu, gameplay, pause overlay, ...).
///
/// Every callback receives the stack's `StateCtx`; queuing operations there is
/// the only way a state can change the stack or ask the application to quit.
pub trait State {
    /// Called once when the layer holding this state is inserted.
    fn on_enter(&mut self, ctx: &mut StateCtx) {
        let _ = ctx;
    }

    /// Called once right before the layer holding this state is removed.
    fn on_exit(&mut self, ctx: &mut StateCtx) {
        let _ = ctx;
    }

    /// Returns `false` to veto a quit request (e.g. unsaved changes).
    fn on_quit_requested(&mut self, ctx: &mut StateCtx) -> bool {
        let _ = ctx;
        true
    }

    fn on_event(&mut self, ctx: &mut StateCtx, event: &Event);

    /// Called zero or more times per frame with the constant simulation step.
    fn on_fixed_update(&mut self, ctx: &mut StateCtx, dt: f64);

    /// Called once per frame with the measured (spike-clamped) frame delta.
    fn on_update(&mut self, ctx: &mut StateCtx, dt: f64);

    /// Draws into `frame`, which may be headless.
    ///
    /// `interpolation` is the fraction of a fixed step not yet simulated, in `[0, 1)`.
    fn on_render(&mut self, ctx: &mut StateCtx, frame: &mut RenderFrame<'_>, interpolation: f64);
}
