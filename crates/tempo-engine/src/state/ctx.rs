use std::fmt;

use super::stack::LayerFlags;
use super::State;

/// Structural change waiting for the next commit point.
pub(crate) enum PendingOp {
    Push(Box<dyn State>, LayerFlags),
    ReplaceTop(Box<dyn State>, LayerFlags),
    Pop,
    Clear,
}

impl fmt::Debug for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingOp::Push(_, flags) => f.debug_tuple("Push").field(flags).finish(),
            PendingOp::ReplaceTop(_, flags) => f.debug_tuple("ReplaceTop").field(flags).finish(),
            PendingOp::Pop => f.write_str("Pop"),
            PendingOp::Clear => f.write_str("Clear"),
        }
    }
}

/// Command sink handed to state callbacks.
///
/// Commands are buffered in arrival order and applied by the owning
/// `StateStack` at its next commit point, never during the callback.
#[derive(Debug, Default)]
pub struct StateCtx {
    pub(crate) ops: Vec<PendingOp>,
    quit_requested: bool,
    toggle_debug: bool,
    toggle_wireframe: bool,
}

impl StateCtx {
    /// Queues a new layer on top of the stack.
    pub fn push(&mut self, state: Box<dyn State>, flags: LayerFlags) {
        self.ops.push(PendingOp::Push(state, flags));
    }

    /// Queues a modal layer. With `allow_render_below`, layers under it keep rendering.
    pub fn push_modal(&mut self, state: Box<dyn State>, allow_render_below: bool) {
        self.push(state, LayerFlags::modal(allow_render_below));
    }

    /// Queues removal of the top layer (if any) followed by insertion of `state`.
    pub fn replace_top(&mut self, state: Box<dyn State>, flags: LayerFlags) {
        self.ops.push(PendingOp::ReplaceTop(state, flags));
    }

    /// Queues removal of the top layer. No effect on an empty stack.
    pub fn pop(&mut self) {
        self.ops.push(PendingOp::Pop);
    }

    /// Queues removal of every layer, top to bottom.
    pub fn clear(&mut self) {
        self.ops.push(PendingOp::Clear);
    }

    /// Asks the scheduler to quit at the end of the current frame.
    ///
    /// The request still goes through `on_quit_requested` and may be vetoed.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Flips the frame statistics overlay after this frame.
    pub fn toggle_debug(&mut self) {
        self.toggle_debug = !self.toggle_debug;
    }

    /// Flips wireframe rendering after this frame.
    pub fn toggle_wireframe(&mut self) {
        self.toggle_wireframe = !self.toggle_wireframe;
    }

    /// Number of queued structural operations.
    pub fn pending_len(&self) -> usize {
        self.ops.len()
    }

    pub(crate) fn take_ops(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.ops)
    }

    pub(crate) fn take_quit_request(&mut self) -> bool {
        std::mem::replace(&mut self.quit_requested, false)
    }

    /// Pending `(debug, wireframe)` flips; two toggles in one frame cancel out.
    pub(crate) fn take_debug_toggles(&mut self) -> (bool, bool) {
        (
            std::mem::replace(&mut self.toggle_debug, false),
            std::mem::replace(&mut self.toggle_wireframe, false),
        )
    }
}
