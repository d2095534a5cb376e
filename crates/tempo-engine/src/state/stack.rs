use std::ops::Range;

use crate::device::RenderFrame;
use crate::input::Event;

use super::ctx::{PendingOp, StateCtx};
use super::State;

/// Per-layer propagation flags.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LayerFlags {
    /// Blocks events and updates from reaching lower layers.
    pub modal: bool,

    /// Only meaningful on the topmost modal layer: keep rendering the layers below it.
    pub allow_render_below: bool,
}

impl LayerFlags {
    pub const fn modal(allow_render_below: bool) -> Self {
        Self {
            modal: true,
            allow_render_below,
        }
    }
}

struct Layer {
    state: Box<dyn State>,
    flags: LayerFlags,
}

/// Ordered layers (index 0 = bottom) plus the queue of pending structural changes.
///
/// `push`/`replace_top`/`pop`/`clear` only queue. The queue is applied in FIFO
/// order by `on_enter_frame`/`on_exit_frame`, which are ignored while a
/// callback fan-out is in progress.
#[derive(Default)]
pub struct StateStack {
    layers: Vec<Layer>,
    ctx: StateCtx,
    iterating: bool,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: Box<dyn State>, flags: LayerFlags) {
        self.ctx.push(state, flags);
    }

    /// Sugar for `push` with `LayerFlags::modal(allow_render_below)`.
    pub fn push_modal(&mut self, state: Box<dyn State>, allow_render_below: bool) {
        self.ctx.push_modal(state, allow_render_below);
    }

    pub fn replace_top(&mut self, state: Box<dyn State>, flags: LayerFlags) {
        self.ctx.replace_top(state, flags);
    }

    pub fn pop(&mut self) {
        self.ctx.pop();
    }

    pub fn clear(&mut self) {
        self.ctx.clear();
    }

    /// Commit point before a frame begins.
    pub fn on_enter_frame(&mut self) {
        if !self.iterating {
            self.apply_pending();
        }
    }

    /// Commit point after a frame's callbacks have finished.
    pub fn on_exit_frame(&mut self) {
        if !self.iterating {
            self.apply_pending();
        }
    }

    /// Asks the active update segment, top first, whether quitting is allowed.
    ///
    /// The scan stops at the first veto. An empty stack never vetoes.
    pub fn on_quit_requested(&mut self) -> bool {
        let Some(range) = self.update_range() else {
            return true;
        };

        self.iterating = true;
        let mut allow = true;
        for layer in self.layers[range].iter_mut().rev() {
            if !layer.state.on_quit_requested(&mut self.ctx) {
                allow = false;
                break;
            }
        }
        self.iterating = false;

        allow
    }

    /// Dispatches top-down; the first modal layer receives the event and stops propagation.
    pub fn on_event(&mut self, event: &Event) {
        self.iterating = true;
        for layer in self.layers.iter_mut().rev() {
            layer.state.on_event(&mut self.ctx, event);
            if layer.flags.modal {
                break;
            }
        }
        self.iterating = false;
    }

    pub fn on_fixed_update(&mut self, dt: f64) {
        let Some(range) = self.update_range() else {
            return;
        };

        self.iterating = true;
        for layer in &mut self.layers[range] {
            layer.state.on_fixed_update(&mut self.ctx, dt);
        }
        self.iterating = false;
    }

    pub fn on_update(&mut self, dt: f64) {
        let Some(range) = self.update_range() else {
            return;
        };

        self.iterating = true;
        for layer in &mut self.layers[range] {
            layer.state.on_update(&mut self.ctx, dt);
        }
        self.iterating = false;
    }

    /// Renders the visible segment bottom-up into one shared frame.
    pub fn on_render(&mut self, frame: &mut RenderFrame<'_>, interpolation: f64) {
        let Some(range) = self.render_range() else {
            return;
        };

        self.iterating = true;
        for layer in &mut self.layers[range] {
            layer.state.on_render(&mut self.ctx, frame, interpolation);
        }
        self.iterating = false;
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Flags of each layer, bottom to top.
    pub fn layer_flags(&self) -> impl Iterator<Item = LayerFlags> + '_ {
        self.layers.iter().map(|l| l.flags)
    }

    /// Number of structural operations waiting for the next commit point.
    pub fn pending_len(&self) -> usize {
        self.ctx.pending_len()
    }

    pub fn is_iterating(&self) -> bool {
        self.iterating
    }

    /// Returns and clears a quit request raised by a state callback.
    pub fn take_quit_request(&mut self) -> bool {
        self.ctx.take_quit_request()
    }

    /// Returns and clears `(debug, wireframe)` toggle requests.
    pub fn take_debug_toggles(&mut self) -> (bool, bool) {
        self.ctx.take_debug_toggles()
    }

    fn topmost_modal_index(&self) -> Option<usize> {
        self.layers.iter().rposition(|l| l.flags.modal)
    }

    /// Topmost modal layer upward, or the top layer alone.
    fn update_range(&self) -> Option<Range<usize>> {
        let top = self.layers.len().checked_sub(1)?;
        let start = self.topmost_modal_index().unwrap_or(top);
        Some(start..self.layers.len())
    }

    /// Like `update_range`, but a modal with `allow_render_below` reveals every layer.
    fn render_range(&self) -> Option<Range<usize>> {
        let top = self.layers.len().checked_sub(1)?;
        let start = match self.topmost_modal_index() {
            Some(i) if self.layers[i].flags.allow_render_below => 0,
            Some(i) => i,
            None => top,
        };
        Some(start..self.layers.len())
    }

    fn apply_pending(&mut self) {
        if self.ctx.pending_len() == 0 {
            return;
        }

        // Ops queued by on_enter/on_exit below land in `ctx` and wait for the next commit.
        let ops = self.ctx.take_ops();

        self.iterating = true;
        for op in ops {
            log::trace!("state stack: applying {op:?} (depth {})", self.layers.len());
            match op {
                PendingOp::Push(state, flags) => {
                    self.insert(state, flags);
                }
                PendingOp::ReplaceTop(state, flags) => {
                    self.remove_top();
                    self.insert(state, flags);
                }
                PendingOp::Pop => {
                    self.remove_top();
                }
                PendingOp::Clear => {
                    for layer in self.layers.iter_mut().rev() {
                        layer.state.on_exit(&mut self.ctx);
                    }
                    self.layers.clear();
                }
            }
        }
        self.iterating = false;
    }

    fn insert(&mut self, mut state: Box<dyn State>, flags: LayerFlags) {
        state.on_enter(&mut self.ctx);
        self.layers.push(Layer { state, flags });
    }

    fn remove_top(&mut self) {
        if let Some(layer) = self.layers.last_mut() {
            layer.state.on_exit(&mut self.ctx);
            self.layers.pop();
        }
    }
}
