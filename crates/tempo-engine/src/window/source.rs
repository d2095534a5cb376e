use std::collections::VecDeque;

use crate::input::Event;

/// Pollable platform event stream.
pub trait EventSource {
    /// Appends every event that arrived since the previous call, in arrival order.
    fn poll(&mut self, out: &mut Vec<Event>);
}

/// A pre-filled queue drains completely on the first poll.
impl EventSource for VecDeque<Event> {
    fn poll(&mut self, out: &mut Vec<Event>) {
        out.extend(self.drain(..));
    }
}
