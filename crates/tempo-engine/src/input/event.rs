use super::types::{InputEvent, Key, KeyInput};

/// One platform event as seen by the scheduler and the state stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The platform asked the application to close (window close button, OS quit).
    Quit,

    /// The drawable surface changed size, in physical pixels.
    Resized { width: u32, height: u32 },

    /// Keyboard, pointer, text, or focus input.
    Input(InputEvent),
}

impl Event {
    /// Returns the key if this is a non-repeat key press.
    pub fn key_pressed(&self) -> Option<Key> {
        match self {
            Event::Input(InputEvent::Key(k)) if k.state.is_pressed() && !k.repeat => Some(k.key),
            _ => None,
        }
    }
}

impl From<InputEvent> for Event {
    fn from(ev: InputEvent) -> Self {
        Event::Input(ev)
    }
}

impl From<KeyInput> for Event {
    fn from(key: KeyInput) -> Self {
        Event::Input(InputEvent::Key(key))
    }
}
