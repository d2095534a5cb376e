use std::fmt;

/// Physical key, independent of keyboard layout.
///
/// Letters and digits share `Char` (lowercase ASCII); anything the engine has
/// no name for arrives as `Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    Char(char),
    /// Function key `F1`..`F12`.
    F(u8),

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{n}"),
            Key::Unknown(code) => write!(f, "Unknown(0x{code:x})"),
            named => write!(f, "{named:?}"),
        }
    }
}

/// Shared by keys and pointer buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    pub fn is_pressed(self) -> bool {
        self == ButtonState::Pressed
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys held when an event was produced.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Position in logical pixels, origin at the top-left of the window.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub state: ButtonState,
    pub modifiers: Modifiers,
    /// Platform scancode; 0 when the platform gives none.
    pub code: u32,
    pub repeat: bool,
}

impl KeyInput {
    /// A fresh, unmodified press of `key`.
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: ButtonState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerInput {
    pub button: MouseButton,
    pub state: ButtonState,
    /// Last known pointer position; the origin if the pointer never entered.
    pub position: Point,
    pub modifiers: Modifiers,
}

/// Scroll amount. Notched wheels report `Lines`, touchpads report `Pixels`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Lines { x: f32, y: f32 },
    Pixels { x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key(KeyInput),
    PointerMoved(Point),
    PointerButton(PointerInput),
    PointerLeft,
    Wheel {
        delta: WheelDelta,
        modifiers: Modifiers,
    },
    /// Committed IME or keyboard text.
    Text(String),
    Focused(bool),
}
