use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::input::{
    ButtonState, Event, InputEvent, Key, KeyInput, Modifiers, MouseButton, Point, PointerInput,
    WheelDelta,
};

/// The window properties translation depends on.
#[derive(Debug, Copy, Clone)]
pub(crate) struct WindowView {
    pub scale_factor: f64,
    pub inner_size: PhysicalSize<u32>,
}

impl WindowView {
    pub fn of(window: &Window) -> Self {
        Self {
            scale_factor: window.scale_factor(),
            inner_size: window.inner_size(),
        }
    }

    fn to_logical(self, pos: PhysicalPosition<f64>) -> Point {
        let logical = pos.to_logical::<f64>(self.scale_factor);
        Point::new(logical.x as f32, logical.y as f32)
    }
}

/// Input context winit does not repeat on every event.
#[derive(Debug, Default)]
pub(crate) struct PointerTracker {
    pub modifiers: Modifiers,
    pub position: Option<Point>,
}

/// Translates a winit `WindowEvent` into an engine `Event`, updating `tracker`.
///
/// Returns `None` for events the engine does not represent (redraw requests,
/// IME preedit, touch, ...).
pub(crate) fn translate(
    view: WindowView,
    tracker: &mut PointerTracker,
    event: &WindowEvent,
) -> Option<Event> {
    let input = match event {
        WindowEvent::CloseRequested => return Some(Event::Quit),

        WindowEvent::Resized(size) => {
            return Some(Event::Resized {
                width: size.width,
                height: size.height,
            });
        }

        WindowEvent::ScaleFactorChanged { .. } => {
            return Some(Event::Resized {
                width: view.inner_size.width,
                height: view.inner_size.height,
            });
        }

        WindowEvent::ModifiersChanged(m) => {
            tracker.modifiers = map_modifiers(m.state());
            InputEvent::ModifiersChanged(tracker.modifiers)
        }

        WindowEvent::Focused(f) => InputEvent::Focused(*f),

        WindowEvent::CursorLeft { .. } => {
            tracker.position = None;
            InputEvent::PointerLeft
        }

        WindowEvent::CursorMoved { position, .. } => {
            let point = view.to_logical(*position);
            tracker.position = Some(point);
            InputEvent::PointerMoved(point)
        }

        WindowEvent::MouseInput { state, button, .. } => InputEvent::PointerButton(PointerInput {
            button: map_mouse_button(*button),
            state: map_state(*state),
            position: tracker.position.unwrap_or_default(),
            modifiers: tracker.modifiers,
        }),

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => WheelDelta::Lines { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let Point { x, y } = view.to_logical(*p);
                    WheelDelta::Pixels { x, y }
                }
            };
            InputEvent::Wheel {
                delta,
                modifiers: tracker.modifiers,
            }
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let (key, code) = map_key(event.physical_key);
            InputEvent::Key(KeyInput {
                key,
                state: map_state(event.state),
                modifiers: tracker.modifiers,
                code,
                repeat: event.repeat,
            })
        }

        WindowEvent::Ime(winit::event::Ime::Commit(text)) if !text.is_empty() => {
            InputEvent::Text(text.clone())
        }

        _ => return None,
    };

    Some(Event::Input(input))
}

fn map_state(state: ElementState) -> ButtonState {
    match state {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    // NativeKeyCode has no stable numeric form in winit 0.30.
    let PhysicalKey::Code(code) = pk else {
        return (Key::Unknown(0), 0);
    };

    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::Delete => Key::Delete,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::Char('a'),
        KeyCode::KeyB => Key::Char('b'),
        KeyCode::KeyC => Key::Char('c'),
        KeyCode::KeyD => Key::Char('d'),
        KeyCode::KeyE => Key::Char('e'),
        KeyCode::KeyF => Key::Char('f'),
        KeyCode::KeyG => Key::Char('g'),
        KeyCode::KeyH => Key::Char('h'),
        KeyCode::KeyI => Key::Char('i'),
        KeyCode::KeyJ => Key::Char('j'),
        KeyCode::KeyK => Key::Char('k'),
        KeyCode::KeyL => Key::Char('l'),
        KeyCode::KeyM => Key::Char('m'),
        KeyCode::KeyN => Key::Char('n'),
        KeyCode::KeyO => Key::Char('o'),
        KeyCode::KeyP => Key::Char('p'),
        KeyCode::KeyQ => Key::Char('q'),
        KeyCode::KeyR => Key::Char('r'),
        KeyCode::KeyS => Key::Char('s'),
        KeyCode::KeyT => Key::Char('t'),
        KeyCode::KeyU => Key::Char('u'),
        KeyCode::KeyV => Key::Char('v'),
        KeyCode::KeyW => Key::Char('w'),
        KeyCode::KeyX => Key::Char('x'),
        KeyCode::KeyY => Key::Char('y'),
        KeyCode::KeyZ => Key::Char('z'),
        KeyCode::Digit0 => Key::Char('0'),
        KeyCode::Digit1 => Key::Char('1'),
        KeyCode::Digit2 => Key::Char('2'),
        KeyCode::Digit3 => Key::Char('3'),
        KeyCode::Digit4 => Key::Char('4'),
        KeyCode::Digit5 => Key::Char('5'),
        KeyCode::Digit6 => Key::Char('6'),
        KeyCode::Digit7 => Key::Char('7'),
        KeyCode::Digit8 => Key::Char('8'),
        KeyCode::Digit9 => Key::Char('9'),
        KeyCode::F1 => Key::F(1),
        KeyCode::F2 => Key::F(2),
        KeyCode::F3 => Key::F(3),
        KeyCode::F4 => Key::F(4),
        KeyCode::F5 => Key::F(5),
        KeyCode::F6 => Key::F(6),
        KeyCode::F7 => Key::F(7),
        KeyCode::F8 => Key::F(8),
        KeyCode::F9 => Key::F(9),
        KeyCode::F10 => Key::F(10),
        KeyCode::F11 => Key::F(11),
        KeyCode::F12 => Key::F(12),

        other => Key::Unknown(other as u32),
    };

    (key, code as u32)
}

#[cfg(test)]
mod tests {
    use winit::event::{DeviceId, Ime, TouchPhase};

    use super::*;

    const HIDPI: WindowView = WindowView {
        scale_factor: 2.0,
        inner_size: PhysicalSize::new(1600, 1200),
    };

    fn device() -> DeviceId {
        // SAFETY: only compared against other dummies, never handed to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn input(tracker: &mut PointerTracker, event: WindowEvent) -> InputEvent {
        match translate(HIDPI, tracker, &event) {
            Some(Event::Input(input)) => input,
            other => panic!("expected input event, got {other:?}"),
        }
    }

    // ── window events ──

    #[test]
    fn close_and_resize_are_reserved_kinds() {
        let mut tracker = PointerTracker::default();
        assert_eq!(
            translate(HIDPI, &mut tracker, &WindowEvent::CloseRequested),
            Some(Event::Quit)
        );
        assert_eq!(
            translate(HIDPI, &mut tracker, &WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(Event::Resized {
                width: 640,
                height: 480
            })
        );
        assert_eq!(translate(HIDPI, &mut tracker, &WindowEvent::RedrawRequested), None);
    }

    #[test]
    fn focus_is_forwarded() {
        let mut tracker = PointerTracker::default();
        assert_eq!(input(&mut tracker, WindowEvent::Focused(false)), InputEvent::Focused(false));
    }

    // ── pointer ──

    #[test]
    fn pointer_position_is_logical_and_stamps_buttons() {
        let mut tracker = PointerTracker::default();

        let moved = input(
            &mut tracker,
            WindowEvent::CursorMoved {
                device_id: device(),
                position: PhysicalPosition::new(200.0, 100.0),
            },
        );
        assert_eq!(moved, InputEvent::PointerMoved(Point::new(100.0, 50.0)));

        let pressed = input(
            &mut tracker,
            WindowEvent::MouseInput {
                device_id: device(),
                state: ElementState::Pressed,
                button: WinitMouseButton::Left,
            },
        );
        assert_eq!(
            pressed,
            InputEvent::PointerButton(PointerInput {
                button: MouseButton::Left,
                state: ButtonState::Pressed,
                position: Point::new(100.0, 50.0),
                modifiers: Modifiers::default(),
            })
        );
    }

    #[test]
    fn pointer_left_forgets_position() {
        let mut tracker = PointerTracker {
            position: Some(Point::new(5.0, 5.0)),
            ..PointerTracker::default()
        };

        let left = input(&mut tracker, WindowEvent::CursorLeft { device_id: device() });
        assert_eq!(left, InputEvent::PointerLeft);

        let released = input(
            &mut tracker,
            WindowEvent::MouseInput {
                device_id: device(),
                state: ElementState::Released,
                button: WinitMouseButton::Other(7),
            },
        );
        let InputEvent::PointerButton(button) = released else {
            panic!("expected pointer button");
        };
        assert_eq!(button.position, Point::default());
        assert_eq!(button.button, MouseButton::Other(7));
    }

    #[test]
    fn wheel_carries_current_modifiers() {
        let mut tracker = PointerTracker::default();
        input(
            &mut tracker,
            WindowEvent::ModifiersChanged(ModifiersState::CONTROL.into()),
        );

        let lines = input(
            &mut tracker,
            WindowEvent::MouseWheel {
                device_id: device(),
                delta: MouseScrollDelta::LineDelta(0.0, -1.0),
                phase: TouchPhase::Moved,
            },
        );
        assert_eq!(
            lines,
            InputEvent::Wheel {
                delta: WheelDelta::Lines { x: 0.0, y: -1.0 },
                modifiers: Modifiers {
                    ctrl: true,
                    ..Modifiers::default()
                },
            }
        );

        let pixels = input(
            &mut tracker,
            WindowEvent::MouseWheel {
                device_id: device(),
                delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 30.0)),
                phase: TouchPhase::Moved,
            },
        );
        let InputEvent::Wheel { delta, .. } = pixels else {
            panic!("expected wheel");
        };
        assert_eq!(delta, WheelDelta::Pixels { x: 0.0, y: 15.0 });
    }

    // ── text ──

    #[test]
    fn committed_text_is_forwarded_and_empty_commits_dropped() {
        let mut tracker = PointerTracker::default();

        assert_eq!(
            input(&mut tracker, WindowEvent::Ime(Ime::Commit("é".to_string()))),
            InputEvent::Text("é".to_string())
        );
        assert_eq!(
            translate(HIDPI, &mut tracker, &WindowEvent::Ime(Ime::Commit(String::new()))),
            None
        );
    }

    // ── keys ──

    #[test]
    fn maps_letters_digits_and_function_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)).0, Key::Char('q'));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Digit7)).0, Key::Char('7'));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F11)).0, Key::F(11));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::NumpadEnter)).0, Key::Enter);
    }

    #[test]
    fn unmapped_key_keeps_platform_code() {
        let (key, code) = map_key(PhysicalKey::Code(KeyCode::CapsLock));
        assert_eq!(key, Key::Unknown(KeyCode::CapsLock as u32));
        assert_eq!(code, KeyCode::CapsLock as u32);
    }

    #[test]
    fn modifiers_map_each_flag() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert_eq!(
            m,
            Modifiers {
                shift: true,
                ctrl: false,
                alt: false,
                meta: true,
            }
        );
    }
}
