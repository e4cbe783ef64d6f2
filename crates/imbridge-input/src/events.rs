//! The host's input event model.
//!
//! Positions are in the client-area coordinates of the window that received
//! the event.

use glam::Vec2;

use crate::keys::{HostKey, JoyAxis, JoyButton, KeyLocation};

/// Modifier keys held when an event was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: HostKey,
    pub location: KeyLocation,
    pub pressed: bool,
    /// True for auto-repeat presses.
    pub echo: bool,
    /// Text produced by the key press, if any.
    pub unicode: Option<char>,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: HostKey, pressed: bool) -> Self {
        Self {
            key,
            location: KeyLocation::Unspecified,
            pressed,
            echo: false,
            unicode: None,
            modifiers: Modifiers::default(),
        }
    }
}

/// Host mouse buttons. Wheel steps arrive as button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostMouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    Xbutton1,
    Xbutton2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    pub button: HostMouseButton,
    pub pressed: bool,
    pub position: Vec2,
    /// Wheel step magnitude; zero when the device does not report one.
    pub factor: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    MouseButton(MouseButtonEvent),
    MouseMotion { position: Vec2, relative: Vec2 },
    /// Trackpad two-finger scroll.
    PanGesture { position: Vec2, delta: Vec2 },
    JoypadButton { button: JoyButton, pressed: bool },
    JoypadMotion { axis: JoyAxis, value: f32 },
    /// The receiving window gained (`true`) or lost keyboard focus.
    WindowFocus(bool),
}

impl InputEvent {
    /// Returns true for events the library treats as mouse input.
    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            Self::MouseButton(_) | Self::MouseMotion { .. } | Self::PanGesture { .. }
        )
    }

    /// Window-local position of mouse events.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            Self::MouseButton(e) => Some(e.position),
            Self::MouseMotion { position, .. } | Self::PanGesture { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}
