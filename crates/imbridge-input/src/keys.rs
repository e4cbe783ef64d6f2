//! Host key codes, controller buttons, and their library equivalents.

use imbridge_core::Key;

/// Host keyboard key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKey {
    Escape,
    Tab,
    Backtab,
    Backspace,
    Enter,
    KpEnter,
    Insert,
    Delete,
    Pause,
    Print,
    Home,
    End,
    Left,
    Up,
    Right,
    Down,
    PageUp,
    PageDown,
    Shift,
    Ctrl,
    Meta,
    Alt,
    CapsLock,
    NumLock,
    ScrollLock,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    KpMultiply,
    KpDivide,
    KpSubtract,
    KpPeriod,
    KpAdd,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    Menu,
    Space,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Semicolon,
    Equal,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    BracketLeft,
    Backslash,
    BracketRight,
    QuoteLeft,
    /// Any key without a library equivalent.
    Unknown,
}

/// Which physical copy of a duplicated key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyLocation {
    #[default]
    Unspecified,
    Left,
    Right,
}

/// Host game-controller buttons, in the host's SDL-style layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyButton {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Misc1,
    Paddle1,
    Paddle2,
    Paddle3,
    Paddle4,
    Touchpad,
}

/// Host game-controller axes. Stick values range over [-1, 1] with +Y down;
/// trigger values range over [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoyAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    TriggerLeft,
    TriggerRight,
}

/// Maps a host key to the library's key, honoring left/right modifier placement.
pub fn to_gui_key(key: HostKey, location: KeyLocation) -> Option<Key> {
    let right = location == KeyLocation::Right;
    Some(match key {
        HostKey::Escape => Key::Escape,
        HostKey::Tab | HostKey::Backtab => Key::Tab,
        HostKey::Backspace => Key::Backspace,
        HostKey::Enter => Key::Enter,
        HostKey::KpEnter => Key::KeypadEnter,
        HostKey::Insert => Key::Insert,
        HostKey::Delete => Key::Delete,
        HostKey::Pause => Key::Pause,
        HostKey::Print => Key::PrintScreen,
        HostKey::Home => Key::Home,
        HostKey::End => Key::End,
        HostKey::Left => Key::LeftArrow,
        HostKey::Up => Key::UpArrow,
        HostKey::Right => Key::RightArrow,
        HostKey::Down => Key::DownArrow,
        HostKey::PageUp => Key::PageUp,
        HostKey::PageDown => Key::PageDown,
        HostKey::Shift if right => Key::RightShift,
        HostKey::Shift => Key::LeftShift,
        HostKey::Ctrl if right => Key::RightCtrl,
        HostKey::Ctrl => Key::LeftCtrl,
        HostKey::Meta if right => Key::RightSuper,
        HostKey::Meta => Key::LeftSuper,
        HostKey::Alt if right => Key::RightAlt,
        HostKey::Alt => Key::LeftAlt,
        HostKey::CapsLock => Key::CapsLock,
        HostKey::NumLock => Key::NumLock,
        HostKey::ScrollLock => Key::ScrollLock,
        HostKey::F1 => Key::F1,
        HostKey::F2 => Key::F2,
        HostKey::F3 => Key::F3,
        HostKey::F4 => Key::F4,
        HostKey::F5 => Key::F5,
        HostKey::F6 => Key::F6,
        HostKey::F7 => Key::F7,
        HostKey::F8 => Key::F8,
        HostKey::F9 => Key::F9,
        HostKey::F10 => Key::F10,
        HostKey::F11 => Key::F11,
        HostKey::F12 => Key::F12,
        HostKey::KpMultiply => Key::KeypadMultiply,
        HostKey::KpDivide => Key::KeypadDivide,
        HostKey::KpSubtract => Key::KeypadSubtract,
        HostKey::KpPeriod => Key::KeypadDecimal,
        HostKey::KpAdd => Key::KeypadAdd,
        HostKey::Kp0 => Key::Keypad0,
        HostKey::Kp1 => Key::Keypad1,
        HostKey::Kp2 => Key::Keypad2,
        HostKey::Kp3 => Key::Keypad3,
        HostKey::Kp4 => Key::Keypad4,
        HostKey::Kp5 => Key::Keypad5,
        HostKey::Kp6 => Key::Keypad6,
        HostKey::Kp7 => Key::Keypad7,
        HostKey::Kp8 => Key::Keypad8,
        HostKey::Kp9 => Key::Keypad9,
        HostKey::Menu => Key::Menu,
        HostKey::Space => Key::Space,
        HostKey::Apostrophe => Key::Apostrophe,
        HostKey::Comma => Key::Comma,
        HostKey::Minus => Key::Minus,
        HostKey::Period => Key::Period,
        HostKey::Slash => Key::Slash,
        HostKey::Key0 => Key::Num0,
        HostKey::Key1 => Key::Num1,
        HostKey::Key2 => Key::Num2,
        HostKey::Key3 => Key::Num3,
        HostKey::Key4 => Key::Num4,
        HostKey::Key5 => Key::Num5,
        HostKey::Key6 => Key::Num6,
        HostKey::Key7 => Key::Num7,
        HostKey::Key8 => Key::Num8,
        HostKey::Key9 => Key::Num9,
        HostKey::Semicolon => Key::Semicolon,
        HostKey::Equal => Key::Equal,
        HostKey::A => Key::A,
        HostKey::B => Key::B,
        HostKey::C => Key::C,
        HostKey::D => Key::D,
        HostKey::E => Key::E,
        HostKey::F => Key::F,
        HostKey::G => Key::G,
        HostKey::H => Key::H,
        HostKey::I => Key::I,
        HostKey::J => Key::J,
        HostKey::K => Key::K,
        HostKey::L => Key::L,
        HostKey::M => Key::M,
        HostKey::N => Key::N,
        HostKey::O => Key::O,
        HostKey::P => Key::P,
        HostKey::Q => Key::Q,
        HostKey::R => Key::R,
        HostKey::S => Key::S,
        HostKey::T => Key::T,
        HostKey::U => Key::U,
        HostKey::V => Key::V,
        HostKey::W => Key::W,
        HostKey::X => Key::X,
        HostKey::Y => Key::Y,
        HostKey::Z => Key::Z,
        HostKey::BracketLeft => Key::LeftBracket,
        HostKey::Backslash => Key::Backslash,
        HostKey::BracketRight => Key::RightBracket,
        HostKey::QuoteLeft => Key::GraveAccent,
        HostKey::Unknown => return None,
    })
}

/// Maps a controller button to the library's gamepad key.
///
/// With `swap_ab`, A and B trade places so the confirm and cancel actions follow
/// the Nintendo-style layout.
pub fn joy_button_to_gui_key(button: JoyButton, swap_ab: bool) -> Option<Key> {
    Some(match button {
        JoyButton::A if swap_ab => Key::GamepadFaceRight,
        JoyButton::A => Key::GamepadFaceDown,
        JoyButton::B if swap_ab => Key::GamepadFaceDown,
        JoyButton::B => Key::GamepadFaceRight,
        JoyButton::X => Key::GamepadFaceLeft,
        JoyButton::Y => Key::GamepadFaceUp,
        JoyButton::Back => Key::GamepadBack,
        JoyButton::Start => Key::GamepadStart,
        JoyButton::LeftStick => Key::GamepadL3,
        JoyButton::RightStick => Key::GamepadR3,
        JoyButton::LeftShoulder => Key::GamepadL1,
        JoyButton::RightShoulder => Key::GamepadR1,
        JoyButton::DpadUp => Key::GamepadDpadUp,
        JoyButton::DpadDown => Key::GamepadDpadDown,
        JoyButton::DpadLeft => Key::GamepadDpadLeft,
        JoyButton::DpadRight => Key::GamepadDpadRight,
        JoyButton::Guide
        | JoyButton::Misc1
        | JoyButton::Paddle1
        | JoyButton::Paddle2
        | JoyButton::Paddle3
        | JoyButton::Paddle4
        | JoyButton::Touchpad => return None,
    })
}

/// The pair of library keys an axis drives: (negative direction, positive direction).
///
/// Triggers only have a positive direction.
pub fn joy_axis_keys(axis: JoyAxis) -> (Option<Key>, Key) {
    match axis {
        JoyAxis::LeftX => (Some(Key::GamepadLStickLeft), Key::GamepadLStickRight),
        JoyAxis::LeftY => (Some(Key::GamepadLStickUp), Key::GamepadLStickDown),
        JoyAxis::RightX => (Some(Key::GamepadRStickLeft), Key::GamepadRStickRight),
        JoyAxis::RightY => (Some(Key::GamepadRStickUp), Key::GamepadRStickDown),
        JoyAxis::TriggerLeft => (None, Key::GamepadL2),
        JoyAxis::TriggerRight => (None, Key::GamepadR2),
    }
}
