//! Translation of host input into library IO events.

use glam::Vec2;
use imbridge_core::{Io, Key, MouseButton, MouseCursor, ViewportId};

use crate::events::{HostMouseButton, InputEvent, KeyEvent, Modifiers, MouseButtonEvent};
use crate::keys::{joy_axis_keys, joy_button_to_gui_key, to_gui_key, JoyAxis};

/// Default deadzone applied to every controller axis.
pub const DEFAULT_JOY_AXIS_DEADZONE: f32 = 0.15;

/// User-adjustable translation settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputOptions {
    /// Axis values with a magnitude below this are reported as zero.
    pub joy_axis_deadzone: f32,
    /// Swap the confirm (face down) and cancel (face right) buttons.
    pub joy_button_swap_ab: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            joy_axis_deadzone: DEFAULT_JOY_AXIS_DEADZONE,
            joy_button_swap_ab: false,
        }
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EventSource {
    /// Viewport of the window that received the event, when registered.
    pub viewport: Option<ViewportId>,
    /// Screen position of that window's client area.
    pub window_position: Vec2,
}

/// Requests for the host produced by [`Input::update`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFeedback {
    /// New cursor shape, when it changed since the last update.
    pub cursor: Option<MouseCursor>,
    /// Position the library wants the OS cursor moved to.
    pub warp: Option<Vec2>,
}

/// Zeroes axis values inside the deadzone.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

/// Stateful translator between host input and the library IO.
#[derive(Debug, Default)]
pub struct Input {
    pub options: InputOptions,
    cursor: Option<MouseCursor>,
}

impl Input {
    pub fn new(options: InputOptions) -> Self {
        Self {
            options,
            cursor: None,
        }
    }

    /// Reads per-frame output state from the library ahead of a new frame.
    pub fn update(&mut self, io: &Io) -> InputFeedback {
        let cursor = if io.mouse_draw_cursor {
            MouseCursor::None
        } else {
            io.mouse_cursor
        };
        let changed = self.cursor != Some(cursor);
        self.cursor = Some(cursor);
        InputFeedback {
            cursor: changed.then_some(cursor),
            warp: io.want_set_mouse_pos.then_some(io.mouse_pos),
        }
    }

    /// Forgets the last reported cursor so the next update reports it again.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Forwards one host event to the library.
    ///
    /// Returns true if the library wants this kind of input right now, in
    /// which case the host should not handle the event itself.
    pub fn process_input(&self, event: &InputEvent, source: &EventSource, io: &mut Io) -> bool {
        let consumed = if event.is_mouse() {
            io.want_capture_mouse
        } else {
            io.want_capture_keyboard
        };

        if event.is_mouse() {
            if let Some(viewport) = source.viewport {
                io.add_mouse_viewport_event(viewport);
            }
        }

        match *event {
            InputEvent::Key(ref key) => Self::key(key, io),
            InputEvent::MouseButton(ref button) => {
                io.add_mouse_pos_event(Self::mouse_pos(button.position, source, io));
                Self::mouse_button(button, io);
            }
            InputEvent::MouseMotion { position, .. } => {
                io.add_mouse_pos_event(Self::mouse_pos(position, source, io));
            }
            InputEvent::PanGesture { position, delta } => {
                io.add_mouse_pos_event(Self::mouse_pos(position, source, io));
                io.add_mouse_wheel_event(Vec2::new(-delta.x, -delta.y));
            }
            InputEvent::JoypadButton { button, pressed } => {
                if let Some(key) = joy_button_to_gui_key(button, self.options.joy_button_swap_ab) {
                    io.add_key_event(key, pressed);
                }
            }
            InputEvent::JoypadMotion { axis, value } => self.joy_axis(axis, value, io),
            InputEvent::WindowFocus(focused) => io.add_focus_event(focused),
        }

        consumed
    }

    /// Positions are screen-space once platform windows are enabled.
    fn mouse_pos(local: Vec2, source: &EventSource, io: &Io) -> Vec2 {
        if io.config_flags.viewports_enable {
            source.window_position + local
        } else {
            local
        }
    }

    fn key(event: &KeyEvent, io: &mut Io) {
        Self::modifiers(event.modifiers, io);
        if !event.echo {
            match to_gui_key(event.key, event.location) {
                Some(key) => io.add_key_event(key, event.pressed),
                None => log::trace!("no GUI key for {:?}", event.key),
            }
        }
        if event.pressed {
            if let Some(c) = event.unicode.filter(|c| !c.is_control()) {
                io.add_input_character(c);
            }
        }
    }

    fn modifiers(mods: Modifiers, io: &mut Io) {
        io.add_key_event(Key::ModCtrl, mods.ctrl);
        io.add_key_event(Key::ModShift, mods.shift);
        io.add_key_event(Key::ModAlt, mods.alt);
        io.add_key_event(Key::ModSuper, mods.meta);
    }

    fn mouse_button(event: &MouseButtonEvent, io: &mut Io) {
        let step = if event.factor > 0.0 { event.factor } else { 1.0 };
        let button = match event.button {
            HostMouseButton::Left => MouseButton::Left,
            HostMouseButton::Right => MouseButton::Right,
            HostMouseButton::Middle => MouseButton::Middle,
            HostMouseButton::Xbutton1 => MouseButton::Extra1,
            HostMouseButton::Xbutton2 => MouseButton::Extra2,
            wheel => {
                if event.pressed {
                    let delta = match wheel {
                        HostMouseButton::WheelUp => Vec2::new(0.0, step),
                        HostMouseButton::WheelDown => Vec2::new(0.0, -step),
                        HostMouseButton::WheelLeft => Vec2::new(step, 0.0),
                        _ => Vec2::new(-step, 0.0),
                    };
                    io.add_mouse_wheel_event(delta);
                }
                return;
            }
        };
        io.add_mouse_button_event(button, event.pressed);
    }

    fn joy_axis(&self, axis: JoyAxis, value: f32, io: &mut Io) {
        let value = apply_deadzone(value, self.options.joy_axis_deadzone);
        let (negative, positive) = joy_axis_keys(axis);
        if let Some(negative) = negative {
            io.add_key_analog_event(negative, value < 0.0, (-value).max(0.0));
        }
        io.add_key_analog_event(positive, value > 0.0, value.max(0.0));
    }
}
