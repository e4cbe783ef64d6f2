//! Input layer for imbridge.
//!
//! Maps host keyboard, mouse, and controller events onto the GUI library's IO
//! event queue, and reports the cursor and mouse-warp requests the library
//! makes back to the host.

pub mod events;
pub mod input;
pub mod keys;

pub use events::{HostMouseButton, InputEvent, KeyEvent, Modifiers, MouseButtonEvent};
pub use input::{
    apply_deadzone, EventSource, Input, InputFeedback, InputOptions, DEFAULT_JOY_AXIS_DEADZONE,
};
pub use keys::{joy_axis_keys, joy_button_to_gui_key, to_gui_key, HostKey, JoyAxis, JoyButton, KeyLocation};
