//! imbridge: runs an immediate-mode GUI library inside a host engine's frame loop.
//!
//! The bridge owns one GUI context and one renderer. It forwards host input to
//! the library, draws the library's output through whichever rendering path the
//! host supports, and manages font atlases and texture handles across
//! reinitialization.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use imbridge::*;
//!
//! fn run(host: Arc<dyn Host>, library: Box<dyn GuiLibrary>, main: HostWindow) -> Result<()> {
//!     let mut bridge = GuiBridge::new(host, library);
//!     bridge.init(main, &Config::default())?;
//!
//!     // Once per host frame:
//!     bridge.update(1.0 / 60.0, Vec2::new(1280.0, 720.0))?;
//!     // ... build widgets through the library ...
//!     bridge.render()?;
//!
//!     bridge.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Renderers
//!
//! - `Dummy` draws nothing. It is forced on headless hosts.
//! - `Canvas` uses the host's retained 2D canvas.
//! - `Gpu` uses the host's command-buffer device, submitting from a dedicated
//!   thread when the host renders multi-threaded. Without a device it is
//!   downgraded to `Canvas`.

mod state;

use std::sync::Arc;

// Re-export core types
pub use imbridge_core::{
    dpi_factor_for, BridgeError, Config, FontData, FontSpec, GuiContext, GuiLibrary, Host,
    HostWindow, Key, RendererKind, Result, SurfaceId, TextureId, TextureResource, Vec2, Vec4,
    WindowId, MIN_SCALE,
};

// Re-export input types
pub use imbridge_input::{
    HostKey, HostMouseButton, InputEvent, JoyAxis, JoyButton, KeyEvent, KeyLocation, Modifiers,
    MouseButtonEvent, DEFAULT_JOY_AXIS_DEADZONE,
};

// Re-export render types
pub use imbridge_render::{Fallback, RendererFactory, RendererVariant};

pub use state::{Lifecycle, State, BACKEND_PLATFORM_NAME};

/// The public entry point: a thin layer over [`State`].
pub struct GuiBridge {
    state: State,
}

impl GuiBridge {
    /// Creates an uninitialized bridge. Logging is set up if nothing else has.
    pub fn new(host: Arc<dyn Host>, library: Box<dyn GuiLibrary>) -> Self {
        let _ = env_logger::try_init();
        Self {
            state: State::new(host, library),
        }
    }

    /// Creates a GUI context rendering into `main`.
    ///
    /// Calling this again replaces the live context.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-64-bit process, for an invalid configuration,
    /// or when the font atlas cannot be built.
    pub fn init(&mut self, main: HostWindow, config: &Config) -> Result<()> {
        self.state.init(main, config)
    }

    /// Opens a frame. Build widgets after this and call [`GuiBridge::render`].
    pub fn update(&mut self, delta: f32, display_size: Vec2) -> Result<()> {
        self.state.update(delta, display_size)
    }

    /// Finalizes and draws the open frame.
    pub fn render(&mut self) -> Result<()> {
        self.state.render()
    }

    /// Releases the context and renderer. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.state.shutdown();
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Forwards a host input event. Returns true if the GUI consumed it.
    pub fn process_input(&mut self, event: &InputEvent, window: WindowId) -> bool {
        self.state.process_input(event, window)
    }

    /// Asks the GUI to close the platform window shown in `window`.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        self.state.close_window(window)
    }

    pub fn bind_texture(&mut self, texture: TextureResource) -> TextureId {
        self.state.bind_texture(texture)
    }

    pub fn unbind_texture(&mut self, id: TextureId) {
        self.state.unbind_texture(id);
    }

    pub fn unbind_texture_resource(&mut self, texture: TextureResource) {
        self.state.unbind_texture_resource(texture);
    }

    /// Queues a font for the next [`GuiBridge::rebuild_font_atlas`].
    pub fn add_font(&mut self, data: impl Into<Arc<[u8]>>, size: i32, merge: bool) {
        self.state.add_font(data.into(), size, merge);
    }

    pub fn add_font_default(&mut self) {
        self.state.add_font_default();
    }

    /// Rasterizes every queued font. Expensive; never call it mid-frame.
    pub fn rebuild_font_atlas(&mut self) -> Result<()> {
        self.state.rebuild_font_atlas()
    }

    /// Rescales the style and optionally clears the queued fonts.
    pub fn reset_font_config(&mut self, reset_list: bool) -> Result<()> {
        self.state.reset_font_config(reset_list)
    }

    pub fn scale(&self) -> f32 {
        self.state.scale().base()
    }

    /// Sets the base scale and rebuilds the font atlas.
    ///
    /// Values below [`MIN_SCALE`] and unchanged values are ignored and return
    /// `Ok(false)`.
    pub fn set_scale(&mut self, value: f32) -> Result<bool> {
        self.state.set_scale(value)
    }

    pub fn scale_to_dpi(&self) -> bool {
        self.state.scale().scale_to_dpi()
    }

    pub fn set_scale_to_dpi(&mut self, enabled: bool) {
        self.state.set_scale_to_dpi(enabled);
    }

    /// Pixels per point of the screen, cached after the first query.
    pub fn dpi_factor(&mut self) -> i32 {
        self.state.dpi_factor()
    }

    pub fn recompute_dpi_factor(&mut self) -> i32 {
        self.state.recompute_dpi_factor()
    }

    pub fn effective_scale(&mut self) -> f32 {
        self.state.effective_scale()
    }

    pub fn joy_axis_deadzone(&self) -> f32 {
        self.state.input_options().joy_axis_deadzone
    }

    pub fn set_joy_axis_deadzone(&mut self, deadzone: f32) {
        self.state.input_options_mut().joy_axis_deadzone = deadzone;
    }

    pub fn joy_button_swap_ab(&self) -> bool {
        self.state.input_options().joy_button_swap_ab
    }

    pub fn set_joy_button_swap_ab(&mut self, swap: bool) {
        self.state.input_options_mut().joy_button_swap_ab = swap;
    }

    /// Shows or hides the GUI. While hidden, frames are built but not drawn.
    pub fn set_visible(&mut self, visible: bool) {
        self.state.set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    /// Name of the active renderer.
    pub fn renderer_name(&self) -> Option<&'static str> {
        self.state.renderer_name()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

/// Maps a host key to the GUI library's key.
pub fn to_gui_key(key: HostKey) -> Option<Key> {
    imbridge_input::to_gui_key(key, KeyLocation::Unspecified)
}

/// Maps a controller button to the GUI library's gamepad key, without A/B swapping.
pub fn joy_button_to_gui_key(button: JoyButton) -> Option<Key> {
    imbridge_input::joy_button_to_gui_key(button, false)
}
