//! The immediate-mode GUI library seam.
//!
//! The widget/layout library is an external collaborator. The bridge talks to it
//! through [`GuiLibrary`] and [`GuiContext`]: it writes IO state and input events
//! into an [`Io`] block, asks the library to open and finalize frames, and reads
//! back renderer-agnostic [`DrawData`].

use std::path::PathBuf;

use glam::{Vec2, Vec4};

use crate::error::Result;

/// Opaque texture handle stored in draw commands.
///
/// `TextureId(0)` is the null texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TextureId(pub u64);

impl TextureId {
    /// The null texture handle.
    pub const NULL: Self = Self(0);

    /// Returns true for the null handle.
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Identifier of a GUI-library viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewportId(pub u32);

impl ViewportId {
    /// The main viewport, always present.
    pub const MAIN: Self = Self(0);
}

/// The library's key enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftSuper,
    RightCtrl,
    RightShift,
    RightAlt,
    RightSuper,
    Menu,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
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
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,
    LeftBracket,
    Backslash,
    RightBracket,
    GraveAccent,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadDecimal,
    KeypadDivide,
    KeypadMultiply,
    KeypadSubtract,
    KeypadAdd,
    KeypadEnter,
    KeypadEqual,
    GamepadStart,
    GamepadBack,
    GamepadFaceLeft,
    GamepadFaceRight,
    GamepadFaceUp,
    GamepadFaceDown,
    GamepadDpadLeft,
    GamepadDpadRight,
    GamepadDpadUp,
    GamepadDpadDown,
    GamepadL1,
    GamepadR1,
    GamepadL2,
    GamepadR2,
    GamepadL3,
    GamepadR3,
    GamepadLStickLeft,
    GamepadLStickRight,
    GamepadLStickUp,
    GamepadLStickDown,
    GamepadRStickLeft,
    GamepadRStickRight,
    GamepadRStickUp,
    GamepadRStickDown,
    ModCtrl,
    ModShift,
    ModAlt,
    ModSuper,
}

/// Mouse buttons known to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Extra1,
    Extra2,
}

/// Cursor shapes the library may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseCursor {
    /// The library asks for the cursor to be hidden.
    None,
    #[default]
    Arrow,
    TextInput,
    ResizeAll,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
    Hand,
    NotAllowed,
}

/// Capabilities the backend advertises to the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct BackendFlags {
    pub has_gamepad: bool,
    pub has_set_mouse_pos: bool,
    pub has_mouse_cursors: bool,
    pub renderer_has_vtx_offset: bool,
    pub renderer_has_viewports: bool,
    pub platform_has_viewports: bool,
}

impl BackendFlags {
    /// The full set of capabilities this bridge implements.
    #[must_use]
    pub fn bridge() -> Self {
        Self {
            has_gamepad: true,
            has_set_mouse_pos: true,
            has_mouse_cursors: true,
            renderer_has_vtx_offset: true,
            renderer_has_viewports: true,
            platform_has_viewports: true,
        }
    }
}

/// User-facing feature switches of the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigFlags {
    pub nav_enable_keyboard: bool,
    pub nav_enable_gamepad: bool,
    pub viewports_enable: bool,
}

/// A queued input event, consumed by the library at the next `new_frame`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IoEvent {
    Key { key: Key, down: bool },
    KeyAnalog { key: Key, down: bool, value: f32 },
    Char(char),
    MousePos(Vec2),
    MouseButton { button: MouseButton, down: bool },
    MouseWheel(Vec2),
    MouseViewport(ViewportId),
    Focus(bool),
    ViewportClose(ViewportId),
}

/// IO state shared between the bridge and the library.
#[derive(Debug, Clone, Default)]
pub struct Io {
    pub display_size: Vec2,
    pub delta_time: f32,
    pub backend_flags: BackendFlags,
    pub config_flags: ConfigFlags,
    /// Layout persistence file. `None` disables persistence.
    pub ini_filename: Option<PathBuf>,
    pub backend_platform_name: String,
    pub backend_renderer_name: String,
    /// Set by the library when it wants mouse input.
    pub want_capture_mouse: bool,
    /// Set by the library when it wants keyboard input.
    pub want_capture_keyboard: bool,
    /// Set by the library when it wants the OS cursor moved to `mouse_pos`.
    pub want_set_mouse_pos: bool,
    pub mouse_pos: Vec2,
    /// Cursor shape requested by the library for this frame.
    pub mouse_cursor: MouseCursor,
    pub mouse_draw_cursor: bool,
    events: Vec<IoEvent>,
}

impl Io {
    /// Queues a key press or release.
    pub fn add_key_event(&mut self, key: Key, down: bool) {
        self.events.push(IoEvent::Key { key, down });
    }

    /// Queues an analog key value (gamepad sticks and triggers).
    pub fn add_key_analog_event(&mut self, key: Key, down: bool, value: f32) {
        self.events.push(IoEvent::KeyAnalog { key, down, value });
    }

    /// Queues a text character.
    pub fn add_input_character(&mut self, c: char) {
        self.events.push(IoEvent::Char(c));
    }

    pub fn add_mouse_pos_event(&mut self, pos: Vec2) {
        self.events.push(IoEvent::MousePos(pos));
    }

    pub fn add_mouse_button_event(&mut self, button: MouseButton, down: bool) {
        self.events.push(IoEvent::MouseButton { button, down });
    }

    pub fn add_mouse_wheel_event(&mut self, wheel: Vec2) {
        self.events.push(IoEvent::MouseWheel(wheel));
    }

    pub fn add_mouse_viewport_event(&mut self, viewport: ViewportId) {
        self.events.push(IoEvent::MouseViewport(viewport));
    }

    pub fn add_focus_event(&mut self, focused: bool) {
        self.events.push(IoEvent::Focus(focused));
    }

    /// Asks the library to close a platform window it owns.
    pub fn add_viewport_close_event(&mut self, viewport: ViewportId) {
        self.events.push(IoEvent::ViewportClose(viewport));
    }

    /// Events queued since the last drain.
    #[must_use]
    pub fn pending_events(&self) -> &[IoEvent] {
        &self.events
    }

    /// Removes and returns all queued events.
    pub fn take_events(&mut self) -> Vec<IoEvent> {
        std::mem::take(&mut self.events)
    }
}

/// One vertex of library output.
///
/// `col` is packed RGBA with red in the lowest byte.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub col: u32,
}

impl DrawVert {
    /// Unpacks the vertex color into normalized RGBA.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        unpack_color(self.col)
    }
}

/// Unpacks a library color (red in the lowest byte) into normalized RGBA.
#[must_use]
pub fn unpack_color(col: u32) -> Vec4 {
    let [r, g, b, a] = col.to_le_bytes();
    Vec4::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    )
}

/// A single draw call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawCmd {
    /// Clip rectangle as (min x, min y, max x, max y) in display coordinates.
    pub clip_rect: Vec4,
    pub texture_id: TextureId,
    /// Offset added to every index of this command.
    pub vtx_offset: u32,
    /// First index of this command in the list's index buffer.
    pub idx_offset: u32,
    pub elem_count: u32,
}

/// Vertex, index, and command buffers of one library draw list.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vtx_buffer: Vec<DrawVert>,
    pub idx_buffer: Vec<u16>,
    pub commands: Vec<DrawCmd>,
}

/// The finalized draw data of one viewport.
#[derive(Debug, Clone, Default)]
pub struct DrawData {
    pub viewport: ViewportId,
    pub display_pos: Vec2,
    pub display_size: Vec2,
    pub framebuffer_scale: Vec2,
    pub lists: Vec<DrawList>,
}

impl DrawData {
    #[must_use]
    pub fn total_vtx_count(&self) -> usize {
        self.lists.iter().map(|l| l.vtx_buffer.len()).sum()
    }

    #[must_use]
    pub fn total_idx_count(&self) -> usize {
        self.lists.iter().map(|l| l.idx_buffer.len()).sum()
    }

    /// Returns true if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|l| l.commands.is_empty())
    }
}

/// Where the atlas takes a font's glyphs from.
#[derive(Debug, Clone, Copy)]
pub enum FontSource<'a> {
    /// Raw font file bytes. Parsing happens inside the library.
    Ttf(&'a [u8]),
    /// The library's built-in font.
    Default,
}

/// Rasterized atlas pixels, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// The library's font atlas.
pub trait FontAtlas {
    /// Removes every font and the rasterized texture.
    fn clear(&mut self);

    /// Queues a font. With `merge` the glyphs are merged into the previous font.
    fn add_font(&mut self, source: FontSource<'_>, size_pixels: f32, merge: bool);

    /// Rasterizes all queued fonts.
    fn build(&mut self) -> Result<AtlasImage>;

    /// Records the texture handle the atlas is drawn with.
    fn set_texture_id(&mut self, id: TextureId);
}

/// A platform-window change requested by the library during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformRequest {
    /// The library opened a new platform window.
    Create {
        viewport: ViewportId,
        position: Vec2,
        size: Vec2,
    },
    /// The library closed a platform window.
    Destroy { viewport: ViewportId },
}

/// A live library context.
///
/// Implementations own the library's IO, font atlas, and per-frame draw data.
/// Dropping the context destroys it.
pub trait GuiContext {
    fn io(&self) -> &Io;
    fn io_mut(&mut self) -> &mut Io;
    fn fonts(&mut self) -> &mut dyn FontAtlas;

    /// Resets the style and scales every size in it by `scale`.
    fn scale_style(&mut self, scale: f32);

    /// Opens a new frame, consuming queued IO events.
    fn new_frame(&mut self);

    /// Finalizes the frame's draw data.
    fn render(&mut self);

    /// Draw data of the last finalized frame, main viewport first.
    fn draw_data(&self) -> &[DrawData];

    /// Updates platform windows and returns the changes made this frame.
    fn update_platform_windows(&mut self) -> Vec<PlatformRequest>;
}

/// Factory for library contexts.
pub trait GuiLibrary {
    fn create_context(&mut self) -> Box<dyn GuiContext>;
}
