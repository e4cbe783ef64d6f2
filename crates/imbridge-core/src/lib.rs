//! Core abstractions for imbridge.
//!
//! This crate provides the fundamental types shared by the bridge crates:
//! - [`GuiContext`] / [`GuiLibrary`], the seam to the immediate-mode GUI library
//! - [`Host`], [`CanvasServer`] and [`RenderingDevice`], the seam to the host engine
//! - [`Config`], the configuration supplied at init
//! - the texture binding table, the viewport registry, the font list, and scale/DPI state

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Module-prefixed names read better at use sites
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fonts;
pub mod gui;
pub mod host;
pub mod scale;
pub mod texture;
pub mod viewport;

pub use config::{Config, FontData, FontSpec, RendererKind, MIN_SCALE};
pub use error::{check_pointer_width, BridgeError, Result};
pub use fonts::{FontEntry, Fonts, DEFAULT_FONT_SIZE};
pub use gui::{
    AtlasImage, BackendFlags, ConfigFlags, DrawCmd, DrawData, DrawList, DrawVert, FontAtlas,
    FontSource, GuiContext, GuiLibrary, Io, IoEvent, Key, MouseButton, MouseCursor,
    PlatformRequest, TextureId, ViewportId,
};
pub use host::{
    is_headless, CanvasItemId, CanvasMesh, CanvasParent, CanvasServer, DrawListId, Host,
    HostError, HostWindow, RenderingDevice, Rid, ShaderSource, SurfaceId, TextureResource,
    WindowId, HEADLESS_DISPLAY, THREAD_MODEL_MULTI_THREADED,
};
pub use scale::{dpi_factor_for, ScaleState};
pub use texture::TextureBindings;
pub use viewport::ViewportRegistry;

// Re-export glam types for convenience
pub use glam::{Vec2, Vec4};
