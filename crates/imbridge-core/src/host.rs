//! The host engine seam.
//!
//! The host supplies windows, surfaces, a DPI query, capability queries, and the
//! two drawing APIs the renderer variants talk to: a retained 2D canvas
//! ([`CanvasServer`]) and a low-level command-buffer device ([`RenderingDevice`]).
//! Host servers use interior mutability, so every call takes `&self`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Vec2, Vec4};
use thiserror::Error;

use crate::gui::{AtlasImage, MouseCursor};

/// Host window identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Host render-surface identifier (a viewport the host can draw into).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

/// Host texture resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureResource(pub u64);

/// Host canvas item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasItemId(pub u64);

/// Rendering-device resource identifier (buffers, shaders, pipelines, framebuffers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rid(pub u64);

/// Rendering-device draw list identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawListId(pub u64);

/// Display-server name reported by hosts without a display.
pub const HEADLESS_DISPLAY: &str = "headless";

/// Thread-model setting value meaning rendering runs on its own thread.
pub const THREAD_MODEL_MULTI_THREADED: i32 = 2;

/// Failure reported by a host API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A window created by the host for a GUI-library platform window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostWindow {
    pub window: WindowId,
    pub surface: SurfaceId,
}

/// What a new canvas item is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasParent {
    Surface(SurfaceId),
    Item(CanvasItemId),
}

/// Triangle mesh handed to [`CanvasServer::canvas_item_add_triangle_array`].
#[derive(Debug, Clone, Copy)]
pub struct CanvasMesh<'a> {
    pub indices: &'a [i32],
    pub points: &'a [Vec2],
    pub colors: &'a [Vec4],
    pub uvs: &'a [Vec2],
}

/// The host's retained 2D drawing API.
pub trait CanvasServer: Send + Sync {
    fn canvas_item_create(&self, parent: CanvasParent) -> CanvasItemId;
    fn canvas_item_clear(&self, item: CanvasItemId);
    fn canvas_item_set_visible(&self, item: CanvasItemId, visible: bool);
    fn canvas_item_set_draw_index(&self, item: CanvasItemId, index: i32);

    /// Clips the item to `rect` (x, y, width, height), or disables clipping.
    fn canvas_item_set_clip_rect(&self, item: CanvasItemId, rect: Option<Vec4>);

    fn canvas_item_add_triangle_array(
        &self,
        item: CanvasItemId,
        mesh: &CanvasMesh<'_>,
        texture: Option<TextureResource>,
    );

    fn canvas_item_free(&self, item: CanvasItemId);
}

/// GLSL sources for a device shader.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// The host's low-level command-buffer API.
///
/// Calls may come from a dedicated render-submission thread.
pub trait RenderingDevice: Send + Sync {
    fn shader_create(&self, source: &ShaderSource) -> Result<Rid, HostError>;

    /// Creates an alpha-blended triangle pipeline with the given vertex stride.
    fn render_pipeline_create(&self, shader: Rid, vertex_stride: u32) -> Result<Rid, HostError>;

    fn vertex_buffer_create(&self, size_bytes: usize) -> Result<Rid, HostError>;

    /// Creates a buffer of 32-bit indices.
    fn index_buffer_create(&self, index_count: usize) -> Result<Rid, HostError>;

    fn buffer_update(&self, buffer: Rid, offset: usize, data: &[u8]) -> Result<(), HostError>;

    /// Creates a uniform set sampling `texture` for `shader`.
    fn texture_uniform_set_create(
        &self,
        shader: Rid,
        texture: TextureResource,
    ) -> Result<Rid, HostError>;

    /// Framebuffer that renders into `surface`.
    fn surface_framebuffer(&self, surface: SurfaceId) -> Result<Rid, HostError>;

    fn draw_list_begin(&self, framebuffer: Rid) -> Result<DrawListId, HostError>;
    fn draw_list_bind_render_pipeline(&self, list: DrawListId, pipeline: Rid);
    fn draw_list_bind_buffers(&self, list: DrawListId, vertices: Rid, indices: Rid);
    fn draw_list_bind_uniform_set(&self, list: DrawListId, set: Rid);
    fn draw_list_set_push_constant(&self, list: DrawListId, data: &[u8]);

    /// Scissor rectangle as (x, y, width, height) in framebuffer pixels.
    fn draw_list_enable_scissor(&self, list: DrawListId, rect: Vec4);

    fn draw_list_draw_indexed(
        &self,
        list: DrawListId,
        first_index: u32,
        index_count: u32,
        vertex_offset: i32,
    );

    fn draw_list_end(&self, list: DrawListId);
    fn free_rid(&self, rid: Rid);
}

/// Services the host engine provides to the bridge.
pub trait Host {
    /// Name of the active display server; [`HEADLESS_DISPLAY`] without a display.
    fn display_server_name(&self) -> String;

    fn screen_dpi(&self) -> i32;

    /// The configured rendering thread model.
    fn thread_model(&self) -> i32;

    /// Resolves a host-relative path to an absolute filesystem path.
    fn globalize_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|dir| dir.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    }

    /// The retained 2D API, if the host has one.
    fn canvas_server(&self) -> Option<Arc<dyn CanvasServer>>;

    /// The command-buffer device; `None` in compatibility mode.
    fn rendering_device(&self) -> Option<Arc<dyn RenderingDevice>>;

    fn texture_create(&self, image: &AtlasImage) -> TextureResource;
    fn texture_free(&self, texture: TextureResource);

    /// Opens an OS window for a GUI-library platform window.
    fn window_create(&self, position: Vec2, size: Vec2) -> Result<HostWindow, HostError>;
    fn window_close(&self, window: WindowId);

    /// Screen position of the window's client area.
    fn window_position(&self, window: WindowId) -> Vec2;

    fn set_mouse_cursor(&self, cursor: MouseCursor);
    fn warp_mouse(&self, position: Vec2);
}

/// Returns true when the host runs without a display.
pub fn is_headless(host: &dyn Host) -> bool {
    host.display_server_name() == HEADLESS_DISPLAY
}
