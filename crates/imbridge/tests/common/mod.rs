//! Mock host and GUI library shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use imbridge::{Config, GuiBridge, HostWindow, RendererKind, SurfaceId, WindowId};
use imbridge_core::{
    AtlasImage, CanvasItemId, CanvasMesh, CanvasParent, CanvasServer, DrawCmd, DrawData,
    DrawList, DrawListId, DrawVert, FontAtlas, FontSource, GuiContext, GuiLibrary, Host,
    HostError, Io, MouseCursor, PlatformRequest, RenderingDevice, Result, Rid, ShaderSource,
    TextureId, TextureResource, Vec2, Vec4, ViewportId, HEADLESS_DISPLAY,
};

pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub const MAIN: HostWindow = HostWindow {
    window: WindowId(1),
    surface: SurfaceId(100),
};

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HostLog {
    pub textures_created: Vec<TextureResource>,
    pub textures_freed: Vec<TextureResource>,
    pub windows_created: Vec<HostWindow>,
    pub windows_closed: Vec<WindowId>,
    pub cursors: Vec<MouseCursor>,
    pub warps: Vec<Vec2>,
    pub dpi_queries: usize,
    pub canvas_items_live: usize,
    pub draws: usize,
}

pub struct MockHost {
    pub headless: bool,
    pub dpi: Mutex<i32>,
    pub thread_model: i32,
    pub has_canvas: bool,
    pub device: Option<Arc<MockDevice>>,
    pub log: Arc<Mutex<HostLog>>,
    pub next: AtomicU64,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            headless: false,
            dpi: Mutex::new(96),
            thread_model: 1,
            has_canvas: true,
            device: Some(Arc::new(MockDevice::default())),
            log: Arc::default(),
            next: AtomicU64::new(1000),
        }
    }
}

impl MockHost {
    pub fn headless() -> Self {
        Self {
            headless: true,
            ..Self::default()
        }
    }

    pub fn log(&self) -> MutexGuard<'_, HostLog> {
        lock(&self.log)
    }

    fn id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Host for MockHost {
    fn display_server_name(&self) -> String {
        if self.headless {
            HEADLESS_DISPLAY.to_string()
        } else {
            "mock".to_string()
        }
    }

    fn screen_dpi(&self) -> i32 {
        self.log().dpi_queries += 1;
        *lock(&self.dpi)
    }

    fn thread_model(&self) -> i32 {
        self.thread_model
    }

    fn globalize_path(&self, path: &str) -> PathBuf {
        PathBuf::from("/project").join(path.trim_start_matches("user://"))
    }

    fn canvas_server(&self) -> Option<Arc<dyn CanvasServer>> {
        self.has_canvas.then(|| {
            Arc::new(MockCanvas {
                log: Arc::clone(&self.log),
                next: AtomicU64::new(1),
            }) as Arc<dyn CanvasServer>
        })
    }

    fn rendering_device(&self) -> Option<Arc<dyn RenderingDevice>> {
        self.device
            .as_ref()
            .map(|d| Arc::clone(d) as Arc<dyn RenderingDevice>)
    }

    fn texture_create(&self, _image: &AtlasImage) -> TextureResource {
        let texture = TextureResource(self.id());
        self.log().textures_created.push(texture);
        texture
    }

    fn texture_free(&self, texture: TextureResource) {
        self.log().textures_freed.push(texture);
    }

    fn window_create(&self, _position: Vec2, _size: Vec2) -> std::result::Result<HostWindow, HostError> {
        let window = HostWindow {
            window: WindowId(self.id()),
            surface: SurfaceId(self.id()),
        };
        self.log().windows_created.push(window);
        Ok(window)
    }

    fn window_close(&self, window: WindowId) {
        self.log().windows_closed.push(window);
    }

    fn window_position(&self, window: WindowId) -> Vec2 {
        if window == MAIN.window {
            Vec2::ZERO
        } else {
            Vec2::new(500.0, 300.0)
        }
    }

    fn set_mouse_cursor(&self, cursor: MouseCursor) {
        self.log().cursors.push(cursor);
    }

    fn warp_mouse(&self, position: Vec2) {
        self.log().warps.push(position);
    }
}

pub struct MockCanvas {
    log: Arc<Mutex<HostLog>>,
    next: AtomicU64,
}

impl CanvasServer for MockCanvas {
    fn canvas_item_create(&self, _parent: CanvasParent) -> CanvasItemId {
        lock(&self.log).canvas_items_live += 1;
        CanvasItemId(self.next.fetch_add(1, Ordering::SeqCst))
    }

    fn canvas_item_clear(&self, _item: CanvasItemId) {}

    fn canvas_item_set_visible(&self, _item: CanvasItemId, _visible: bool) {}

    fn canvas_item_set_draw_index(&self, _item: CanvasItemId, _index: i32) {}

    fn canvas_item_set_clip_rect(&self, _item: CanvasItemId, _rect: Option<Vec4>) {}

    fn canvas_item_add_triangle_array(
        &self,
        _item: CanvasItemId,
        _mesh: &CanvasMesh<'_>,
        _texture: Option<TextureResource>,
    ) {
        lock(&self.log).draws += 1;
    }

    fn canvas_item_free(&self, _item: CanvasItemId) {
        lock(&self.log).canvas_items_live -= 1;
    }
}

/// Command-buffer device; `fail_shader` makes GPU renderer construction fail.
#[derive(Default)]
pub struct MockDevice {
    pub fail_shader: bool,
    next: AtomicU64,
    pub draws: AtomicU64,
}

impl MockDevice {
    pub fn failing() -> Self {
        Self {
            fail_shader: true,
            ..Self::default()
        }
    }

    fn rid(&self) -> Rid {
        Rid(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

impl RenderingDevice for MockDevice {
    fn shader_create(&self, _source: &ShaderSource) -> std::result::Result<Rid, HostError> {
        if self.fail_shader {
            return Err(HostError::new("SPIR-V compilation failed"));
        }
        Ok(self.rid())
    }

    fn render_pipeline_create(&self, _shader: Rid, _stride: u32) -> std::result::Result<Rid, HostError> {
        Ok(self.rid())
    }

    fn vertex_buffer_create(&self, _size_bytes: usize) -> std::result::Result<Rid, HostError> {
        Ok(self.rid())
    }

    fn index_buffer_create(&self, _index_count: usize) -> std::result::Result<Rid, HostError> {
        Ok(self.rid())
    }

    fn buffer_update(&self, _buffer: Rid, _offset: usize, _data: &[u8]) -> std::result::Result<(), HostError> {
        Ok(())
    }

    fn texture_uniform_set_create(
        &self,
        _shader: Rid,
        _texture: TextureResource,
    ) -> std::result::Result<Rid, HostError> {
        Ok(self.rid())
    }

    fn surface_framebuffer(&self, surface: SurfaceId) -> std::result::Result<Rid, HostError> {
        Ok(Rid(surface.0))
    }

    fn draw_list_begin(&self, _framebuffer: Rid) -> std::result::Result<DrawListId, HostError> {
        Ok(DrawListId(self.next.fetch_add(1, Ordering::SeqCst)))
    }

    fn draw_list_bind_render_pipeline(&self, _list: DrawListId, _pipeline: Rid) {}

    fn draw_list_bind_buffers(&self, _list: DrawListId, _vertices: Rid, _indices: Rid) {}

    fn draw_list_bind_uniform_set(&self, _list: DrawListId, _set: Rid) {}

    fn draw_list_set_push_constant(&self, _list: DrawListId, _data: &[u8]) {}

    fn draw_list_enable_scissor(&self, _list: DrawListId, _rect: Vec4) {}

    fn draw_list_draw_indexed(&self, _list: DrawListId, _first: u32, _count: u32, _offset: i32) {
        self.draws.fetch_add(1, Ordering::SeqCst);
    }

    fn draw_list_end(&self, _list: DrawListId) {}

    fn free_rid(&self, _rid: Rid) {}
}

// ---------------------------------------------------------------------------
// GUI library
// ---------------------------------------------------------------------------

/// A font the atlas received.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasFont {
    /// First byte of the font data; `None` for the built-in font.
    pub tag: Option<u8>,
    pub size: f32,
    pub merge: bool,
}

#[derive(Debug, Default)]
pub struct LibraryLog {
    pub contexts_created: usize,
    pub contexts_dropped: usize,
    pub fonts: Vec<AtlasFont>,
    pub builds: usize,
    pub atlas_texture: Option<TextureId>,
    pub style_scales: Vec<f32>,
    pub new_frames: usize,
    pub renders: usize,
    /// Events drained by the last `new_frame`.
    pub last_events: Vec<imbridge_core::IoEvent>,
    /// Platform requests returned by the next `update_platform_windows`.
    pub platform_requests: Vec<PlatformRequest>,
    /// Whether the next contexts draw a textured quad.
    pub draw_quad: bool,
}

#[derive(Clone, Default)]
pub struct MockLibrary {
    pub log: Arc<Mutex<LibraryLog>>,
}

impl MockLibrary {
    pub fn log(&self) -> MutexGuard<'_, LibraryLog> {
        lock(&self.log)
    }
}

impl GuiLibrary for MockLibrary {
    fn create_context(&mut self) -> Box<dyn GuiContext> {
        self.log().contexts_created += 1;
        Box::new(MockContext {
            io: Io::default(),
            atlas: MockAtlas {
                log: Arc::clone(&self.log),
            },
            draw_data: Vec::new(),
            log: Arc::clone(&self.log),
        })
    }
}

pub struct MockAtlas {
    log: Arc<Mutex<LibraryLog>>,
}

impl FontAtlas for MockAtlas {
    fn clear(&mut self) {
        lock(&self.log).fonts.clear();
    }

    fn add_font(&mut self, source: FontSource<'_>, size_pixels: f32, merge: bool) {
        let tag = match source {
            FontSource::Ttf(bytes) => bytes.first().copied(),
            FontSource::Default => None,
        };
        lock(&self.log).fonts.push(AtlasFont {
            tag,
            size: size_pixels,
            merge,
        });
    }

    fn build(&mut self) -> Result<AtlasImage> {
        lock(&self.log).builds += 1;
        Ok(AtlasImage {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        })
    }

    fn set_texture_id(&mut self, id: TextureId) {
        lock(&self.log).atlas_texture = Some(id);
    }
}

pub struct MockContext {
    io: Io,
    atlas: MockAtlas,
    draw_data: Vec<DrawData>,
    log: Arc<Mutex<LibraryLog>>,
}

impl GuiContext for MockContext {
    fn io(&self) -> &Io {
        &self.io
    }

    fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    fn fonts(&mut self) -> &mut dyn FontAtlas {
        &mut self.atlas
    }

    fn scale_style(&mut self, scale: f32) {
        lock(&self.log).style_scales.push(scale);
    }

    fn new_frame(&mut self) {
        let events = self.io.take_events();
        let mut log = lock(&self.log);
        log.new_frames += 1;
        log.last_events = events;
    }

    fn render(&mut self) {
        let mut log = lock(&self.log);
        log.renders += 1;
        self.draw_data.clear();
        if log.draw_quad {
            self.draw_data.push(quad(log.atlas_texture.unwrap_or(TextureId::NULL)));
        }
    }

    fn draw_data(&self) -> &[DrawData] {
        &self.draw_data
    }

    fn update_platform_windows(&mut self) -> Vec<PlatformRequest> {
        std::mem::take(&mut lock(&self.log).platform_requests)
    }
}

impl Drop for MockContext {
    fn drop(&mut self) {
        lock(&self.log).contexts_dropped += 1;
    }
}

fn quad(texture_id: TextureId) -> DrawData {
    let vert = |x: f32, y: f32| DrawVert {
        pos: [x, y],
        uv: [0.0, 0.0],
        col: u32::MAX,
    };
    DrawData {
        viewport: ViewportId::MAIN,
        display_pos: Vec2::ZERO,
        display_size: Vec2::new(64.0, 64.0),
        framebuffer_scale: Vec2::ONE,
        lists: vec![DrawList {
            vtx_buffer: vec![vert(0.0, 0.0), vert(8.0, 0.0), vert(8.0, 8.0), vert(0.0, 8.0)],
            idx_buffer: vec![0, 1, 2, 0, 2, 3],
            commands: vec![DrawCmd {
                clip_rect: Vec4::new(0.0, 0.0, 64.0, 64.0),
                texture_id,
                vtx_offset: 0,
                idx_offset: 0,
                elem_count: 6,
            }],
        }],
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn config(renderer: RendererKind) -> Config {
    Config {
        renderer,
        ..Config::default()
    }
}

/// A bridge over the given host, with its library log.
pub fn bridge(host: MockHost) -> (GuiBridge, Arc<MockHost>, MockLibrary) {
    let host = Arc::new(host);
    let library = MockLibrary::default();
    let bridge = GuiBridge::new(host.clone(), Box::new(library.clone()));
    (bridge, host, library)
}
