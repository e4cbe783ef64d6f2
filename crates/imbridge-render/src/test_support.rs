//! Recording host servers and a one-quad frame for renderer tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread::ThreadId;
use std::time::Duration;

use glam::{Vec2, Vec4};
use imbridge_core::{
    CanvasItemId, CanvasMesh, CanvasParent, CanvasServer, DrawCmd, DrawData, DrawList,
    DrawListId, DrawVert, HostError, HostWindow, RenderingDevice, Rid, ShaderSource, SurfaceId,
    TextureBindings, TextureResource, ViewportId, ViewportRegistry, WindowId,
};

use crate::renderer::RenderFrame;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Logger that keeps every record, tagged with the thread that emitted it.
struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, log::Level, String)>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        lock(&self.records).push((
            std::thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static CAPTURE: OnceLock<&'static CaptureLogger> = OnceLock::new();

fn capture_logger() -> &'static CaptureLogger {
    CAPTURE.get_or_init(|| {
        let logger: &'static CaptureLogger = Box::leak(Box::new(CaptureLogger {
            records: Mutex::new(Vec::new()),
        }));
        if log::set_logger(logger).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
        logger
    })
}

/// Removes and returns the log records emitted by the calling thread.
///
/// Call once before the code under test to discard earlier records.
pub fn take_logs() -> Vec<(log::Level, String)> {
    let id = std::thread::current().id();
    let mut records = lock(&capture_logger().records);
    let (mine, rest): (Vec<_>, Vec<_>) = records
        .drain(..)
        .partition(|(thread, _, _)| *thread == id);
    *records = rest;
    mine.into_iter().map(|(_, level, message)| (level, message)).collect()
}

pub struct Fixture {
    pub draw_data: Vec<DrawData>,
    pub textures: TextureBindings,
    pub viewports: ViewportRegistry,
}

impl Fixture {
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            draw_data: &self.draw_data,
            textures: &self.textures,
            viewports: &self.viewports,
        }
    }
}

/// A 100x100 main viewport on surface 10 drawing half a quad with texture 5.
pub fn frame_fixture() -> Fixture {
    let mut textures = TextureBindings::new();
    let texture_id = textures.bind(TextureResource(5));
    let vert = |x: f32, y: f32| DrawVert {
        pos: [x, y],
        uv: [0.0, 0.0],
        col: 0xffff_ffff,
    };
    let list = DrawList {
        vtx_buffer: vec![vert(0.0, 0.0), vert(10.0, 0.0), vert(10.0, 10.0), vert(0.0, 10.0)],
        idx_buffer: vec![0, 1, 2, 0, 2, 3],
        commands: vec![DrawCmd {
            clip_rect: Vec4::new(0.0, 0.0, 100.0, 100.0),
            texture_id,
            vtx_offset: 0,
            idx_offset: 3,
            elem_count: 3,
        }],
    };
    Fixture {
        draw_data: vec![DrawData {
            viewport: ViewportId::MAIN,
            display_pos: Vec2::ZERO,
            display_size: Vec2::new(100.0, 100.0),
            framebuffer_scale: Vec2::ONE,
            lists: vec![list],
        }],
        textures,
        viewports: ViewportRegistry::new(HostWindow {
            window: WindowId(1),
            surface: SurfaceId(10),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOp {
    Create(Rid),
    Free(Rid),
    Update { buffer: Rid, len: usize },
    Begin(DrawListId),
    Scissor(Vec4),
    DrawIndexed {
        first_index: u32,
        index_count: u32,
        vertex_offset: i32,
    },
    End(DrawListId),
}

/// Ordering points shared by a test thread and the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    RenderStart(usize),
    RenderEnd(usize),
    DrawStart,
    DrawEnd,
}

#[derive(Default)]
pub struct MockDevice {
    fail_shader: bool,
    fail_pipeline: bool,
    fail_draw_lists: AtomicBool,
    fail_buffers: AtomicBool,
    draw_delay: Option<Duration>,
    timeline: Mutex<Vec<Mark>>,
    next: AtomicU64,
    freed: AtomicUsize,
    live: Mutex<HashSet<Rid>>,
    ops: Mutex<Vec<DeviceOp>>,
    draw_threads: Mutex<Vec<Option<String>>>,
}

impl MockDevice {
    pub fn failing_shader() -> Self {
        Self {
            fail_shader: true,
            ..Self::default()
        }
    }

    pub fn failing_pipeline() -> Self {
        Self {
            fail_pipeline: true,
            ..Self::default()
        }
    }

    /// Every indexed draw takes `delay`, bracketed by timeline marks.
    pub fn slow_draws(delay: Duration) -> Self {
        Self {
            draw_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn fail_buffers(&self, fail: bool) {
        self.fail_buffers.store(fail, Ordering::SeqCst);
    }

    pub fn mark(&self, mark: Mark) {
        lock(&self.timeline).push(mark);
    }

    pub fn timeline(&self) -> Vec<Mark> {
        lock(&self.timeline).clone()
    }

    pub fn fail_draw_lists(&self, fail: bool) {
        self.fail_draw_lists.store(fail, Ordering::SeqCst);
    }

    pub fn ops(&self) -> Vec<DeviceOp> {
        lock(&self.ops).clone()
    }

    pub fn live(&self) -> HashSet<Rid> {
        lock(&self.live).clone()
    }

    pub fn freed(&self) -> usize {
        self.freed.load(Ordering::SeqCst)
    }

    /// Names of the threads that issued indexed draws.
    pub fn draw_threads(&self) -> Vec<Option<String>> {
        lock(&self.draw_threads).clone()
    }

    fn record(&self, op: DeviceOp) {
        lock(&self.ops).push(op);
    }

    fn create(&self) -> Rid {
        let rid = Rid(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        lock(&self.live).insert(rid);
        self.record(DeviceOp::Create(rid));
        rid
    }
}

impl RenderingDevice for MockDevice {
    fn shader_create(&self, _source: &ShaderSource) -> Result<Rid, HostError> {
        if self.fail_shader {
            return Err(HostError::new("shader did not compile"));
        }
        Ok(self.create())
    }

    fn render_pipeline_create(&self, _shader: Rid, _vertex_stride: u32) -> Result<Rid, HostError> {
        if self.fail_pipeline {
            return Err(HostError::new("bad pipeline"));
        }
        Ok(self.create())
    }

    fn vertex_buffer_create(&self, _size_bytes: usize) -> Result<Rid, HostError> {
        if self.fail_buffers.load(Ordering::SeqCst) {
            return Err(HostError::new("out of device memory"));
        }
        Ok(self.create())
    }

    fn index_buffer_create(&self, _index_count: usize) -> Result<Rid, HostError> {
        if self.fail_buffers.load(Ordering::SeqCst) {
            return Err(HostError::new("out of device memory"));
        }
        Ok(self.create())
    }

    fn buffer_update(&self, buffer: Rid, _offset: usize, data: &[u8]) -> Result<(), HostError> {
        self.record(DeviceOp::Update {
            buffer,
            len: data.len(),
        });
        Ok(())
    }

    fn texture_uniform_set_create(
        &self,
        _shader: Rid,
        _texture: TextureResource,
    ) -> Result<Rid, HostError> {
        Ok(self.create())
    }

    fn surface_framebuffer(&self, surface: SurfaceId) -> Result<Rid, HostError> {
        Ok(Rid(1_000_000 + surface.0))
    }

    fn draw_list_begin(&self, _framebuffer: Rid) -> Result<DrawListId, HostError> {
        if self.fail_draw_lists.load(Ordering::SeqCst) {
            return Err(HostError::new("device lost"));
        }
        let list = DrawListId(self.next.fetch_add(1, Ordering::SeqCst));
        self.record(DeviceOp::Begin(list));
        Ok(list)
    }

    fn draw_list_bind_render_pipeline(&self, _list: DrawListId, _pipeline: Rid) {}

    fn draw_list_bind_buffers(&self, _list: DrawListId, _vertices: Rid, _indices: Rid) {}

    fn draw_list_bind_uniform_set(&self, _list: DrawListId, _set: Rid) {}

    fn draw_list_set_push_constant(&self, _list: DrawListId, _data: &[u8]) {}

    fn draw_list_enable_scissor(&self, _list: DrawListId, rect: Vec4) {
        self.record(DeviceOp::Scissor(rect));
    }

    fn draw_list_draw_indexed(
        &self,
        _list: DrawListId,
        first_index: u32,
        index_count: u32,
        vertex_offset: i32,
    ) {
        lock(&self.draw_threads).push(std::thread::current().name().map(str::to_owned));
        if let Some(delay) = self.draw_delay {
            self.mark(Mark::DrawStart);
            std::thread::sleep(delay);
            self.mark(Mark::DrawEnd);
        }
        self.record(DeviceOp::DrawIndexed {
            first_index,
            index_count,
            vertex_offset,
        });
    }

    fn draw_list_end(&self, list: DrawListId) {
        self.record(DeviceOp::End(list));
    }

    fn free_rid(&self, rid: Rid) {
        lock(&self.live).remove(&rid);
        self.freed.fetch_add(1, Ordering::SeqCst);
        self.record(DeviceOp::Free(rid));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Create(CanvasItemId, CanvasParent),
    Clear(CanvasItemId),
    SetVisible(CanvasItemId, bool),
    SetDrawIndex(CanvasItemId, i32),
    Free(CanvasItemId),
}

/// A triangle array as the canvas received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMesh {
    pub item: CanvasItemId,
    pub indices: Vec<i32>,
    pub points: Vec<Vec2>,
    pub texture: Option<TextureResource>,
    pub clip_rect: Option<Vec4>,
}

#[derive(Default)]
pub struct MockCanvas {
    next: AtomicU64,
    live: Mutex<HashSet<CanvasItemId>>,
    clips: Mutex<HashMap<CanvasItemId, Option<Vec4>>>,
    ops: Mutex<Vec<CanvasOp>>,
    meshes: Mutex<Vec<RecordedMesh>>,
}

impl MockCanvas {
    pub fn ops(&self) -> Vec<CanvasOp> {
        lock(&self.ops).clone()
    }

    pub fn meshes(&self) -> Vec<RecordedMesh> {
        lock(&self.meshes).clone()
    }

    /// Number of items ever created.
    pub fn created(&self) -> usize {
        usize::try_from(self.next.load(Ordering::SeqCst)).unwrap_or(usize::MAX)
    }

    /// Number of items created and not yet freed.
    pub fn live(&self) -> usize {
        lock(&self.live).len()
    }
}

impl CanvasServer for MockCanvas {
    fn canvas_item_create(&self, parent: CanvasParent) -> CanvasItemId {
        let item = CanvasItemId(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        lock(&self.live).insert(item);
        lock(&self.ops).push(CanvasOp::Create(item, parent));
        item
    }

    fn canvas_item_clear(&self, item: CanvasItemId) {
        lock(&self.ops).push(CanvasOp::Clear(item));
    }

    fn canvas_item_set_visible(&self, item: CanvasItemId, visible: bool) {
        lock(&self.ops).push(CanvasOp::SetVisible(item, visible));
    }

    fn canvas_item_set_draw_index(&self, item: CanvasItemId, index: i32) {
        lock(&self.ops).push(CanvasOp::SetDrawIndex(item, index));
    }

    fn canvas_item_set_clip_rect(&self, item: CanvasItemId, rect: Option<Vec4>) {
        lock(&self.clips).insert(item, rect);
    }

    fn canvas_item_add_triangle_array(
        &self,
        item: CanvasItemId,
        mesh: &CanvasMesh<'_>,
        texture: Option<TextureResource>,
    ) {
        let clip_rect = lock(&self.clips).get(&item).copied().flatten();
        lock(&self.meshes).push(RecordedMesh {
            item,
            indices: mesh.indices.to_vec(),
            points: mesh.points.to_vec(),
            texture,
            clip_rect,
        });
    }

    fn canvas_item_free(&self, item: CanvasItemId) {
        lock(&self.live).remove(&item);
        lock(&self.ops).push(CanvasOp::Free(item));
    }
}
