//! Renderer backed by the host's command-buffer device.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{Vec2, Vec4};
use imbridge_core::{DrawVert, HostError, RenderingDevice, Rid, SurfaceId, TextureResource};

use crate::error::{RenderError, RenderResult};
use crate::renderer::{RenderFrame, Renderer};
use crate::shader::{PushConstants, GUI_SHADER, VERTEX_STRIDE};
use crate::snapshot::{FrameSnapshot, ViewportSnapshot};

const MIN_VERTEX_CAPACITY: usize = 1024;
const MIN_INDEX_CAPACITY: usize = 2048;

/// A device buffer that grows by powers of two and never shrinks.
#[derive(Debug, Clone, Copy)]
struct GpuBuffer {
    rid: Rid,
    /// Capacity in elements.
    capacity: usize,
}

#[derive(Debug, Default)]
struct SurfaceTarget {
    framebuffer: Option<Rid>,
    vertices: Option<GpuBuffer>,
    indices: Option<GpuBuffer>,
}

/// Device-side state shared by the single- and multi-threaded GPU renderers.
///
/// Owns the shader, the pipeline, per-surface buffers, and one uniform set per
/// sampled texture. Draw failures are logged and abandon the affected viewport
/// for the current frame only.
pub struct DeviceBackend {
    device: Arc<dyn RenderingDevice>,
    shader: Rid,
    pipeline: Rid,
    surfaces: HashMap<SurfaceId, SurfaceTarget>,
    uniform_sets: HashMap<TextureResource, Rid>,
    used_textures: HashSet<TextureResource>,
    disposed: bool,
}

impl DeviceBackend {
    /// Compiles the shader and builds the pipeline.
    pub fn new(device: Arc<dyn RenderingDevice>) -> RenderResult<Self> {
        let shader = device
            .shader_create(&GUI_SHADER)
            .map_err(|e| RenderError::ShaderCompilationFailed(e.0))?;
        let pipeline = match device.render_pipeline_create(shader, VERTEX_STRIDE) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                device.free_rid(shader);
                return Err(RenderError::PipelineCreationFailed(e.0));
            }
        };
        Ok(Self {
            device,
            shader,
            pipeline,
            surfaces: HashMap::new(),
            uniform_sets: HashMap::new(),
            used_textures: HashSet::new(),
            disposed: false,
        })
    }

    pub fn init_viewport(&mut self, surface: SurfaceId) {
        self.surfaces.entry(surface).or_default();
    }

    pub fn close_viewport(&mut self, surface: SurfaceId) {
        if let Some(target) = self.surfaces.remove(&surface) {
            self.free_target(&target);
        }
    }

    /// Submits every viewport of `snapshot`.
    pub fn draw(&mut self, snapshot: &FrameSnapshot) {
        if self.disposed {
            return;
        }
        self.used_textures.clear();
        for viewport in snapshot.viewports() {
            if let Err(e) = self.draw_viewport(viewport) {
                log::error!("failed to draw surface {:?}: {e}", viewport.surface);
            }
        }
        self.release_frame_resources();
    }

    /// Frees uniform sets of textures not sampled by the last frame.
    fn release_frame_resources(&mut self) {
        let device = &self.device;
        let used = &self.used_textures;
        self.uniform_sets.retain(|texture, set| {
            let keep = used.contains(texture);
            if !keep {
                device.free_rid(*set);
            }
            keep
        });
    }

    fn draw_viewport(&mut self, viewport: &ViewportSnapshot) -> RenderResult<()> {
        if viewport.commands.is_empty() {
            return Ok(());
        }
        let fb_size = viewport.display_size * viewport.framebuffer_scale;
        if fb_size.x <= 0.0 || fb_size.y <= 0.0 {
            return Ok(());
        }

        let device = Arc::clone(&self.device);
        let target = self.surfaces.entry(viewport.surface).or_default();
        let framebuffer = match target.framebuffer {
            Some(fb) => fb,
            None => {
                let fb = device.surface_framebuffer(viewport.surface)?;
                target.framebuffer = Some(fb);
                fb
            }
        };
        let vertex_bytes = viewport.vertices.len() * std::mem::size_of::<DrawVert>();
        let vertices = ensure_capacity(
            device.as_ref(),
            &mut target.vertices,
            vertex_bytes,
            MIN_VERTEX_CAPACITY * std::mem::size_of::<DrawVert>(),
            |d, n| d.vertex_buffer_create(n),
        )?;
        let indices = ensure_capacity(
            device.as_ref(),
            &mut target.indices,
            viewport.indices.len(),
            MIN_INDEX_CAPACITY,
            |d, n| d.index_buffer_create(n),
        )?;
        device.buffer_update(vertices, 0, bytemuck::cast_slice(&viewport.vertices))?;
        device.buffer_update(indices, 0, bytemuck::cast_slice(&viewport.indices))?;

        let push = PushConstants::for_viewport(viewport.display_pos, viewport.display_size);
        let list = device.draw_list_begin(framebuffer)?;
        device.draw_list_bind_render_pipeline(list, self.pipeline);
        device.draw_list_bind_buffers(list, vertices, indices);
        device.draw_list_set_push_constant(list, bytemuck::bytes_of(&push));

        let mut result = Ok(());
        for cmd in &viewport.commands {
            let Some(scissor) = scissor_rect(cmd.clip_rect, viewport, fb_size) else {
                continue;
            };
            let set = match self.uniform_set(cmd.texture) {
                Ok(set) => set,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            };
            device.draw_list_bind_uniform_set(list, set);
            device.draw_list_enable_scissor(list, scissor);
            device.draw_list_draw_indexed(list, cmd.first_index, cmd.index_count, cmd.vertex_offset);
        }
        device.draw_list_end(list);
        result
    }

    fn uniform_set(&mut self, texture: TextureResource) -> RenderResult<Rid> {
        self.used_textures.insert(texture);
        if let Some(&set) = self.uniform_sets.get(&texture) {
            return Ok(set);
        }
        let set = self.device.texture_uniform_set_create(self.shader, texture)?;
        self.uniform_sets.insert(texture, set);
        Ok(set)
    }

    fn free_target(&self, target: &SurfaceTarget) {
        for buffer in [target.vertices, target.indices].into_iter().flatten() {
            self.device.free_rid(buffer.rid);
        }
    }

    /// Frees every device resource. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for (_, target) in std::mem::take(&mut self.surfaces) {
            self.free_target(&target);
        }
        for (_, set) in self.uniform_sets.drain() {
            self.device.free_rid(set);
        }
        self.device.free_rid(self.pipeline);
        self.device.free_rid(self.shader);
    }
}

/// Returns a buffer holding at least `needed` elements, reallocating if required.
fn ensure_capacity(
    device: &dyn RenderingDevice,
    slot: &mut Option<GpuBuffer>,
    needed: usize,
    minimum: usize,
    create: impl FnOnce(&dyn RenderingDevice, usize) -> Result<Rid, HostError>,
) -> RenderResult<Rid> {
    if let Some(buffer) = slot {
        if buffer.capacity >= needed {
            return Ok(buffer.rid);
        }
        device.free_rid(buffer.rid);
        *slot = None;
    }
    let capacity = needed.next_power_of_two().max(minimum);
    let rid = create(device, capacity)
        .map_err(|e| RenderError::BufferCreationFailed(format!("{capacity} elements: {e}")))?;
    *slot = Some(GpuBuffer { rid, capacity });
    Ok(rid)
}

/// Converts a clip rectangle to a framebuffer scissor (x, y, width, height).
///
/// Returns `None` when nothing of the command is visible.
fn scissor_rect(clip: Vec4, viewport: &ViewportSnapshot, fb_size: Vec2) -> Option<Vec4> {
    let scale = viewport.framebuffer_scale;
    let min = ((Vec2::new(clip.x, clip.y) - viewport.display_pos) * scale)
        .max(Vec2::ZERO)
        .floor();
    let max = ((Vec2::new(clip.z, clip.w) - viewport.display_pos) * scale)
        .min(fb_size)
        .ceil();
    if max.x <= min.x || max.y <= min.y {
        return None;
    }
    Some(Vec4::new(min.x, min.y, max.x - min.x, max.y - min.y))
}

/// Renders through the command-buffer device on the calling thread.
pub struct GpuRenderer {
    backend: DeviceBackend,
    snapshot: FrameSnapshot,
}

impl GpuRenderer {
    pub fn new(device: Arc<dyn RenderingDevice>) -> RenderResult<Self> {
        Ok(Self {
            backend: DeviceBackend::new(device)?,
            snapshot: FrameSnapshot::new(),
        })
    }
}

impl Renderer for GpuRenderer {
    fn name(&self) -> &'static str {
        "imbridge_gpu"
    }

    fn init_viewport(&mut self, surface: SurfaceId) {
        self.backend.init_viewport(surface);
    }

    fn close_viewport(&mut self, surface: SurfaceId) {
        self.backend.close_viewport(surface);
    }

    fn render(&mut self, frame: &RenderFrame<'_>) {
        self.snapshot.capture(frame);
        self.backend.draw(&self.snapshot);
    }

    fn on_hide(&mut self) {}

    fn dispose(&mut self) {
        self.backend.dispose();
    }
}
