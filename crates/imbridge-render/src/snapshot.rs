//! Owned copies of a frame's draw data.
//!
//! The command-buffer renderers flatten every draw list of a viewport into one
//! vertex and one index buffer, resolve texture handles to host textures, and
//! keep the result in a [`FrameSnapshot`]. The snapshot owns all of its data,
//! so it can be handed to another thread while the GUI library reuses its own
//! draw-data buffers. Buffers are reused across captures.

use glam::{Vec2, Vec4};
use imbridge_core::{DrawData, DrawVert, SurfaceId, TextureResource};

use crate::renderer::RenderFrame;

/// A draw call with offsets into the viewport's flattened buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotCmd {
    /// Clip rectangle (min x, min y, max x, max y) in display coordinates.
    pub clip_rect: Vec4,
    pub texture: TextureResource,
    pub first_index: u32,
    pub index_count: u32,
    pub vertex_offset: i32,
}

/// Flattened draw data of one viewport.
#[derive(Debug, Clone)]
pub struct ViewportSnapshot {
    pub surface: SurfaceId,
    pub display_pos: Vec2,
    pub display_size: Vec2,
    pub framebuffer_scale: Vec2,
    pub vertices: Vec<DrawVert>,
    pub indices: Vec<u32>,
    pub commands: Vec<SnapshotCmd>,
}

impl ViewportSnapshot {
    fn empty(surface: SurfaceId) -> Self {
        Self {
            surface,
            display_pos: Vec2::ZERO,
            display_size: Vec2::ZERO,
            framebuffer_scale: Vec2::ONE,
            vertices: Vec::new(),
            indices: Vec::new(),
            commands: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn fill(&mut self, surface: SurfaceId, data: &DrawData, frame: &RenderFrame<'_>) {
        self.surface = surface;
        self.display_pos = data.display_pos;
        self.display_size = data.display_size;
        self.framebuffer_scale = data.framebuffer_scale;
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();

        for list in &data.lists {
            let base_vertex = self.vertices.len() as u32;
            let base_index = self.indices.len() as u32;
            self.vertices.extend_from_slice(&list.vtx_buffer);
            self.indices
                .extend(list.idx_buffer.iter().map(|&i| u32::from(i)));

            for cmd in &list.commands {
                if cmd.elem_count == 0 {
                    continue;
                }
                let end = cmd.idx_offset as usize + cmd.elem_count as usize;
                if end > list.idx_buffer.len() {
                    log::error!(
                        "draw command indexes past its list ({end} > {})",
                        list.idx_buffer.len()
                    );
                    continue;
                }
                let Some(texture) = frame.textures.resolve(cmd.texture_id) else {
                    log::debug!("skipping draw command with unbound texture {:?}", cmd.texture_id);
                    continue;
                };
                self.commands.push(SnapshotCmd {
                    clip_rect: cmd.clip_rect,
                    texture,
                    first_index: base_index + cmd.idx_offset,
                    index_count: cmd.elem_count,
                    vertex_offset: (base_vertex + cmd.vtx_offset) as i32,
                });
            }
        }
    }
}

/// Owned draw data of every viewport of a frame.
#[derive(Debug, Default)]
pub struct FrameSnapshot {
    viewports: Vec<ViewportSnapshot>,
    active: usize,
}

impl FrameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies a frame's draw data into this snapshot.
    ///
    /// Viewports without a registered surface are skipped.
    pub fn capture(&mut self, frame: &RenderFrame<'_>) {
        self.active = 0;
        for data in frame.draw_data {
            let Some(surface) = frame.viewports.surface_of(data.viewport) else {
                log::warn!("no surface registered for viewport {:?}", data.viewport);
                continue;
            };
            if self.active == self.viewports.len() {
                self.viewports.push(ViewportSnapshot::empty(surface));
            }
            self.viewports[self.active].fill(surface, data, frame);
            self.active += 1;
        }
    }

    /// Viewports captured by the last [`FrameSnapshot::capture`].
    pub fn viewports(&self) -> &[ViewportSnapshot] {
        &self.viewports[..self.active]
    }

    pub fn is_empty(&self) -> bool {
        self.viewports().iter().all(|v| v.commands.is_empty())
    }
}
