//! Renderer built on the host's retained 2D canvas.
//!
//! Each surface gets a root canvas item, and each draw command is replayed into
//! a child item that carries the command's clip rectangle. Child items are
//! pooled per surface; items not needed by a frame are cleared and hidden.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Vec2, Vec4};
use imbridge_core::{
    CanvasItemId, CanvasMesh, CanvasParent, CanvasServer, DrawData, DrawList, SurfaceId,
    TextureBindings,
};

use crate::renderer::{RenderFrame, Renderer};

#[derive(Debug)]
struct CanvasTarget {
    root: CanvasItemId,
    children: Vec<CanvasItemId>,
}

/// Scratch mesh buffers reused across lists.
#[derive(Debug, Default)]
struct MeshScratch {
    points: Vec<Vec2>,
    colors: Vec<Vec4>,
    uvs: Vec<Vec2>,
    indices: Vec<i32>,
}

impl MeshScratch {
    fn load_vertices(&mut self, list: &DrawList, origin: Vec2) {
        self.points.clear();
        self.colors.clear();
        self.uvs.clear();
        for vert in &list.vtx_buffer {
            self.points.push(Vec2::from_array(vert.pos) - origin);
            self.colors.push(vert.color());
            self.uvs.push(Vec2::from_array(vert.uv));
        }
    }
}

/// Replays draw data as canvas items.
pub struct CanvasRenderer {
    server: Arc<dyn CanvasServer>,
    targets: HashMap<SurfaceId, CanvasTarget>,
    scratch: MeshScratch,
}

/// Returns the target of `surface`, creating its root item on first use.
fn target_for<'a>(
    server: &dyn CanvasServer,
    targets: &'a mut HashMap<SurfaceId, CanvasTarget>,
    surface: SurfaceId,
) -> &'a mut CanvasTarget {
    targets.entry(surface).or_insert_with(|| CanvasTarget {
        root: server.canvas_item_create(CanvasParent::Surface(surface)),
        children: Vec::new(),
    })
}

impl CanvasRenderer {
    pub fn new(server: Arc<dyn CanvasServer>) -> Self {
        Self {
            server,
            targets: HashMap::new(),
            scratch: MeshScratch::default(),
        }
    }

    fn ensure_target(&mut self, surface: SurfaceId) {
        target_for(self.server.as_ref(), &mut self.targets, surface);
    }

    fn render_viewport(&mut self, surface: SurfaceId, data: &DrawData, textures: &TextureBindings) {
        let Self {
            server,
            targets,
            scratch,
        } = self;
        let origin = data.display_pos;
        let target = target_for(server.as_ref(), targets, surface);

        let mut used = 0usize;
        for list in &data.lists {
            scratch.load_vertices(list, origin);
            for cmd in &list.commands {
                if cmd.elem_count == 0 {
                    continue;
                }
                let start = cmd.idx_offset as usize;
                let end = start + cmd.elem_count as usize;
                let Some(slice) = list.idx_buffer.get(start..end) else {
                    log::error!(
                        "draw command indexes past its list ({end} > {})",
                        list.idx_buffer.len()
                    );
                    continue;
                };
                let texture = if cmd.texture_id.is_null() {
                    None
                } else if let Some(texture) = textures.resolve(cmd.texture_id) {
                    Some(texture)
                } else {
                    log::debug!("skipping draw command with unbound texture {:?}", cmd.texture_id);
                    continue;
                };

                scratch.indices.clear();
                #[allow(clippy::cast_possible_wrap)]
                let base = cmd.vtx_offset as i32;
                scratch
                    .indices
                    .extend(slice.iter().map(|&i| i32::from(i) + base));

                if used == target.children.len() {
                    let child = server.canvas_item_create(CanvasParent::Item(target.root));
                    target.children.push(child);
                }
                let item = target.children[used];

                let clip = cmd.clip_rect;
                let clip_rect = Vec4::new(
                    clip.x - origin.x,
                    clip.y - origin.y,
                    clip.z - clip.x,
                    clip.w - clip.y,
                );

                server.canvas_item_clear(item);
                server.canvas_item_set_visible(item, true);
                server.canvas_item_set_draw_index(item, i32::try_from(used).unwrap_or(i32::MAX));
                server.canvas_item_set_clip_rect(item, Some(clip_rect));
                server.canvas_item_add_triangle_array(
                    item,
                    &CanvasMesh {
                        indices: &scratch.indices,
                        points: &scratch.points,
                        colors: &scratch.colors,
                        uvs: &scratch.uvs,
                    },
                    texture,
                );
                used += 1;
            }
        }

        for &item in &target.children[used..] {
            server.canvas_item_clear(item);
            server.canvas_item_set_visible(item, false);
        }
    }

    fn free_target(&self, target: CanvasTarget) {
        for item in target.children {
            self.server.canvas_item_free(item);
        }
        self.server.canvas_item_free(target.root);
    }
}

impl Renderer for CanvasRenderer {
    fn name(&self) -> &'static str {
        "imbridge_canvas"
    }

    fn init_viewport(&mut self, surface: SurfaceId) {
        self.ensure_target(surface);
    }

    fn close_viewport(&mut self, surface: SurfaceId) {
        if let Some(target) = self.targets.remove(&surface) {
            self.free_target(target);
        }
    }

    fn render(&mut self, frame: &RenderFrame<'_>) {
        for data in frame.draw_data {
            let Some(surface) = frame.viewports.surface_of(data.viewport) else {
                log::warn!("no surface registered for viewport {:?}", data.viewport);
                continue;
            };
            self.render_viewport(surface, data, frame.textures);
        }
    }

    fn on_hide(&mut self) {
        for target in self.targets.values() {
            for &item in &target.children {
                self.server.canvas_item_clear(item);
            }
        }
    }

    fn dispose(&mut self) {
        let targets: Vec<_> = self.targets.drain().map(|(_, t)| t).collect();
        for target in targets {
            self.free_target(target);
        }
    }
}
