//! The renderer interface shared by every backend.

use imbridge_core::{DrawData, SurfaceId, TextureBindings, ViewportRegistry};

/// Everything a renderer needs to draw one finalized frame.
pub struct RenderFrame<'a> {
    /// Finalized draw data, main viewport first.
    pub draw_data: &'a [DrawData],
    /// Resolves texture handles in draw commands to host textures.
    pub textures: &'a TextureBindings,
    /// Resolves viewports to the surfaces they render into.
    pub viewports: &'a ViewportRegistry,
}

/// A rendering backend.
///
/// Exactly one renderer is live per GUI context. It is selected at init and
/// disposed exactly once, on shutdown or when a new init replaces it.
/// Backend failures during [`Renderer::render`] are logged by the renderer
/// and never propagate to the frame loop.
pub trait Renderer {
    /// Identifying name, reported to the GUI library as the renderer backend.
    fn name(&self) -> &'static str;

    /// Prepares per-surface resources for a surface that will receive draw data.
    fn init_viewport(&mut self, surface: SurfaceId);

    /// Releases per-surface resources of a closed surface.
    fn close_viewport(&mut self, surface: SurfaceId);

    /// Draws a finalized frame.
    fn render(&mut self, frame: &RenderFrame<'_>);

    /// Drops everything drawn so far, e.g. when the UI layer is hidden.
    fn on_hide(&mut self);

    /// Releases every backend resource.
    fn dispose(&mut self);
}
