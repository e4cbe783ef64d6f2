//! A renderer that draws nothing, used headless and as the last fallback.

use imbridge_core::SurfaceId;

use crate::renderer::{RenderFrame, Renderer};

/// Renderer that accepts frames and discards them.
#[derive(Debug, Default)]
pub struct DummyRenderer;

impl DummyRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DummyRenderer {
    fn name(&self) -> &'static str {
        "imbridge_dummy"
    }

    fn init_viewport(&mut self, _surface: SurfaceId) {}

    fn close_viewport(&mut self, _surface: SurfaceId) {}

    fn render(&mut self, _frame: &RenderFrame<'_>) {}

    fn on_hide(&mut self) {}

    fn dispose(&mut self) {}
}
