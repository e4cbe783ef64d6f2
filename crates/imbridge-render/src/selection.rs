//! Renderer selection and the construction fallback chain.
//!
//! The variants know nothing about fallback. [`select_renderer`] resolves the
//! requested kind against the host's capabilities, asks a [`RendererFactory`]
//! to build the result, and substitutes a cheaper variant when construction
//! fails: GPU falls back to Canvas, everything else falls back to Dummy.

use imbridge_core::{is_headless, Host, RendererKind, THREAD_MODEL_MULTI_THREADED};

use crate::canvas::CanvasRenderer;
use crate::device::GpuRenderer;
use crate::device_threaded::ThreadedGpuRenderer;
use crate::dummy::DummyRenderer;
use crate::error::{RenderError, RenderResult};
use crate::renderer::Renderer;

/// A concrete renderer implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererVariant {
    Dummy,
    Canvas,
    Gpu,
    GpuThreadSafe,
}

impl RendererVariant {
    pub fn is_gpu(self) -> bool {
        matches!(self, Self::Gpu | Self::GpuThreadSafe)
    }
}

/// Runtime facts about the host that constrain the choice of renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub headless: bool,
    pub has_rendering_device: bool,
    pub thread_model: i32,
}

impl Capabilities {
    pub fn detect(host: &dyn Host) -> Self {
        Self {
            headless: is_headless(host),
            has_rendering_device: host.rendering_device().is_some(),
            thread_model: host.thread_model(),
        }
    }
}

/// Maps a requested kind to the variant that should be constructed.
pub fn resolve_variant(requested: RendererKind, caps: Capabilities) -> RendererVariant {
    if caps.headless {
        return RendererVariant::Dummy;
    }
    match requested {
        RendererKind::Dummy => RendererVariant::Dummy,
        RendererKind::Canvas => RendererVariant::Canvas,
        RendererKind::Gpu if !caps.has_rendering_device => RendererVariant::Canvas,
        RendererKind::Gpu if caps.thread_model == THREAD_MODEL_MULTI_THREADED => {
            RendererVariant::GpuThreadSafe
        }
        RendererKind::Gpu => RendererVariant::Gpu,
    }
}

/// Builds renderer variants.
pub trait RendererFactory {
    fn create(&mut self, variant: RendererVariant) -> RenderResult<Box<dyn Renderer>>;
}

/// Builds renderers against a live host.
pub struct HostRendererFactory<'a> {
    host: &'a dyn Host,
}

impl<'a> HostRendererFactory<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }
}

impl RendererFactory for HostRendererFactory<'_> {
    fn create(&mut self, variant: RendererVariant) -> RenderResult<Box<dyn Renderer>> {
        Ok(match variant {
            RendererVariant::Dummy => Box::new(DummyRenderer::new()),
            RendererVariant::Canvas => {
                let server = self
                    .host
                    .canvas_server()
                    .ok_or(RenderError::CanvasUnavailable)?;
                Box::new(CanvasRenderer::new(server))
            }
            RendererVariant::Gpu => {
                let device = self
                    .host
                    .rendering_device()
                    .ok_or(RenderError::DeviceUnavailable)?;
                Box::new(GpuRenderer::new(device)?)
            }
            RendererVariant::GpuThreadSafe => {
                let device = self
                    .host
                    .rendering_device()
                    .ok_or(RenderError::DeviceUnavailable)?;
                Box::new(ThreadedGpuRenderer::new(device)?)
            }
        })
    }
}

/// A construction failure that was recovered by substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub from: RendererVariant,
    pub to: RendererVariant,
    pub reason: String,
}

/// The outcome of [`select_renderer`].
pub struct Selection {
    pub renderer: Box<dyn Renderer>,
    /// The variant actually constructed.
    pub variant: RendererVariant,
    /// The last substitution made, if construction of the resolved variant failed.
    pub fallback: Option<Fallback>,
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("renderer", &self.renderer.name())
            .field("variant", &self.variant)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Picks and constructs a renderer.
///
/// Never fails: the Dummy renderer is the final fallback and is built directly.
pub fn select_renderer(
    requested: RendererKind,
    caps: Capabilities,
    factory: &mut dyn RendererFactory,
) -> Selection {
    let resolved = resolve_variant(requested, caps);
    let err = match factory.create(resolved) {
        Ok(renderer) => {
            log::info!("using {} renderer", renderer.name());
            return Selection {
                renderer,
                variant: resolved,
                fallback: None,
            };
        }
        Err(e) => e,
    };

    let err = if resolved.is_gpu() {
        log::warn!("falling back to Canvas renderer ({err})");
        match factory.create(RendererVariant::Canvas) {
            Ok(renderer) => {
                return Selection {
                    renderer,
                    variant: RendererVariant::Canvas,
                    fallback: Some(Fallback {
                        from: resolved,
                        to: RendererVariant::Canvas,
                        reason: err.to_string(),
                    }),
                };
            }
            Err(e) => (RendererVariant::Canvas, e),
        }
    } else {
        (resolved, err)
    };

    let (from, err) = err;
    log::error!("falling back to Dummy renderer ({err})");
    Selection {
        renderer: Box::new(DummyRenderer::new()),
        variant: RendererVariant::Dummy,
        fallback: Some(Fallback {
            from,
            to: RendererVariant::Dummy,
            reason: err.to_string(),
        }),
    }
}
