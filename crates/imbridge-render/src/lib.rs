//! Rendering backends for imbridge.
//!
//! This crate turns finalized GUI draw data into host drawing calls:
//! - [`DummyRenderer`] draws nothing (headless hosts, last-resort fallback)
//! - [`CanvasRenderer`] replays commands through the host's retained 2D canvas
//! - [`GpuRenderer`] and [`ThreadedGpuRenderer`] submit through the command-buffer device
//! - [`select_renderer`] picks a variant and applies the construction fallback chain

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// Index and offset math on draw lists stays well inside u32
#![allow(clippy::cast_possible_truncation)]

pub mod canvas;
pub mod device;
pub mod device_threaded;
pub mod dummy;
pub mod error;
pub mod renderer;
pub mod selection;
pub mod shader;
pub mod snapshot;

#[cfg(test)]
mod test_support;

pub use canvas::CanvasRenderer;
pub use device::{DeviceBackend, GpuRenderer};
pub use device_threaded::ThreadedGpuRenderer;
pub use dummy::DummyRenderer;
pub use error::{RenderError, RenderResult};
pub use renderer::{RenderFrame, Renderer};
pub use selection::{
    resolve_variant, select_renderer, Capabilities, Fallback, HostRendererFactory,
    RendererFactory, RendererVariant, Selection,
};
pub use shader::{PushConstants, GUI_SHADER, VERTEX_STRIDE};
pub use snapshot::{FrameSnapshot, SnapshotCmd, ViewportSnapshot};
