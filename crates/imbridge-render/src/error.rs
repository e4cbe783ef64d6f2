//! Rendering error types.

use imbridge_core::HostError;
use thiserror::Error;

/// Errors that can occur while constructing or driving a renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The host has no command-buffer device (compatibility mode).
    #[error("no rendering device available")]
    DeviceUnavailable,

    /// The host has no 2D canvas API.
    #[error("no canvas server available")]
    CanvasUnavailable,

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// Pipeline creation failed.
    #[error("pipeline creation failed: {0}")]
    PipelineCreationFailed(String),

    /// Buffer creation failed.
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),

    /// The render-submission thread could not be started.
    #[error("failed to start render thread: {0}")]
    ThreadSpawnFailed(String),

    /// A host API call failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
