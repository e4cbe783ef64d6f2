//! Error types for imbridge.

use thiserror::Error;

/// The main error type for imbridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The process does not use 64-bit native pointers.
    #[error("imbridge requires 64-bit pointers (found {pointer_width}-bit)")]
    UnsupportedPlatform { pointer_width: u32 },

    /// The configuration contains a value that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A frame operation was called before `init`.
    #[error("imbridge not initialized - call init() first")]
    NotInitialized,

    /// The call is not allowed between `update` and `render` of a frame.
    #[error("a frame is in progress - call render() first")]
    FrameInProgress,

    /// `render` was called without a matching `update`.
    #[error("no frame is open - call update() first")]
    NoFrameOpen,

    /// The GUI library failed to build the font atlas.
    #[error("font atlas build failed: {0}")]
    FontAtlas(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for imbridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Native pointer width required by the bridge.
pub const REQUIRED_POINTER_WIDTH: u32 = 64;

/// Checks that the given native pointer width is supported.
///
/// Callers pass `usize::BITS` for the running process.
pub fn check_pointer_width(pointer_width: u32) -> Result<()> {
    if pointer_width == REQUIRED_POINTER_WIDTH {
        Ok(())
    } else {
        Err(BridgeError::UnsupportedPlatform { pointer_width })
    }
}
