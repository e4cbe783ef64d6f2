//! Configuration supplied to `init`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Smallest accepted UI scale.
pub const MIN_SCALE: f32 = 0.25;

/// Bridge configuration.
///
/// Keys are PascalCase so the same document can be shared with the host's
/// resource format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    /// Requested rendering strategy.
    pub renderer: RendererKind,

    /// Base UI scale, at least [`MIN_SCALE`].
    pub scale: f32,

    /// Layout persistence file. Empty disables persistence.
    pub ini_filename: String,

    /// Fonts in atlas order. The first entry is the base font.
    pub fonts: Vec<FontSpec>,

    /// Append the library's built-in font after `fonts`.
    pub add_default_font: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Gpu,
            scale: 1.0,
            ini_filename: "user://imgui.ini".to_string(),
            fonts: Vec::new(),
            add_default_font: true,
        }
    }
}

impl Config {
    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                BridgeError::InvalidConfiguration(e.to_string())
            } else {
                BridgeError::JsonError(e)
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() {
            return Err(BridgeError::InvalidConfiguration(format!(
                "scale {} is not a finite number",
                self.scale
            )));
        }
        if self.scale < MIN_SCALE {
            return Err(BridgeError::InvalidConfiguration(format!(
                "scale {} is below the minimum of {MIN_SCALE}",
                self.scale
            )));
        }
        if let Some(font) = self.fonts.iter().find(|f| f.font_size <= 0) {
            return Err(BridgeError::InvalidConfiguration(format!(
                "font size {} must be positive",
                font.font_size
            )));
        }
        Ok(())
    }
}

/// Rendering strategy requested by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RendererKind {
    /// Draws nothing.
    Dummy,
    /// Issues 2D primitives through the host canvas.
    Canvas,
    /// Issues draw calls through the host's command-buffer device.
    #[default]
    #[serde(alias = "RenderingDevice", alias = "GPU")]
    Gpu,
}

impl FromStr for RendererKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Dummy" => Ok(Self::Dummy),
            "Canvas" => Ok(Self::Canvas),
            "Gpu" | "GPU" | "RenderingDevice" => Ok(Self::Gpu),
            other => Err(BridgeError::InvalidConfiguration(format!(
                "unknown renderer '{other}'"
            ))),
        }
    }
}

/// One configured font.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FontSpec {
    pub font_data: FontData,
    pub font_size: i32,
    #[serde(default)]
    pub merge: bool,
}

/// Font file contents or a reference to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FontData {
    /// A host path, resolved through the host at load time.
    Path(PathBuf),
    /// Bytes already in memory.
    #[serde(skip)]
    Memory(Arc<[u8]>),
}

impl FontData {
    /// Wraps in-memory font bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory(bytes.into())
    }

    /// Loads the font bytes, resolving paths with `globalize`.
    pub fn load(&self, globalize: impl FnOnce(&str) -> PathBuf) -> Result<Arc<[u8]>> {
        match self {
            Self::Memory(bytes) => Ok(Arc::clone(bytes)),
            Self::Path(path) => {
                let resolved = globalize(&path.to_string_lossy());
                Ok(std::fs::read(resolved)?.into())
            }
        }
    }
}
