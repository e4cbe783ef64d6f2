//! Font list and atlas rebuilds.
//!
//! Fonts are queued in order and consumed only when the atlas is rebuilt. The
//! first entry becomes the base font; later entries may merge their glyphs
//! into the font before them. A rebuild rasterizes every glyph again, so it
//! must never run between `update` and `render` of a frame.

use std::sync::Arc;

use crate::error::Result;
use crate::gui::{AtlasImage, FontAtlas, FontSource};

/// Point size of the library's built-in font.
pub const DEFAULT_FONT_SIZE: i32 = 13;

/// A queued font.
#[derive(Debug, Clone)]
pub struct FontEntry {
    /// Font file bytes; `None` is the built-in font.
    pub data: Option<Arc<[u8]>>,
    pub size: i32,
    pub merge: bool,
}

impl FontEntry {
    /// The built-in font entry.
    pub fn builtin() -> Self {
        Self {
            data: None,
            size: DEFAULT_FONT_SIZE,
            merge: false,
        }
    }
}

/// Ordered font configuration.
#[derive(Debug, Default)]
pub struct Fonts {
    entries: Vec<FontEntry>,
}

impl Fonts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a font.
    pub fn add_font(&mut self, data: Arc<[u8]>, size: i32, merge: bool) {
        self.entries.push(FontEntry {
            data: Some(data),
            size,
            merge,
        });
    }

    /// Queues the library's built-in font.
    pub fn add_font_default(&mut self) {
        self.entries.push(FontEntry::builtin());
    }

    /// Forgets every queued font.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds `atlas` from the queued fonts at the given scale.
    ///
    /// The atlas is cleared, every entry is added in order, and a single build
    /// is performed. The merge flag of the first entry is ignored. With no
    /// queued fonts the built-in font is used.
    #[allow(clippy::cast_precision_loss)]
    pub fn rebuild(&self, atlas: &mut dyn FontAtlas, scale: f32) -> Result<AtlasImage> {
        atlas.clear();

        let builtin = [FontEntry::builtin()];
        let entries = if self.entries.is_empty() {
            &builtin[..]
        } else {
            &self.entries[..]
        };

        for (i, entry) in entries.iter().enumerate() {
            let source = match &entry.data {
                Some(bytes) => FontSource::Ttf(bytes),
                None => FontSource::Default,
            };
            let merge = i > 0 && entry.merge;
            atlas.add_font(source, entry.size as f32 * scale, merge);
        }

        let image = atlas.build()?;
        log::debug!(
            "rebuilt font atlas: {} fonts, {}x{} px",
            entries.len(),
            image.width,
            image.height
        );
        Ok(image)
    }
}
