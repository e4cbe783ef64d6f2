//! Texture binding table.
//!
//! Maps the opaque [`TextureId`] handles used in draw commands to host texture
//! resources and back. Only the thread that owns the GUI context touches it.

use std::collections::HashMap;

use crate::gui::TextureId;
use crate::host::TextureResource;

/// Bidirectional handle <-> resource table.
#[derive(Debug)]
pub struct TextureBindings {
    by_handle: HashMap<TextureId, TextureResource>,
    by_resource: HashMap<TextureResource, TextureId>,
    next_handle: u64,
}

impl Default for TextureBindings {
    fn default() -> Self {
        Self {
            by_handle: HashMap::new(),
            by_resource: HashMap::new(),
            next_handle: 1,
        }
    }
}

impl TextureBindings {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a resource and returns its handle.
    ///
    /// Binding a resource that is already bound returns the existing handle.
    pub fn bind(&mut self, resource: TextureResource) -> TextureId {
        if let Some(&handle) = self.by_resource.get(&resource) {
            return handle;
        }
        let handle = TextureId(self.next_handle);
        self.next_handle += 1;
        self.by_handle.insert(handle, resource);
        self.by_resource.insert(resource, handle);
        handle
    }

    /// Removes a binding by handle. Unknown handles are ignored.
    pub fn unbind(&mut self, handle: TextureId) -> Option<TextureResource> {
        let resource = self.by_handle.remove(&handle)?;
        self.by_resource.remove(&resource);
        Some(resource)
    }

    /// Removes a binding by resource. Unknown resources are ignored.
    pub fn unbind_resource(&mut self, resource: TextureResource) -> Option<TextureId> {
        let handle = self.by_resource.remove(&resource)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }

    /// Looks up the resource bound to a handle.
    pub fn resolve(&self, handle: TextureId) -> Option<TextureResource> {
        self.by_handle.get(&handle).copied()
    }

    /// Looks up the handle bound to a resource.
    pub fn handle_of(&self, resource: TextureResource) -> Option<TextureId> {
        self.by_resource.get(&resource).copied()
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    /// Removes every binding. Handles are never reused.
    pub fn clear(&mut self) {
        self.by_handle.clear();
        self.by_resource.clear();
    }
}
