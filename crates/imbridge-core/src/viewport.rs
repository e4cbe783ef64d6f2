//! Viewport registry for multi-window rendering.
//!
//! Maps GUI-library viewports to the host windows and surfaces they render
//! into. The main window entry is created with the registry and cannot be
//! removed.

use std::collections::HashMap;

use crate::gui::ViewportId;
use crate::host::{HostWindow, SurfaceId, WindowId};

/// Registry of host windows backing library viewports.
#[derive(Debug)]
pub struct ViewportRegistry {
    main: HostWindow,
    /// Platform windows opened by the library, keyed by viewport.
    platform: HashMap<ViewportId, HostWindow>,
    by_window: HashMap<WindowId, ViewportId>,
}

impl ViewportRegistry {
    /// Creates a registry whose main viewport renders into `main`.
    pub fn new(main: HostWindow) -> Self {
        let mut by_window = HashMap::new();
        by_window.insert(main.window, ViewportId::MAIN);
        Self {
            main,
            platform: HashMap::new(),
            by_window,
        }
    }

    /// The permanent main window entry.
    pub fn main(&self) -> HostWindow {
        self.main
    }

    /// Registers a platform window.
    ///
    /// Returns the window previously registered for `viewport`, if any.
    /// The main viewport cannot be replaced.
    pub fn insert(&mut self, viewport: ViewportId, window: HostWindow) -> Option<HostWindow> {
        if viewport == ViewportId::MAIN {
            log::warn!("ignoring platform window registration for the main viewport");
            return None;
        }
        let previous = self.platform.insert(viewport, window);
        if let Some(previous) = previous {
            self.by_window.remove(&previous.window);
        }
        self.by_window.insert(window.window, viewport);
        previous
    }

    /// Removes a platform window. The main entry is never removed.
    pub fn remove(&mut self, viewport: ViewportId) -> Option<HostWindow> {
        let window = self.platform.remove(&viewport)?;
        self.by_window.remove(&window.window);
        Some(window)
    }

    /// Looks up the host window of a viewport.
    pub fn get(&self, viewport: ViewportId) -> Option<HostWindow> {
        if viewport == ViewportId::MAIN {
            Some(self.main)
        } else {
            self.platform.get(&viewport).copied()
        }
    }

    /// Looks up the surface a viewport renders into.
    pub fn surface_of(&self, viewport: ViewportId) -> Option<SurfaceId> {
        self.get(viewport).map(|w| w.surface)
    }

    /// Looks up the viewport shown in a host window.
    pub fn viewport_of(&self, window: WindowId) -> Option<ViewportId> {
        self.by_window.get(&window).copied()
    }

    /// Returns true if the viewport has a registered window.
    pub fn contains(&self, viewport: ViewportId) -> bool {
        viewport == ViewportId::MAIN || self.platform.contains_key(&viewport)
    }

    /// Number of registered viewports, main included.
    pub fn len(&self) -> usize {
        self.platform.len() + 1
    }

    /// Always false: the main entry is permanent.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over platform windows, main excluded.
    pub fn platform_windows(&self) -> impl Iterator<Item = (ViewportId, HostWindow)> + '_ {
        self.platform.iter().map(|(v, w)| (*v, *w))
    }

    /// Removes every platform window and returns them.
    pub fn drain_platform_windows(&mut self) -> Vec<(ViewportId, HostWindow)> {
        for window in self.platform.values() {
            self.by_window.remove(&window.window);
        }
        self.platform.drain().collect()
    }
}
