//! The orchestrator that owns a GUI context and drives it through frames.
//!
//! [`State`] is not reentrant. Every method must be called from the thread
//! that owns it, strictly one after another.

use std::sync::Arc;

use imbridge_core::{
    check_pointer_width, BackendFlags, BridgeError, Config, Fonts, GuiContext, GuiLibrary, Host,
    HostWindow, PlatformRequest, Result, ScaleState, TextureBindings, TextureId, TextureResource,
    Vec2, ViewportId, ViewportRegistry, WindowId,
};
use imbridge_input::{EventSource, Input, InputEvent, InputOptions};
use imbridge_render::{
    select_renderer, Capabilities, Fallback, HostRendererFactory, RenderFrame, Renderer,
    RendererFactory, RendererVariant,
};

/// Name reported to the GUI library as the platform backend.
pub const BACKEND_PLATFORM_NAME: &str = "imbridge";

/// Where a [`State`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, `init` not called yet.
    Uninitialized,
    /// A context is live and no frame is open.
    Ready,
    /// Between `update` and `render`.
    FrameOpen,
    /// Shut down. `init` may be called again.
    Disposed,
}

/// Owns the GUI context, the renderer, and the tables they share.
pub struct State {
    host: Arc<dyn Host>,
    library: Box<dyn GuiLibrary>,
    lifecycle: Lifecycle,
    context: Option<Box<dyn GuiContext>>,
    renderer: Option<Box<dyn Renderer>>,
    variant: Option<RendererVariant>,
    fallback: Option<Fallback>,
    viewports: Option<ViewportRegistry>,
    textures: TextureBindings,
    fonts: Fonts,
    scale: ScaleState,
    input: Input,
    atlas_texture: Option<(TextureId, TextureResource)>,
    visible: bool,
}

impl State {
    pub fn new(host: Arc<dyn Host>, library: Box<dyn GuiLibrary>) -> Self {
        Self {
            host,
            library,
            lifecycle: Lifecycle::Uninitialized,
            context: None,
            renderer: None,
            variant: None,
            fallback: None,
            viewports: None,
            textures: TextureBindings::new(),
            fonts: Fonts::new(),
            scale: ScaleState::new(),
            input: Input::new(InputOptions::default()),
            atlas_texture: None,
            visible: true,
        }
    }

    /// Creates a fresh context rendering into `main`, replacing any live one.
    pub fn init(&mut self, main: HostWindow, config: &Config) -> Result<()> {
        let host = Arc::clone(&self.host);
        let mut factory = HostRendererFactory::new(host.as_ref());
        self.init_with_factory(main, config, &mut factory)
    }

    /// Like [`State::init`], constructing renderers through `factory`.
    pub fn init_with_factory(
        &mut self,
        main: HostWindow,
        config: &Config,
        factory: &mut dyn RendererFactory,
    ) -> Result<()> {
        check_pointer_width(usize::BITS)?;
        config.validate()?;

        if self.context.is_some() {
            log::debug!("replacing live GUI context");
        }
        self.teardown();

        let mut context = self.library.create_context();
        {
            let io = context.io_mut();
            io.backend_flags = BackendFlags::bridge();
            io.backend_platform_name = BACKEND_PLATFORM_NAME.to_string();
        }

        let caps = Capabilities::detect(self.host.as_ref());
        let selection = select_renderer(config.renderer, caps, factory);
        let mut renderer = selection.renderer;
        context.io_mut().backend_renderer_name = renderer.name().to_string();
        renderer.init_viewport(main.surface);

        context.io_mut().ini_filename = if config.ini_filename.is_empty() {
            None
        } else {
            Some(self.host.globalize_path(&config.ini_filename))
        };

        self.scale.set_base(config.scale);
        self.context = Some(context);
        self.renderer = Some(renderer);
        self.variant = Some(selection.variant);
        self.fallback = selection.fallback;
        self.viewports = Some(ViewportRegistry::new(main));
        self.input.reset_cursor();
        self.visible = true;
        self.lifecycle = Lifecycle::Ready;

        self.reset_font_config(true)?;
        let host = Arc::clone(&self.host);
        for (i, spec) in config.fonts.iter().enumerate() {
            match spec.font_data.load(|path| host.globalize_path(path)) {
                Ok(data) => self.fonts.add_font(data, spec.font_size, i > 0 && spec.merge),
                Err(e) => log::error!("skipping font {i}: {e}"),
            }
        }
        if config.add_default_font {
            self.fonts.add_font_default();
        }
        self.rebuild_font_atlas()?;

        log::info!(
            "imbridge initialized ({} renderer, scale {})",
            self.renderer_name().unwrap_or("no"),
            self.scale.effective()
        );
        Ok(())
    }

    /// Sets frame timing, forwards input state, and opens a new frame.
    pub fn update(&mut self, delta: f32, display_size: Vec2) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Ready => {}
            Lifecycle::FrameOpen => return Err(BridgeError::FrameInProgress),
            Lifecycle::Uninitialized | Lifecycle::Disposed => {
                return Err(BridgeError::NotInitialized)
            }
        }
        let context = self.context.as_mut().ok_or(BridgeError::NotInitialized)?;

        let io = context.io_mut();
        io.display_size = display_size;
        io.delta_time = delta;
        let feedback = self.input.update(io);
        if let Some(cursor) = feedback.cursor {
            self.host.set_mouse_cursor(cursor);
        }
        if let Some(position) = feedback.warp {
            self.host.warp_mouse(position);
        }

        context.new_frame();
        self.lifecycle = Lifecycle::FrameOpen;
        Ok(())
    }

    /// Finalizes the open frame, syncs platform windows, and draws.
    pub fn render(&mut self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::FrameOpen => {}
            Lifecycle::Ready => return Err(BridgeError::NoFrameOpen),
            Lifecycle::Uninitialized | Lifecycle::Disposed => {
                return Err(BridgeError::NotInitialized)
            }
        }
        let (Some(context), Some(renderer), Some(viewports)) = (
            self.context.as_mut(),
            self.renderer.as_mut(),
            self.viewports.as_mut(),
        ) else {
            return Err(BridgeError::NotInitialized);
        };

        context.render();
        for request in context.update_platform_windows() {
            match request {
                PlatformRequest::Create {
                    viewport,
                    position,
                    size,
                } => match self.host.window_create(position, size) {
                    Ok(window) => {
                        log::debug!("opened platform window {:?} for {viewport:?}", window.window);
                        if let Some(stale) = viewports.insert(viewport, window) {
                            renderer.close_viewport(stale.surface);
                            self.host.window_close(stale.window);
                        }
                        renderer.init_viewport(window.surface);
                    }
                    Err(e) => log::error!("failed to open platform window for {viewport:?}: {e}"),
                },
                PlatformRequest::Destroy { viewport } => {
                    if let Some(window) = viewports.remove(viewport) {
                        log::debug!("closed platform window {:?} for {viewport:?}", window.window);
                        renderer.close_viewport(window.surface);
                        self.host.window_close(window.window);
                    }
                }
            }
        }

        if self.visible {
            renderer.render(&RenderFrame {
                draw_data: context.draw_data(),
                textures: &self.textures,
                viewports: &*viewports,
            });
        }
        self.lifecycle = Lifecycle::Ready;
        Ok(())
    }

    /// Releases the renderer, platform windows, and the context.
    ///
    /// Calling this on a state that is not initialized does nothing.
    pub fn shutdown(&mut self) {
        if !matches!(self.lifecycle, Lifecycle::Ready | Lifecycle::FrameOpen) {
            return;
        }
        self.teardown();
        self.lifecycle = Lifecycle::Disposed;
        log::info!("imbridge shut down");
    }

    fn teardown(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.on_hide();
            if let Some(viewports) = self.viewports.as_mut() {
                for (_, window) in viewports.drain_platform_windows() {
                    renderer.close_viewport(window.surface);
                    self.host.window_close(window.window);
                }
            }
            renderer.dispose();
        }
        if let Some((id, texture)) = self.atlas_texture.take() {
            self.textures.unbind(id);
            self.host.texture_free(texture);
        }
        self.viewports = None;
        self.context = None;
        self.variant = None;
        self.fallback = None;
    }

    /// Forwards a host input event received by `window`.
    ///
    /// Returns true if the GUI wants this kind of input and the host should
    /// ignore the event.
    pub fn process_input(&mut self, event: &InputEvent, window: WindowId) -> bool {
        let Some(context) = self.context.as_mut() else {
            return false;
        };
        let source = EventSource {
            viewport: self.viewports.as_ref().and_then(|v| v.viewport_of(window)),
            window_position: if event.is_mouse() {
                self.host.window_position(window)
            } else {
                Vec2::ZERO
            },
        };
        self.input.process_input(event, &source, context.io_mut())
    }

    /// Asks the GUI library to close the platform window shown in `window`.
    ///
    /// Returns false for the main window and for unknown windows.
    pub fn close_window(&mut self, window: WindowId) -> bool {
        let (Some(context), Some(viewports)) = (self.context.as_mut(), self.viewports.as_ref())
        else {
            return false;
        };
        match viewports.viewport_of(window) {
            Some(viewport) if viewport != ViewportId::MAIN => {
                context.io_mut().add_viewport_close_event(viewport);
                true
            }
            _ => false,
        }
    }

    /// Sets the base scale.
    ///
    /// Returns `Ok(false)` when the value is rejected or unchanged; otherwise
    /// the style is rescaled and the font atlas rebuilt once.
    pub fn set_scale(&mut self, value: f32) -> Result<bool> {
        if self.lifecycle == Lifecycle::FrameOpen {
            return Err(BridgeError::FrameInProgress);
        }
        if !self.scale.set_base(value) {
            log::debug!("scale {value} rejected or unchanged");
            return Ok(false);
        }
        if self.context.is_some() {
            self.reset_font_config(false)?;
            self.rebuild_font_atlas()?;
        }
        Ok(true)
    }

    /// Turns DPI scaling on or off. Takes effect at the next rebuild.
    pub fn set_scale_to_dpi(&mut self, enabled: bool) {
        self.scale.set_scale_to_dpi(enabled);
    }

    /// The DPI factor, queried from the host on first use and cached.
    pub fn dpi_factor(&mut self) -> i32 {
        let host = &self.host;
        self.scale.dpi_factor(|| host.screen_dpi())
    }

    /// Queries the host DPI again and replaces the cached factor.
    pub fn recompute_dpi_factor(&mut self) -> i32 {
        self.scale.recompute_dpi_factor(self.host.screen_dpi())
    }

    /// Effective UI scale: base scale times the DPI factor when enabled.
    pub fn effective_scale(&mut self) -> f32 {
        self.dpi_factor();
        self.scale.effective()
    }

    pub fn scale(&self) -> &ScaleState {
        &self.scale
    }

    /// Rescales the style for the effective scale.
    ///
    /// With `reset_list` the queued font list is cleared as well.
    pub fn reset_font_config(&mut self, reset_list: bool) -> Result<()> {
        if self.lifecycle == Lifecycle::FrameOpen {
            return Err(BridgeError::FrameInProgress);
        }
        let scale = self.effective_scale();
        let context = self.context.as_mut().ok_or(BridgeError::NotInitialized)?;
        if reset_list {
            self.fonts.reset();
        }
        context.scale_style(scale);
        Ok(())
    }

    /// Queues a font for the next atlas rebuild.
    pub fn add_font(&mut self, data: Arc<[u8]>, size: i32, merge: bool) {
        self.fonts.add_font(data, size, merge);
    }

    /// Queues the library's built-in font.
    pub fn add_font_default(&mut self) {
        self.fonts.add_font_default();
    }

    pub fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    /// Rasterizes the queued fonts and swaps in the new atlas texture.
    pub fn rebuild_font_atlas(&mut self) -> Result<()> {
        if self.lifecycle == Lifecycle::FrameOpen {
            return Err(BridgeError::FrameInProgress);
        }
        let scale = self.effective_scale();
        let context = self.context.as_mut().ok_or(BridgeError::NotInitialized)?;

        let image = self.fonts.rebuild(context.fonts(), scale)?;
        let texture = self.host.texture_create(&image);
        let id = self.textures.bind(texture);
        context.fonts().set_texture_id(id);

        if let Some((old_id, old_texture)) = self.atlas_texture.replace((id, texture)) {
            if old_texture != texture {
                self.textures.unbind(old_id);
                self.host.texture_free(old_texture);
            }
        }
        Ok(())
    }

    /// Registers a host texture for use in draw commands.
    pub fn bind_texture(&mut self, texture: TextureResource) -> TextureId {
        self.textures.bind(texture)
    }

    /// Removes a texture handle. Unknown handles are ignored.
    pub fn unbind_texture(&mut self, id: TextureId) {
        if self.textures.unbind(id).is_none() {
            log::debug!("unbind of unknown texture handle {id:?}");
        }
    }

    /// Removes the handle of a host texture. Unknown textures are ignored.
    pub fn unbind_texture_resource(&mut self, texture: TextureResource) {
        if self.textures.unbind_resource(texture).is_none() {
            log::debug!("unbind of unbound texture {texture:?}");
        }
    }

    pub fn textures(&self) -> &TextureBindings {
        &self.textures
    }

    /// Shows or hides the GUI. Hiding drops everything the renderer drew.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible && !visible {
            self.on_hide();
        }
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_hide(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.on_hide();
        }
    }

    pub fn input_options(&self) -> InputOptions {
        self.input.options
    }

    pub fn input_options_mut(&mut self) -> &mut InputOptions {
        &mut self.input.options
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready | Lifecycle::FrameOpen)
    }

    pub fn context(&self) -> Option<&dyn GuiContext> {
        self.context.as_deref()
    }

    pub fn context_mut(&mut self) -> Option<&mut (dyn GuiContext + 'static)> {
        self.context.as_deref_mut()
    }

    pub fn viewports(&self) -> Option<&ViewportRegistry> {
        self.viewports.as_ref()
    }

    pub fn renderer_name(&self) -> Option<&'static str> {
        self.renderer.as_ref().map(|r| r.name())
    }

    /// The renderer variant selected by the last `init`.
    pub fn renderer_variant(&self) -> Option<RendererVariant> {
        self.variant
    }

    /// The fallback taken by the last `init`, if construction failed.
    pub fn fallback(&self) -> Option<&Fallback> {
        self.fallback.as_ref()
    }

    /// Handle of the current font atlas texture.
    pub fn atlas_texture(&self) -> Option<TextureId> {
        self.atlas_texture.map(|(id, _)| id)
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.shutdown();
    }
}
