#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
//! Headless bridge demonstration.
//!
//! This demo shows:
//! - A minimal host with no display, which forces the dummy renderer
//! - A toy GUI library that echoes the input events it receives
//! - The init / update / render / shutdown cycle and scale changes
//!
//! Run with: `RUST_LOG=debug cargo run --example headless_demo`

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use imbridge::{Config, GuiBridge, HostKey, HostWindow, InputEvent, KeyEvent, Vec2, WindowId};
use imbridge_core::{
    AtlasImage, CanvasServer, DrawData, FontAtlas, FontSource, GuiContext, GuiLibrary, Host,
    HostError, Io, MouseCursor, PlatformRequest, RenderingDevice, SurfaceId, TextureId,
    TextureResource, HEADLESS_DISPLAY,
};

/// A host without a display.
#[derive(Default)]
struct HeadlessHost {
    next_texture: AtomicU64,
}

impl Host for HeadlessHost {
    fn display_server_name(&self) -> String {
        HEADLESS_DISPLAY.to_string()
    }

    fn screen_dpi(&self) -> i32 {
        96
    }

    fn thread_model(&self) -> i32 {
        1
    }

    fn globalize_path(&self, path: &str) -> PathBuf {
        std::env::temp_dir().join(path.trim_start_matches("user://"))
    }

    fn canvas_server(&self) -> Option<Arc<dyn CanvasServer>> {
        None
    }

    fn rendering_device(&self) -> Option<Arc<dyn RenderingDevice>> {
        None
    }

    fn texture_create(&self, image: &AtlasImage) -> TextureResource {
        let id = self.next_texture.fetch_add(1, Ordering::Relaxed) + 1;
        println!("host: texture {id} ({}x{})", image.width, image.height);
        TextureResource(id)
    }

    fn texture_free(&self, texture: TextureResource) {
        println!("host: freed texture {}", texture.0);
    }

    fn window_create(&self, _position: Vec2, _size: Vec2) -> Result<HostWindow, HostError> {
        Err(HostError::new("headless host has no windows"))
    }

    fn window_close(&self, _window: WindowId) {}

    fn window_position(&self, _window: WindowId) -> Vec2 {
        Vec2::ZERO
    }

    fn set_mouse_cursor(&self, cursor: MouseCursor) {
        println!("host: cursor {cursor:?}");
    }

    fn warp_mouse(&self, _position: Vec2) {}
}

/// Atlas that "rasterizes" one pixel row per font.
#[derive(Default)]
struct EchoAtlas {
    fonts: Vec<f32>,
}

impl FontAtlas for EchoAtlas {
    fn clear(&mut self) {
        self.fonts.clear();
    }

    fn add_font(&mut self, _source: FontSource<'_>, size_pixels: f32, _merge: bool) {
        self.fonts.push(size_pixels);
    }

    fn build(&mut self) -> imbridge::Result<AtlasImage> {
        let width = self.fonts.iter().copied().fold(1.0_f32, f32::max).ceil() as u32;
        let height = self.fonts.len() as u32;
        Ok(AtlasImage {
            width,
            height,
            pixels: vec![255; (width * height * 4) as usize],
        })
    }

    fn set_texture_id(&mut self, id: TextureId) {
        println!("library: atlas bound to {id:?}");
    }
}

#[derive(Default)]
struct EchoContext {
    io: Io,
    atlas: EchoAtlas,
    frame: u64,
}

impl GuiContext for EchoContext {
    fn io(&self) -> &Io {
        &self.io
    }

    fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    fn fonts(&mut self) -> &mut dyn FontAtlas {
        &mut self.atlas
    }

    fn scale_style(&mut self, scale: f32) {
        println!("library: style scaled by {scale}");
    }

    fn new_frame(&mut self) {
        self.frame += 1;
        for event in self.io.take_events() {
            println!("library: frame {} got {event:?}", self.frame);
        }
    }

    fn render(&mut self) {}

    fn draw_data(&self) -> &[DrawData] {
        &[]
    }

    fn update_platform_windows(&mut self) -> Vec<PlatformRequest> {
        Vec::new()
    }
}

struct EchoLibrary;

impl GuiLibrary for EchoLibrary {
    fn create_context(&mut self) -> Box<dyn GuiContext> {
        Box::new(EchoContext::default())
    }
}

fn main() -> imbridge::Result<()> {
    let main_window = HostWindow {
        window: WindowId(1),
        surface: SurfaceId(1),
    };
    let mut bridge = GuiBridge::new(Arc::new(HeadlessHost::default()), Box::new(EchoLibrary));

    let config = Config {
        ini_filename: String::new(),
        ..Config::default()
    };
    bridge.init(main_window, &config)?;
    println!("renderer: {}", bridge.renderer_name().unwrap_or("none"));

    for frame in 0..3 {
        let mut key = KeyEvent::new(HostKey::A, true);
        key.unicode = Some('a');
        bridge.process_input(&InputEvent::Key(key), main_window.window);

        bridge.update(1.0 / 60.0, Vec2::new(1280.0, 720.0))?;
        bridge.render()?;

        if frame == 1 {
            bridge.set_scale(1.5)?;
        }
    }

    bridge.shutdown();
    Ok(())
}
