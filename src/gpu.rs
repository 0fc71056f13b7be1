//! GPU state management
//!
//! Device-level and per-window GPU resources for wgpu rendering.

use anyhow::Context;
use rush_renderer::{CursorRenderer, GlyphCache, TextRenderer};

/// GPU resources shared by everything in the process
pub struct SharedGpuState {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl SharedGpuState {
    pub fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        // Request adapter without a surface first (the surface is created per window)
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .context("Failed to find suitable GPU adapter")?;

        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .context("Failed to create device")?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }
}

/// Pick the surface format, preferring a non-sRGB one
///
/// Config colors are written to the target as-is, so an sRGB target would
/// encode them a second time.
pub fn preferred_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Per-window GPU state (surface tied to a specific window)
pub struct WindowGpuState {
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub glyph_cache: GlyphCache,
    pub text_renderer: TextRenderer,
    pub cursor_renderer: CursorRenderer,
}

impl WindowGpuState {
    /// Reconfigure the surface for a new size
    pub fn resize_surface(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(device, &self.config);
        self.text_renderer
            .update_screen_size(self.config.width as f32, self.config.height as f32);
    }
}
