//! Window state
//!
//! One window owns its surface, glyph atlas, pipelines, cell grid and text
//! buffer.

use std::sync::Arc;

use anyhow::Context;
use rush::Config;
use rush_core::{CellMetrics, Grid, TextBuffer};
use rush_renderer::{Color, CursorRenderer, GlyphCache, TextRenderer};
use winit::{event_loop::ActiveEventLoop, window::Window};

use crate::font::LoadedFont;
use crate::gpu::{SharedGpuState, WindowGpuState, preferred_surface_format};

/// Colors resolved from config
#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub text: Color,
    pub cursor: Color,
    pub background: Color,
}

impl Colors {
    pub fn from_config(config: &Config) -> Self {
        Self {
            text: config.text_color(),
            cursor: config.cursor_color(),
            background: config.background_color(),
        }
    }
}

pub struct WindowState {
    pub window: Arc<Window>,
    pub gpu: WindowGpuState,
    pub grid: Grid,
    pub buffer: TextBuffer,
    pub colors: Colors,
    pub scale_factor: f32,
    /// Content changed since the last frame
    pub dirty: bool,
}

fn build_glyph_cache(
    shared: &SharedGpuState,
    font: &LoadedFont,
    font_size: f32,
    color: Color,
) -> anyhow::Result<GlyphCache> {
    let mut glyph_cache = GlyphCache::new(&shared.device, &font.data, font.index, font_size, color)
        .context("Failed to create glyph cache")?;
    glyph_cache.precache_ascii();
    glyph_cache.flush(&shared.queue);
    Ok(glyph_cache)
}

fn cell_metrics(glyph_cache: &GlyphCache) -> CellMetrics {
    CellMetrics::new(glyph_cache.cell_width(), glyph_cache.line_height())
}

impl WindowState {
    pub fn new(
        event_loop: &ActiveEventLoop,
        shared: &SharedGpuState,
        config: &Config,
        font: &LoadedFont,
    ) -> anyhow::Result<Self> {
        // Approximate the initial size; the grid is derived from the real one
        let font_size = config.font_size();
        let approx_cell_width = font_size * 0.6;
        let approx_line_height = font_size * 1.2;
        let width = (config.window.columns as f32 * approx_cell_width).ceil() as u32;
        let height = (config.window.rows as f32 * approx_line_height).ceil() as u32;

        let window_attrs = Window::default_attributes()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );
        let size = window.inner_size();
        let scale_factor = window.scale_factor() as f32;

        let surface = shared
            .instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let caps = surface.get_capabilities(&shared.adapter);
        let format = preferred_surface_format(&caps.formats)
            .context("Surface reports no supported formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&shared.device, &surface_config);

        let colors = Colors::from_config(config);
        let glyph_cache = build_glyph_cache(shared, font, font_size * scale_factor, colors.text)?;

        let screen_width = surface_config.width as f32;
        let screen_height = surface_config.height as f32;

        let mut text_renderer = TextRenderer::new(&shared.device, format)?;
        text_renderer.set_glyph_cache(&shared.device, &glyph_cache);
        text_renderer.update_screen_size(screen_width, screen_height);

        let mut cursor_renderer = CursorRenderer::new(&shared.device, format)?;
        cursor_renderer.set_visible(config.cursor.visible);

        let grid = Grid::new(cell_metrics(&glyph_cache), screen_width, screen_height);
        let buffer = TextBuffer::new(grid.size());

        log::info!(
            "Created {}x{} window, grid {}x{}",
            screen_width,
            screen_height,
            grid.size().columns,
            grid.size().rows
        );

        Ok(Self {
            window,
            gpu: WindowGpuState {
                surface,
                config: surface_config,
                glyph_cache,
                text_renderer,
                cursor_renderer,
            },
            grid,
            buffer,
            colors,
            scale_factor,
            dirty: true,
        })
    }

    /// Surface resize: reconfigure, regrid and reflow
    pub fn handle_resize(&mut self, shared: &SharedGpuState, width: u32, height: u32) {
        self.gpu.resize_surface(&shared.device, width, height);
        let (width, height) = (self.gpu.config.width as f32, self.gpu.config.height as f32);
        if self.grid.resize(width, height) {
            self.buffer.resize(self.grid.size());
        }
        self.dirty = true;
    }

    /// Apply a reloaded config: rebuild the atlas and refresh colors
    pub fn apply_config(
        &mut self,
        shared: &SharedGpuState,
        config: &Config,
        font: &LoadedFont,
    ) -> anyhow::Result<()> {
        let colors = Colors::from_config(config);
        let font_size = config.font_size() * self.scale_factor;
        let glyph_cache = build_glyph_cache(shared, font, font_size, colors.text)?;

        self.gpu.text_renderer.set_glyph_cache(&shared.device, &glyph_cache);
        if self.grid.set_metrics(cell_metrics(&glyph_cache)) {
            self.buffer.resize(self.grid.size());
        }
        self.gpu.glyph_cache = glyph_cache;
        self.gpu.cursor_renderer.set_visible(config.cursor.visible);
        self.window.set_title(&config.window.title);
        self.colors = colors;
        self.dirty = true;
        Ok(())
    }
}
