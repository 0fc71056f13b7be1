//! Glyph cache with texture atlas for fast terminal rendering
//!
//! Pre-rasterizes glyphs using swash and stores them in a GPU texture atlas.
//! The atlas is RGBA: RGB holds the text color and A holds glyph coverage,
//! which is exactly what the alpha-tested text fragment stage samples.

use std::collections::HashMap;
use swash::{
    FontRef,
    scale::{Render, ScaleContext, Source, StrikeWith},
    zeno::Format,
};

use crate::RenderError;
use crate::color::Color;

const ATLAS_SIZE: u32 = 1024;

/// Key for glyph lookup - character + size
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GlyphKey {
    pub character: char,
    pub size_tenths: u16,
}

impl GlyphKey {
    pub fn new(character: char, size: f32) -> Self {
        Self {
            character,
            size_tenths: (size * 10.0) as u16,
        }
    }
}

/// Cached glyph data - position in atlas + metrics for positioning
#[derive(Clone, Copy, Debug)]
pub struct CachedGlyph {
    /// UV coordinates in atlas (normalized 0.0-1.0)
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Glyph bitmap dimensions
    pub width: f32,
    pub height: f32,
    /// Placement offset from cell origin
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Atlas packing state (rows of glyphs with a 1px gutter)
pub(crate) struct AtlasPacker {
    width: u32,
    height: u32,
    row_x: u32,
    row_y: u32,
    row_height: u32,
}

impl AtlasPacker {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            row_x: 1,
            row_y: 1,
            row_height: 0,
        }
    }

    pub(crate) fn allocate(&mut self, glyph_width: u32, glyph_height: u32) -> Option<(u32, u32)> {
        let padded_width = glyph_width + 1;
        let padded_height = glyph_height + 1;

        if padded_width + 1 > self.width {
            return None;
        }

        if self.row_x + padded_width > self.width {
            self.row_x = 1;
            self.row_y += self.row_height;
            self.row_height = 0;
        }

        if self.row_y + padded_height > self.height {
            return None;
        }

        let x = self.row_x;
        let y = self.row_y;

        self.row_x += padded_width;
        self.row_height = self.row_height.max(padded_height);

        Some((x, y))
    }
}

/// Expand an alpha mask into RGBA texels of a single color
pub(crate) fn coverage_to_rgba(coverage: &[u8], color: [u8; 3]) -> Vec<u8> {
    let mut texels = Vec::with_capacity(coverage.len() * 4);
    for &alpha in coverage {
        texels.extend_from_slice(&[color[0], color[1], color[2], alpha]);
    }
    texels
}

/// Positioned glyph ready for rendering
#[derive(Clone, Copy, Debug)]
pub struct PositionedGlyph {
    /// Screen position (top-left of glyph bitmap)
    pub x: f32,
    pub y: f32,
    /// Glyph bitmap dimensions
    pub width: f32,
    pub height: f32,
    /// UV coordinates in atlas
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

/// Glyph cache with GPU texture atlas
pub struct GlyphCache {
    font_data: Vec<u8>,
    /// Face index within a font collection
    font_index: usize,
    scale_context: ScaleContext,
    /// Font size in pixels
    font_size: f32,
    /// Text color baked into atlas texels
    color: [u8; 3],
    /// Monospace advance
    cell_width: f32,
    line_height: f32,
    /// Baseline position within cell (from top)
    baseline_offset: f32,
    glyphs: HashMap<GlyphKey, CachedGlyph>,
    pub atlas_texture: wgpu::Texture,
    pub atlas_view: wgpu::TextureView,
    atlas_width: u32,
    atlas_height: u32,
    packer: AtlasPacker,
    /// RGBA texels waiting for upload
    staging_data: Vec<u8>,
    /// Pending uploads: (x, y, width, height, offset into staging_data)
    pending_uploads: Vec<(u32, u32, u32, u32, usize)>,
}

impl GlyphCache {
    pub fn new(
        device: &wgpu::Device,
        font_data: &[u8],
        font_index: u32,
        font_size: f32,
        color: Color,
    ) -> Result<Self, RenderError> {
        let font_data = font_data.to_vec();
        let font_index = font_index as usize;
        let font = FontRef::from_index(&font_data, font_index).ok_or_else(|| {
            RenderError::FontLoad(format!("no usable face at index {}", font_index))
        })?;

        let atlas_width = ATLAS_SIZE;
        let atlas_height = ATLAS_SIZE;

        let atlas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Glyph Atlas"),
            size: wgpu::Extent3d {
                width: atlas_width,
                height: atlas_height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let atlas_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let metrics = font.metrics(&[]);
        let scale = font_size / metrics.units_per_em as f32;
        let ascent = metrics.ascent * scale;
        let descent = metrics.descent.abs() * scale;
        let leading = metrics.leading * scale;

        let line_height = (ascent + descent + leading).ceil();
        let baseline_offset = ascent.round();

        // Monospace cell width is the advance of 'M'
        let glyph_id = font.charmap().map('M');
        let cell_width = if glyph_id != 0 {
            font.glyph_metrics(&[]).scale(font_size).advance_width(glyph_id).ceil()
        } else {
            (font_size * 0.6).ceil()
        };

        log::info!(
            "Glyph cache: {}px font, cell {}x{}",
            font_size,
            cell_width,
            line_height
        );

        Ok(Self {
            font_data,
            font_index,
            scale_context: ScaleContext::new(),
            font_size,
            color: color.to_rgb8(),
            cell_width,
            line_height,
            baseline_offset,
            glyphs: HashMap::new(),
            atlas_texture,
            atlas_view,
            atlas_width,
            atlas_height,
            packer: AtlasPacker::new(atlas_width, atlas_height),
            staging_data: Vec::new(),
            pending_uploads: Vec::new(),
        })
    }

    /// Get or create a cached glyph
    ///
    /// Returns `None` for characters the font does not map, or when the
    /// atlas has no room left.
    pub fn get_or_insert(&mut self, character: char) -> Option<CachedGlyph> {
        let key = GlyphKey::new(character, self.font_size);

        if let Some(&glyph) = self.glyphs.get(&key) {
            return Some(glyph);
        }

        let font = FontRef::from_index(&self.font_data, self.font_index)?;
        let glyph_id = font.charmap().map(character);

        if glyph_id == 0 {
            return None;
        }

        let mut scaler = self
            .scale_context
            .builder(font)
            .size(self.font_size)
            .hint(true)
            .build();

        // Mask sources only: atlas texels are coverage tinted with one color
        let image = Render::new(&[Source::Outline, Source::Bitmap(StrikeWith::BestFit)])
            .format(Format::Alpha)
            .render(&mut scaler, glyph_id)?;

        // Spaces and other blank glyphs
        if image.placement.width == 0 || image.placement.height == 0 {
            let glyph = CachedGlyph {
                uv_min: [0.0, 0.0],
                uv_max: [0.0, 0.0],
                width: 0.0,
                height: 0.0,
                offset_x: 0.0,
                offset_y: 0.0,
            };
            self.glyphs.insert(key, glyph);
            return Some(glyph);
        }

        let Some((x, y)) = self
            .packer
            .allocate(image.placement.width, image.placement.height)
        else {
            log::warn!("Glyph atlas full, dropping {:?}", character);
            return None;
        };

        let data_offset = self.staging_data.len();
        self.staging_data
            .extend_from_slice(&coverage_to_rgba(&image.data, self.color));
        self.pending_uploads.push((
            x,
            y,
            image.placement.width,
            image.placement.height,
            data_offset,
        ));

        let uv_min = [
            x as f32 / self.atlas_width as f32,
            y as f32 / self.atlas_height as f32,
        ];
        let uv_max = [
            (x + image.placement.width) as f32 / self.atlas_width as f32,
            (y + image.placement.height) as f32 / self.atlas_height as f32,
        ];

        let glyph = CachedGlyph {
            uv_min,
            uv_max,
            width: image.placement.width as f32,
            height: image.placement.height as f32,
            offset_x: image.placement.left as f32,
            offset_y: -image.placement.top as f32, // placement.top is baseline-relative
        };

        self.glyphs.insert(key, glyph);
        Some(glyph)
    }

    /// Position a character in the cell whose top-left is (cell_x, cell_y)
    pub fn position_char(
        &mut self,
        character: char,
        cell_x: f32,
        cell_y: f32,
    ) -> Option<PositionedGlyph> {
        let glyph = self.get_or_insert(character)?;

        if glyph.width == 0.0 || glyph.height == 0.0 {
            return None;
        }

        Some(PositionedGlyph {
            x: cell_x + glyph.offset_x,
            y: cell_y + self.baseline_offset + glyph.offset_y,
            width: glyph.width,
            height: glyph.height,
            uv_min: glyph.uv_min,
            uv_max: glyph.uv_max,
        })
    }

    /// Upload pending glyphs to GPU
    pub fn flush(&mut self, queue: &wgpu::Queue) {
        for (x, y, width, height, data_offset) in self.pending_uploads.drain(..) {
            let data_end = data_offset + (width * height * 4) as usize;
            let data = &self.staging_data[data_offset..data_end];

            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &self.atlas_texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d { x, y, z: 0 },
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * 4),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }
        self.staging_data.clear();
    }

    /// Pre-cache printable ASCII
    pub fn precache_ascii(&mut self) {
        for c in 32u8..=126u8 {
            self.get_or_insert(c as char);
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cached_count(&self) -> usize {
        self.glyphs.len()
    }
}
