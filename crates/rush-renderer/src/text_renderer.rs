//! Text renderer drawing glyph quads from the atlas
//!
//! Each glyph becomes two triangles whose vertices already carry clip-space
//! positions and atlas coordinates. All text renders in a single draw call
//! through the alpha-tested text program.

use crate::RenderError;
use crate::geometry::glyph_quad;
use crate::glyph_cache::{GlyphCache, PositionedGlyph};
use crate::shaders::{self, ENTRY_POINT};
use crate::vertex::TextVertex;

const VERTICES_PER_GLYPH: usize = 6;

/// Text renderer using the text.vert / text.frag program
pub struct TextRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    vertex_buffer: wgpu::Buffer,
    glyph_capacity: usize,
    sampler: wgpu::Sampler,
    bind_group: Option<wgpu::BindGroup>,
    screen_size: (f32, f32),
    /// Pending vertices to render
    vertices: Vec<TextVertex>,
}

impl TextRenderer {
    const MAX_GLYPHS: usize = 16 * 1024;

    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, RenderError> {
        let vertex_shader = shaders::create_module(device, &shaders::TEXT_VERTEX)?;
        let fragment_shader = shaders::create_module(device, &shaders::TEXT_FRAGMENT)?;

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Text Bind Group Layout"),
            entries: &[
                // text
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // text_sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Text Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Text Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some(ENTRY_POINT),
                buffers: &[TextVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some(ENTRY_POINT),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let glyph_capacity = Self::MAX_GLYPHS;
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Text Vertex Buffer"),
            size: (glyph_capacity * VERTICES_PER_GLYPH * std::mem::size_of::<TextVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Text Atlas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            vertex_buffer,
            glyph_capacity,
            sampler,
            bind_group: None,
            screen_size: (1.0, 1.0),
            vertices: Vec::with_capacity(Self::MAX_GLYPHS * VERTICES_PER_GLYPH),
        })
    }

    /// Bind a glyph cache atlas as the `text` texture
    pub fn set_glyph_cache(&mut self, device: &wgpu::Device, glyph_cache: &GlyphCache) {
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Text Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&glyph_cache.atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
    }

    /// Clear pending glyphs
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Screen size used for the pixel to clip-space conversion
    pub fn update_screen_size(&mut self, width: f32, height: f32) {
        self.screen_size = (width.max(1.0), height.max(1.0));
    }

    /// Add a positioned glyph
    pub fn push_glyph(&mut self, glyph: &PositionedGlyph) {
        if self.glyph_count() >= self.glyph_capacity {
            log::debug!("Text vertex buffer full, dropping glyph");
            return;
        }
        let (width, height) = self.screen_size;
        self.vertices.extend_from_slice(&glyph_quad(glyph, width, height));
    }

    /// Upload vertices and render
    pub fn render<'a>(&'a self, queue: &wgpu::Queue, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.vertices.is_empty() {
            return;
        }

        let Some(bind_group) = &self.bind_group else {
            return;
        };

        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertices.len() as u32, 0..1);
    }

    pub fn glyph_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_GLYPH
    }
}
