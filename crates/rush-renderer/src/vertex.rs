//! Vertex formats matching the GLSL attribute locations

use bytemuck::{Pod, Zeroable};

/// Text quad vertex: clip-space xy + texture coordinate (location 0, vec4)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TextVertex {
    pub vertex: [f32; 4],
}

impl TextVertex {
    pub fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { vertex: [x, y, u, v] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TextVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // vertex
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colored vertex: position (location 0) + color (location 1)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes_match_strides() {
        assert_eq!(std::mem::size_of::<TextVertex>(), 16);
        assert_eq!(std::mem::size_of::<ColorVertex>(), 24);
        assert_eq!(TextVertex::layout().array_stride, 16);
        assert_eq!(ColorVertex::layout().array_stride, 24);
    }

    #[test]
    fn test_attribute_locations() {
        let text: Vec<u32> = TextVertex::layout()
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(text, vec![0]);
        let color: Vec<(u32, u64)> = ColorVertex::layout()
            .attributes
            .iter()
            .map(|a| (a.shader_location, a.offset))
            .collect();
        assert_eq!(color, vec![(0, 0), (1, 12)]);
    }

    #[test]
    fn test_color_vertex_bytes() {
        let v = ColorVertex {
            position: [1.0, 2.0, 3.0],
            color: [4.0, 5.0, 6.0],
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
