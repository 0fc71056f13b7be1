//! Shader module - GLSL programs for the text and cursor pipelines
//!
//! Shaders are stored as external GLSL files and included at compile time.
//! They are parsed and validated with naga's GLSL front end, then handed to
//! wgpu as naga IR, so a broken shader is reported with its file label
//! before any pipeline is built.

use std::borrow::Cow;
use thiserror::Error;

/// Built-in shaders included at compile time
pub mod builtin {
    /// Text quad vertex stage - clip-space xy and texture coordinate packed in one vec4
    pub const TEXT_VERT: &str = include_str!("text.vert");

    /// Colored geometry vertex stage - position and color passthrough
    pub const COLOR_VERT: &str = include_str!("color.vert");

    /// Alpha-tested text fragment stage - samples `text`, discards below the cutoff
    pub const TEXT_FRAG: &str = include_str!("text.frag");

    /// Flat color fragment stage for the cursor
    pub const COLOR_FRAG: &str = include_str!("color.frag");
}

/// Entry point name every GLSL stage uses
pub const ENTRY_POINT: &str = "main";

/// Fragments whose sampled alpha is below this are discarded
pub const ALPHA_CUTOFF: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    fn naga_stage(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// A GLSL source with the stage it is compiled for
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    pub label: &'static str,
    pub stage: Stage,
    pub code: &'static str,
}

pub const TEXT_VERTEX: ShaderSource = ShaderSource {
    label: "text.vert",
    stage: Stage::Vertex,
    code: builtin::TEXT_VERT,
};

pub const COLOR_VERTEX: ShaderSource = ShaderSource {
    label: "color.vert",
    stage: Stage::Vertex,
    code: builtin::COLOR_VERT,
};

pub const TEXT_FRAGMENT: ShaderSource = ShaderSource {
    label: "text.frag",
    stage: Stage::Fragment,
    code: builtin::TEXT_FRAG,
};

pub const COLOR_FRAGMENT: ShaderSource = ShaderSource {
    label: "color.frag",
    stage: Stage::Fragment,
    code: builtin::COLOR_FRAG,
};

pub const ALL: [ShaderSource; 4] = [TEXT_VERTEX, COLOR_VERTEX, TEXT_FRAGMENT, COLOR_FRAGMENT];

#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("{label}: GLSL parse error: {message}")]
    Parse { label: &'static str, message: String },

    #[error("{label}: validation error: {message}")]
    Validation { label: &'static str, message: String },
}

/// Parse and validate a GLSL source into naga IR
pub fn load(source: &ShaderSource) -> Result<naga::Module, ShaderError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(source.stage.naga_stage());

    let module = frontend
        .parse(&options, source.code)
        .map_err(|e| ShaderError::Parse {
            label: source.label,
            message: e.to_string(),
        })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Validation {
        label: source.label,
        message: e.to_string(),
    })?;

    log::debug!("Loaded shader {} ({:?})", source.label, source.stage);
    Ok(module)
}

/// Create a wgpu shader module from a GLSL source
pub fn create_module(
    device: &wgpu::Device,
    source: &ShaderSource,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let module = load(source)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(source.label),
        source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
    }))
}

/// CPU mirror of each stage
///
/// Each function computes what the matching GLSL `main` writes, so vertex
/// data can be checked against the stage contract without a GPU.
pub mod cpu {
    use super::ALPHA_CUTOFF;

    /// text.vert: returns (gl_Position, tex_coords)
    pub fn text_vertex_output(vertex: [f32; 4]) -> ([f32; 4], [f32; 2]) {
        ([vertex[0], vertex[1], 0.0, 1.0], [vertex[2], vertex[3]])
    }

    /// color.vert: returns (gl_Position, vertex_color)
    pub fn color_vertex_output(position: [f32; 3], color: [f32; 3]) -> ([f32; 4], [f32; 3]) {
        ([position[0], position[1], position[2], 1.0], color)
    }

    /// text.frag: `None` when the fragment is discarded
    pub fn text_fragment_output(sampled: [f32; 4]) -> Option<[f32; 4]> {
        if sampled[3] < ALPHA_CUTOFF {
            None
        } else {
            Some(sampled)
        }
    }

    /// color.frag
    pub fn color_fragment_output(vertex_color: [f32; 3]) -> [f32; 4] {
        [vertex_color[0], vertex_color[1], vertex_color[2], 1.0]
    }
}
