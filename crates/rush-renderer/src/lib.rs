//! Rush Renderer - GPU text and cursor rendering
//!
//! Two programs draw everything:
//! - Text: glyph quads with clip-space positions and atlas coordinates,
//!   alpha-tested against the `text` texture (text.vert + text.frag)
//! - Cursor: a colored cell quad (color.vert + color.frag)
//!
//! Vertex stages do no transformation, so all geometry is built in clip
//! space on the CPU (see [`geometry`]).

pub mod color;
pub mod cursor_renderer;
pub mod geometry;
pub mod glyph_cache;
pub mod shaders;
pub mod text_renderer;
pub mod vertex;

pub use color::{Color, ColorParseError, parse_hex_color};
pub use cursor_renderer::CursorRenderer;
pub use glyph_cache::{CachedGlyph, GlyphCache, GlyphKey, PositionedGlyph};
pub use shaders::ShaderError;
pub use text_renderer::TextRenderer;
pub use vertex::{ColorVertex, TextVertex};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font load error: {0}")]
    FontLoad(String),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}
