//! Quad construction for the text and cursor pipelines
//!
//! Neither vertex stage transforms positions, so everything is converted to
//! clip space here.

use rush_core::Rect;

use crate::glyph_cache::PositionedGlyph;
use crate::vertex::{ColorVertex, TextVertex};

/// Index order for a quad given as top-left, top-right, bottom-left, bottom-right
pub const CELL_QUAD_INDICES: [u16; 6] = [0, 1, 2, 1, 2, 3];

/// Convert window pixels (top-left origin) to clip space (y up)
pub fn pixel_to_clip(x: f32, y: f32, width: f32, height: f32) -> [f32; 2] {
    [x / width * 2.0 - 1.0, 1.0 - y / height * 2.0]
}

/// Two triangles covering a positioned glyph
pub fn glyph_quad(
    glyph: &PositionedGlyph,
    screen_width: f32,
    screen_height: f32,
) -> [TextVertex; 6] {
    let [left, top] = pixel_to_clip(glyph.x, glyph.y, screen_width, screen_height);
    let [right, bottom] = pixel_to_clip(
        glyph.x + glyph.width,
        glyph.y + glyph.height,
        screen_width,
        screen_height,
    );
    let [u0, v0] = glyph.uv_min;
    let [u1, v1] = glyph.uv_max;

    [
        TextVertex::new(left, top, u0, v0),
        TextVertex::new(left, bottom, u0, v1),
        TextVertex::new(right, bottom, u1, v1),
        TextVertex::new(left, top, u0, v0),
        TextVertex::new(right, bottom, u1, v1),
        TextVertex::new(right, top, u1, v0),
    ]
}

/// Corners of a clip-space rect (top-left anchored, extending down)
pub fn cell_quad(rect: Rect, color: [f32; 3]) -> [ColorVertex; 4] {
    let left = rect.x;
    let right = rect.x + rect.width;
    let top = rect.y;
    let bottom = rect.y - rect.height;

    [
        ColorVertex { position: [left, top, 0.0], color },
        ColorVertex { position: [right, top, 0.0], color },
        ColorVertex { position: [left, bottom, 0.0], color },
        ColorVertex { position: [right, bottom, 0.0], color },
    ]
}
