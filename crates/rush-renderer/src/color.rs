//! RGBA colors and hex color parsing

use thiserror::Error;

/// RGBA color as floats (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl Color {
    /// Create a new opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit components
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// RGB components as 8-bit values
    pub fn to_rgb8(self) -> [u8; 3] {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    pub fn to_rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

fn hex_byte(hex: &str, range: std::ops::Range<usize>) -> Result<u8, ColorParseError> {
    hex.get(range)
        .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        .ok_or_else(|| ColorParseError::InvalidColor(hex.to_string()))
}

/// Parse a hex color (#rgb, #rrggbb, #rrggbbaa)
pub fn parse_hex_color(hex: &str) -> Result<Color, ColorParseError> {
    let hex = hex.trim().trim_start_matches('#');

    match hex.len() {
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            let r = hex_byte(&expanded, 0..2)?;
            let g = hex_byte(&expanded, 2..4)?;
            let b = hex_byte(&expanded, 4..6)?;
            Ok(Color::from_u8(r, g, b, 255))
        }
        6 => {
            let r = hex_byte(hex, 0..2)?;
            let g = hex_byte(hex, 2..4)?;
            let b = hex_byte(hex, 4..6)?;
            Ok(Color::from_u8(r, g, b, 255))
        }
        8 => {
            let r = hex_byte(hex, 0..2)?;
            let g = hex_byte(hex, 2..4)?;
            let b = hex_byte(hex, 4..6)?;
            let a = hex_byte(hex, 6..8)?;
            Ok(Color::from_u8(r, g, b, a))
        }
        _ => Err(ColorParseError::InvalidColor(hex.to_string())),
    }
}
