//! Configuration management for rush
//!
//! Loads config from ~/.config/rush/config.toml with sensible defaults.

use rush_renderer::{Color, parse_hex_color};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font family names in order of preference (fallback chain)
    /// First available font will be used; falls back to any monospace face
    pub family: Vec<String>,
    /// Font size in points
    pub size: f32,
    /// Text color (#rgb, #rrggbb)
    pub color: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: vec![
                "DejaVu Sans Mono".to_string(),
                "JetBrains Mono".to_string(),
                "Fira Code".to_string(),
                "Menlo".to_string(),
            ],
            size: 24.0,
            color: "#80cc33".to_string(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial number of columns
    pub columns: usize,
    /// Initial number of rows
    pub rows: usize,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            title: "rush".to_string(),
        }
    }
}

/// Cursor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub color: String,
    pub visible: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            visible: true,
        }
    }
}

/// Background configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub color: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub window: WindowConfig,
    pub cursor: CursorConfig,
    pub background: BackgroundConfig,
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a configured color, logging and falling back when invalid
fn resolve_color(key: &str, value: &str, fallback: Color) -> Color {
    match parse_hex_color(value) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("{} = {:?}: {}, using default", key, value, e);
            fallback
        }
    }
}

impl Config {
    /// Get the config directory path (~/.config/rush)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("rush"))
    }

    /// Get the config file path (~/.config/rush/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::info!("Could not determine config path, using defaults");
            return Self::default();
        };

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load config {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Font size in points, falling back to the default unless positive and finite
    pub fn font_size(&self) -> f32 {
        let size = self.font.size;
        if size.is_finite() && size > 0.0 {
            return size;
        }
        let fallback = FontConfig::default().size;
        log::warn!("font.size = {}: must be a positive number, using {}", size, fallback);
        fallback
    }

    pub fn text_color(&self) -> Color {
        let fallback = parse_hex_color(&FontConfig::default().color).unwrap_or(Color::WHITE);
        resolve_color("font.color", &self.font.color, fallback)
    }

    pub fn cursor_color(&self) -> Color {
        resolve_color("cursor.color", &self.cursor.color, Color::WHITE)
    }

    pub fn background_color(&self) -> Color {
        resolve_color("background.color", &self.background.color, Color::BLACK)
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        r##"# rush configuration
# Place this file at ~/.config/rush/config.toml

[font]
# Font families in order of preference
family = ["DejaVu Sans Mono", "JetBrains Mono", "Fira Code", "Menlo"]
# Font size in points
size = 24.0
# Text color
color = "#80cc33"

[window]
# Initial terminal size
columns = 80
rows = 24
title = "rush"

[cursor]
color = "#ffffff"
visible = true

[background]
color = "#000000"
"##
        .to_string()
    }
}
