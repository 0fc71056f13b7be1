//! rush - GPU-drawn text buffer
//!
//! The implementation lives in:
//! - `rush-core` - text buffer and cell grid
//! - `rush-renderer` - shaders, glyph atlas, text and cursor pipelines
//!
//! This crate holds the window-independent parts of the application
//! (configuration and key mapping) so they can be tested without a display.

pub mod config;
pub mod input;

pub use config::Config;
pub use input::InputAction;
