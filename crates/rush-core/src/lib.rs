//! Rush Core - terminal text state
//!
//! This crate provides:
//! - Cell grid geometry (pixel and clip-space cell rectangles)
//! - The typed text buffer, its line wrapping and the cursor cell
//!
//! Nothing here touches the GPU, so all of it is testable headless.

pub mod buffer;
pub mod grid;

pub use buffer::TextBuffer;
pub use grid::{CellMetrics, CellPosition, Grid, GridSize, Rect};
