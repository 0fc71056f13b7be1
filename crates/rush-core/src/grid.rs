//! Cell grid geometry
//!
//! The window is divided into fixed-size cells. Pixel coordinates have their
//! origin at the top-left of the window; clip-space coordinates run from -1
//! to 1 with y pointing up.

/// Rectangle with position and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rectangle
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Zero-based grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Grid size in cells, never smaller than 1x1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Pixel size of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl CellMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }
}

/// Window-sized grid of cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    metrics: CellMetrics,
    window_width: f32,
    window_height: f32,
    size: GridSize,
}

impl Grid {
    pub fn new(metrics: CellMetrics, window_width: f32, window_height: f32) -> Self {
        let mut grid = Self {
            metrics,
            window_width: 1.0,
            window_height: 1.0,
            size: GridSize::new(1, 1),
        };
        grid.resize(window_width, window_height);
        grid
    }

    /// Recompute the grid size for a new window size
    ///
    /// Returns true if the number of columns or rows changed.
    pub fn resize(&mut self, window_width: f32, window_height: f32) -> bool {
        self.window_width = window_width.max(1.0);
        self.window_height = window_height.max(1.0);

        let columns = (self.window_width / self.metrics.width).floor() as usize;
        let rows = (self.window_height / self.metrics.height).floor() as usize;
        let size = GridSize::new(columns, rows);

        let changed = size != self.size;
        if changed {
            log::debug!(
                "Grid resized to {}x{} ({}x{} px)",
                size.columns,
                size.rows,
                self.window_width,
                self.window_height
            );
        }
        self.size = size;
        changed
    }

    /// Swap cell metrics (font change) keeping the window size
    pub fn set_metrics(&mut self, metrics: CellMetrics) -> bool {
        self.metrics = metrics;
        self.resize(self.window_width, self.window_height)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn window_size(&self) -> (f32, f32) {
        (self.window_width, self.window_height)
    }

    /// Cell rectangle in window pixels (top-left origin)
    pub fn cell_rect(&self, cell: CellPosition) -> Rect {
        Rect::new(
            cell.col as f32 * self.metrics.width,
            cell.row as f32 * self.metrics.height,
            self.metrics.width,
            self.metrics.height,
        )
    }

    /// Cell rectangle in clip space
    ///
    /// `x`/`y` is the top-left corner, `height` extends downwards
    /// (towards smaller y).
    pub fn cell_clip_rect(&self, cell: CellPosition) -> Rect {
        let px = self.cell_rect(cell);
        let sx = 2.0 / self.window_width;
        let sy = 2.0 / self.window_height;
        Rect::new(
            px.x * sx - 1.0,
            1.0 - px.y * sy,
            px.width * sx,
            px.height * sy,
        )
    }
}
