//! Typed text buffer laid out on the cell grid
//!
//! Every character takes one cell. Lines wrap at the grid width and `'\n'`
//! starts a new row. The cursor is the cell the next character lands in.
//! Once the content is taller than the grid, the oldest rows scroll off the
//! top of the view.

use crate::grid::{CellPosition, GridSize};

#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    content: Vec<char>,
    size: GridSize,
}

/// Result of laying the whole buffer out on an unbounded grid
struct Layout {
    cells: Vec<(CellPosition, char)>,
    /// Absolute cell of the next character
    cursor: CellPosition,
}

impl TextBuffer {
    pub fn new(size: GridSize) -> Self {
        Self {
            content: Vec::new(),
            size,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Buffer content as a string
    pub fn text(&self) -> String {
        self.content.iter().collect()
    }

    /// Append a character. Control characters other than newline are ignored.
    pub fn push_char(&mut self, c: char) {
        if c == '\n' || !c.is_control() {
            self.content.push(c);
        }
    }

    pub fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            self.push_char(c);
        }
    }

    pub fn newline(&mut self) {
        self.content.push('\n');
    }

    /// Remove the last character (a newline counts as one)
    pub fn backspace(&mut self) -> Option<char> {
        self.content.pop()
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    /// Change the grid size; content reflows on the next layout
    pub fn resize(&mut self, size: GridSize) {
        if size != self.size {
            log::debug!(
                "Reflowing {} chars for {}x{} grid",
                self.content.len(),
                size.columns,
                size.rows
            );
            self.size = size;
        }
    }

    fn layout(&self) -> Layout {
        let columns = self.size.columns;
        let mut cells = Vec::with_capacity(self.content.len());
        let mut row = 0;
        let mut col = 0;

        for &c in &self.content {
            if c == '\n' {
                row += 1;
                col = 0;
                continue;
            }
            if col == columns {
                row += 1;
                col = 0;
            }
            cells.push((CellPosition::new(row, col), c));
            col += 1;
        }

        if col == columns {
            row += 1;
            col = 0;
        }

        Layout {
            cells,
            cursor: CellPosition::new(row, col),
        }
    }

    /// Number of rows scrolled off the top of the view
    fn scroll_offset(&self, cursor_row: usize) -> usize {
        (cursor_row + 1).saturating_sub(self.size.rows)
    }

    /// Cursor cell relative to the visible view
    pub fn cursor(&self) -> CellPosition {
        let cursor = self.layout().cursor;
        let offset = self.scroll_offset(cursor.row);
        CellPosition::new(cursor.row - offset, cursor.col)
    }

    /// Characters in view with their cells, in reading order
    pub fn visible_cells(&self) -> Vec<(CellPosition, char)> {
        let layout = self.layout();
        let offset = self.scroll_offset(layout.cursor.row);
        layout
            .cells
            .into_iter()
            .filter(|(cell, _)| cell.row >= offset)
            .map(|(cell, c)| (CellPosition::new(cell.row - offset, cell.col), c))
            .collect()
    }
}
