//! Terminal grids
//!
//! The primary grid is a ring of `rows + scrollback` rows: the visible
//! screen is the `rows` rows starting at the ring's top, and the rows just
//! above it are history. The alternate grid is a flat `rows x cols` buffer
//! with no history.
//!
//! All row accessors take logical coordinates and bounds-check them; an
//! out-of-range row yields `None` rather than a panic.

use crate::core::cell::Glyph;
use crate::error::{Error, Result};

/// Allocate `cols * rows` glyphs, reporting failure instead of aborting
fn alloc_cells(what: &'static str, cols: usize, rows: usize, blank: Glyph) -> Result<Vec<Glyph>> {
    let cells = cols
        .checked_mul(rows)
        .ok_or(Error::Allocation { what, cells: usize::MAX })?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(cells)
        .map_err(|_| Error::Allocation { what, cells })?;
    buf.resize(cells, blank);
    Ok(buf)
}

/// Circular mapping from logical rows to physical rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingIndex {
    top: usize,
    total: usize,
}

impl RingIndex {
    /// Ring over `total` physical rows, top at row 0
    pub fn new(total: usize) -> Self {
        Self { top: 0, total }
    }

    /// Physical row holding logical row `y`
    pub fn logical_to_physical(&self, y: usize) -> usize {
        (self.top + y) % self.total
    }

    /// Physical row shown at viewport row `y` when scrolled back by
    /// `view_offset` rows. `view_offset` must not exceed `total`.
    pub fn view_to_physical(&self, y: usize, view_offset: usize) -> usize {
        (self.top + self.total - view_offset + y) % self.total
    }

    /// Move the top down one row; the old top row becomes history
    pub fn advance(&mut self) {
        self.top = (self.top + 1) % self.total;
    }

    /// Physical index of the top row
    pub fn top(&self) -> usize {
        self.top
    }

    /// Number of physical rows
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Row storage shared by the primary and alternate grids
pub trait Grid {
    /// Number of columns
    fn cols(&self) -> usize;

    /// Number of visible rows
    fn rows(&self) -> usize;

    /// Offset in `cells()` of the first glyph of logical row `y` (`y < rows`)
    fn row_offset(&self, y: usize) -> usize;

    /// Backing storage
    fn cells(&self) -> &[Glyph];

    /// Mutable backing storage
    fn cells_mut(&mut self) -> &mut [Glyph];

    /// Scroll the whole screen up by one row
    fn scroll_up(&mut self, blank: Glyph);

    /// Logical row `y`, `None` if out of range
    fn line(&self, y: usize) -> Option<&[Glyph]> {
        if y >= self.rows() {
            return None;
        }
        let start = self.row_offset(y);
        let cols = self.cols();
        self.cells().get(start..start + cols)
    }

    /// Mutable logical row `y`, `None` if out of range
    fn line_mut(&mut self, y: usize) -> Option<&mut [Glyph]> {
        if y >= self.rows() {
            return None;
        }
        let start = self.row_offset(y);
        let cols = self.cols();
        self.cells_mut().get_mut(start..start + cols)
    }

    /// Copy logical row `src` over logical row `dst`
    fn copy_row(&mut self, src: usize, dst: usize) {
        if src >= self.rows() || dst >= self.rows() || src == dst {
            return;
        }
        let from = self.row_offset(src);
        let to = self.row_offset(dst);
        let cols = self.cols();
        self.cells_mut().copy_within(from..from + cols, to);
    }

    /// Fill logical row `y` with `blank`
    fn clear_row(&mut self, y: usize, blank: Glyph) {
        if let Some(line) = self.line_mut(y) {
            line.fill(blank);
        }
    }

    /// Scroll the inclusive logical range `[top, bottom]` by `n` rows:
    /// positive moves content up, negative moves it down. Exposed rows are
    /// filled with `blank`. Never feeds history.
    fn scroll_region(&mut self, top: usize, bottom: usize, n: isize, blank: Glyph) {
        if n == 0 || top > bottom || bottom >= self.rows() {
            return;
        }
        let height = bottom - top + 1;
        let amount = n.unsigned_abs().min(height);
        let keep = height - amount;

        if n > 0 {
            for i in 0..keep {
                self.copy_row(top + amount + i, top + i);
            }
            for y in bottom + 1 - amount..=bottom {
                self.clear_row(y, blank);
            }
        } else {
            for i in (0..keep).rev() {
                self.copy_row(top + i, top + amount + i);
            }
            for y in top..top + amount {
                self.clear_row(y, blank);
            }
        }
    }

    /// Fill every visible row with `glyph`
    fn fill_visible(&mut self, glyph: Glyph) {
        for y in 0..self.rows() {
            self.clear_row(y, glyph);
        }
    }
}

/// Primary screen: ring buffer with scrollback history
#[derive(Debug, Clone)]
pub struct PrimaryGrid {
    cells: Vec<Glyph>,
    cols: usize,
    rows: usize,
    scrollback: usize,
    ring: RingIndex,
    history_size: usize,
}

impl PrimaryGrid {
    /// Allocate a grid of `rows + scrollback` rows filled with `blank`
    pub fn new(cols: usize, rows: usize, scrollback: usize, blank: Glyph) -> Result<Self> {
        let total = rows
            .checked_add(scrollback)
            .ok_or(Error::Allocation { what: "primary grid", cells: usize::MAX })?;
        let cells = alloc_cells("primary grid", cols, total, blank)?;
        Ok(Self {
            cells,
            cols,
            rows,
            scrollback,
            ring: RingIndex::new(total),
            history_size: 0,
        })
    }

    /// Maximum history rows
    pub fn scrollback(&self) -> usize {
        self.scrollback
    }

    /// Rows of retrievable history (`<= scrollback`)
    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Physical index of the top visible row
    pub fn top_line(&self) -> usize {
        self.ring.top()
    }

    /// Total physical rows (`rows + scrollback`)
    pub fn total_lines(&self) -> usize {
        self.ring.total()
    }

    /// Row shown at viewport row `y` when scrolled back `view_offset` rows.
    /// `view_offset` is clamped to the history size.
    pub fn view_line(&self, y: usize, view_offset: usize) -> Option<&[Glyph]> {
        if y >= self.rows {
            return None;
        }
        let offset = view_offset.min(self.history_size);
        let start = self.ring.view_to_physical(y, offset) * self.cols;
        self.cells.get(start..start + self.cols)
    }

    /// Fill the whole ring, history included, and forget history
    pub fn reset(&mut self, blank: Glyph) {
        self.cells.fill(blank);
        self.ring = RingIndex::new(self.ring.total());
        self.history_size = 0;
    }
}

impl Grid for PrimaryGrid {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn row_offset(&self, y: usize) -> usize {
        self.ring.logical_to_physical(y) * self.cols
    }

    fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Glyph] {
        &mut self.cells
    }

    fn scroll_up(&mut self, blank: Glyph) {
        self.ring.advance();
        if self.history_size < self.scrollback {
            self.history_size += 1;
        }
        self.clear_row(self.rows - 1, blank);
    }
}

/// Alternate screen: flat buffer, no history
#[derive(Debug, Clone)]
pub struct AltGrid {
    cells: Vec<Glyph>,
    cols: usize,
    rows: usize,
}

impl AltGrid {
    /// Allocate a `rows x cols` grid filled with `blank`
    pub fn new(cols: usize, rows: usize, blank: Glyph) -> Result<Self> {
        let cells = alloc_cells("alternate grid", cols, rows, blank)?;
        Ok(Self { cells, cols, rows })
    }
}

impl Grid for AltGrid {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn row_offset(&self, y: usize) -> usize {
        y * self.cols
    }

    fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Glyph] {
        &mut self.cells
    }

    fn scroll_up(&mut self, blank: Glyph) {
        let rows = self.rows;
        self.scroll_region(0, rows - 1, 1, blank);
    }
}
