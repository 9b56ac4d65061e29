//! Screen model implementation
//!
//! The screen owns the primary and alternate grids plus everything that
//! addresses them: cursor, saved cursors, scroll region, mode flags,
//! charsets, the current pen and the dirty tracker. All coordinates are
//! 0-indexed here; the parser layer converts from 1-based parameters.

use tracing::{debug, error};

use super::cell::{Attrs, Glyph, Pen};
use super::charset::CharsetState;
use super::cursor::{Cursor, SavedCursor};
use super::dirty::{DirtyRegion, DirtyTracker};
use super::grid::{AltGrid, Grid, PrimaryGrid};
use super::modes::Modes;
use crate::error::{Error, Result};

/// The main screen structure
#[derive(Debug, Clone)]
pub struct Screen {
    cols: usize,
    rows: usize,
    /// Primary grid with scrollback
    primary: PrimaryGrid,
    /// Alternate grid, allocated on first use
    alt: Option<AltGrid>,
    /// Cursor position and appearance
    pub cursor: Cursor,
    /// Slot shared by ESC 7/8 and CSI s/u
    saved_cursor: SavedCursor,
    /// Normal-screen cursor saved across alternate screen use
    alt_saved_cursor: SavedCursor,
    /// Scroll region top (inclusive)
    scroll_top: usize,
    /// Scroll region bottom (inclusive)
    scroll_bottom: usize,
    /// Terminal modes
    pub modes: Modes,
    /// G0/G1 designations
    pub charsets: CharsetState,
    /// Rendition for newly written and erased cells
    pub pen: Pen,
    /// Rendition restored by resets
    default_pen: Pen,
    dirty: DirtyTracker,
    /// Rows scrolled back into history, 0 = live
    view_offset: usize,
}

impl Screen {
    /// Create a screen of `cols x rows` with `scrollback` history rows
    pub fn new(cols: usize, rows: usize, scrollback: usize, default_pen: Pen) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions { cols, rows });
        }
        let primary = PrimaryGrid::new(cols, rows, scrollback, default_pen.blank())?;

        Ok(Self {
            cols,
            rows,
            primary,
            alt: None,
            cursor: Cursor::new(),
            saved_cursor: SavedCursor::default(),
            alt_saved_cursor: SavedCursor::default(),
            scroll_top: 0,
            scroll_bottom: rows - 1,
            modes: Modes::new(),
            charsets: CharsetState::new(),
            pen: default_pen,
            default_pen,
            dirty: DirtyTracker::new(rows),
            view_offset: 0,
        })
    }

    /// Get the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Configured scrollback depth
    pub fn scrollback(&self) -> usize {
        self.primary.scrollback()
    }

    /// Rows of history currently retained
    pub fn history_size(&self) -> usize {
        self.primary.history_size()
    }

    /// Current scrollback viewport offset
    pub fn view_offset(&self) -> usize {
        self.view_offset
    }

    /// Scroll region as inclusive 0-indexed (top, bottom)
    pub fn scroll_region_bounds(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    /// Whether the region spans every row
    fn full_screen_region(&self) -> bool {
        self.scroll_top == 0 && self.scroll_bottom == self.rows - 1
    }

    /// The ESC 7 / CSI s slot
    pub fn saved_cursor(&self) -> SavedCursor {
        self.saved_cursor
    }

    /// Whether the alternate grid has been allocated
    pub fn has_alt_grid(&self) -> bool {
        self.alt.is_some()
    }

    /// Rendition used by resets
    pub fn default_pen(&self) -> Pen {
        self.default_pen
    }

    /// Change the reset rendition (after a palette change)
    pub fn set_default_pen(&mut self, pen: Pen) {
        self.default_pen = pen;
    }

    /// Get a reference to the active grid
    fn grid(&self) -> &dyn Grid {
        match (&self.alt, self.modes.alternate_screen) {
            (Some(alt), true) => alt,
            _ => &self.primary,
        }
    }

    /// Get a mutable reference to the active grid
    fn grid_mut(&mut self) -> &mut dyn Grid {
        match (&mut self.alt, self.modes.alternate_screen) {
            (Some(alt), true) => alt,
            _ => &mut self.primary,
        }
    }

    /// Live logical row `y` of the active grid
    pub fn line(&self, y: usize) -> Option<&[Glyph]> {
        self.grid().line(y)
    }

    /// Row the renderer shows at viewport row `y`
    pub fn view_line(&self, y: usize) -> Option<&[Glyph]> {
        if self.modes.alternate_screen {
            return self.grid().line(y);
        }
        self.primary.view_line(y, self.view_offset)
    }

    /// Glyph at a live position
    pub fn glyph(&self, x: usize, y: usize) -> Option<&Glyph> {
        self.line(y).and_then(|line| line.get(x))
    }

    /// Text of live row `y` with trailing blanks trimmed
    pub fn line_text(&self, y: usize) -> Option<String> {
        self.line(y).map(|line| {
            let text: String = line.iter().map(|g| g.ch).collect();
            text.trim_end().to_string()
        })
    }

    // Dirty tracking

    /// Dirty state
    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Hand the dirty region to the renderer, clearing it
    pub fn take_dirty(&mut self) -> DirtyRegion {
        self.dirty.take()
    }

    /// Mark a row dirty
    pub fn mark_line(&mut self, y: usize) {
        self.dirty.mark_line(y);
    }

    /// Request a full repaint of every row
    pub fn force_full_redraw(&mut self) {
        self.dirty.mark_all();
        self.dirty.force_full_redraw();
    }

    // Writing

    /// Write a character at the cursor
    pub fn put_char(&mut self, c: char) {
        if self.modes.autowrap && self.cursor.x >= self.cols {
            self.cursor.x = 0;
            self.newline();
        }
        if self.modes.insert_mode {
            self.insert_chars(1);
        }

        let x = self.cursor.x.min(self.cols - 1);
        let y = self.cursor.y;
        let ch = if (c as u32) < 0x80 {
            self.charsets.translate(c)
        } else {
            c
        };
        let glyph = self.pen.glyph(ch);
        if let Some(cell) = self.grid_mut().line_mut(y).and_then(|line| line.get_mut(x)) {
            *cell = glyph;
        }
        self.dirty.mark_line(y);

        if self.cursor.x < self.cols {
            self.cursor.x += 1;
        }
    }

    /// Line feed: move down, scrolling at the region bottom. A cursor below
    /// the region is pulled back to its bottom row first.
    pub fn newline(&mut self) {
        if self.cursor.y >= self.scroll_bottom {
            self.cursor.y = self.scroll_bottom;
            if self.full_screen_region() {
                self.scroll_up();
            } else {
                self.scroll_region(self.scroll_top, self.scroll_bottom, 1);
            }
        } else {
            self.cursor.y += 1;
        }
    }

    /// Reverse index: move up, scrolling down at the region top. A cursor
    /// above the region is pulled back to its top row first.
    pub fn reverse_index(&mut self) {
        if self.cursor.y <= self.scroll_top {
            self.cursor.y = self.scroll_top;
            self.scroll_region(self.scroll_top, self.scroll_bottom, -1);
        } else {
            self.cursor.y -= 1;
        }
    }

    /// Carriage return
    pub fn carriage_return(&mut self) {
        self.cursor.x = 0;
    }

    /// Backspace, stopping at column 0
    pub fn backspace(&mut self) {
        self.cursor.x = self.cursor.x.saturating_sub(1);
    }

    /// Horizontal tab to the next multiple of 8, wrapping past the margin
    pub fn tab(&mut self) {
        self.cursor.x = (self.cursor.x + 8) & !7;
        if self.cursor.x >= self.cols {
            self.cursor.x = 0;
            self.newline();
        }
    }

    // Scrolling

    /// Scroll the whole screen up one row. On the primary screen the top
    /// row goes into history.
    pub fn scroll_up(&mut self) {
        let blank = self.pen.blank();
        self.grid_mut().scroll_up(blank);
        self.force_full_redraw();
    }

    /// Scroll the inclusive range `[top, bottom]` by `n` rows, positive
    /// moving content up. History is never touched.
    pub fn scroll_region(&mut self, top: usize, bottom: usize, n: isize) {
        if n == 0 || top > bottom || bottom >= self.rows {
            return;
        }
        let blank = self.pen.blank();
        self.dirty.mark_lines(top, bottom);
        self.dirty.force_full_redraw();
        self.grid_mut().scroll_region(top, bottom, n, blank);
    }

    /// SU: scroll the region up `n` rows
    pub fn scroll_region_up(&mut self, n: usize) {
        self.scroll_region(self.scroll_top, self.scroll_bottom, to_signed(n));
    }

    /// SD: scroll the region down `n` rows
    pub fn scroll_region_down(&mut self, n: usize) {
        self.scroll_region(self.scroll_top, self.scroll_bottom, -to_signed(n));
    }

    /// DECSTBM with 1-based bounds, 0 meaning the default. Invalid regions
    /// are ignored; a valid one homes the cursor.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let top = if top > 0 { top } else { 1 };
        let bottom = if bottom > 0 { bottom } else { self.rows };
        if top >= bottom || bottom > self.rows {
            debug!("Ignoring invalid scroll region {};{}", top, bottom);
            return;
        }
        self.scroll_top = top - 1;
        self.scroll_bottom = bottom - 1;
        self.cursor.x = 0;
        self.cursor.y = 0;
    }

    // Cursor movement

    /// CUU, clamped to the scroll region
    pub fn cursor_up(&mut self, n: usize) {
        self.cursor.y = self
            .cursor
            .y
            .saturating_sub(n)
            .clamp(self.scroll_top, self.scroll_bottom);
    }

    /// CUD, clamped to the scroll region
    pub fn cursor_down(&mut self, n: usize) {
        self.cursor.y = self
            .cursor
            .y
            .saturating_add(n)
            .clamp(self.scroll_top, self.scroll_bottom);
    }

    /// CUF
    pub fn cursor_forward(&mut self, n: usize) {
        self.cursor.x = self.cursor.x.saturating_add(n).min(self.cols - 1);
    }

    /// CUB
    pub fn cursor_backward(&mut self, n: usize) {
        self.cursor.x = self.cursor.x.saturating_sub(n).min(self.cols - 1);
    }

    /// CHA, 1-based
    pub fn cursor_to_col(&mut self, col: usize) {
        self.cursor.x = col.saturating_sub(1).min(self.cols - 1);
    }

    /// VPA, 1-based, clamped to the full screen
    pub fn cursor_to_row(&mut self, row: usize) {
        self.cursor.y = row.saturating_sub(1).min(self.rows - 1);
    }

    /// CUP, 1-based. Under origin mode the row counts from the region top
    /// and is clamped to the region.
    pub fn cursor_position(&mut self, row: usize, col: usize) {
        let row = row.max(1) - 1;
        let col = col.max(1) - 1;
        self.cursor.y = if self.modes.origin_mode {
            self.scroll_top.saturating_add(row).min(self.scroll_bottom)
        } else {
            row.min(self.rows - 1)
        };
        self.cursor.x = col.min(self.cols - 1);
    }

    /// DECSC / CSI s
    pub fn save_cursor(&mut self) {
        self.saved_cursor = self.cursor.save();
    }

    /// DECRC / CSI u
    pub fn restore_cursor(&mut self) {
        self.cursor.restore(self.saved_cursor);
    }

    /// DECOM toggle; homes to the region top or the screen top
    pub fn set_origin_mode(&mut self, enabled: bool) {
        self.modes.origin_mode = enabled;
        self.cursor.x = 0;
        self.cursor.y = if enabled { self.scroll_top } else { 0 };
    }

    // Erasing

    /// Blank row `y` from column `from` to the end
    pub fn clear_line(&mut self, y: usize, from: usize) {
        let blank = self.pen.blank();
        if let Some(line) = self.grid_mut().line_mut(y) {
            let from = from.min(line.len());
            line[from..].fill(blank);
            self.dirty.mark_line(y);
        }
    }

    /// Blank row `y` from column 0 through column `to` inclusive
    pub fn clear_line_to(&mut self, y: usize, to: usize) {
        let blank = self.pen.blank();
        if let Some(line) = self.grid_mut().line_mut(y) {
            let end = to.saturating_add(1).min(line.len());
            line[..end].fill(blank);
            self.dirty.mark_line(y);
        }
    }

    /// Blank every visible row of the active grid
    pub fn clear_visible_screen(&mut self) {
        for y in 0..self.rows {
            self.clear_line(y, 0);
        }
        self.force_full_redraw();
    }

    /// ED: 0 = cursor to end, 1 = start to cursor, 2 = whole screen
    pub fn erase_in_display(&mut self, mode: u32) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        match mode {
            0 => {
                self.clear_line(y, x);
                for row in y + 1..self.rows {
                    self.clear_line(row, 0);
                }
            }
            1 => {
                for row in 0..y {
                    self.clear_line(row, 0);
                }
                self.clear_line_to(y, x);
            }
            2 => self.clear_visible_screen(),
            _ => debug!("Unhandled erase in display mode {}", mode),
        }
    }

    /// EL: 0 = cursor to end, 1 = start to cursor, 2 = whole line
    pub fn erase_in_line(&mut self, mode: u32) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        match mode {
            0 => self.clear_line(y, x),
            1 => self.clear_line_to(y, x),
            2 => self.clear_line(y, 0),
            _ => debug!("Unhandled erase in line mode {}", mode),
        }
    }

    // Character and line editing

    /// ICH: shift the rest of the line right by `n`, blanking the gap
    pub fn insert_chars(&mut self, n: usize) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        let blank = self.pen.blank();
        let Some(line) = self.grid_mut().line_mut(y) else {
            return;
        };
        if x >= line.len() {
            return;
        }
        let n = n.min(line.len() - x);
        let len = line.len();
        line.copy_within(x..len - n, x + n);
        line[x..x + n].fill(blank);
        self.dirty.mark_line(y);
    }

    /// DCH: shift the rest of the line left by `n`, blanking the end
    pub fn delete_chars(&mut self, n: usize) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        let blank = self.pen.blank();
        let Some(line) = self.grid_mut().line_mut(y) else {
            return;
        };
        if x >= line.len() {
            return;
        }
        let len = line.len();
        let n = n.min(len - x);
        line.copy_within(x + n..len, x);
        line[len - n..].fill(blank);
        self.dirty.mark_line(y);
    }

    /// ECH: blank `n` cells from the cursor without shifting
    pub fn erase_chars(&mut self, n: usize) {
        let (x, y) = (self.cursor.x, self.cursor.y);
        let blank = self.pen.blank();
        let Some(line) = self.grid_mut().line_mut(y) else {
            return;
        };
        if x >= line.len() {
            return;
        }
        let end = x.saturating_add(n).min(line.len());
        line[x..end].fill(blank);
        self.dirty.mark_line(y);
    }

    /// IL: only when the cursor is inside the region
    pub fn insert_lines(&mut self, n: usize) {
        let y = self.cursor.y;
        if y >= self.scroll_top && y <= self.scroll_bottom {
            self.scroll_region(y, self.scroll_bottom, -to_signed(n));
        }
    }

    /// DL: only when the cursor is inside the region
    pub fn delete_lines(&mut self, n: usize) {
        let y = self.cursor.y;
        if y >= self.scroll_top && y <= self.scroll_bottom {
            self.scroll_region(y, self.scroll_bottom, to_signed(n));
        }
    }

    /// DECALN: fill the screen with 'E' in the default rendition
    pub fn alignment_test(&mut self) {
        let glyph = self.default_pen.glyph('E');
        self.grid_mut().fill_visible(glyph);
        self.force_full_redraw();
    }

    // Alternate screen

    /// Mode 1049 set. Allocates the alternate grid on first use; if that
    /// fails the terminal stays on the primary screen.
    pub fn enter_alternate_screen(&mut self) {
        if self.modes.alternate_screen {
            return;
        }
        if self.alt.is_none() {
            match AltGrid::new(self.cols, self.rows, self.default_pen.blank()) {
                Ok(grid) => self.alt = Some(grid),
                Err(e) => {
                    error!("Failed to allocate alternate screen: {}", e);
                    return;
                }
            }
        }
        self.alt_saved_cursor = self.cursor.save();
        self.modes.alternate_screen = true;
        self.clear_visible_screen();
        self.cursor.x = 0;
        self.cursor.y = 0;
    }

    /// Mode 1049 reset. Alternate content is left behind.
    pub fn exit_alternate_screen(&mut self) {
        if !self.modes.alternate_screen {
            return;
        }
        self.modes.alternate_screen = false;
        self.cursor.restore(self.alt_saved_cursor);
        self.force_full_redraw();
    }

    // Scrollback viewport

    /// Set the viewport offset, clamped to `[0, history_size]`. Returns
    /// whether it changed.
    pub fn set_view_offset(&mut self, offset: i64) -> bool {
        let max = self.primary.history_size();
        let clamped = if offset <= 0 {
            0
        } else {
            usize::try_from(offset).map_or(max, |o| o.min(max))
        };
        if clamped == self.view_offset {
            return false;
        }
        self.view_offset = clamped;
        self.force_full_redraw();
        true
    }

    /// Move the viewport by `delta` rows (positive = further back). No-op
    /// on the alternate screen or with empty history.
    pub fn scroll_view(&mut self, delta: i64) -> bool {
        if self.modes.alternate_screen || self.primary.history_size() == 0 {
            return false;
        }
        let current = i64::try_from(self.view_offset).unwrap_or(i64::MAX);
        self.set_view_offset(current.saturating_add(delta))
    }

    /// Snap back to the live screen
    pub fn reset_view(&mut self) -> bool {
        self.set_view_offset(0)
    }

    // Cursor appearance

    /// Flip DECTCEM
    pub fn toggle_cursor_visibility(&mut self) {
        self.cursor.visible = !self.cursor.visible;
        self.dirty.mark_line(self.cursor.y);
    }

    /// Flip cursor blinking
    pub fn toggle_cursor_blink(&mut self) {
        self.cursor.blinking = !self.cursor.blinking;
        self.dirty.mark_line(self.cursor.y);
    }

    /// Advance block -> underline -> bar -> block
    pub fn cycle_cursor_style(&mut self) {
        self.cursor.style = self.cursor.style.next();
        self.dirty.mark_line(self.cursor.y);
    }

    // Lifecycle

    /// Full reset. Scrollback is discarded; the palette is not part of the
    /// screen and survives.
    pub fn reset(&mut self) {
        self.pen = self.default_pen;
        self.cursor = Cursor::new();
        self.saved_cursor = SavedCursor::default();
        self.scroll_top = 0;
        self.scroll_bottom = self.rows - 1;
        self.modes.reset();
        self.charsets.reset();
        self.view_offset = 0;

        let blank = Glyph::blank(self.default_pen.fg, self.default_pen.bg, Attrs::empty());
        self.primary.reset(blank);
        self.force_full_redraw();
    }

    /// Reallocate for new dimensions, then reset. Returns whether anything
    /// changed; an unchanged size is a no-op. On failure the screen is left
    /// exactly as it was.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<bool> {
        if cols == 0 || rows == 0 {
            return Err(Error::InvalidDimensions { cols, rows });
        }
        if cols == self.cols && rows == self.rows {
            return Ok(false);
        }

        let blank = self.default_pen.blank();
        let primary = PrimaryGrid::new(cols, rows, self.primary.scrollback(), blank)
            .inspect_err(|e| error!("Resize to {}x{} aborted: {}", cols, rows, e))?;
        let alt = match self.alt {
            Some(_) => Some(
                AltGrid::new(cols, rows, blank)
                    .inspect_err(|e| error!("Resize to {}x{} aborted: {}", cols, rows, e))?,
            ),
            None => None,
        };

        self.primary = primary;
        self.alt = alt;
        self.cols = cols;
        self.rows = rows;
        self.dirty.resize(rows);
        self.reset();
        Ok(true)
    }
}

/// Row counts come from clamped CSI parameters and always fit
fn to_signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
