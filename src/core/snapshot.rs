//! Deterministic snapshot generation
//!
//! Snapshots capture what the renderer would show plus the state that
//! drives it, in a serializable format for testing and debugging. Given the
//! same byte stream, the terminal must produce identical snapshots.

use serde::{Deserialize, Serialize};

use super::cell::{Attrs, Glyph};
use super::color::Color;
use super::cursor::{Cursor, CursorStyle};
use super::modes::Modes;
use super::screen::Screen;
use crate::terminal::Terminal;

/// A complete snapshot of the terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Screen dimensions
    pub cols: usize,
    pub rows: usize,
    /// Visible rows as text, trailing blanks trimmed
    pub lines: Vec<String>,
    /// Visible grid content (row-major)
    pub grid: Vec<Vec<CellSnapshot>>,
    /// Cursor state
    pub cursor: CursorSnapshot,
    /// Scroll region, 0-indexed inclusive
    pub scroll_top: usize,
    pub scroll_bottom: usize,
    /// Terminal modes
    pub modes: ModesSnapshot,
    /// Rows of retained history
    pub history_size: usize,
    /// Scrollback viewport offset
    pub view_offset: usize,
}

/// Snapshot of a single cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub style: StyleSnapshot,
}

/// Snapshot of style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blink: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub inverse: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Snapshot of cursor state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSnapshot {
    pub col: usize,
    pub row: usize,
    pub visible: bool,
    pub shape: String,
    pub blinking: bool,
}

/// Snapshot of terminal modes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModesSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub insert_mode: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub application_cursor: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub application_keypad: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub origin_mode: bool,
    pub autowrap: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub alternate_screen: bool,
}

impl From<Attrs> for StyleSnapshot {
    fn from(attrs: Attrs) -> Self {
        StyleSnapshot {
            bold: attrs.contains(Attrs::BOLD),
            italic: attrs.contains(Attrs::ITALIC),
            underline: attrs.contains(Attrs::UNDERLINE),
            blink: attrs.contains(Attrs::BLINK),
            inverse: attrs.contains(Attrs::INVERSE),
        }
    }
}

impl From<&Glyph> for CellSnapshot {
    fn from(glyph: &Glyph) -> Self {
        CellSnapshot {
            ch: glyph.ch,
            fg: glyph.fg,
            bg: glyph.bg,
            style: StyleSnapshot::from(glyph.attrs),
        }
    }
}

impl From<&Cursor> for CursorSnapshot {
    fn from(cursor: &Cursor) -> Self {
        CursorSnapshot {
            col: cursor.x,
            row: cursor.y,
            visible: cursor.visible,
            shape: match cursor.style {
                CursorStyle::Block => "block".to_string(),
                CursorStyle::Underline => "underline".to_string(),
                CursorStyle::Bar => "bar".to_string(),
            },
            blinking: cursor.blinking,
        }
    }
}

impl From<&Modes> for ModesSnapshot {
    fn from(modes: &Modes) -> Self {
        ModesSnapshot {
            insert_mode: modes.insert_mode,
            application_cursor: modes.application_cursor,
            application_keypad: modes.application_keypad,
            origin_mode: modes.origin_mode,
            autowrap: modes.autowrap,
            alternate_screen: modes.alternate_screen,
        }
    }
}

impl Snapshot {
    /// Create a snapshot of the rows the renderer currently shows
    pub fn from_screen(screen: &Screen) -> Self {
        let mut grid = Vec::with_capacity(screen.rows());
        let mut lines = Vec::with_capacity(screen.rows());

        for row in 0..screen.rows() {
            let cells: Vec<CellSnapshot> = screen
                .view_line(row)
                .map(|line| line.iter().map(CellSnapshot::from).collect())
                .unwrap_or_default();
            let text: String = cells.iter().map(|c| c.ch).collect();
            lines.push(text.trim_end().to_string());
            grid.push(cells);
        }

        let (scroll_top, scroll_bottom) = screen.scroll_region_bounds();
        Snapshot {
            cols: screen.cols(),
            rows: screen.rows(),
            lines,
            grid,
            cursor: CursorSnapshot::from(&screen.cursor),
            scroll_top,
            scroll_bottom,
            modes: ModesSnapshot::from(&screen.modes),
            history_size: screen.history_size(),
            view_offset: screen.view_offset(),
        }
    }

    /// Snapshot a terminal's screen
    pub fn from_terminal(terminal: &Terminal) -> Self {
        Self::from_screen(terminal.screen())
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Visible rows joined by newlines, trailing empty rows dropped
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(line);
            result.push('\n');
        }
        while result.ends_with("\n\n") {
            result.pop();
        }
        result
    }

    /// Compare grid content only
    pub fn content_equals(&self, other: &Snapshot) -> bool {
        self.cols == other.cols && self.rows == other.rows && self.grid == other.grid
    }
}
