//! Cursor state management
//!
//! The cursor tracks position, visibility, and style. Saved positions live
//! in [`SavedCursor`] slots owned by the screen.

use serde::{Deserialize, Serialize};

/// Cursor shape/style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorStyle {
    /// Block cursor (filled rectangle)
    #[default]
    Block,
    /// Underline cursor
    Underline,
    /// Vertical bar cursor
    Bar,
}

impl CursorStyle {
    /// Next style in the block -> underline -> bar cycle
    pub fn next(self) -> Self {
        match self {
            CursorStyle::Block => CursorStyle::Underline,
            CursorStyle::Underline => CursorStyle::Bar,
            CursorStyle::Bar => CursorStyle::Block,
        }
    }

    /// Decode a DECSCUSR parameter into (style, blinking)
    pub fn from_decscusr(param: u32) -> Option<(Self, bool)> {
        match param {
            0 | 1 => Some((CursorStyle::Block, true)),
            2 => Some((CursorStyle::Block, false)),
            3 => Some((CursorStyle::Underline, true)),
            4 => Some((CursorStyle::Underline, false)),
            5 => Some((CursorStyle::Bar, true)),
            6 => Some((CursorStyle::Bar, false)),
            _ => None,
        }
    }
}

/// Cursor position and appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Column (0-indexed). May equal `cols` after writing the last column,
    /// meaning the next printable character wraps.
    pub x: usize,
    /// Row (0-indexed)
    pub y: usize,
    /// Whether the cursor is visible (DECTCEM)
    pub visible: bool,
    /// Cursor shape
    pub style: CursorStyle,
    /// Whether cursor is blinking
    pub blinking: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            visible: true,
            style: CursorStyle::Block,
            blinking: true,
        }
    }
}

impl Cursor {
    /// Create a new cursor at the home position
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the position into a slot
    pub fn save(&self) -> SavedCursor {
        SavedCursor {
            x: self.x,
            y: self.y,
        }
    }

    /// Restore the position from a slot
    pub fn restore(&mut self, saved: SavedCursor) {
        self.x = saved.x;
        self.y = saved.y;
    }
}

/// A saved cursor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor {
    pub x: usize,
    pub y: usize,
}
