//! Terminal Cell
//!
//! A glyph is a single character cell: codepoint, resolved colors and
//! attribute bits. Glyphs are plain values and are copied freely.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::color::Color;

bitflags! {
    /// Text attributes (SGR 1/3/4/5/7)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Attrs: u8 {
        const BOLD      = 1 << 0;
        const ITALIC    = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE   = 1 << 3;
        const BLINK     = 1 << 4;
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    /// The character in this cell
    pub ch: char,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Text attributes
    pub attrs: Attrs,
}

impl Glyph {
    /// Create a glyph
    pub const fn new(ch: char, fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self { ch, fg, bg, attrs }
    }

    /// A blank cell carrying the given colors and attributes
    pub const fn blank(fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self::new(' ', fg, bg, attrs)
    }

    /// Unicode scalar value of the cell
    pub fn codepoint(&self) -> u32 {
        self.ch as u32
    }

    /// Check if this cell shows nothing but background
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }
}

/// Current rendition applied to newly written glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pen {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Pen {
    /// Pen with default colors and no attributes
    pub fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: Attrs::empty(),
        }
    }

    /// Glyph for `ch` in this rendition
    pub fn glyph(&self, ch: char) -> Glyph {
        Glyph::new(ch, self.fg, self.bg, self.attrs)
    }

    /// Blank glyph used by erase operations
    pub fn blank(&self) -> Glyph {
        Glyph::blank(self.fg, self.bg, self.attrs)
    }
}
