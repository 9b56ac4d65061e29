//! Character set handling for terminal emulation
//!
//! VT100 G0/G1 designation with SO/SI shifting. Only DEC Special Graphics
//! (line drawing) substitutes anything; every other designation is ASCII.

use serde::{Deserialize, Serialize};

/// Character set designations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    /// US ASCII (`ESC ( B`)
    #[default]
    Ascii,
    /// DEC Special Graphics (`ESC ( 0`)
    DecSpecialGraphics,
}

impl Charset {
    /// Parse a designation byte; `None` for sets this terminal ignores
    pub fn from_designation(byte: u8) -> Option<Self> {
        match byte {
            b'B' => Some(Charset::Ascii),
            b'0' => Some(Charset::DecSpecialGraphics),
            _ => None,
        }
    }
}

/// G0/G1 character set state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetState {
    /// G0 character set
    pub g0: Charset,
    /// G1 character set
    pub g1: Charset,
    /// Active slot: 0 for G0, 1 for G1
    pub active: u8,
}

impl CharsetState {
    /// Create new charset state with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to default state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Designate a charset into G0 (slot 0) or G1 (slot 1)
    pub fn designate(&mut self, slot: u8, charset: Charset) {
        match slot {
            0 => self.g0 = charset,
            1 => self.g1 = charset,
            _ => {}
        }
    }

    /// Get the currently active charset
    pub fn current(&self) -> Charset {
        if self.active == 1 {
            self.g1
        } else {
            self.g0
        }
    }

    /// Shift In (SI) - select G0
    pub fn shift_in(&mut self) {
        self.active = 0;
    }

    /// Shift Out (SO) - select G1
    pub fn shift_out(&mut self) {
        self.active = 1;
    }

    /// Translate a character through the active charset. Only codepoints
    /// below 128 are candidates for substitution.
    pub fn translate(&self, c: char) -> char {
        match self.current() {
            Charset::Ascii => c,
            Charset::DecSpecialGraphics => translate_dec_special_graphics(c),
        }
    }
}

/// Translate DEC Special Graphics characters (0x60-0x7E)
fn translate_dec_special_graphics(c: char) -> char {
    match c {
        '`' => '◆', // Diamond
        'a' => '▒', // Checkerboard
        'b' => '␉', // HT symbol
        'c' => '␌', // FF symbol
        'd' => '␍', // CR symbol
        'e' => '␊', // LF symbol
        'f' => '°',
        'g' => '±',
        'h' => '␤', // NL symbol
        'i' => '␋', // VT symbol
        'j' => '┘',
        'k' => '┐',
        'l' => '┌',
        'm' => '└',
        'n' => '┼',
        'o' => '⎺', // Scan line 1
        'p' => '⎻', // Scan line 3
        'q' => '─', // Scan line 5
        'r' => '⎼', // Scan line 7
        's' => '⎽', // Scan line 9
        't' => '├',
        'u' => '┤',
        'v' => '┴',
        'w' => '┬',
        'x' => '│',
        'y' => '≤',
        'z' => '≥',
        '{' => 'π',
        '|' => '≠',
        '}' => '£',
        '~' => '·',
        _ => c,
    }
}
