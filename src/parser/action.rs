//! Parser output
//!
//! Each complete unit of input becomes one `Action`; the terminal executor
//! applies them to the screen in order.

use serde::{Deserialize, Serialize};

use crate::core::{Charset, Color};

/// One decoded unit of terminal input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Printable character, before charset translation
    Print(char),

    /// C0 control
    Execute(ControlCode),

    /// `ESC [` ... final byte
    Csi(CsiAction),

    /// Two- or three-byte escape sequence
    Esc(EscAction),

    /// Interpreted `ESC ]` string
    Osc(OscAction),
}

/// C0 control codes the terminal acts on. Others are dropped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlCode {
    /// BS - Backspace
    Backspace,
    /// HT - Horizontal Tab
    Tab,
    /// LF - Line Feed
    LineFeed,
    /// CR - Carriage Return
    CarriageReturn,
    /// SO, select G1
    ShiftOut,
    /// SI, select G0
    ShiftIn,
}

impl ControlCode {
    /// Map a C0 byte to the control it executes
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x08 => Some(ControlCode::Backspace),
            0x09 => Some(ControlCode::Tab),
            0x0A => Some(ControlCode::LineFeed),
            0x0D => Some(ControlCode::CarriageReturn),
            0x0E => Some(ControlCode::ShiftOut),
            0x0F => Some(ControlCode::ShiftIn),
            _ => None,
        }
    }
}

/// A complete CSI sequence as collected by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsiAction {
    /// The final byte that identifies the command
    pub final_byte: u8,
    /// Parameters; empty parameters are 0. Always at least one entry.
    pub params: Vec<u32>,
    /// Intermediate bytes (0x20-0x2F), at most 3
    pub intermediates: Vec<u8>,
    /// Private marker (`<`, `=`, `>` or `?`)
    pub private_marker: Option<u8>,
}

impl CsiAction {
    pub fn new(final_byte: u8) -> Self {
        Self {
            final_byte,
            params: vec![0],
            intermediates: Vec::new(),
            private_marker: None,
        }
    }

    /// Get parameter at index, or default value if not present
    pub fn param(&self, index: usize, default: u32) -> u32 {
        self.params.get(index).copied().unwrap_or(default)
    }

    /// Get parameter at index, treating 0 as default
    pub fn param_or_default(&self, index: usize, default: u32) -> u32 {
        match self.params.get(index) {
            Some(&0) | None => default,
            Some(&v) => v,
        }
    }
}

/// Escape sequences other than CSI, OSC and DCS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscAction {
    /// DECSC, `ESC 7`
    SaveCursor,

    /// DECRC, `ESC 8`
    RestoreCursor,

    /// IND, `ESC D`: same as line feed
    Index,

    /// RI, `ESC M`
    ReverseIndex,

    /// RIS, `ESC c`
    FullReset,

    /// DECKPAM, `ESC =`
    ApplicationKeypad,

    /// DECKPNM, `ESC >`
    NormalKeypad,

    /// ESC ( x / ESC ) x - designate G0 (slot 0) or G1 (slot 1)
    DesignateCharset { slot: u8, charset: Charset },

    /// DECALN, `ESC # 8`
    AlignmentTest,
}

/// OSC strings the terminal acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscAction {
    /// OSC 4 - set a palette entry
    SetColor { index: u8, color: Color },
}
