//! CSI command decoding
//!
//! Maps a collected `CsiAction` to the command it names, keyed on
//! `(final byte, private marker, intermediates)`. Counts and positions are
//! already defaulted here; sizes are left unclamped for the screen to
//! bound.

use super::action::CsiAction;

/// A recognised CSI command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsiCommand {
    /// CUU
    CursorUp(usize),
    /// CUD
    CursorDown(usize),
    /// CUF
    CursorForward(usize),
    /// CUB
    CursorBackward(usize),
    /// CHA, 1-based
    CursorColumn(usize),
    /// VPA, 1-based
    CursorRow(usize),
    /// CUP / HVP, 1-based
    CursorPosition { row: usize, col: usize },
    /// ED
    EraseInDisplay(u32),
    /// EL
    EraseInLine(u32),
    /// SGR
    SelectGraphicRendition,
    /// SM / RM (ANSI modes)
    SetMode { modes: Vec<u32>, enable: bool },
    /// DECSET / DECRST
    SetPrivateMode { modes: Vec<u32>, enable: bool },
    /// DECSCUSR
    SetCursorStyle(u32),
    /// SCOSC
    SaveCursor,
    /// SCORC
    RestoreCursor,
    /// DECSTBM, 1-based with 0 meaning default
    SetScrollRegion { top: usize, bottom: usize },
    /// ICH
    InsertChars(usize),
    /// IL
    InsertLines(usize),
    /// DL
    DeleteLines(usize),
    /// DCH
    DeleteChars(usize),
    /// SU
    ScrollUp(usize),
    /// SD
    ScrollDown(usize),
    /// ECH
    EraseChars(usize),
    /// DA
    DeviceAttributes(u32),
    /// DSR
    DeviceStatusReport(u32),
    /// XTWINOPS
    WindowOp(u32),
}

impl CsiCommand {
    /// Decode a CSI sequence; `None` for combinations the terminal ignores
    pub fn parse(csi: &CsiAction) -> Option<Self> {
        let count = |i: usize| csi.param_or_default(i, 1) as usize;
        let modes = || csi.params.clone();

        let command = match (csi.final_byte, csi.private_marker, csi.intermediates.as_slice()) {
            (b'h', Some(b'?'), []) => CsiCommand::SetPrivateMode { modes: modes(), enable: true },
            (b'l', Some(b'?'), []) => CsiCommand::SetPrivateMode { modes: modes(), enable: false },
            (b'q', None, [b' ']) => CsiCommand::SetCursorStyle(csi.param(0, 1)),
            (_, Some(_), _) | (_, None, [_, ..]) => return None,

            (b'A', None, []) => CsiCommand::CursorUp(count(0)),
            (b'B', None, []) => CsiCommand::CursorDown(count(0)),
            (b'C', None, []) => CsiCommand::CursorForward(count(0)),
            (b'D', None, []) => CsiCommand::CursorBackward(count(0)),
            (b'G', None, []) => CsiCommand::CursorColumn(count(0)),
            (b'd', None, []) => CsiCommand::CursorRow(count(0)),
            (b'H' | b'f', None, []) => CsiCommand::CursorPosition {
                row: count(0),
                col: count(1),
            },
            (b'J', None, []) => CsiCommand::EraseInDisplay(csi.param(0, 0)),
            (b'K', None, []) => CsiCommand::EraseInLine(csi.param(0, 0)),
            (b'm', None, []) => CsiCommand::SelectGraphicRendition,
            (b'h', None, []) => CsiCommand::SetMode { modes: modes(), enable: true },
            (b'l', None, []) => CsiCommand::SetMode { modes: modes(), enable: false },
            (b's', None, []) => CsiCommand::SaveCursor,
            (b'u', None, []) => CsiCommand::RestoreCursor,
            (b'r', None, []) => CsiCommand::SetScrollRegion {
                top: csi.param(0, 0) as usize,
                bottom: csi.param(1, 0) as usize,
            },
            (b'@', None, []) => CsiCommand::InsertChars(count(0)),
            (b'L', None, []) => CsiCommand::InsertLines(count(0)),
            (b'M', None, []) => CsiCommand::DeleteLines(count(0)),
            (b'P', None, []) => CsiCommand::DeleteChars(count(0)),
            (b'S', None, []) => CsiCommand::ScrollUp(count(0)),
            (b'T' | b'^', None, []) => CsiCommand::ScrollDown(count(0)),
            (b'X', None, []) => CsiCommand::EraseChars(count(0)),
            (b'c', None, []) => CsiCommand::DeviceAttributes(csi.param(0, 0)),
            (b'n', None, []) => CsiCommand::DeviceStatusReport(csi.param(0, 0)),
            (b't', None, []) => CsiCommand::WindowOp(csi.param(0, 0)),
            _ => return None,
        };
        Some(command)
    }
}
