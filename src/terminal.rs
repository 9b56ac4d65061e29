//! Terminal Executor
//!
//! Ties together the parser, screen model and palette, and applies parsed
//! actions to update the terminal state. This is the main integration point
//! between parsing and the screen model.
//!
//! Replies to device queries (DA, DSR, window size) are held in a single
//! pending slot that the caller drains and writes back to the PTY.

use std::path::Path;

use tracing::{debug, trace, warn};

use crate::colorscheme::Colorscheme;
use crate::config::TerminalConfig;
use crate::core::{Attrs, Color, CursorStyle, DirtyRegion, Glyph, Palette, Pen, Screen, Snapshot};
use crate::error::Result;
use crate::parser::{
    Action, ControlCode, CsiAction, CsiCommand, EscAction, OscAction, Parser, SgrAttribute,
};

/// Longest reply the terminal ever queues
const RESPONSE_CAPACITY: usize = 64;

/// Commands issued by the host UI rather than the byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleCursorVisibility,
    ToggleCursorBlink,
    CycleCursorStyle,
    Reset,
    ClearScreen,
}

/// Terminal executor that processes parsed actions and updates the screen
#[derive(Debug, Clone)]
pub struct Terminal {
    /// The terminal screen
    screen: Screen,
    /// The escape sequence parser
    parser: Parser,
    /// Colors that SGR indices and defaults resolve against
    palette: Palette,
    /// Pending reply for the host, empty when drained
    response: Vec<u8>,
}

impl Terminal {
    /// Create a terminal with the default palette
    pub fn new(cols: usize, rows: usize, scrollback: usize) -> Result<Self> {
        Self::with_palette(cols, rows, scrollback, Palette::new())
    }

    /// Create a terminal with the given palette
    pub fn with_palette(cols: usize, rows: usize, scrollback: usize, palette: Palette) -> Result<Self> {
        let pen = Pen::new(palette.default_fg, palette.default_bg);
        Ok(Self {
            screen: Screen::new(cols, rows, scrollback, pen)?,
            parser: Parser::new(),
            palette,
            response: Vec::with_capacity(RESPONSE_CAPACITY),
        })
    }

    /// Create a terminal from configuration. A colorscheme that cannot be
    /// read is logged and the default palette kept.
    pub fn from_config(config: &TerminalConfig) -> Result<Self> {
        config.validate()?;
        let mut palette = Palette::new();
        if let Some(path) = &config.colorscheme {
            match Colorscheme::load(path) {
                Ok(scheme) => scheme.apply(&mut palette),
                Err(e) => warn!(
                    "Could not load colorscheme {}: {}; using defaults",
                    path.display(),
                    e
                ),
            }
        }
        Self::with_palette(config.cols, config.rows, config.scrollback, palette)
    }

    /// Get a reference to the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Get a mutable reference to the screen
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Get the palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the palette. Cells already on screen keep their colors; the
    /// new defaults apply to subsequent output and resets.
    pub fn set_palette(&mut self, palette: Palette) {
        let old_default = self.screen.default_pen();
        let new_default = Pen::new(palette.default_fg, palette.default_bg);
        if self.screen.pen == old_default {
            self.screen.pen = new_default;
        }
        self.screen.set_default_pen(new_default);
        self.palette = palette;
    }

    /// Load a colorscheme file and apply it to the current palette
    pub fn load_colorscheme(&mut self, path: &Path) -> Result<()> {
        let scheme = Colorscheme::load(path)?;
        let mut palette = self.palette.clone();
        scheme.apply(&mut palette);
        self.set_palette(palette);
        Ok(())
    }

    /// Process output bytes from the PTY. New output snaps the viewport back
    /// to the live screen.
    pub fn handle_input(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.screen.reset_view();
        let actions = self.parser.parse(data);
        for action in actions {
            self.apply_action(action);
        }
    }

    /// Pending reply bytes, empty if none
    pub fn response(&self) -> &[u8] {
        &self.response
    }

    /// Whether a reply is waiting to be written back
    pub fn has_response(&self) -> bool {
        !self.response.is_empty()
    }

    /// Drain the pending reply
    pub fn take_response(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.response)
    }

    /// Discard the pending reply after the caller has written it
    pub fn clear_response(&mut self) {
        self.response.clear();
    }

    /// Queue a reply. Only one reply is held; while it is pending, later
    /// replies are dropped.
    fn queue_response(&mut self, reply: String) {
        if !self.response.is_empty() {
            debug!("Response pending, dropping {:?}", reply);
            return;
        }
        if reply.len() > RESPONSE_CAPACITY {
            debug!("Response too long, dropping {:?}", reply);
            return;
        }
        self.response.extend_from_slice(reply.as_bytes());
    }

    /// Full reset of screen and parser state. The palette is kept.
    pub fn reset(&mut self) {
        self.screen.reset();
        self.parser.reset();
    }

    /// Resize and reset. Content and history are not preserved. On error
    /// the terminal is left as it was.
    pub fn resize(&mut self, cols: usize, rows: usize) -> Result<()> {
        if self.screen.resize(cols, rows)? {
            self.parser.reset();
        }
        Ok(())
    }

    /// Blank the visible screen without moving the cursor
    pub fn clear_visible_screen(&mut self) {
        self.screen.clear_visible_screen();
    }

    /// Move the scrollback viewport by `delta` rows, positive going back
    pub fn scroll_view(&mut self, delta: i64) -> bool {
        self.screen.scroll_view(delta)
    }

    /// Set the scrollback viewport, clamped to the available history
    pub fn set_view_offset(&mut self, offset: i64) -> bool {
        self.screen.set_view_offset(offset)
    }

    /// Row `y` as the renderer should show it
    pub fn view_line(&self, y: usize) -> Option<&[Glyph]> {
        self.screen.view_line(y)
    }

    /// Whether anything needs repainting
    pub fn is_dirty(&self) -> bool {
        let dirty = self.screen.dirty();
        dirty.has_dirty() || dirty.full_redraw_needed()
    }

    /// Consume the dirty state for a render pass
    pub fn take_dirty(&mut self) -> DirtyRegion {
        self.screen.take_dirty()
    }

    /// Capture the visible state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_terminal(self)
    }

    /// Run a host command
    pub fn run_command(&mut self, command: Command) {
        debug!("Running command {:?}", command);
        match command {
            Command::ToggleCursorVisibility => self.screen.toggle_cursor_visibility(),
            Command::ToggleCursorBlink => self.screen.toggle_cursor_blink(),
            Command::CycleCursorStyle => self.screen.cycle_cursor_style(),
            Command::Reset => self.reset(),
            Command::ClearScreen => self.clear_visible_screen(),
        }
    }

    /// Apply a single parsed action to the screen
    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Print(c) => self.screen.put_char(c),
            Action::Execute(code) => self.execute_c0(code),
            Action::Csi(csi) => self.execute_csi(&csi),
            Action::Esc(esc) => self.execute_esc(esc),
            Action::Osc(osc) => self.execute_osc(osc),
        }
    }

    /// Execute a C0 control character
    fn execute_c0(&mut self, code: ControlCode) {
        match code {
            ControlCode::Backspace => self.screen.backspace(),
            ControlCode::Tab => self.screen.tab(),
            ControlCode::LineFeed => self.screen.newline(),
            ControlCode::CarriageReturn => self.screen.carriage_return(),
            ControlCode::ShiftOut => self.screen.charsets.shift_out(),
            ControlCode::ShiftIn => self.screen.charsets.shift_in(),
        }
    }

    /// Execute a CSI sequence
    fn execute_csi(&mut self, csi: &CsiAction) {
        let Some(command) = CsiCommand::parse(csi) else {
            debug!(
                "Unhandled CSI: final={:?} marker={:?} intermediates={:?} params={:?}",
                csi.final_byte as char, csi.private_marker, csi.intermediates, csi.params
            );
            return;
        };
        trace!("CSI {:?}", command);

        match command {
            CsiCommand::CursorUp(n) => self.screen.cursor_up(n),
            CsiCommand::CursorDown(n) => self.screen.cursor_down(n),
            CsiCommand::CursorForward(n) => self.screen.cursor_forward(n),
            CsiCommand::CursorBackward(n) => self.screen.cursor_backward(n),
            CsiCommand::CursorColumn(col) => self.screen.cursor_to_col(col),
            CsiCommand::CursorRow(row) => self.screen.cursor_to_row(row),
            CsiCommand::CursorPosition { row, col } => self.screen.cursor_position(row, col),
            CsiCommand::EraseInDisplay(mode) => self.screen.erase_in_display(mode),
            CsiCommand::EraseInLine(mode) => self.screen.erase_in_line(mode),
            CsiCommand::SelectGraphicRendition => self.execute_sgr(csi),
            CsiCommand::SetMode { modes, enable } => {
                for mode in modes {
                    match mode {
                        4 => self.screen.modes.insert_mode = enable,
                        _ => debug!("Unknown ANSI mode: {} = {}", mode, enable),
                    }
                }
            }
            CsiCommand::SetPrivateMode { modes, enable } => {
                for mode in modes {
                    self.set_dec_mode(mode, enable);
                }
            }
            CsiCommand::SetCursorStyle(param) => match CursorStyle::from_decscusr(param) {
                Some((style, blinking)) => {
                    self.screen.cursor.style = style;
                    self.screen.cursor.blinking = blinking;
                    self.screen.mark_line(self.screen.cursor.y);
                }
                None => debug!("Unknown cursor style {}", param),
            },
            CsiCommand::SaveCursor => self.screen.save_cursor(),
            CsiCommand::RestoreCursor => self.screen.restore_cursor(),
            CsiCommand::SetScrollRegion { top, bottom } => self.screen.set_scroll_region(top, bottom),
            CsiCommand::InsertChars(n) => self.screen.insert_chars(n),
            CsiCommand::InsertLines(n) => self.screen.insert_lines(n),
            CsiCommand::DeleteLines(n) => self.screen.delete_lines(n),
            CsiCommand::DeleteChars(n) => self.screen.delete_chars(n),
            CsiCommand::ScrollUp(n) => self.screen.scroll_region_up(n),
            CsiCommand::ScrollDown(n) => self.screen.scroll_region_down(n),
            CsiCommand::EraseChars(n) => self.screen.erase_chars(n),
            CsiCommand::DeviceAttributes(0) => self.queue_response("\x1b[?1;2c".to_string()),
            CsiCommand::DeviceStatusReport(6) => {
                let x = self.screen.cursor.x.min(self.screen.cols() - 1);
                let y = self.screen.cursor.y;
                self.queue_response(format!("\x1b[{};{}R", y + 1, x + 1));
            }
            CsiCommand::WindowOp(18) => {
                let reply = format!("\x1b[8;{};{}t", self.screen.rows(), self.screen.cols());
                self.queue_response(reply);
            }
            CsiCommand::DeviceAttributes(p)
            | CsiCommand::DeviceStatusReport(p)
            | CsiCommand::WindowOp(p) => {
                debug!("Ignoring report request {:?} with parameter {}", csi.final_byte as char, p);
            }
        }
    }

    /// Set/reset a DEC private mode
    fn set_dec_mode(&mut self, mode: u32, enable: bool) {
        match mode {
            1 => self.screen.modes.application_cursor = enable,
            6 => self.screen.set_origin_mode(enable),
            7 => self.screen.modes.autowrap = enable,
            25 => {
                self.screen.cursor.visible = enable;
                self.screen.mark_line(self.screen.cursor.y);
            }
            66 => self.screen.modes.application_keypad = enable,
            1049 => {
                if enable {
                    self.screen.enter_alternate_screen();
                } else {
                    self.screen.exit_alternate_screen();
                }
            }
            _ => debug!("Unknown DEC mode: {} = {}", mode, enable),
        }
    }

    /// Execute SGR (Select Graphic Rendition)
    fn execute_sgr(&mut self, csi: &CsiAction) {
        let default_pen = self.screen.default_pen();
        let pen = &mut self.screen.pen;

        for attr in csi.parse_sgr() {
            match attr {
                SgrAttribute::Reset => *pen = default_pen,
                SgrAttribute::Bold => pen.attrs.insert(Attrs::BOLD),
                SgrAttribute::Italic => pen.attrs.insert(Attrs::ITALIC),
                SgrAttribute::Underline => pen.attrs.insert(Attrs::UNDERLINE),
                SgrAttribute::Blink => pen.attrs.insert(Attrs::BLINK),
                SgrAttribute::Inverse => pen.attrs.insert(Attrs::INVERSE),
                SgrAttribute::NormalIntensity => pen.attrs.remove(Attrs::BOLD),
                SgrAttribute::NotItalic => pen.attrs.remove(Attrs::ITALIC),
                SgrAttribute::NotUnderlined => pen.attrs.remove(Attrs::UNDERLINE),
                SgrAttribute::NotBlinking => pen.attrs.remove(Attrs::BLINK),
                SgrAttribute::NotInverse => pen.attrs.remove(Attrs::INVERSE),
                SgrAttribute::ForegroundIndexed(i) => pen.fg = self.palette.base(i as usize),
                SgrAttribute::BackgroundIndexed(i) => pen.bg = self.palette.base(i as usize),
                SgrAttribute::Foreground256(i) => pen.fg = self.palette.indexed(i),
                SgrAttribute::Background256(i) => pen.bg = self.palette.indexed(i),
                SgrAttribute::ForegroundRgb(r, g, b) => pen.fg = Color::rgb(r, g, b),
                SgrAttribute::BackgroundRgb(r, g, b) => pen.bg = Color::rgb(r, g, b),
                SgrAttribute::DefaultForeground => pen.fg = self.palette.default_fg,
                SgrAttribute::DefaultBackground => pen.bg = self.palette.default_bg,
            }
        }
    }

    /// Execute an ESC sequence
    fn execute_esc(&mut self, esc: EscAction) {
        match esc {
            EscAction::SaveCursor => self.screen.save_cursor(),
            EscAction::RestoreCursor => self.screen.restore_cursor(),
            EscAction::Index => self.screen.newline(),
            EscAction::ReverseIndex => self.screen.reverse_index(),
            // The parser has already reset itself
            EscAction::FullReset => self.screen.reset(),
            EscAction::ApplicationKeypad => self.screen.modes.application_keypad = true,
            EscAction::NormalKeypad => self.screen.modes.application_keypad = false,
            EscAction::DesignateCharset { slot, charset } => {
                self.screen.charsets.designate(slot, charset);
            }
            EscAction::AlignmentTest => self.screen.alignment_test(),
        }
    }

    /// Execute an OSC command
    fn execute_osc(&mut self, osc: OscAction) {
        match osc {
            OscAction::SetColor { index, color } => {
                trace!("Set color {} to {:?}", index, color);
                self.palette.set_indexed(index, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Charset;

    fn terminal(cols: usize, rows: usize) -> Terminal {
        Terminal::new(cols, rows, 100).unwrap()
    }

    fn text(term: &Terminal, y: usize) -> String {
        term.screen().line_text(y).unwrap()
    }

    #[test]
    fn test_terminal_print() {
        let mut term = terminal(80, 24);
        term.handle_input(b"Hello, World!");
        assert_eq!(text(&term, 0), "Hello, World!");
        assert_eq!(term.screen().cursor.x, 13);
    }

    #[test]
    fn test_terminal_rejects_zero_size() {
        assert!(Terminal::new(0, 24, 100).is_err());
        assert!(Terminal::new(80, 0, 100).is_err());
    }

    #[test]
    fn test_terminal_cursor_movement() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[10;5HX");
        assert_eq!(term.screen().cursor.y, 9);
        assert_eq!(term.screen().cursor.x, 5);
        assert_eq!(term.screen().glyph(4, 9).unwrap().ch, 'X');
    }

    #[test]
    fn test_terminal_colors() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[31;44mA");
        let glyph = *term.screen().glyph(0, 0).unwrap();
        assert_eq!(glyph.fg, term.palette().base(1));
        assert_eq!(glyph.bg, term.palette().base(4));
    }

    #[test]
    fn test_terminal_sgr_reset() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[1;31mA\x1b[0mB");

        let a = *term.screen().glyph(0, 0).unwrap();
        assert!(a.attrs.contains(Attrs::BOLD));
        assert_eq!(a.fg, term.palette().base(1));

        let b = *term.screen().glyph(1, 0).unwrap();
        assert!(b.attrs.is_empty());
        assert_eq!(b.fg, term.palette().default_fg);
    }

    #[test]
    fn test_terminal_default_colors_use_palette_defaults() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[31;42m\x1b[39;49mA");
        let glyph = *term.screen().glyph(0, 0).unwrap();
        assert_eq!(glyph.fg, term.palette().default_fg);
        assert_eq!(glyph.bg, term.palette().default_bg);
    }

    #[test]
    fn test_terminal_extended_colors() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[38;2;255;128;64;48;5;196mX");
        let glyph = *term.screen().glyph(0, 0).unwrap();
        assert_eq!(glyph.fg, Color::rgb(255, 128, 64));
        assert_eq!(glyph.bg, term.palette().indexed(196));
    }

    #[test]
    fn test_terminal_erase() {
        let mut term = terminal(10, 3);
        term.handle_input(b"XXXXXXXXXX");
        term.handle_input(b"\x1b[1;5H\x1b[K");
        assert_eq!(text(&term, 0), "XXXX");
    }

    #[test]
    fn test_terminal_scroll_region() {
        let mut term = terminal(10, 6);
        term.handle_input(b"\x1b[2;4r");
        assert_eq!(term.screen().scroll_region_bounds(), (1, 3));
        assert_eq!((term.screen().cursor.x, term.screen().cursor.y), (0, 0));
    }

    #[test]
    fn test_terminal_alternate_screen() {
        let mut term = terminal(20, 5);
        term.handle_input(b"primary\x1b[3;4H");
        let before = term.snapshot();

        term.handle_input(b"\x1b[?1049hX");
        assert!(term.screen().modes.alternate_screen);
        assert_eq!(text(&term, 0), "X");

        term.handle_input(b"\x1b[?1049l");
        let after = term.snapshot();
        assert!(after.content_equals(&before));
        assert_eq!(after.cursor, before.cursor);
    }

    #[test]
    fn test_terminal_private_modes() {
        let mut term = terminal(20, 5);
        term.handle_input(b"\x1b[?1;66h");
        assert!(term.screen().modes.application_cursor);
        assert!(term.screen().modes.application_keypad);

        term.handle_input(b"\x1b[?25l\x1b[?7l");
        assert!(!term.screen().cursor.visible);
        assert!(!term.screen().modes.autowrap);

        term.handle_input(b"\x1b[4h");
        assert!(term.screen().modes.insert_mode);
        term.handle_input(b"\x1b[4l");
        assert!(!term.screen().modes.insert_mode);
    }

    #[test]
    fn test_terminal_origin_mode() {
        let mut term = terminal(20, 10);
        term.handle_input(b"\x1b[3;8r\x1b[?6h");
        assert_eq!(term.screen().cursor.y, 2);
        term.handle_input(b"\x1b[2;1H");
        assert_eq!(term.screen().cursor.y, 3);
        term.handle_input(b"\x1b[20;1H");
        assert_eq!(term.screen().cursor.y, 7);
    }

    #[test]
    fn test_terminal_cursor_style() {
        let mut term = terminal(20, 5);
        term.handle_input(b"\x1b[6 q");
        assert_eq!(term.screen().cursor.style, CursorStyle::Bar);
        assert!(!term.screen().cursor.blinking);

        term.handle_input(b"\x1b[3 q");
        assert_eq!(term.screen().cursor.style, CursorStyle::Underline);
        assert!(term.screen().cursor.blinking);

        // Without the intermediate this is not DECSCUSR
        term.handle_input(b"\x1b[2q");
        assert_eq!(term.screen().cursor.style, CursorStyle::Underline);
    }

    #[test]
    fn test_terminal_insert_delete_lines() {
        let mut term = terminal(10, 4);
        term.handle_input(b"A\r\nB\r\nC\r\nD");
        term.handle_input(b"\x1b[2;1H\x1b[L");
        assert_eq!(text(&term, 0), "A");
        assert_eq!(text(&term, 1), "");
        assert_eq!(text(&term, 2), "B");
        assert_eq!(text(&term, 3), "C");

        term.handle_input(b"\x1b[M");
        assert_eq!(text(&term, 1), "B");
        assert_eq!(text(&term, 3), "");
    }

    #[test]
    fn test_terminal_dsr_reply() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[3;4H\x1b[6n");
        assert_eq!(term.response(), b"\x1b[3;4R");
        assert_eq!(term.take_response(), b"\x1b[3;4R".to_vec());
        assert!(!term.has_response());
    }

    #[test]
    fn test_terminal_device_attributes_and_size() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[c");
        assert_eq!(term.take_response(), b"\x1b[?1;2c".to_vec());

        term.handle_input(b"\x1b[18t");
        assert_eq!(term.take_response(), b"\x1b[8;24;80t".to_vec());

        term.handle_input(b"\x1b[5n\x1b[1c\x1b[14t");
        assert!(!term.has_response());
    }

    #[test]
    fn test_terminal_first_response_wins() {
        let mut term = terminal(80, 24);
        term.handle_input(b"\x1b[c\x1b[6n");
        assert_eq!(term.response(), b"\x1b[?1;2c");

        term.clear_response();
        term.handle_input(b"\x1b[6n");
        assert_eq!(term.response(), b"\x1b[1;1R");
    }

    #[test]
    fn test_terminal_charset_switching() {
        let mut term = terminal(20, 5);
        term.handle_input(b"\x1b(0qx\x1b(Bq");
        assert_eq!(text(&term, 0), "\u{2500}\u{2502}q");

        term.handle_input(b"\r\n\x1b)0\x0eq\x0fq");
        assert_eq!(text(&term, 1), "\u{2500}q");
        assert_eq!(term.screen().charsets.current(), Charset::Ascii);
    }

    #[test]
    fn test_terminal_osc_palette() {
        let mut term = terminal(20, 5);
        term.handle_input(b"\x1b]4;1;rgb:12/34/56\x07\x1b[31mA");
        assert_eq!(term.palette().base(1), Color::rgb(0x12, 0x34, 0x56));
        assert_eq!(term.screen().glyph(0, 0).unwrap().fg, Color::rgb(0x12, 0x34, 0x56));

        term.handle_input(b"\x1b]4;200;#010203\x1b\\");
        assert_eq!(term.palette().indexed(200), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_terminal_full_reset_keeps_palette() {
        let mut term = terminal(20, 5);
        term.handle_input(b"\x1b]4;2;#abcdef\x07\x1b[1mtext\x1b[?1049h");
        term.handle_input(b"\x1bc");

        assert!(!term.screen().modes.alternate_screen);
        assert_eq!(text(&term, 0), "");
        assert!(term.screen().pen.attrs.is_empty());
        assert_eq!(term.palette().base(2), Color::rgb(0xab, 0xcd, 0xef));
    }

    #[test]
    fn test_terminal_alignment_test() {
        let mut term = terminal(4, 2);
        term.handle_input(b"\x1b#8");
        assert_eq!(text(&term, 0), "EEEE");
        assert_eq!(text(&term, 1), "EEEE");
    }

    #[test]
    fn test_terminal_index_and_reverse_index() {
        let mut term = terminal(10, 3);
        term.handle_input(b"top\x1bD\x1bD\x1bD");
        assert_eq!(term.screen().history_size(), 1);
        assert_eq!(text(&term, 0), "");

        term.handle_input(b"\x1b[1;1H\x1bM");
        assert_eq!(term.screen().cursor.y, 0);
        assert_eq!(term.screen().history_size(), 1);
    }

    #[test]
    fn test_terminal_resize() {
        let mut term = terminal(20, 5);
        term.handle_input(b"content\x1b[2;4r\x1b(0");
        term.resize(30, 8).unwrap();

        assert_eq!((term.screen().cols(), term.screen().rows()), (30, 8));
        assert_eq!(text(&term, 0), "");
        assert_eq!(term.screen().scroll_region_bounds(), (0, 7));
        assert_eq!(term.screen().charsets.current(), Charset::Ascii);
    }

    #[test]
    fn test_terminal_resize_resets_parser() {
        let mut term = terminal(20, 5);
        term.handle_input(b"\x1b[3");
        term.resize(10, 5).unwrap();
        term.handle_input(b"A");
        assert_eq!(text(&term, 0), "A");
    }

    #[test]
    fn test_terminal_resize_same_size_keeps_content() {
        let mut term = terminal(20, 5);
        term.handle_input(b"keep");
        term.resize(20, 5).unwrap();
        assert_eq!(text(&term, 0), "keep");

        // A pending sequence survives a same-size resize
        term.handle_input(b"\r\x1b[3");
        term.resize(20, 5).unwrap();
        term.handle_input(b"CX");
        assert_eq!(text(&term, 0), "keeX");
    }

    #[test]
    fn test_terminal_resize_zero_fails() {
        let mut term = terminal(20, 5);
        term.handle_input(b"keep");
        assert!(term.resize(0, 5).is_err());
        assert_eq!(text(&term, 0), "keep");
        assert_eq!(term.screen().cols(), 20);
    }

    #[test]
    fn test_terminal_input_resets_view() {
        let mut term = terminal(10, 3);
        for _ in 0..10 {
            term.handle_input(b"line\r\n");
        }
        assert!(term.scroll_view(3));
        assert_eq!(term.screen().view_offset(), 3);

        term.handle_input(b"");
        assert_eq!(term.screen().view_offset(), 3);

        term.handle_input(b"x");
        assert_eq!(term.screen().view_offset(), 0);
    }

    #[test]
    fn test_terminal_view_offset_clamp() {
        let mut term = terminal(10, 3);
        for _ in 0..5 {
            term.handle_input(b"\n");
        }
        let history = term.screen().history_size() as i64;
        term.set_view_offset(history + 50);
        assert_eq!(term.screen().view_offset() as i64, history);
        term.set_view_offset(-7);
        assert_eq!(term.screen().view_offset(), 0);
    }

    #[test]
    fn test_terminal_commands() {
        let mut term = terminal(10, 3);
        term.run_command(Command::ToggleCursorVisibility);
        assert!(!term.screen().cursor.visible);
        term.run_command(Command::CycleCursorStyle);
        assert_eq!(term.screen().cursor.style, CursorStyle::Underline);
        term.run_command(Command::ToggleCursorBlink);
        assert!(!term.screen().cursor.blinking);

        term.handle_input(b"abc");
        term.run_command(Command::ClearScreen);
        assert_eq!(text(&term, 0), "");
        assert_eq!(term.screen().cursor.x, 3);

        term.run_command(Command::Reset);
        assert!(term.screen().cursor.visible);
        assert_eq!(term.screen().cursor.x, 0);
    }

    #[test]
    fn test_terminal_set_palette_updates_defaults() {
        let mut term = terminal(10, 3);
        let mut palette = Palette::new();
        palette.default_fg = Color::rgb(1, 2, 3);
        palette.default_bg = Color::rgb(4, 5, 6);
        term.set_palette(palette);

        term.handle_input(b"A\x1b[31m\x1b[0mB");
        let a = *term.screen().glyph(0, 0).unwrap();
        let b = *term.screen().glyph(1, 0).unwrap();
        assert_eq!((a.fg, a.bg), (Color::rgb(1, 2, 3), Color::rgb(4, 5, 6)));
        assert_eq!((b.fg, b.bg), (Color::rgb(1, 2, 3), Color::rgb(4, 5, 6)));
    }

    #[test]
    fn test_terminal_from_config_with_colorscheme() {
        let dir = tempfile::tempdir().unwrap();
        let scheme = dir.path().join("scheme.conf");
        std::fs::write(&scheme, "foreground = #aabbcc\ncolor1 = #010101\n").unwrap();

        let config = TerminalConfig {
            cols: 40,
            rows: 10,
            scrollback: 50,
            colorscheme: Some(scheme),
        };
        let mut term = Terminal::from_config(&config).unwrap();
        assert_eq!(term.screen().cols(), 40);
        assert_eq!(term.screen().scrollback(), 50);
        assert_eq!(term.palette().cursor, Color::rgb(0xaa, 0xbb, 0xcc));

        term.handle_input(b"\x1b[31mA");
        assert_eq!(term.screen().glyph(0, 0).unwrap().fg, Color::rgb(1, 1, 1));
    }

    #[test]
    fn test_terminal_from_config_missing_colorscheme() {
        let dir = tempfile::tempdir().unwrap();
        let config = TerminalConfig {
            colorscheme: Some(dir.path().join("nope.conf")),
            ..TerminalConfig::default()
        };
        let term = Terminal::from_config(&config).unwrap();
        assert_eq!(term.palette(), &Palette::new());
    }

    #[test]
    fn test_terminal_load_colorscheme() {
        let mut term = terminal(10, 3);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"background = #202020\n").unwrap();

        term.load_colorscheme(file.path()).unwrap();
        assert_eq!(term.palette().default_bg, Color::rgb(32, 32, 32));
        assert_eq!(term.screen().default_pen().bg, Color::rgb(32, 32, 32));
    }

    #[test]
    fn test_terminal_dirty_tracking() {
        let mut term = terminal(10, 3);
        term.take_dirty();
        assert!(!term.is_dirty());

        term.handle_input(b"\x1b[2;1Hx");
        assert!(term.is_dirty());
        let region = term.take_dirty();
        assert!(region.lines[1]);
        assert!(!term.is_dirty());
    }
}
