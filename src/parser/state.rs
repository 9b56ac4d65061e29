//! Parser State Machine
//!
//! Byte-at-a-time state machine turning PTY output into [`Action`]s. All
//! state, including a partially decoded UTF-8 sequence and any half-read
//! escape sequence, persists between calls, so input may be split at any
//! byte boundary.
//!
//! States:
//! - Normal: text, C0 controls and UTF-8 decoding
//! - Escape: after ESC, waiting for the dispatch byte
//! - Charset: after `ESC (` or `ESC )`, waiting for the designation byte
//! - Hash: after `ESC #`, waiting for `8`
//! - Csi: collecting parameters, private marker and intermediates
//! - Osc: collecting the payload until BEL or ESC
//! - Dcs: swallowing everything until ESC

use tracing::{debug, trace};

use super::action::{Action, ControlCode, CsiAction, EscAction};
use super::osc::parse_osc;
use crate::core::Charset;

/// Maximum CSI parameters kept; later ones are discarded
pub const MAX_PARAMS: usize = 16;
/// Maximum CSI intermediate bytes kept
pub const MAX_INTERMEDIATES: usize = 3;
/// OSC payload capacity; longer payloads are truncated
pub const OSC_CAPACITY: usize = 255;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escape,
    /// Designating into G0 (0) or G1 (1)
    Charset(u8),
    Hash,
    Csi,
    Osc,
    Dcs,
}

/// The terminal parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    /// Parameters for CSI sequences
    params: [u32; MAX_PARAMS],
    /// Parameters started so far (0 until the first digit or `;`)
    param_count: usize,
    /// Set once a parameter past the limit has begun
    params_overflow: bool,
    private_marker: Option<u8>,
    intermediates: Vec<u8>,
    /// OSC string payload
    osc: Vec<u8>,
    /// UTF-8 decoder state
    utf8_codepoint: u32,
    utf8_remaining: u8,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the normal state
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            params: [0; MAX_PARAMS],
            param_count: 0,
            params_overflow: false,
            private_marker: None,
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            osc: Vec::with_capacity(OSC_CAPACITY),
            utf8_codepoint: 0,
            utf8_remaining: 0,
        }
    }

    /// Reset the parser to initial state
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.clear_csi();
        self.osc.clear();
        self.utf8_codepoint = 0;
        self.utf8_remaining = 0;
    }

    /// True when no sequence or UTF-8 character is partially read
    pub fn is_idle(&self) -> bool {
        self.state == State::Normal && self.utf8_remaining == 0
    }

    /// Clear CSI collection state
    fn clear_csi(&mut self) {
        self.params = [0; MAX_PARAMS];
        self.param_count = 0;
        self.params_overflow = false;
        self.private_marker = None;
        self.intermediates.clear();
    }

    /// Process a chunk of bytes, returning actions
    pub fn parse(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        for &byte in data {
            self.advance(byte, &mut actions);
        }
        actions
    }

    /// Process a single byte. A byte that aborts a sequence is fed again
    /// from the normal state.
    pub fn advance(&mut self, byte: u8, actions: &mut Vec<Action>) {
        loop {
            let reprocess = match self.state {
                State::Normal => self.process_normal(byte, actions),
                State::Escape => self.process_escape(byte, actions),
                State::Charset(slot) => self.process_charset(slot, byte, actions),
                State::Hash => self.process_hash(byte, actions),
                State::Csi => self.process_csi(byte, actions),
                State::Osc => self.process_osc(byte, actions),
                State::Dcs => self.process_dcs(byte),
            };
            if !reprocess {
                break;
            }
        }
    }

    fn process_normal(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        if self.utf8_remaining > 0 {
            if byte & 0xC0 == 0x80 {
                self.utf8_codepoint = (self.utf8_codepoint << 6) | u32::from(byte & 0x3F);
                self.utf8_remaining -= 1;
                if self.utf8_remaining == 0 {
                    let c = char::from_u32(self.utf8_codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
                    actions.push(Action::Print(c));
                }
                return false;
            }
            debug!("Invalid UTF-8 continuation byte: {:#04x}", byte);
            self.utf8_remaining = 0;
            return true;
        }

        match byte {
            0x1B => self.state = State::Escape,
            0x20..=0x7E => actions.push(Action::Print(byte as char)),
            0x00..=0x1F => {
                if let Some(code) = ControlCode::from_byte(byte) {
                    actions.push(Action::Execute(code));
                }
            }
            0x7F => {}
            0xC0..=0xDF => self.start_utf8(u32::from(byte & 0x1F), 1),
            0xE0..=0xEF => self.start_utf8(u32::from(byte & 0x0F), 2),
            0xF0..=0xF7 => self.start_utf8(u32::from(byte & 0x07), 3),
            _ => debug!("Invalid UTF-8 start byte: {:#04x}", byte),
        }
        false
    }

    fn start_utf8(&mut self, bits: u32, remaining: u8) {
        self.utf8_codepoint = bits;
        self.utf8_remaining = remaining;
    }

    fn process_escape(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        self.state = State::Normal;
        let esc = match byte {
            0x1B => {
                self.state = State::Escape;
                None
            }
            b'[' => {
                self.clear_csi();
                self.state = State::Csi;
                None
            }
            b']' => {
                self.osc.clear();
                self.state = State::Osc;
                None
            }
            b'P' => {
                self.state = State::Dcs;
                None
            }
            b'(' => {
                self.state = State::Charset(0);
                None
            }
            b')' => {
                self.state = State::Charset(1);
                None
            }
            b'#' => {
                self.state = State::Hash;
                None
            }
            b'7' => Some(EscAction::SaveCursor),
            b'8' => Some(EscAction::RestoreCursor),
            b'D' => Some(EscAction::Index),
            b'M' => Some(EscAction::ReverseIndex),
            b'=' => Some(EscAction::ApplicationKeypad),
            b'>' => Some(EscAction::NormalKeypad),
            b'c' => {
                self.reset();
                Some(EscAction::FullReset)
            }
            // String terminator and VT52 ANSI-mode entry need no action
            b'\\' | b'<' => None,
            _ => {
                debug!(
                    "Unhandled escape sequence: ESC {:?} ({:#04x})",
                    byte as char, byte
                );
                None
            }
        };
        if let Some(esc) = esc {
            trace!("ESC dispatch: {:?}", esc);
            actions.push(Action::Esc(esc));
        }
        false
    }

    fn process_charset(&mut self, slot: u8, byte: u8, actions: &mut Vec<Action>) -> bool {
        self.state = State::Normal;
        match Charset::from_designation(byte) {
            Some(charset) => actions.push(Action::Esc(EscAction::DesignateCharset { slot, charset })),
            None => debug!("Ignoring charset designation {:?} for G{}", byte as char, slot),
        }
        false
    }

    fn process_hash(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        self.state = State::Normal;
        if byte == b'8' {
            actions.push(Action::Esc(EscAction::AlignmentTest));
            return false;
        }
        debug!("Unhandled escape sequence: ESC # {:?}", byte as char);
        true
    }

    fn process_csi(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        match byte {
            0x1B => self.state = State::Escape,
            b'0'..=b'9' => {
                if self.param_count == 0 {
                    self.param_count = 1;
                }
                if !self.params_overflow {
                    let param = &mut self.params[self.param_count - 1];
                    *param = param
                        .saturating_mul(10)
                        .saturating_add(u32::from(byte - b'0'));
                }
            }
            // Colon subparameters are treated as plain separators
            b';' | b':' => {
                if self.param_count == 0 {
                    self.param_count = 1;
                }
                if self.param_count < MAX_PARAMS {
                    self.param_count += 1;
                } else {
                    self.params_overflow = true;
                }
            }
            b'<'..=b'?' => self.private_marker = Some(byte),
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                }
            }
            0x40..=0x7E => {
                if self.param_count == 0 {
                    self.param_count = 1;
                }
                let csi = CsiAction {
                    final_byte: byte,
                    params: self.params[..self.param_count].to_vec(),
                    intermediates: self.intermediates.clone(),
                    private_marker: self.private_marker,
                };
                trace!("CSI dispatch: {:?}", csi);
                actions.push(Action::Csi(csi));
                self.state = State::Normal;
            }
            _ => {
                debug!("Unexpected byte {:#04x} in CSI sequence", byte);
                self.state = State::Normal;
                return true;
            }
        }
        false
    }

    fn process_osc(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        match byte {
            0x07 => {
                self.dispatch_osc(actions);
                self.state = State::Normal;
            }
            0x1B => {
                self.dispatch_osc(actions);
                self.state = State::Escape;
            }
            0x20..=0x7E => {
                if self.osc.len() < OSC_CAPACITY {
                    self.osc.push(byte);
                }
            }
            _ => {
                debug!("Aborting OSC sequence on byte {:#04x}", byte);
                self.state = State::Normal;
            }
        }
        false
    }

    fn dispatch_osc(&mut self, actions: &mut Vec<Action>) {
        if let Some(osc) = parse_osc(&self.osc) {
            trace!("OSC dispatch: {:?}", osc);
            actions.push(Action::Osc(osc));
        }
        self.osc.clear();
    }

    fn process_dcs(&mut self, byte: u8) -> bool {
        if byte == 0x1B {
            self.state = State::Escape;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;
    use crate::parser::OscAction;

    fn parse(input: &[u8]) -> Vec<Action> {
        Parser::new().parse(input)
    }

    fn single_csi(input: &[u8]) -> CsiAction {
        match parse(input).as_slice() {
            [Action::Csi(csi)] => csi.clone(),
            other => panic!("expected one CSI action, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text() {
        let actions = parse(b"Hi");
        assert_eq!(actions, vec![Action::Print('H'), Action::Print('i')]);
    }

    #[test]
    fn test_controls() {
        let actions = parse(b"\r\n\x08\t\x0e\x0f\x07");
        assert_eq!(
            actions,
            vec![
                Action::Execute(ControlCode::CarriageReturn),
                Action::Execute(ControlCode::LineFeed),
                Action::Execute(ControlCode::Backspace),
                Action::Execute(ControlCode::Tab),
                Action::Execute(ControlCode::ShiftOut),
                Action::Execute(ControlCode::ShiftIn),
            ]
        );
    }

    #[test]
    fn test_utf8() {
        let actions = parse("é€😀".as_bytes());
        assert_eq!(
            actions,
            vec![Action::Print('é'), Action::Print('€'), Action::Print('😀')]
        );
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let mut parser = Parser::new();
        let bytes = "€".as_bytes();
        assert!(parser.parse(&bytes[..1]).is_empty());
        assert!(!parser.is_idle());
        assert!(parser.parse(&bytes[1..2]).is_empty());
        assert_eq!(parser.parse(&bytes[2..]), vec![Action::Print('€')]);
        assert!(parser.is_idle());
    }

    #[test]
    fn test_invalid_continuation_is_reprocessed() {
        let actions = parse(b"\xe2\x82A");
        assert_eq!(actions, vec![Action::Print('A')]);

        let actions = parse(b"\xc3\x1b[A");
        assert!(matches!(actions.as_slice(), [Action::Csi(csi)] if csi.final_byte == b'A'));
    }

    #[test]
    fn test_invalid_start_byte_dropped() {
        assert_eq!(parse(b"\x80\xffA"), vec![Action::Print('A')]);
    }

    #[test]
    fn test_surrogate_becomes_replacement() {
        assert_eq!(parse(b"\xed\xa0\x80"), vec![Action::Print('\u{FFFD}')]);
    }

    #[test]
    fn test_csi_params() {
        let csi = single_csi(b"\x1b[1;31m");
        assert_eq!(csi.final_byte, b'm');
        assert_eq!(csi.params, vec![1, 31]);
        assert_eq!(csi.private_marker, None);
    }

    #[test]
    fn test_csi_empty_params() {
        assert_eq!(single_csi(b"\x1b[m").params, vec![0]);
        assert_eq!(single_csi(b"\x1b[;5H").params, vec![0, 5]);
        assert_eq!(single_csi(b"\x1b[5;H").params, vec![5, 0]);
    }

    #[test]
    fn test_csi_param_overflow_discarded() {
        let mut input = b"\x1b[".to_vec();
        for i in 1..=20 {
            input.extend_from_slice(i.to_string().as_bytes());
            input.push(b';');
        }
        input.push(b'm');
        let csi = single_csi(&input);
        assert_eq!(csi.params.len(), MAX_PARAMS);
        assert_eq!(csi.params[15], 16);
    }

    #[test]
    fn test_csi_huge_param_saturates() {
        let csi = single_csi(b"\x1b[99999999999999999999A");
        assert_eq!(csi.params, vec![u32::MAX]);
    }

    #[test]
    fn test_csi_private_and_intermediate() {
        let csi = single_csi(b"\x1b[?1049h");
        assert_eq!(csi.private_marker, Some(b'?'));
        assert_eq!(csi.params, vec![1049]);

        let csi = single_csi(b"\x1b[4 q");
        assert_eq!(csi.intermediates, vec![b' ']);
        assert_eq!(csi.params, vec![4]);
    }

    #[test]
    fn test_csi_split_across_chunks() {
        let mut parser = Parser::new();
        assert!(parser.parse(b"\x1b[1").is_empty());
        assert!(parser.parse(b"0;2").is_empty());
        let actions = parser.parse(b"0H");
        assert!(matches!(actions.as_slice(), [Action::Csi(csi)] if csi.params == vec![10, 20]));
    }

    #[test]
    fn test_escape_cancels_csi() {
        let actions = parse(b"\x1b[12\x1b7");
        assert_eq!(actions, vec![Action::Esc(EscAction::SaveCursor)]);
    }

    #[test]
    fn test_control_aborts_csi_and_executes() {
        let actions = parse(b"\x1b[1\nA");
        assert_eq!(
            actions,
            vec![Action::Execute(ControlCode::LineFeed), Action::Print('A')]
        );
    }

    #[test]
    fn test_escape_sequences() {
        let actions = parse(b"\x1b7\x1b8\x1bD\x1bM\x1b=\x1b>");
        assert_eq!(
            actions,
            vec![
                Action::Esc(EscAction::SaveCursor),
                Action::Esc(EscAction::RestoreCursor),
                Action::Esc(EscAction::Index),
                Action::Esc(EscAction::ReverseIndex),
                Action::Esc(EscAction::ApplicationKeypad),
                Action::Esc(EscAction::NormalKeypad),
            ]
        );
    }

    #[test]
    fn test_unknown_escape_returns_to_normal() {
        assert_eq!(parse(b"\x1bZA"), vec![Action::Print('A')]);
    }

    #[test]
    fn test_charset_designation_split() {
        let mut parser = Parser::new();
        assert!(parser.parse(b"\x1b(").is_empty());
        assert_eq!(
            parser.parse(b"0q"),
            vec![
                Action::Esc(EscAction::DesignateCharset {
                    slot: 0,
                    charset: Charset::DecSpecialGraphics
                }),
                Action::Print('q'),
            ]
        );
        // Unsupported sets are consumed and ignored
        assert_eq!(parse(b"\x1b)Ax"), vec![Action::Print('x')]);
    }

    #[test]
    fn test_alignment_test() {
        assert_eq!(parse(b"\x1b#8"), vec![Action::Esc(EscAction::AlignmentTest)]);
        assert_eq!(parse(b"\x1b#X"), vec![Action::Print('X')]);
    }

    #[test]
    fn test_osc_bel_and_st() {
        let expected = Action::Osc(OscAction::SetColor {
            index: 1,
            color: Color::rgb(255, 0, 0),
        });
        assert_eq!(parse(b"\x1b]4;1;#ff0000\x07"), vec![expected.clone()]);
        assert_eq!(parse(b"\x1b]4;1;#ff0000\x1b\\A"), vec![expected, Action::Print('A')]);
    }

    #[test]
    fn test_osc_ignored_and_aborted() {
        assert_eq!(parse(b"\x1b]0;title\x07A"), vec![Action::Print('A')]);
        // Non-printable byte aborts and is dropped
        assert_eq!(parse(b"\x1b]4;1\x01B"), vec![Action::Print('B')]);
    }

    #[test]
    fn test_osc_truncated() {
        let mut input = b"\x1b]4;1;#00ff00".to_vec();
        input.extend(std::iter::repeat(b'x').take(400));
        input.push(0x07);
        let mut parser = Parser::new();
        assert!(parser.parse(&input).is_empty());
        assert!(parser.is_idle());
    }

    #[test]
    fn test_osc_overflow_keeps_buffered_prefix() {
        // Zero-padded index so the payload fills the buffer exactly
        let suffix = "1;#00ff00";
        let index_pad = "0".repeat(OSC_CAPACITY - 2 - suffix.len());
        let payload = format!("4;{}{}", index_pad, suffix);
        assert_eq!(payload.len(), OSC_CAPACITY);

        let mut input = b"\x1b]".to_vec();
        input.extend_from_slice(payload.as_bytes());
        input.extend(std::iter::repeat(b'z').take(50));
        input.push(0x07);

        let mut parser = Parser::new();
        assert_eq!(
            parser.parse(&input),
            vec![Action::Osc(OscAction::SetColor {
                index: 1,
                color: Color::rgb(0, 255, 0),
            })]
        );
        assert!(parser.is_idle());
    }

    #[test]
    fn test_dcs_swallowed() {
        assert_eq!(parse(b"\x1bPq#0;1;2\x1b\\A"), vec![Action::Print('A')]);
    }

    #[test]
    fn test_full_reset() {
        assert_eq!(parse(b"\x1bcA"), vec![
            Action::Esc(EscAction::FullReset),
            Action::Print('A'),
        ]);
    }

    #[test]
    fn test_del_ignored() {
        assert_eq!(parse(b"a\x7fb"), vec![Action::Print('a'), Action::Print('b')]);
    }
}
