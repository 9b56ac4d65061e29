//! SGR (Select Graphic Rendition) decoding
//!
//! Turns the parameter list of `CSI ... m` into attribute changes. Colors
//! are left symbolic; the terminal resolves them against its palette.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::CsiAction;

/// A single rendition change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SgrAttribute {
    /// 0 - default colors, no attributes
    Reset,
    Bold,
    Italic,
    Underline,
    Blink,
    Inverse,
    /// 22
    NormalIntensity,
    NotItalic,
    NotUnderlined,
    NotBlinking,
    NotInverse,
    /// 30-37, 90-97: base palette entry 0-15
    ForegroundIndexed(u8),
    /// 40-47, 100-107: base palette entry 0-15
    BackgroundIndexed(u8),
    /// 38;5;n
    Foreground256(u8),
    /// 48;5;n
    Background256(u8),
    /// 38;2;r;g;b
    ForegroundRgb(u8, u8, u8),
    /// 48;2;r;g;b
    BackgroundRgb(u8, u8, u8),
    /// 39
    DefaultForeground,
    /// 49
    DefaultBackground,
}

impl CsiAction {
    /// Decode this sequence's parameters as SGR attributes
    pub fn parse_sgr(&self) -> Vec<SgrAttribute> {
        parse_sgr(&self.params)
    }
}

/// Decode SGR parameters in order. Extended colors consume the parameters
/// that follow them.
pub fn parse_sgr(params: &[u32]) -> Vec<SgrAttribute> {
    let mut attrs = Vec::with_capacity(params.len());
    let mut i = 0;

    while i < params.len() {
        let code = params[i];
        let attr = match code {
            0 => Some(SgrAttribute::Reset),
            1 => Some(SgrAttribute::Bold),
            3 => Some(SgrAttribute::Italic),
            4 => Some(SgrAttribute::Underline),
            5 => Some(SgrAttribute::Blink),
            7 => Some(SgrAttribute::Inverse),
            22 => Some(SgrAttribute::NormalIntensity),
            23 => Some(SgrAttribute::NotItalic),
            24 => Some(SgrAttribute::NotUnderlined),
            25 => Some(SgrAttribute::NotBlinking),
            27 => Some(SgrAttribute::NotInverse),
            30..=37 => Some(SgrAttribute::ForegroundIndexed((code - 30) as u8)),
            40..=47 => Some(SgrAttribute::BackgroundIndexed((code - 40) as u8)),
            90..=97 => Some(SgrAttribute::ForegroundIndexed((code - 90 + 8) as u8)),
            100..=107 => Some(SgrAttribute::BackgroundIndexed((code - 100 + 8) as u8)),
            38 | 48 => {
                let (attr, consumed) = parse_extended_color(&params[i + 1..], code == 38);
                i += consumed;
                attr
            }
            39 => Some(SgrAttribute::DefaultForeground),
            49 => Some(SgrAttribute::DefaultBackground),
            _ => {
                debug!("Unhandled SGR parameter {}", code);
                None
            }
        };
        if let Some(attr) = attr {
            attrs.push(attr);
        }
        i += 1;
    }

    attrs
}

/// Parse the tail of a 38/48 sequence. Returns the attribute and how many
/// parameters were consumed. An incomplete sequence consumes what is left
/// so its components are never read as new SGR codes.
fn parse_extended_color(rest: &[u32], foreground: bool) -> (Option<SgrAttribute>, usize) {
    match rest.first() {
        Some(5) => match rest.get(1) {
            Some(&idx) => {
                let attr = u8::try_from(idx).ok().map(|idx| {
                    if foreground {
                        SgrAttribute::Foreground256(idx)
                    } else {
                        SgrAttribute::Background256(idx)
                    }
                });
                (attr, 2)
            }
            None => (None, rest.len()),
        },
        Some(2) => {
            if rest.len() < 4 {
                return (None, rest.len());
            }
            let channel = |v: u32| v.min(255) as u8;
            let (r, g, b) = (channel(rest[1]), channel(rest[2]), channel(rest[3]));
            let attr = if foreground {
                SgrAttribute::ForegroundRgb(r, g, b)
            } else {
                SgrAttribute::BackgroundRgb(r, g, b)
            };
            (Some(attr), 4)
        }
        Some(mode) => {
            debug!("Unsupported extended color mode {}", mode);
            (None, 1)
        }
        None => (None, 0),
    }
}
