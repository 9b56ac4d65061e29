//! Colorscheme files
//!
//! A colorscheme is a plain text file of `key = value` lines:
//!
//! ```text
//! # Solarized-ish
//! foreground = #839496
//! background = #002b36
//! color1 = dc322f
//! ```
//!
//! Keys are `color0` through `color15`, `foreground`, `background` and
//! `cursor`. Values are `#RRGGBB`, `RRGGBB` or `#AARRGGBB`. Unknown keys are
//! ignored and malformed values are logged and skipped.

use std::path::Path;

use tracing::{debug, warn};

use crate::core::{Color, Palette};
use crate::error::Result;

/// Colors read from a colorscheme file. Unset entries keep the palette's
/// current value when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Colorscheme {
    pub colors: [Option<Color>; 16],
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub cursor: Option<Color>,
}

impl Colorscheme {
    /// Parse colorscheme text. Never fails; bad lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut scheme = Self::default();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim_start();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = split_entry(line) else {
                debug!("Colorscheme line {}: no key/value pair", lineno + 1);
                continue;
            };

            let color = match Color::from_hex(value) {
                Ok(color) => color,
                Err(e) => {
                    warn!("Colorscheme line {}: {} for key '{}'", lineno + 1, e, key);
                    continue;
                }
            };

            match key {
                "foreground" => scheme.foreground = Some(color),
                "background" => scheme.background = Some(color),
                "cursor" => scheme.cursor = Some(color),
                _ => match key.strip_prefix("color").and_then(|n| n.parse::<usize>().ok()) {
                    Some(n) if n < 16 => scheme.colors[n] = Some(color),
                    _ => debug!("Colorscheme line {}: unknown key '{}'", lineno + 1, key),
                },
            }
        }

        scheme
    }

    /// Read and parse a colorscheme file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Apply onto a palette. A cursor that was tracking the foreground keeps
    /// tracking it unless the scheme sets one, and the 256-color table is
    /// rebuilt from the new base.
    pub fn apply(&self, palette: &mut Palette) {
        let cursor_follows_fg = palette.cursor == palette.default_fg;
        for (index, color) in self.colors.iter().enumerate() {
            if let Some(color) = color {
                palette.set_base(index, *color);
            }
        }
        if let Some(fg) = self.foreground {
            palette.default_fg = fg;
        }
        if let Some(bg) = self.background {
            palette.default_bg = bg;
        }
        match self.cursor {
            Some(cursor) => palette.cursor = cursor,
            None if cursor_follows_fg => palette.cursor = palette.default_fg,
            None => {}
        }
        palette.derive_xterm();
    }
}

/// Split `key = value`. The key ends at `=` or whitespace; the value is the
/// first whitespace-delimited token after `=`.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let key_end = line.find(|c: char| c == '=' || c == ' ' || c == '\t')?;
    let key = &line[..key_end];
    let rest = line[key_end..].trim_start().strip_prefix('=')?;
    let value = rest.split_whitespace().next()?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}
