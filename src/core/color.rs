//! Color representation and palette model
//!
//! Glyphs store resolved RGBA colors, so palette edits only affect text
//! written after the edit. The palette holds:
//! - 16 base colors (ANSI 0-7 and bright 8-15)
//! - a derived 256-color xterm palette (base + 6x6x6 cube + grayscale ramp)
//! - the default foreground/background used by resets
//! - the cursor color

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#AARRGGBB` or `AARRGGBB`
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let parsed = match hex.len() {
            6 => byte(0).and_then(|r| Ok(Self::rgb(r, byte(2)?, byte(4)?))),
            8 => byte(0).and_then(|a| Ok(Self::rgba(byte(2)?, byte(4)?, byte(6)?, a))),
            _ => return Err(Error::InvalidColor(s.to_string())),
        };
        parsed.map_err(|_| Error::InvalidColor(s.to_string()))
    }

    /// Parse an OSC color spec: `rgb:R/G/B` (1-4 hex digits per component)
    /// or `#RRGGBB`
    pub fn from_osc_spec(spec: &str) -> Option<Self> {
        if let Some(rest) = spec.strip_prefix("rgb:") {
            let mut parts = rest.split('/').map(scale_component);
            let r = parts.next()??;
            let g = parts.next()??;
            let b = parts.next()??;
            if parts.next().is_some() {
                return None;
            }
            return Some(Self::rgb(r, g, b));
        }
        if spec.starts_with('#') && spec.len() == 7 {
            return Self::from_hex(spec).ok();
        }
        None
    }
}

/// Scale a 1-4 digit hex component to 8 bits (X11 color spec semantics).
/// Components are scaled, not read as raw values: `rgb:1/2/3` is
/// `0x11/0x22/0x33`, not `1/2/3`.
fn scale_component(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 4 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let v = u16::from_str_radix(s, 16).ok()?;
    let scaled = match s.len() {
        1 => v * 0x11,
        2 => v,
        3 => v >> 4,
        _ => v >> 8,
    };
    Some(scaled as u8)
}

/// The Tango-derived default base palette
pub const DEFAULT_BASE: [Color; 16] = [
    Color::rgb(46, 52, 54),    // Black
    Color::rgb(204, 0, 0),     // Red
    Color::rgb(78, 154, 6),    // Green
    Color::rgb(196, 160, 0),   // Yellow
    Color::rgb(52, 101, 164),  // Blue
    Color::rgb(117, 80, 123),  // Magenta
    Color::rgb(6, 152, 154),   // Cyan
    Color::rgb(211, 215, 207), // White
    Color::rgb(85, 87, 83),    // Bright Black
    Color::rgb(239, 41, 41),   // Bright Red
    Color::rgb(138, 226, 52),  // Bright Green
    Color::rgb(252, 233, 79),  // Bright Yellow
    Color::rgb(114, 159, 207), // Bright Blue
    Color::rgb(173, 127, 168), // Bright Magenta
    Color::rgb(52, 226, 226),  // Bright Cyan
    Color::rgb(238, 238, 236), // Bright White
];

/// Color cube intensity levels
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Terminal color palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// 16 base colors, targets of SGR 30-37/40-47/90-97/100-107
    base: [Color; 16],
    /// Derived 256-color xterm palette, target of SGR 38;5/48;5
    #[serde(with = "xterm_serde")]
    xterm: [Color; 256],
    /// Foreground used by SGR 0/39 and resets
    pub default_fg: Color,
    /// Background used by SGR 0/49 and resets
    pub default_bg: Color,
    /// Cursor color
    pub cursor: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    /// Create the default palette
    pub fn new() -> Self {
        let mut palette = Self {
            base: DEFAULT_BASE,
            xterm: [Color::rgb(0, 0, 0); 256],
            default_fg: DEFAULT_BASE[2],
            default_bg: DEFAULT_BASE[0],
            cursor: DEFAULT_BASE[2],
        };
        palette.derive_xterm();
        palette
    }

    /// Rebuild the 256-color palette from the base colors
    pub fn derive_xterm(&mut self) {
        self.xterm[..16].copy_from_slice(&self.base);

        let mut idx = 16;
        for r in CUBE_LEVELS {
            for g in CUBE_LEVELS {
                for b in CUBE_LEVELS {
                    self.xterm[idx] = Color::rgb(r, g, b);
                    idx += 1;
                }
            }
        }

        for i in 0..24u8 {
            let gray = 8 + i * 10;
            self.xterm[idx] = Color::rgb(gray, gray, gray);
            idx += 1;
        }
    }

    /// Base color (0-15); out-of-range indices wrap into the bright half
    pub fn base(&self, index: usize) -> Color {
        self.base[index % 16]
    }

    /// 256-color palette entry
    pub fn indexed(&self, index: u8) -> Color {
        self.xterm[index as usize]
    }

    /// All 16 base colors
    pub fn base_colors(&self) -> &[Color; 16] {
        &self.base
    }

    /// Set a base color without touching the derived palette
    pub fn set_base(&mut self, index: usize, color: Color) {
        if let Some(slot) = self.base.get_mut(index) {
            *slot = color;
        }
    }

    /// Override a single palette entry (OSC 4). Entries below 16 also
    /// update the base palette.
    pub fn set_indexed(&mut self, index: u8, color: Color) {
        if (index as usize) < self.base.len() {
            self.base[index as usize] = color;
        }
        self.xterm[index as usize] = color;
    }
}

/// serde has no impls for arrays longer than 32
mod xterm_serde {
    use super::Color;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(colors: &[Color; 256], s: S) -> Result<S::Ok, S::Error> {
        colors.as_slice().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[Color; 256], D::Error> {
        let v = Vec::<Color>::deserialize(d)?;
        let len = v.len();
        v.try_into()
            .map_err(|_| D::Error::invalid_length(len, &"256 colors"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::new();
        assert_eq!(palette.default_fg, palette.base(2));
        assert_eq!(palette.default_bg, palette.base(0));
        assert_eq!(palette.base(1), Color::rgb(204, 0, 0));
    }

    #[test]
    fn test_xterm_palette_layout() {
        let palette = Palette::new();
        // Base colors are mirrored
        for i in 0..16u8 {
            assert_eq!(palette.indexed(i), palette.base(i as usize));
        }
        // First and last cube entries
        assert_eq!(palette.indexed(16), Color::rgb(0, 0, 0));
        assert_eq!(palette.indexed(231), Color::rgb(255, 255, 255));
        // Pure red in cube
        assert_eq!(palette.indexed(196), Color::rgb(255, 0, 0));
        // Grayscale ramp
        assert_eq!(palette.indexed(232), Color::rgb(8, 8, 8));
        assert_eq!(palette.indexed(255), Color::rgb(238, 238, 238));
    }

    #[test]
    fn test_set_indexed_updates_base() {
        let mut palette = Palette::new();
        palette.set_indexed(3, Color::rgb(1, 2, 3));
        assert_eq!(palette.base(3), Color::rgb(1, 2, 3));
        assert_eq!(palette.indexed(3), Color::rgb(1, 2, 3));

        palette.set_indexed(100, Color::rgb(9, 9, 9));
        assert_eq!(palette.indexed(100), Color::rgb(9, 9, 9));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(
            Color::from_hex("#80ff8000").unwrap(),
            Color::rgba(255, 128, 0, 128)
        );
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_from_osc_spec() {
        assert_eq!(
            Color::from_osc_spec("rgb:ff/80/00"),
            Some(Color::rgb(255, 128, 0))
        );
        assert_eq!(
            Color::from_osc_spec("rgb:ffff/8000/0000"),
            Some(Color::rgb(255, 128, 0))
        );
        assert_eq!(Color::from_osc_spec("rgb:f/0/0"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            Color::from_osc_spec("rgb:1/2/3"),
            Some(Color::rgb(0x11, 0x22, 0x33))
        );
        assert_eq!(Color::from_osc_spec("#102030"), Some(Color::rgb(16, 32, 48)));
        assert_eq!(Color::from_osc_spec("rgb:ff/80"), None);
        assert_eq!(Color::from_osc_spec("red"), None);
    }

    #[test]
    fn test_palette_serialization() {
        let palette = Palette::new();
        let json = serde_json::to_string(&palette).unwrap();
        let restored: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(palette, restored);
    }
}
