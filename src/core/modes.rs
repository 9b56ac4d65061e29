//! Terminal mode flags
//!
//! ANSI and DEC private modes the core honors.

use serde::{Deserialize, Serialize};

/// Terminal mode flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// IRM - characters shift the rest of the line right instead of overwriting
    pub insert_mode: bool,
    /// DECCKM - cursor keys send application sequences
    pub application_cursor: bool,
    /// DECNKM / DECKPAM - keypad sends application sequences
    pub application_keypad: bool,
    /// DECOM - cursor addressing relative to the scroll region
    pub origin_mode: bool,
    /// DECAWM - wrap at the right margin
    pub autowrap: bool,
    /// Alternate screen buffer active (mode 1049)
    pub alternate_screen: bool,
}

impl Modes {
    /// Create new modes with default values
    pub fn new() -> Self {
        Self {
            insert_mode: false,
            application_cursor: false,
            application_keypad: false,
            origin_mode: false,
            autowrap: true,
            alternate_screen: false,
        }
    }

    /// Reset all modes to default
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Modes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_default() {
        let modes = Modes::new();
        assert!(modes.autowrap);
        assert!(!modes.origin_mode);
        assert!(!modes.insert_mode);
        assert!(!modes.alternate_screen);
    }

    #[test]
    fn test_modes_reset() {
        let mut modes = Modes::new();
        modes.autowrap = false;
        modes.application_cursor = true;

        modes.reset();

        assert!(modes.autowrap);
        assert!(!modes.application_cursor);
    }
}
