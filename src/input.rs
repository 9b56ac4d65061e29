//! Keyboard input encoding
//!
//! Converts navigation keys into the byte sequences a program running in
//! the terminal expects, honoring application cursor mode (DECCKM).

/// Navigation keys whose encoding depends on terminal modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Encode a key. Cursor keys and Home/End use SS3 (`ESC O x`) in
/// application cursor mode and CSI otherwise; paging keys are the same in
/// both modes.
pub fn encode_key(key: Key, application_cursor: bool) -> &'static [u8] {
    match (key, application_cursor) {
        (Key::Up, true) => b"\x1bOA",
        (Key::Down, true) => b"\x1bOB",
        (Key::Right, true) => b"\x1bOC",
        (Key::Left, true) => b"\x1bOD",
        (Key::Home, true) => b"\x1bOH",
        (Key::End, true) => b"\x1bOF",

        (Key::Up, false) => b"\x1b[A",
        (Key::Down, false) => b"\x1b[B",
        (Key::Right, false) => b"\x1b[C",
        (Key::Left, false) => b"\x1b[D",
        (Key::Home, false) => b"\x1b[1~",
        (Key::End, false) => b"\x1b[4~",

        (Key::PageUp, _) => b"\x1b[5~",
        (Key::PageDown, _) => b"\x1b[6~",
    }
}
