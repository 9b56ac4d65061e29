//! Vaixterm Terminal Core
//!
//! The byte-stream and screen-model half of a terminal emulator. This crate
//! provides:
//!
//! - `core`: Screen model, glyphs, palette, cursor, grids with scrollback
//! - `parser`: VT100/xterm escape sequence parser
//! - `terminal`: Executor that applies parsed actions to the screen
//! - `colorscheme` / `config`: Palette files and terminal configuration
//! - `input`: Navigation key encoding
//!
//! Windowing, rendering and PTY management live outside this crate; they
//! feed bytes into [`Terminal::handle_input`] and read the screen back.

pub mod colorscheme;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod parser;
pub mod terminal;

pub use crate::colorscheme::Colorscheme;
pub use crate::config::TerminalConfig;
pub use crate::core::{Palette, Screen, Snapshot};
pub use crate::error::{Error, Result};
pub use crate::input::{encode_key, Key};
pub use crate::parser::Parser;
pub use crate::terminal::{Command, Terminal};
