//! Terminal Core Module
//!
//! Platform-independent terminal state. This module contains:
//! - Colors, palette and glyph attributes
//! - Ring-buffer primary grid with scrollback, and the alternate grid
//! - Screen model: cursor, scroll region, modes, charsets, dirty rows
//! - Deterministic snapshot generation
//!
//! The core is deterministic: given the same sequence of operations, it
//! always produces the same state.

mod cell;
mod charset;
mod color;
mod cursor;
mod dirty;
mod grid;
mod modes;
mod screen;
mod snapshot;

pub use cell::{Attrs, Glyph, Pen};
pub use charset::{Charset, CharsetState};
pub use color::{Color, Palette, DEFAULT_BASE};
pub use cursor::{Cursor, CursorStyle, SavedCursor};
pub use dirty::{DirtyRegion, DirtyTracker};
pub use grid::{AltGrid, Grid, PrimaryGrid, RingIndex};
pub use modes::Modes;
pub use screen::Screen;
pub use snapshot::{CellSnapshot, CursorSnapshot, ModesSnapshot, Snapshot, StyleSnapshot};
