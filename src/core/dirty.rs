//! Dirty region tracking
//!
//! Per-row change flags plus aggregate bounds, consumed once per frame by
//! the renderer. `lines.len()` always equals the screen row count.

use serde::{Deserialize, Serialize};

/// Rows changed since the last render handoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirtyTracker {
    lines: Vec<bool>,
    /// Inclusive (min_y, max_y) of dirty rows, `None` if nothing is dirty
    bounds: Option<(usize, usize)>,
    full_redraw: bool,
}

/// What the renderer has to repaint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyRegion {
    /// Per-row flags
    pub lines: Vec<bool>,
    /// Inclusive (min_y, max_y) of dirty rows
    pub bounds: Option<(usize, usize)>,
    /// Whole screen must be repainted
    pub full_redraw: bool,
}

impl DirtyTracker {
    /// Tracker for `rows` rows, starting with a full redraw pending
    pub fn new(rows: usize) -> Self {
        let mut tracker = Self {
            lines: vec![false; rows],
            bounds: None,
            full_redraw: true,
        };
        tracker.mark_all();
        tracker
    }

    /// Number of tracked rows
    pub fn rows(&self) -> usize {
        self.lines.len()
    }

    /// Mark one row dirty. Out-of-range rows are ignored.
    pub fn mark_line(&mut self, y: usize) {
        let Some(flag) = self.lines.get_mut(y) else {
            return;
        };
        if *flag {
            return;
        }
        *flag = true;
        self.bounds = match self.bounds {
            None => Some((y, y)),
            Some((min, max)) => Some((min.min(y), max.max(y))),
        };
    }

    /// Mark an inclusive range of rows dirty, clamped to the screen
    pub fn mark_lines(&mut self, start: usize, end: usize) {
        let end = end.min(self.lines.len().saturating_sub(1));
        for y in start..=end {
            self.mark_line(y);
        }
    }

    /// Mark every row dirty
    pub fn mark_all(&mut self) {
        if !self.lines.is_empty() {
            self.mark_lines(0, self.lines.len() - 1);
        }
    }

    /// Request a full repaint
    pub fn force_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Whether row `y` is dirty
    pub fn is_dirty(&self, y: usize) -> bool {
        self.lines.get(y).copied().unwrap_or(false)
    }

    /// Any row dirty
    pub fn has_dirty(&self) -> bool {
        self.bounds.is_some()
    }

    /// Inclusive bounds of the dirty rows
    pub fn bounds(&self) -> Option<(usize, usize)> {
        self.bounds
    }

    /// Full repaint pending
    pub fn full_redraw_needed(&self) -> bool {
        self.full_redraw
    }

    /// Per-row flags
    pub fn lines(&self) -> &[bool] {
        &self.lines
    }

    /// Clear all flags, bounds and the full-redraw request
    pub fn clear(&mut self) {
        self.lines.iter_mut().for_each(|l| *l = false);
        self.bounds = None;
        self.full_redraw = false;
    }

    /// Hand the current region to the renderer and reset the tracker
    pub fn take(&mut self) -> DirtyRegion {
        let region = DirtyRegion {
            lines: self.lines.clone(),
            bounds: self.bounds,
            full_redraw: self.full_redraw,
        };
        self.clear();
        region
    }

    /// Reallocate for a new row count, everything dirty
    pub fn resize(&mut self, rows: usize) {
        *self = Self::new(rows);
    }
}
