// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Decaying visual highlights.

/// Highlight time after a note is hit (seconds)
pub const HIT_HIGHLIGHT_SECONDS: f64 = 0.3;

/// Highlight time after a note is focused from the list (seconds)
pub const FOCUS_HIGHLIGHT_SECONDS: f64 = 0.5;

/// Whole-path flash time (seconds)
pub const PATH_HIGHLIGHT_SECONDS: f64 = 1.0;

/// Amount removed from every timer on each animation tick
pub const DECAY_PER_TICK: f64 = 1.0 / 60.0;

/// Highlight timers: at most one highlighted note plus the path flash
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Highlights {
    note: Option<(usize, f64)>,
    path: f64,
}

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flash a note that was just hit
    pub fn note_hit(&mut self, index: usize) {
        self.note = Some((index, HIT_HIGHLIGHT_SECONDS));
    }

    /// Highlight a focused note
    pub fn focus(&mut self, index: usize) {
        self.note = Some((index, FOCUS_HIGHLIGHT_SECONDS));
    }

    /// Flash the whole path
    pub fn flash_path(&mut self) {
        self.path = PATH_HIGHLIGHT_SECONDS;
    }

    /// Advance one animation tick. Returns whether anything was still
    /// decaying (and so needs a redraw).
    pub fn decay(&mut self) -> bool {
        let mut changed = false;

        if let Some((index, remaining)) = self.note {
            let remaining = remaining - DECAY_PER_TICK;
            self.note = (remaining > 0.0).then_some((index, remaining));
            changed = true;
        }

        if self.path > 0.0 {
            self.path = (self.path - DECAY_PER_TICK).max(0.0);
            changed = true;
        }

        changed
    }

    /// Whether the animation timer needs to keep running
    pub fn is_active(&self) -> bool {
        self.note.is_some() || self.path > 0.0
    }

    /// Highlighted note and its remaining time
    pub fn note(&self) -> Option<(usize, f64)> {
        self.note
    }

    /// Remaining path flash time
    pub fn path(&self) -> f64 {
        self.path
    }

    /// Drop the note highlight if it points at a note that no longer exists
    pub fn retain_within(&mut self, note_count: usize) {
        if matches!(self.note, Some((index, _)) if index >= note_count) {
            self.note = None;
        }
    }
}
