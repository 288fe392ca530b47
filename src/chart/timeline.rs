// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timeline model.
//!
//! Owns the authored notes and the timing parameters. Every mutation goes
//! through this type so the revision counter can tell derived state (the
//! path cache) exactly when it is stale.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use super::{Direction, Note, NoteKind};
use crate::timing::TimingParams;

static NEXT_TIMELINE_ID: AtomicU64 = AtomicU64::new(1);

/// Highest authoring beat a note may sit on
pub const MAX_BEAT: u32 = 1 << 24;

/// Rejected note edits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The beat-0 direction anchor can't be removed, moved or retyped
    #[error("the origin direction note at beat 0 cannot be changed that way")]
    AnchorLocked,
    /// Edit would create a second beat-0 direction note
    #[error("a direction note at beat 0 already exists")]
    DuplicateAnchor,
    /// Index out of range
    #[error("no note at index {0}")]
    NoSuchNote(usize),
    /// Beat past [`MAX_BEAT`]
    #[error("beat {0} is past the end of the chart grid")]
    BeatOutOfRange(u64),
}

/// Ordered notes plus timing parameters
#[derive(Debug)]
pub struct Timeline {
    id: u64,
    revision: u64,
    notes: Vec<Note>,
    timing: TimingParams,
}

impl Timeline {
    /// Create a timeline holding only the origin anchor
    pub fn new(timing: TimingParams) -> Self {
        Self::from_notes(Vec::new(), timing)
    }

    /// Bulk load notes. The anchor is created when missing; extra beat-0
    /// direction notes after the first are dropped.
    pub fn from_notes(notes: Vec<Note>, timing: TimingParams) -> Self {
        let mut seen_anchor = false;
        let mut kept = Vec::with_capacity(notes.len() + 1);
        for mut note in notes {
            if note.beat > MAX_BEAT {
                warn!(beat = note.beat, "Clamping note beat to the end of the grid");
                note.beat = MAX_BEAT;
            }
            if note.is_anchor() {
                if seen_anchor {
                    warn!("Dropping duplicate beat-0 direction note");
                    continue;
                }
                seen_anchor = true;
            }
            kept.push(note);
        }

        let mut timeline = Self {
            id: next_id(),
            revision: 0,
            notes: kept,
            timing,
        };
        timeline.ensure_anchor();
        timeline
    }

    /// Unique identity of this timeline instance
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Monotonic counter bumped on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Notes in authoring order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Note at an index
    pub fn note(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false; the anchor is never removed
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Current timing parameters
    pub fn timing(&self) -> &TimingParams {
        &self.timing
    }

    /// The beat-0 anchor
    pub fn anchor(&self) -> Option<&Note> {
        self.notes.iter().find(|n| n.is_anchor())
    }

    /// Direction notes ordered by authoring beat, ties by authoring index
    pub fn direction_notes(&self) -> Vec<&Note> {
        let mut dirs: Vec<&Note> = self
            .notes
            .iter()
            .filter(|n| n.kind == NoteKind::Direction)
            .collect();
        dirs.sort_by_key(|n| (n.beat, n.index()));
        dirs
    }

    /// Largest authoring beat among all notes
    pub fn max_beat(&self) -> u32 {
        self.notes.iter().map(|n| n.beat).max().unwrap_or(0)
    }

    /// Replace the timing parameters. Returns whether anything changed.
    pub fn set_timing(&mut self, timing: TimingParams) -> bool {
        if self.timing == timing {
            return false;
        }
        debug!(?timing, "Timing parameters changed");
        self.timing = timing;
        self.touch();
        true
    }

    /// Apply raw user input for the three timing fields. Input that does
    /// not parse leaves the current parameters in effect.
    pub fn apply_timing_input(&mut self, bpm: &str, subdivisions: &str, pre_delay_ms: &str) -> bool {
        match TimingParams::parse(bpm, subdivisions, pre_delay_ms) {
            Ok(timing) => self.set_timing(timing),
            Err(e) => {
                debug!("Ignoring timing input: {}", e);
                false
            }
        }
    }

    /// Append a tab note one grid step past the last note
    pub fn add_tab(&mut self) -> Result<usize, EditError> {
        let beat = self.step_after(self.max_beat())?;
        Ok(self.push(Note::tab(beat)))
    }

    /// Append a direction note one grid step past the last direction note,
    /// inheriting its direction
    pub fn add_direction(&mut self) -> Result<usize, EditError> {
        let (beat, direction) = self
            .notes
            .iter()
            .filter(|n| n.kind == NoteKind::Direction)
            .max_by_key(|n| (n.beat, n.index()))
            .map(|n| (n.beat, n.direction))
            .unwrap_or((0, Direction::None));
        let beat = self.step_after(beat)?;
        Ok(self.push(Note::direction(beat, direction)))
    }

    /// Append an arbitrary note
    pub fn insert(&mut self, note: Note) -> Result<usize, EditError> {
        check_beat(note.beat)?;
        if note.is_anchor() && self.anchor().is_some() {
            return Err(EditError::DuplicateAnchor);
        }
        Ok(self.push(note))
    }

    /// Remove a note. The anchor is refused.
    pub fn remove(&mut self, index: usize) -> Result<Note, EditError> {
        let note = self.notes.get(index).ok_or(EditError::NoSuchNote(index))?;
        if note.is_anchor() {
            return Err(EditError::AnchorLocked);
        }
        let removed = self.notes.remove(index);
        self.reindex();
        self.touch();
        Ok(removed)
    }

    /// Stable sort by authoring beat
    pub fn sort_by_beat(&mut self) {
        self.notes.sort_by_key(|n| n.beat);
        self.reindex();
        self.touch();
    }

    /// Drop everything except a fresh anchor
    pub fn clear(&mut self) {
        self.notes.clear();
        self.ensure_anchor();
        self.touch();
    }

    /// Change a note's beat
    pub fn set_beat(&mut self, index: usize, beat: u32) -> Result<(), EditError> {
        let note = self.notes.get(index).ok_or(EditError::NoSuchNote(index))?;
        if note.beat == beat {
            return Ok(());
        }
        if note.is_anchor() {
            return Err(EditError::AnchorLocked);
        }
        check_beat(beat)?;
        if note.kind == NoteKind::Direction && beat == 0 {
            return Err(EditError::DuplicateAnchor);
        }
        self.notes[index].beat = beat;
        self.touch();
        Ok(())
    }

    /// Change a note's direction
    pub fn set_direction(&mut self, index: usize, direction: Direction) -> Result<(), EditError> {
        let note = self.notes.get_mut(index).ok_or(EditError::NoSuchNote(index))?;
        if note.direction == direction {
            return Ok(());
        }
        note.direction = direction;
        self.touch();
        Ok(())
    }

    /// Change a note's kind
    pub fn set_kind(&mut self, index: usize, kind: NoteKind) -> Result<(), EditError> {
        let note = self.notes.get(index).ok_or(EditError::NoSuchNote(index))?;
        if note.kind == kind {
            return Ok(());
        }
        if note.is_anchor() {
            return Err(EditError::AnchorLocked);
        }
        if kind == NoteKind::Direction && note.beat == 0 {
            return Err(EditError::DuplicateAnchor);
        }
        self.notes[index].kind = kind;
        self.touch();
        Ok(())
    }

    /// One grid step past `beat`, if it stays on the grid
    fn step_after(&self, beat: u32) -> Result<u32, EditError> {
        let next = beat as u64 + self.timing.subdivisions as u64;
        if next > MAX_BEAT as u64 {
            return Err(EditError::BeatOutOfRange(next));
        }
        Ok(next as u32)
    }

    fn push(&mut self, note: Note) -> usize {
        self.notes.push(note);
        self.reindex();
        self.touch();
        self.notes.len() - 1
    }

    fn ensure_anchor(&mut self) {
        if self.anchor().is_none() {
            self.notes.insert(0, Note::anchor());
        }
        self.reindex();
    }

    fn reindex(&mut self) {
        for (i, note) in self.notes.iter_mut().enumerate() {
            note.set_index(i);
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

fn next_id() -> u64 {
    NEXT_TIMELINE_ID.fetch_add(1, Ordering::Relaxed)
}

fn check_beat(beat: u32) -> Result<(), EditError> {
    if beat > MAX_BEAT {
        return Err(EditError::BeatOutOfRange(beat as u64));
    }
    Ok(())
}

/// A clone is a new timeline: it gets its own id so derived state cached
/// for the original is never served for the copy.
impl Clone for Timeline {
    fn clone(&self) -> Self {
        Self {
            id: next_id(),
            revision: self.revision,
            notes: self.notes.clone(),
            timing: self.timing,
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimingParams::default())
    }
}
