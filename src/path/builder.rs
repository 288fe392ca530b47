// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Path builder.
//!
//! Walks the direction notes in path-beat order and integrates each note's
//! unit direction over the beats until the next note.

use crate::chart::{Direction, Note, Timeline};
use crate::timing::TimingParams;

use super::{PathNode, Point};

/// Path distance covered per beat unit (`subdivisions` path beats)
pub const STEP_DISTANCE: f64 = 8.0;

/// A direction note paired with its path beat
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathBeatNote {
    /// Authoring index of the note
    pub note_index: usize,
    /// Authoring beat
    pub beat: u32,
    /// Travel direction from this note onward
    pub direction: Direction,
    /// Beat after pre-delay remapping
    pub path_beat: f64,
}

/// Map direction notes (authoring order) to path beats, ordered by path
/// beat. Ties keep the authoring index order.
pub fn path_beat_notes(direction_notes: &[&Note], timing: &TimingParams) -> Vec<PathBeatNote> {
    let mut entries: Vec<PathBeatNote> = direction_notes
        .iter()
        .map(|note| PathBeatNote {
            note_index: note.index(),
            beat: note.beat,
            direction: note.direction,
            path_beat: timing.path_beat(note),
        })
        .collect();

    entries.sort_by(|a, b| {
        a.path_beat
            .total_cmp(&b.path_beat)
            .then(a.note_index.cmp(&b.note_index))
    });
    entries
}

/// Build the node list for a set of direction notes.
///
/// Node `i` is where the path stands when direction note `i` (in path
/// order) takes over; node 0 is the origin.
pub fn build_path(direction_notes: &[&Note], timing: &TimingParams) -> Vec<PathNode> {
    let entries = path_beat_notes(direction_notes, timing);

    let Some(first) = entries.first() else {
        return vec![PathNode::origin(0, Direction::None)];
    };

    let mut nodes = Vec::with_capacity(entries.len());
    nodes.push(PathNode {
        position: Point::ORIGIN,
        path_beat: first.path_beat,
        direction: first.direction,
        note_index: first.note_index,
    });

    let mut position = Point::ORIGIN;
    for pair in entries.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let distance = STEP_DISTANCE * (b.path_beat - a.path_beat) / timing.subdivisions as f64;
        position = position + a.direction.unit_vector() * distance;
        nodes.push(PathNode {
            position,
            path_beat: b.path_beat,
            direction: b.direction,
            note_index: b.note_index,
        });
    }

    nodes
}

/// Build the node list straight from a timeline
pub fn build_timeline_path(timeline: &Timeline) -> Vec<PathNode> {
    build_path(&timeline.direction_notes(), timeline.timing())
}
