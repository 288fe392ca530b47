// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Position resolver.
//!
//! Locates the segment bracketing a path beat and interpolates along it.

use crate::chart::{Direction, NoteKind, Timeline};

use super::{PathNode, Point};

/// Interpolated position for a path beat.
///
/// Scans segments in path order and answers from the first one whose
/// (non-empty) range contains `query`. Returns `None` outside the path or
/// when there is no segment at all.
pub fn resolve(query: f64, nodes: &[PathNode]) -> Option<Point> {
    nodes.windows(2).find_map(|pair| {
        let (a, b) = (&pair[0], &pair[1]);
        if a.path_beat <= query && query <= b.path_beat && a.path_beat != b.path_beat {
            let t = (query - a.path_beat) / (b.path_beat - a.path_beat);
            Some(a.position.lerp(b.position, t))
        } else {
            None
        }
    })
}

/// Most beat markers drawn for one path
pub const MAX_BEAT_MARKERS: usize = 4096;

/// Marker positions at every whole beat unit (`subdivisions` path beats)
/// strictly before the end of the path, at most [`MAX_BEAT_MARKERS`]
pub fn beat_markers(nodes: &[PathNode], subdivisions: u32) -> Vec<Point> {
    let Some(last) = nodes.last() else {
        return Vec::new();
    };
    if subdivisions == 0 {
        return Vec::new();
    }

    let step = subdivisions as f64;
    let mut markers = Vec::new();
    for unit in 1..=MAX_BEAT_MARKERS {
        let beat = unit as f64 * step;
        if beat >= last.path_beat {
            break;
        }
        if let Some(pos) = resolve(beat, nodes) {
            markers.push(pos);
        }
    }
    markers
}

/// A note placed on the path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePlacement {
    /// Authoring index
    pub index: usize,
    pub kind: NoteKind,
    pub direction: Direction,
    pub path_beat: f64,
    pub position: Point,
    /// Whether this is the origin anchor
    pub anchor: bool,
}

/// Place every note of the timeline on the path. Notes whose path beat
/// falls outside the path are skipped.
pub fn note_positions(timeline: &Timeline, nodes: &[PathNode]) -> Vec<NotePlacement> {
    let timing = timeline.timing();
    timeline
        .notes()
        .iter()
        .filter_map(|note| {
            let path_beat = timing.path_beat(note);
            let position = if note.is_anchor() {
                Point::ORIGIN
            } else {
                resolve(path_beat, nodes)?
            };
            Some(NotePlacement {
                index: note.index(),
                kind: note.kind,
                direction: note.direction,
                path_beat,
                position,
                anchor: note.is_anchor(),
            })
        })
        .collect()
}
