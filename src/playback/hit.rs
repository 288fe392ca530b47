// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note-hit detection.
//!
//! Each note fires once per playback session, the first time the elapsed
//! time lands within tolerance of its target time.

use std::collections::HashSet;

use crate::chart::{Note, NoteKind, Timeline};
use crate::timing::TimingParams;

/// Maximum distance (seconds) between elapsed time and target for a hit
pub const HIT_TOLERANCE_SECONDS: f64 = 0.05;

/// Coarse window (seconds) used to skip notes far from the current time
pub const HIT_WINDOW_SECONDS: f64 = 0.1;

/// Identity of a consumed note within a session
type HitKey = (NoteKind, u32, usize);

/// A note that was hit on this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteHit {
    /// Authoring index
    pub index: usize,
    pub kind: NoteKind,
    pub beat: u32,
    /// Target time in seconds
    pub target_time: f64,
    /// The anchor is silent; everything else triggers a tap sound
    pub plays_sound: bool,
}

/// Authoring beats that fall within [`HIT_WINDOW_SECONDS`] of an elapsed
/// time, worked out once per check so distant notes are skipped without
/// computing their target time
#[derive(Debug, Clone, Copy, PartialEq)]
struct HitWindow {
    elapsed: f64,
    low_beat: f64,
    high_beat: f64,
}

impl HitWindow {
    fn new(elapsed: f64, timing: &TimingParams) -> Self {
        let beats_per_second = timing.bpm * timing.subdivisions as f64 / 60.0;
        let music = elapsed - timing.pre_delay_seconds();
        Self {
            elapsed,
            low_beat: (music - HIT_WINDOW_SECONDS) * beats_per_second,
            high_beat: (music + HIT_WINDOW_SECONDS) * beats_per_second,
        }
    }

    fn contains(&self, note: &Note) -> bool {
        if note.is_anchor() {
            return self.elapsed.abs() <= HIT_WINDOW_SECONDS;
        }
        let beat = note.beat as f64;
        self.low_beat <= beat && beat <= self.high_beat
    }
}

/// Consumed-note bookkeeping for one playback session
#[derive(Debug, Default, Clone)]
pub struct HitTracker {
    consumed: HashSet<HitKey>,
}

impl HitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate every note against the elapsed time. Notes hit here are
    /// consumed and won't fire again until [`HitTracker::reset`].
    pub fn check(&mut self, elapsed: f64, timeline: &Timeline) -> Vec<NoteHit> {
        let timing = timeline.timing();
        let window = HitWindow::new(elapsed, timing);
        let mut hits = Vec::new();

        for note in timeline.notes().iter().filter(|n| window.contains(n)) {
            let key = (note.kind, note.beat, note.index());
            if self.consumed.contains(&key) {
                continue;
            }

            let target = timing.target_time(note);
            if (elapsed - target).abs() > HIT_TOLERANCE_SECONDS {
                continue;
            }

            self.consumed.insert(key);
            hits.push(NoteHit {
                index: note.index(),
                kind: note.kind,
                beat: note.beat,
                target_time: target,
                plays_sound: !note.is_anchor(),
            });
        }

        hits
    }

    /// Forget all consumed notes
    pub fn reset(&mut self) {
        self.consumed.clear();
    }

    /// Number of notes consumed this session
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Direction, Note};
    use crate::timing::TimingParams;

    fn timeline() -> Timeline {
        // 120 BPM, 16 subdivisions: beat 16 = 0.5 s, + 1 s pre-delay
        Timeline::from_notes(
            vec![
                Note::direction(0, Direction::Right),
                Note::tab(16),
                Note::direction(32, Direction::Down),
            ],
            TimingParams::new(120.0, 16, 1000).unwrap(),
        )
    }

    #[test]
    fn test_anchor_hit_is_silent() {
        let timeline = timeline();
        let mut tracker = HitTracker::new();
        let hits = tracker.check(0.03, &timeline);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 0);
        assert!(!hits[0].plays_sound);
    }

    #[test]
    fn test_hit_within_tolerance() {
        let timeline = timeline();
        let mut tracker = HitTracker::new();
        assert!(tracker.check(1.44, &timeline).is_empty());

        let hits = tracker.check(1.46, &timeline);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, NoteKind::Tab);
        assert!((hits[0].target_time - 1.5).abs() < 1e-9);
        assert!(hits[0].plays_sound);
    }

    #[test]
    fn test_hit_fires_once() {
        let timeline = timeline();
        let mut tracker = HitTracker::new();
        assert_eq!(tracker.check(1.5, &timeline).len(), 1);
        assert!(tracker.check(1.52, &timeline).is_empty());
        assert_eq!(tracker.consumed_count(), 1);

        tracker.reset();
        assert_eq!(tracker.check(1.52, &timeline).len(), 1);
    }

    #[test]
    fn test_missed_note_stays_unconsumed() {
        let timeline = timeline();
        let mut tracker = HitTracker::new();
        // Jumping past the window never hits
        assert!(tracker.check(1.7, &timeline).is_empty());
        assert_eq!(tracker.consumed_count(), 0);
    }

    #[test]
    fn test_window_bounds() {
        let timeline = timeline();
        let tab = &timeline.notes()[1];
        let anchor = &timeline.notes()[0];

        // Inside the window but outside tolerance: considered, not hit
        let window = HitWindow::new(1.58, timeline.timing());
        assert!(window.contains(tab));
        assert!(!window.contains(anchor));
        let mut tracker = HitTracker::new();
        assert!(tracker.check(1.58, &timeline).is_empty());

        assert!(!HitWindow::new(1.62, timeline.timing()).contains(tab));
        assert!(!HitWindow::new(1.38, timeline.timing()).contains(tab));
        assert!(HitWindow::new(0.08, timeline.timing()).contains(anchor));
    }

    #[test]
    fn test_multiple_hits_same_tick() {
        let timeline = Timeline::from_notes(
            vec![Note::tab(16), Note::direction(16, Direction::Up)],
            TimingParams::new(120.0, 16, 0).unwrap(),
        );
        let mut tracker = HitTracker::new();
        let hits = tracker.check(0.5, &timeline);
        assert_eq!(hits.len(), 2);
    }
}
