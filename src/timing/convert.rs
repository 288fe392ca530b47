// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Beat/time conversion.
//!
//! Authoring beats are counted in grid subdivisions, so one beat lasts
//! `60 / (bpm * subdivisions)` seconds. These functions assume validated
//! parameters; with a non-positive bpm or subdivision count they return
//! infinities or NaN rather than failing.

use crate::chart::Note;

/// Seconds from the authoring zero point to `beat`
pub fn beat_to_seconds(beat: u32, bpm: f64, subdivisions: u32) -> f64 {
    (beat as f64 * 60.0) / (bpm * subdivisions as f64)
}

/// Nearest whole beat for a time in seconds
///
/// Rounds rather than truncates so a round trip through
/// [`beat_to_seconds`] lands back on the same beat.
pub fn seconds_to_beat(seconds: f64, bpm: f64, subdivisions: u32) -> i64 {
    ((seconds * bpm * subdivisions as f64) / 60.0).round() as i64
}

/// Path beat of a note
///
/// The beat-0 direction anchor is always 0. Every other note is shifted by
/// the pre-delay through the seconds domain: beat → seconds, add the
/// pre-delay, seconds → nearest beat.
pub fn to_path_beat(note: &Note, bpm: f64, subdivisions: u32, pre_delay_seconds: f64) -> f64 {
    if note.is_anchor() {
        return 0.0;
    }
    let adjusted = beat_to_seconds(note.beat, bpm, subdivisions) + pre_delay_seconds;
    seconds_to_beat(adjusted, bpm, subdivisions) as f64
}

/// Format seconds as `MM:SS:CC` (centiseconds)
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    let centis = (((seconds * 1000.0) % 1000.0) / 10.0) as u64;
    format!("{:02}:{:02}:{:02}", minutes, secs, centis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Direction;

    #[test]
    fn test_beat_to_seconds() {
        // 16 subdivisions at 120 BPM: one quarter note = 0.5s
        assert_eq!(beat_to_seconds(16, 120.0, 16), 0.5);
        assert_eq!(beat_to_seconds(0, 120.0, 16), 0.0);
        assert_eq!(beat_to_seconds(4, 60.0, 4), 1.0);
    }

    #[test]
    fn test_seconds_to_beat_rounds() {
        assert_eq!(seconds_to_beat(0.5, 120.0, 16), 16);
        // 0.51s is 16.32 beats, rounds down
        assert_eq!(seconds_to_beat(0.51, 120.0, 16), 16);
        // 0.52s is 16.64 beats, rounds up where truncation would not
        assert_eq!(seconds_to_beat(0.52, 120.0, 16), 17);
    }

    #[test]
    fn test_round_trip() {
        for &(bpm, subdivisions) in &[(120.0, 16), (97.3, 3), (180.0, 32), (61.7, 1), (240.0, 12)] {
            for beat in (0..5000).step_by(7) {
                let seconds = beat_to_seconds(beat, bpm, subdivisions);
                assert_eq!(seconds_to_beat(seconds, bpm, subdivisions), beat as i64);
            }
        }
    }

    #[test]
    fn test_invalid_params_do_not_panic() {
        assert!(beat_to_seconds(4, 0.0, 16).is_infinite());
        assert!(beat_to_seconds(0, 0.0, 0).is_nan());
    }

    #[test]
    fn test_anchor_path_beat_is_zero() {
        let anchor = Note::anchor();
        assert_eq!(to_path_beat(&anchor, 120.0, 16, 3.0), 0.0);
        assert_eq!(to_path_beat(&anchor, 73.0, 5, 11.25), 0.0);
    }

    #[test]
    fn test_path_beat_through_seconds() {
        // 16 → 0.5s, +3s → 3.5s → 112 beats
        let note = Note::direction(16, Direction::Down);
        assert_eq!(to_path_beat(&note, 120.0, 16, 3.0), 112.0);
        assert_eq!(to_path_beat(&note, 120.0, 16, 0.0), 16.0);

        // A tab at beat 0 still gets the pre-delay
        assert_eq!(to_path_beat(&Note::tab(0), 120.0, 16, 3.0), 96.0);
    }

    #[test]
    fn test_path_beat_rounds_pre_delay() {
        // 10ms at 120 BPM/16 is 0.32 beats, which rounds away
        let note = Note::tab(16);
        assert_eq!(to_path_beat(&note, 120.0, 16, 0.01), 16.0);
        // 20ms is 0.64 beats, which rounds up
        assert_eq!(to_path_beat(&note, 120.0, 16, 0.02), 17.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00:00");
        assert_eq!(format_clock(61.25), "01:01:25");
        assert_eq!(format_clock(-3.0), "00:00:00");
    }
}
