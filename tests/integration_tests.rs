// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for WLCHART
//!
//! These tests verify that multiple components work together correctly.

use std::time::{Duration, Instant};

use tempfile::tempdir;

use wlchart::chart::{Direction, Note, NoteKind, Timeline};
use wlchart::config::{load_chart, parse_chart, save_chart, ChartDocument, SessionFile};
use wlchart::path::{build_timeline_path, note_positions, resolve, PathCache, Point};
use wlchart::playback::PlaybackSession;
use wlchart::timing::{beat_to_seconds, seconds_to_beat, TimingParams};

fn timing(pre_delay_ms: u32) -> TimingParams {
    TimingParams::new(120.0, 16, pre_delay_ms).unwrap()
}

fn two_directions(pre_delay_ms: u32) -> Timeline {
    Timeline::from_notes(
        vec![
            Note::direction(0, Direction::Right),
            Note::direction(16, Direction::Down),
        ],
        timing(pre_delay_ms),
    )
}

fn close(a: Point, b: Point) -> bool {
    a.distance(b) < 1e-9
}

/// Two direction notes one beat unit apart build one segment
#[test]
fn test_single_segment_path() {
    let nodes = build_timeline_path(&two_directions(0));
    assert_eq!(nodes.len(), 2);
    assert!(close(nodes[0].position, Point::new(0.0, 0.0)));
    assert!(close(nodes[1].position, Point::new(8.0, 0.0)));

    // With a 3s pre-delay the second note lands at path beat 112
    let nodes = build_timeline_path(&two_directions(3000));
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].path_beat, 112.0);
    assert!(close(nodes[1].position, Point::new(56.0, 0.0)));
}

/// A tab between two direction notes sits on the segment by interpolation
#[test]
fn test_tab_interpolated_on_segment() {
    for (pre_delay, expected) in [(0, Point::new(4.0, 0.0)), (3000, Point::new(52.0, 0.0))] {
        let mut timeline = two_directions(pre_delay);
        timeline.insert(Note::tab(8)).unwrap();

        let nodes = build_timeline_path(&timeline);
        let placements = note_positions(&timeline, &nodes);
        let tab = placements.iter().find(|p| p.kind == NoteKind::Tab).unwrap();
        assert!(close(tab.position, expected), "pre-delay {}: {:?}", pre_delay, tab.position);
    }
}

/// Raising the pre-delay moves every note except the anchor
#[test]
fn test_pre_delay_moves_notes_not_anchor() {
    let mut timeline = two_directions(0);
    let mut cache = PathCache::new();

    let before = cache.get(&timeline);
    assert!(timeline.set_timing(timing(1000)));
    let after = cache.get(&timeline);

    assert_eq!(before[0].path_beat, 0.0);
    assert_eq!(after[0].path_beat, 0.0);
    assert!(close(after[0].position, Point::ORIGIN));
    assert!(after[1].path_beat > before[1].path_beat);
    assert_eq!(cache.rebuild_count(), 2);
}

/// The lone anchor gives an origin-only path and nothing resolves
#[test]
fn test_anchor_only_chart() {
    let timeline = Timeline::from_notes(vec![Note::direction(0, Direction::Up)], timing(3000));
    let nodes = build_timeline_path(&timeline);

    assert_eq!(nodes.len(), 1);
    assert!(close(nodes[0].position, Point::ORIGIN));
    for beat in [1.0, 16.0, 112.0] {
        assert!(resolve(beat, &nodes).is_none());
    }
}

/// Beats survive the trip through seconds for typical grids
#[test]
fn test_beat_seconds_round_trip() {
    for bpm in [60.0, 97.5, 120.0, 174.0, 240.0] {
        for subdivisions in [1, 4, 12, 16, 48] {
            for beat in (0..2000).step_by(37) {
                let seconds = beat_to_seconds(beat, bpm, subdivisions);
                assert_eq!(seconds_to_beat(seconds, bpm, subdivisions), beat as i64);
            }
        }
    }
}

/// A chart written to disk reads back with the same notes and timing
#[test]
fn test_chart_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.json");

    let mut timeline = two_directions(2500);
    timeline.insert(Note::tab(8)).unwrap();
    timeline.insert(Note::direction(40, Direction::UpLeft)).unwrap();
    save_chart(&path, &timeline).unwrap();

    let chart = load_chart(&path).unwrap();
    assert!(chart.fallbacks.is_empty());
    assert_eq!(chart.timeline.notes(), timeline.notes());
    assert_eq!(chart.timeline.timing(), timeline.timing());
    assert_eq!(
        build_timeline_path(&chart.timeline),
        build_timeline_path(&timeline)
    );
}

/// The platform offset is applied on export and undone on import
#[test]
fn test_offset_symmetry() {
    let timeline = two_directions(3000);
    let doc = ChartDocument::with_offset(&timeline, 800, "2026-01-01T00:00:00+00:00".to_string());
    assert_eq!(doc.pre_delay, 2200);

    let chart = parse_chart(&doc.to_json().unwrap(), 800).unwrap();
    assert_eq!(chart.timeline.timing().pre_delay_ms, 3000);
}

/// The autosave session restores the same timeline
#[test]
fn test_session_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("autosave.yaml");

    let mut timeline = two_directions(1200);
    timeline.add_tab().unwrap();
    SessionFile::from_timeline(&timeline, None).save(&path).unwrap();

    let restored = SessionFile::load(&path).unwrap().to_timeline();
    assert_eq!(restored.notes(), timeline.notes());
    assert_eq!(restored.timing(), timeline.timing());
}

/// Playback walks the cursor along the path and fires each note once
#[test]
fn test_playback_walks_path() {
    let mut timeline = two_directions(0);
    timeline.insert(Note::tab(8)).unwrap();
    let mut cache = PathCache::new();
    let mut session = PlaybackSession::new();

    let start = Instant::now();
    session.play(start);

    let mut hits = Vec::new();
    let mut cursor_x = Vec::new();
    for step in 0..=20 {
        let now = start + Duration::from_millis(step * 25);
        let report = session.tick(now, &timeline, &mut cache).unwrap();
        hits.extend(report.hits.iter().map(|h| h.index));
        cursor_x.push(report.cursor.x);
    }

    // Anchor, tab at 0.25s, direction at 0.5s: each exactly once
    assert_eq!(hits, vec![0, 2, 1]);
    // The cursor only moves forward and ends on the second node
    assert!(cursor_x.windows(2).all(|w| w[1] >= w[0]));
    assert!((cursor_x.last().unwrap() - 8.0).abs() < 1e-9);
    assert_eq!(cache.rebuild_count(), 1);
}
