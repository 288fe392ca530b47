// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback session.
//!
//! Drives the cursor along the path from the playback clock:
//! - Transport (play, pause/resume, stop, seek)
//! - Per-tick cursor resolution through the path cache
//! - Note-hit detection
//! - Decaying highlights for the animation tick

pub mod highlight;
pub mod hit;

pub use highlight::{
    Highlights, DECAY_PER_TICK, FOCUS_HIGHLIGHT_SECONDS, HIT_HIGHLIGHT_SECONDS,
    PATH_HIGHLIGHT_SECONDS,
};
pub use hit::{HitTracker, NoteHit, HIT_TOLERANCE_SECONDS, HIT_WINDOW_SECONDS};

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::chart::Timeline;
use crate::path::{PathCache, Point};
use crate::timing::{ClockState, PlaybackClock};

/// Ticks slower than this are logged
pub const SLOW_TICK_THRESHOLD: Duration = Duration::from_millis(10);

/// Result of one playback tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Elapsed playback seconds
    pub elapsed: f64,
    /// Position within the music, `None` before it starts
    pub music_position: Option<f64>,
    /// Elapsed time expressed as a path beat
    pub current_beat: i64,
    /// Cursor position after this tick
    pub cursor: Point,
    /// Whether the resolver found a segment for the current beat
    pub cursor_resolved: bool,
    /// Notes hit on this tick
    pub hits: Vec<NoteHit>,
    /// Time spent computing this tick
    pub cost: Duration,
}

/// Playback transport state plus per-session hit tracking
#[derive(Debug, Default)]
pub struct PlaybackSession {
    clock: PlaybackClock,
    hits: HitTracker,
    cursor: Point,
    audio_duration: Option<f64>,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport state
    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    /// Start from the beginning, or resume if paused. No-op while running.
    pub fn play(&mut self, now: Instant) {
        match self.clock.state() {
            ClockState::Stopped => {
                self.hits.reset();
                self.cursor = Point::ORIGIN;
                self.clock.start(now);
                info!("Playback started");
            }
            ClockState::Paused => {
                self.clock.resume(now);
                info!("Playback resumed");
            }
            ClockState::Running => {}
        }
    }

    /// Pause a running session or resume a paused one
    pub fn toggle_pause(&mut self, now: Instant) {
        match self.clock.state() {
            ClockState::Running => {
                self.clock.pause(now);
                info!(elapsed = self.clock.elapsed_at(now), "Playback paused");
            }
            ClockState::Paused => {
                self.clock.resume(now);
                info!("Playback resumed");
            }
            ClockState::Stopped => {}
        }
    }

    /// Stop, rewind to zero and forget consumed notes. The path cache is
    /// left alone.
    pub fn stop(&mut self) {
        if self.clock.state() == ClockState::Stopped {
            return;
        }
        self.clock.stop();
        self.hits.reset();
        self.cursor = Point::ORIGIN;
        info!("Playback stopped");
    }

    /// Jump to an elapsed time. Consumed notes are forgotten so notes after
    /// the new position fire again. Ignored while stopped.
    pub fn seek(&mut self, now: Instant, elapsed: f64) {
        if self.clock.state() == ClockState::Stopped {
            return;
        }
        let elapsed = elapsed.max(0.0);
        self.clock.seek(now, elapsed);
        self.hits.reset();
        debug!(elapsed, "Playback seek");
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, now: Instant, delta: f64) {
        let target = self.clock.elapsed_at(now) + delta;
        self.seek(now, target);
    }

    /// Advance one playback tick. Returns `None` unless running.
    pub fn tick(
        &mut self,
        now: Instant,
        timeline: &Timeline,
        cache: &mut PathCache,
    ) -> Option<TickReport> {
        if !self.clock.is_running() {
            return None;
        }
        let started = Instant::now();

        let elapsed = self.clock.elapsed_at(now);
        let timing = timeline.timing();
        let current_beat = timing.seconds_to_beat(elapsed);

        let hits = self.hits.check(elapsed, timeline);

        let resolved = cache.resolve(timeline, current_beat as f64);
        if let Some(position) = resolved {
            self.cursor = position;
        }

        let cost = started.elapsed();
        if cost > SLOW_TICK_THRESHOLD {
            debug!(
                cost_ms = cost.as_secs_f64() * 1000.0,
                notes = timeline.len(),
                "Slow playback tick"
            );
        }

        Some(TickReport {
            elapsed,
            music_position: self.clock.music_position(now),
            current_beat,
            cursor: self.cursor,
            cursor_resolved: resolved.is_some(),
            hits,
            cost,
        })
    }

    /// Elapsed playback seconds as of `now`
    pub fn elapsed_at(&self, now: Instant) -> f64 {
        self.clock.elapsed_at(now)
    }

    /// Current cursor position
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Record the probed audio duration (seconds)
    pub fn set_audio_duration(&mut self, seconds: Option<f64>) {
        self.audio_duration = seconds;
    }

    pub fn audio_duration(&self) -> Option<f64> {
        self.audio_duration
    }

    /// Session length: audio duration plus pre-delay. Unknown without audio.
    pub fn total_time(&self, pre_delay_seconds: f64) -> Option<f64> {
        self.audio_duration.map(|d| d + pre_delay_seconds)
    }
}
