// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback clock.
//!
//! Tracks elapsed playback time against a wall-clock anchor. Every method
//! takes the current `Instant` explicitly so callers (and tests) decide
//! what "now" is.

use std::time::{Duration, Instant};

/// Seconds after playback start at which the music itself begins
pub const MUSIC_START_SECONDS: f64 = 3.0;

/// Clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
    Paused,
}

/// Elapsed-time clock with pause and seek
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    /// Wall-clock instant that corresponds to elapsed time zero
    started_at: Option<Instant>,
    /// Elapsed seconds, frozen while paused or stopped
    elapsed: f64,
}

impl PlaybackClock {
    /// Create a stopped clock
    pub fn new() -> Self {
        Self {
            state: ClockState::Stopped,
            started_at: None,
            elapsed: 0.0,
        }
    }

    /// Current state
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Whether the clock is advancing
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Start from zero
    pub fn start(&mut self, now: Instant) {
        self.state = ClockState::Running;
        self.elapsed = 0.0;
        self.started_at = Some(now);
    }

    /// Freeze elapsed time
    pub fn pause(&mut self, now: Instant) {
        if self.state == ClockState::Running {
            self.elapsed = self.elapsed_at(now);
            self.state = ClockState::Paused;
        }
    }

    /// Continue from the frozen elapsed time
    pub fn resume(&mut self, now: Instant) {
        if self.state == ClockState::Paused {
            self.started_at = Some(rewind(now, self.elapsed));
            self.state = ClockState::Running;
        }
    }

    /// Stop and reset to zero
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.elapsed = 0.0;
        self.started_at = None;
    }

    /// Jump to an elapsed time. Ignored while stopped.
    pub fn seek(&mut self, now: Instant, elapsed: f64) {
        if self.state == ClockState::Stopped {
            return;
        }
        self.elapsed = elapsed.max(0.0);
        self.started_at = Some(rewind(now, self.elapsed));
    }

    /// Elapsed seconds as of `now`
    pub fn elapsed_at(&self, now: Instant) -> f64 {
        match (self.state, self.started_at) {
            (ClockState::Running, Some(start)) => now.saturating_duration_since(start).as_secs_f64(),
            _ => self.elapsed,
        }
    }

    /// Position within the music track, `None` before the music starts
    pub fn music_position(&self, now: Instant) -> Option<f64> {
        let position = self.elapsed_at(now) - MUSIC_START_SECONDS;
        (self.state != ClockState::Stopped && position >= 0.0).then_some(position)
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

fn rewind(now: Instant, elapsed: f64) -> Instant {
    now.checked_sub(Duration::from_secs_f64(elapsed)).unwrap_or(now)
}
