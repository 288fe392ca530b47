// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing parameters shared by every conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::convert::{beat_to_seconds, seconds_to_beat, to_path_beat};
use crate::chart::Note;

/// Default tempo when nothing else is known
pub const DEFAULT_BPM: f64 = 120.0;
/// Default grid subdivisions per beat unit
pub const DEFAULT_SUBDIVISIONS: u32 = 16;
/// Default pre-delay before audible content (3 seconds)
pub const DEFAULT_PRE_DELAY_MS: u32 = 3000;

/// Invalid timing input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    #[error("invalid BPM: {0:?}")]
    InvalidBpm(String),
    #[error("invalid subdivision count: {0:?}")]
    InvalidSubdivisions(String),
    #[error("invalid pre-delay: {0:?}")]
    InvalidPreDelay(String),
}

/// Tempo, grid and pre-delay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingParams {
    /// Beats per minute
    pub bpm: f64,
    /// Grid subdivisions per beat unit
    pub subdivisions: u32,
    /// Milliseconds between the authoring zero point and audible content
    pub pre_delay_ms: u32,
}

impl Default for TimingParams {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            subdivisions: DEFAULT_SUBDIVISIONS,
            pre_delay_ms: DEFAULT_PRE_DELAY_MS,
        }
    }
}

impl TimingParams {
    /// Create validated timing parameters
    pub fn new(bpm: f64, subdivisions: u32, pre_delay_ms: u32) -> Result<Self, TimingError> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(TimingError::InvalidBpm(bpm.to_string()));
        }
        if subdivisions == 0 {
            return Err(TimingError::InvalidSubdivisions(subdivisions.to_string()));
        }
        Ok(Self {
            bpm,
            subdivisions,
            pre_delay_ms,
        })
    }

    /// Parse all three fields from raw text. Either every field is valid or
    /// nothing is returned.
    pub fn parse(bpm: &str, subdivisions: &str, pre_delay_ms: &str) -> Result<Self, TimingError> {
        let bpm_value: f64 = bpm
            .trim()
            .parse()
            .map_err(|_| TimingError::InvalidBpm(bpm.to_string()))?;
        let subdivisions_value: u32 = subdivisions
            .trim()
            .parse()
            .map_err(|_| TimingError::InvalidSubdivisions(subdivisions.to_string()))?;
        let pre_delay_value: u32 = pre_delay_ms
            .trim()
            .parse()
            .map_err(|_| TimingError::InvalidPreDelay(pre_delay_ms.to_string()))?;
        Self::new(bpm_value, subdivisions_value, pre_delay_value)
    }

    /// Copy with a different tempo, if valid
    pub fn with_bpm(&self, bpm: f64) -> Result<Self, TimingError> {
        Self::new(bpm, self.subdivisions, self.pre_delay_ms)
    }

    /// Copy with a different subdivision count, if valid
    pub fn with_subdivisions(&self, subdivisions: u32) -> Result<Self, TimingError> {
        Self::new(self.bpm, subdivisions, self.pre_delay_ms)
    }

    /// Copy with a different pre-delay
    pub fn with_pre_delay_ms(&self, pre_delay_ms: u32) -> Self {
        Self {
            pre_delay_ms,
            ..*self
        }
    }

    /// Pre-delay in seconds
    pub fn pre_delay_seconds(&self) -> f64 {
        self.pre_delay_ms as f64 / 1000.0
    }

    /// Seconds for an authoring beat, without pre-delay
    pub fn beat_to_seconds(&self, beat: u32) -> f64 {
        beat_to_seconds(beat, self.bpm, self.subdivisions)
    }

    /// Nearest beat for a time in seconds
    pub fn seconds_to_beat(&self, seconds: f64) -> i64 {
        seconds_to_beat(seconds, self.bpm, self.subdivisions)
    }

    /// Path beat of a note under these parameters
    pub fn path_beat(&self, note: &Note) -> f64 {
        to_path_beat(note, self.bpm, self.subdivisions, self.pre_delay_seconds())
    }

    /// Playback time at which a note should be hit. The anchor sits at 0.
    pub fn target_time(&self, note: &Note) -> f64 {
        if note.is_anchor() {
            return 0.0;
        }
        self.beat_to_seconds(note.beat) + self.pre_delay_seconds()
    }
}
