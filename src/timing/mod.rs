// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing and clock module.
//!
//! This module provides beat/time conversion, the timing parameters
//! every conversion reads, and the playback clock.

pub mod clock;
pub mod convert;
pub mod params;

pub use clock::{ClockState, PlaybackClock, MUSIC_START_SECONDS};
pub use convert::{beat_to_seconds, format_clock, seconds_to_beat, to_path_beat};
pub use params::{
    TimingError, TimingParams, DEFAULT_BPM, DEFAULT_PRE_DELAY_MS, DEFAULT_SUBDIVISIONS,
};
