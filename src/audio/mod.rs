// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio file handling for WLCHART.
//!
//! The editor only needs to know how long the music is: total playback
//! length is the audio duration plus the pre-delay. Probing reads the WAV
//! header on a blocking task and hands the result back to the event loop.

pub mod probe;

pub use probe::{probe_wav, spawn_probe, ProbeResult};

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Audio error types
#[derive(Debug, Error)]
pub enum AudioError {
    /// File could not be opened
    #[error("Failed to open audio file: {0}")]
    Io(#[from] std::io::Error),
    /// File is not a format the probe understands
    #[error("Unsupported audio file: {0}")]
    Unsupported(String),
    /// WAV header or data is malformed
    #[error("Invalid WAV file: {0}")]
    Wav(#[from] hound::Error),
}

/// Properties of a probed audio file
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    pub path: PathBuf,
    /// Length in seconds
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// File size in bytes
    pub file_size: u64,
}

impl AudioInfo {
    /// File name for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Whether a path looks like a file the probe can read
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav") || ext.eq_ignore_ascii_case("wave"))
        .unwrap_or(false)
}
