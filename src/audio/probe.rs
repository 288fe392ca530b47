// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! WAV duration probe.

use std::fs;
use std::path::{Path, PathBuf};

use hound::WavReader;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{is_supported, AudioError, AudioInfo};

/// Outcome of a background probe, tagged with the probed path
#[derive(Debug)]
pub struct ProbeResult {
    pub path: PathBuf,
    pub result: Result<AudioInfo, AudioError>,
}

/// Read the duration and format of a WAV file from its header
pub fn probe_wav(path: &Path) -> Result<AudioInfo, AudioError> {
    if !is_supported(path) {
        return Err(AudioError::Unsupported(path.display().to_string()));
    }

    let file_size = fs::metadata(path)?.len();
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(AudioError::Unsupported(format!(
            "{} has a zero sample rate",
            path.display()
        )));
    }

    // duration() counts frames, not interleaved samples
    let duration = reader.duration() as f64 / spec.sample_rate as f64;
    debug!(path = ?path, duration, sample_rate = spec.sample_rate, "Probed audio");

    Ok(AudioInfo {
        path: path.to_path_buf(),
        duration,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        file_size,
    })
}

/// Probe on the blocking pool and send the result back over `tx`.
/// Must be called from within a tokio runtime.
pub fn spawn_probe(path: PathBuf, tx: UnboundedSender<ProbeResult>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let probe_path = path.clone();
        let result = match tokio::task::spawn_blocking(move || probe_wav(&probe_path)).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Audio probe task failed: {}", e);
                Err(AudioError::Io(std::io::Error::other(e.to_string())))
            }
        };
        let _ = tx.send(ProbeResult { path, result });
    })
}
