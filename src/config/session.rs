// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Autosave session.
//!
//! The working chart is saved after every edit so a crash or restart picks
//! up where the user left off. The audio file itself is not stored, only
//! its name and size as a reminder.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chart::{Direction, Note, NoteKind, Timeline};
use crate::timing::{TimingParams, DEFAULT_BPM, DEFAULT_PRE_DELAY_MS, DEFAULT_SUBDIVISIONS};

use super::data_dir;

/// A note as stored in the session file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionNote {
    /// "direction" or "tab"
    pub kind: String,
    pub beat: u32,
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_direction() -> String {
    Direction::None.as_str().to_string()
}

impl From<&Note> for SessionNote {
    fn from(note: &Note) -> Self {
        Self {
            kind: note.kind.as_str().to_ascii_lowercase(),
            beat: note.beat,
            direction: note.direction.as_str().to_string(),
        }
    }
}

impl From<&SessionNote> for Note {
    fn from(note: &SessionNote) -> Self {
        Note::new(
            NoteKind::from_tag(&note.kind),
            note.beat,
            Direction::from_tag(&note.direction),
        )
    }
}

/// Autosaved editor state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionFile {
    #[serde(default)]
    pub notes: Vec<SessionNote>,
    /// File name of the last opened audio file
    #[serde(default)]
    pub audio_file_name: Option<String>,
    /// Size in bytes of the last opened audio file
    #[serde(default)]
    pub audio_file_size: Option<u64>,
    /// Pre-delay in milliseconds
    #[serde(default = "default_pre_delay")]
    pub pre_delay: u32,
    #[serde(default = "default_bpm")]
    pub bpm: f64,
    #[serde(default = "default_subdivisions")]
    pub subdivisions: u32,
}

fn default_pre_delay() -> u32 {
    DEFAULT_PRE_DELAY_MS
}
fn default_bpm() -> f64 {
    DEFAULT_BPM
}
fn default_subdivisions() -> u32 {
    DEFAULT_SUBDIVISIONS
}

impl Default for SessionFile {
    fn default() -> Self {
        Self::from_timeline(&Timeline::default(), None)
    }
}

impl SessionFile {
    /// Snapshot a timeline plus the current audio file
    pub fn from_timeline(timeline: &Timeline, audio_file: Option<&Path>) -> Self {
        let timing = timeline.timing();
        let audio_file_name = audio_file
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        let audio_file_size = audio_file
            .and_then(|p| fs::metadata(p).ok())
            .map(|meta| meta.len());

        Self {
            notes: timeline.notes().iter().map(SessionNote::from).collect(),
            audio_file_name,
            audio_file_size,
            pre_delay: timing.pre_delay_ms,
            bpm: timing.bpm,
            subdivisions: timing.subdivisions,
        }
    }

    /// Rebuild the timeline. Invalid timing values fall back to defaults.
    pub fn to_timeline(&self) -> Timeline {
        let timing = match TimingParams::new(self.bpm, self.subdivisions, self.pre_delay) {
            Ok(timing) => timing,
            Err(e) => {
                warn!("Session timing rejected ({}), using defaults", e);
                TimingParams::default().with_pre_delay_ms(self.pre_delay)
            }
        };
        Timeline::from_notes(self.notes.iter().map(Note::from).collect(), timing)
    }

    /// Load a session from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read session file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a session from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse session YAML")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize session to YAML")
    }

    /// Save the session, creating the parent directory if needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory: {:?}", parent))?;
        }
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write session file: {:?}", path.as_ref()))?;
        debug!(path = ?path.as_ref(), notes = self.notes.len(), "Session saved");
        Ok(())
    }

    /// Default session location: `<data dir>/wlchart/autosave.yaml`
    pub fn default_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("autosave.yaml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn timeline() -> Timeline {
        Timeline::from_notes(
            vec![
                Note::direction(0, Direction::Up),
                Note::tab(16),
                Note::direction(32, Direction::UpRight),
            ],
            TimingParams::new(140.0, 8, 1500).unwrap(),
        )
    }

    #[test]
    fn test_session_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wlchart").join("autosave.yaml");
        let original = timeline();

        SessionFile::from_timeline(&original, None).save(&path).unwrap();
        let restored = SessionFile::load(&path).unwrap().to_timeline();

        assert_eq!(restored.notes(), original.notes());
        assert_eq!(restored.timing(), original.timing());
    }

    #[test]
    fn test_session_records_audio_file() {
        let dir = tempdir().unwrap();
        let audio = dir.path().join("song.wav");
        fs::write(&audio, [0u8; 128]).unwrap();

        let session = SessionFile::from_timeline(&timeline(), Some(&audio));
        assert_eq!(session.audio_file_name.as_deref(), Some("song.wav"));
        assert_eq!(session.audio_file_size, Some(128));
    }

    #[test]
    fn test_session_defaults() {
        let yaml = r#"
notes:
  - kind: tab
    beat: 16
"#;
        let session = SessionFile::from_yaml(yaml).unwrap();
        assert_eq!(session.bpm, 120.0);
        assert_eq!(session.subdivisions, 16);
        assert_eq!(session.pre_delay, 3000);
        assert_eq!(session.audio_file_name, None);

        let timeline = session.to_timeline();
        assert_eq!(timeline.len(), 2);
        assert!(timeline.notes()[0].is_anchor());
    }

    #[test]
    fn test_invalid_session_timing() {
        let yaml = "bpm: -1.0\nsubdivisions: 0\npre_delay: 250\n";
        let timeline = SessionFile::from_yaml(yaml).unwrap().to_timeline();
        assert_eq!(timeline.timing().bpm, 120.0);
        assert_eq!(timeline.timing().pre_delay_ms, 250);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(SessionFile::from_yaml("notes: [").is_err());
    }
}
