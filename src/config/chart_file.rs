// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chart export/import.
//!
//! Export writes the authored notes plus derived timing fields. Import only
//! trusts `beat`, `noteType` and `direction` per note (the derived fields
//! are recomputed) and falls back field by field on anything missing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::chart::{Direction, Note, NoteKind, Timeline, MAX_BEAT};
use crate::timing::{
    TimingParams, DEFAULT_BPM, DEFAULT_PRE_DELAY_MS, DEFAULT_SUBDIVISIONS, MUSIC_START_SECONDS,
};

/// Pre-delay shift between macOS and other platforms (milliseconds)
pub const MAC_DELAY_OFFSET_MS: i64 = 800;

const DIFF_INDEX: u32 = 5;
const LEVEL: u32 = 10;
const DESCRIPTION: &str = "WL Editor chart file with music timing";
const TIMING_EXPLANATION: &str =
    "finalTime = 3.0 + originalTime + preDelay (except for beat 0 direction note)";

/// Pre-delay offset for the running platform
pub fn platform_delay_offset_ms() -> i64 {
    if cfg!(target_os = "macos") {
        MAC_DELAY_OFFSET_MS
    } else {
        0
    }
}

/// Exported chart file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    pub diff_index: u32,
    pub level: u32,
    pub bpm: f64,
    pub subdivisions: u32,
    /// Platform-adjusted pre-delay (milliseconds)
    pub pre_delay: i64,
    pub note_list: Vec<ExportedNote>,
    pub metadata: ChartMetadata,
}

/// One exported note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedNote {
    pub beat: u32,
    /// Beat time without pre-delay
    pub original_time: f64,
    /// Time within the playback session (music starts 3 s in)
    pub music_time: f64,
    /// Beat time plus pre-delay; the anchor keeps its original time
    pub final_time: f64,
    pub is_long: bool,
    pub long_time: f64,
    pub note_type: String,
    pub direction: String,
}

/// Export metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub description: String,
    pub timing_explanation: String,
    /// RFC 3339 export timestamp
    pub exported_at: String,
}

impl ChartDocument {
    /// Build the export document for the running platform
    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self::with_offset(timeline, platform_delay_offset_ms(), Local::now().to_rfc3339())
    }

    /// Build the export document with an explicit pre-delay offset
    pub fn with_offset(timeline: &Timeline, offset_ms: i64, exported_at: String) -> Self {
        let timing = timeline.timing();
        let pre_delay = timing.pre_delay_ms as i64 - offset_ms;
        let pre_delay_seconds = pre_delay as f64 / 1000.0;

        let note_list = timeline
            .notes()
            .iter()
            .map(|note| {
                let original_time = timing.beat_to_seconds(note.beat);
                let final_time = if note.is_anchor() {
                    original_time
                } else {
                    original_time + pre_delay_seconds
                };
                ExportedNote {
                    beat: note.beat,
                    original_time,
                    music_time: MUSIC_START_SECONDS + original_time,
                    final_time,
                    is_long: false,
                    long_time: 0.0,
                    note_type: note.kind.as_str().to_string(),
                    direction: note.direction.as_str().to_string(),
                }
            })
            .collect();

        Self {
            diff_index: DIFF_INDEX,
            level: LEVEL,
            bpm: timing.bpm,
            subdivisions: timing.subdivisions,
            pre_delay,
            note_list,
            metadata: ChartMetadata {
                description: DESCRIPTION.to_string(),
                timing_explanation: TIMING_EXPLANATION.to_string(),
                exported_at,
            },
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize chart to JSON")
    }
}

/// Result of a lenient chart import
#[derive(Debug, Clone)]
pub struct ImportedChart {
    pub timeline: Timeline,
    /// Fields that were missing or invalid and replaced by a fallback
    pub fallbacks: Vec<String>,
}

/// Write a chart export for the running platform
pub fn save_chart<P: AsRef<Path>>(path: P, timeline: &Timeline) -> Result<()> {
    let json = ChartDocument::from_timeline(timeline).to_json()?;
    fs::write(path.as_ref(), json)
        .with_context(|| format!("Failed to write chart file: {:?}", path.as_ref()))?;
    info!(path = ?path.as_ref(), notes = timeline.len(), "Chart exported");
    Ok(())
}

/// Read a chart export for the running platform
pub fn load_chart<P: AsRef<Path>>(path: P) -> Result<ImportedChart> {
    let contents = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read chart file: {:?}", path.as_ref()))?;
    let chart = parse_chart(&contents, platform_delay_offset_ms())
        .with_context(|| format!("Failed to load chart file: {:?}", path.as_ref()))?;
    info!(
        path = ?path.as_ref(),
        notes = chart.timeline.len(),
        fallbacks = chart.fallbacks.len(),
        "Chart imported"
    );
    Ok(chart)
}

/// Parse chart JSON. Only malformed JSON is an error; every missing or
/// invalid field falls back to its default.
pub fn parse_chart(json: &str, offset_ms: i64) -> Result<ImportedChart> {
    let root: Value = serde_json::from_str(json).context("Failed to parse chart JSON")?;
    let mut fallbacks = Vec::new();

    let bpm = match root.get("bpm").and_then(Value::as_f64) {
        Some(bpm) if bpm.is_finite() && bpm > 0.0 => bpm,
        _ => fallback(&mut fallbacks, "bpm", DEFAULT_BPM),
    };

    let subdivisions = match root.get("subdivisions").and_then(Value::as_u64) {
        Some(sub) if sub > 0 && sub <= u32::MAX as u64 => sub as u32,
        _ => fallback(&mut fallbacks, "subdivisions", DEFAULT_SUBDIVISIONS),
    };

    let pre_delay_ms = match root.get("preDelay").and_then(Value::as_i64) {
        Some(stored) => stored.saturating_add(offset_ms).clamp(0, u32::MAX as i64) as u32,
        None => fallback(&mut fallbacks, "preDelay", DEFAULT_PRE_DELAY_MS),
    };

    let mut notes = Vec::new();
    match root.get("noteList").and_then(Value::as_array) {
        Some(list) => {
            for (i, entry) in list.iter().enumerate() {
                notes.push(parse_note(entry, i, &mut fallbacks));
            }
        }
        None => {
            fallback(&mut fallbacks, "noteList", ());
        }
    }

    // bpm and subdivisions are validated above
    let timing = TimingParams::new(bpm, subdivisions, pre_delay_ms).unwrap_or_default();
    Ok(ImportedChart {
        timeline: Timeline::from_notes(notes, timing),
        fallbacks,
    })
}

fn parse_note(entry: &Value, position: usize, fallbacks: &mut Vec<String>) -> Note {
    let field = format!("noteList[{}].beat", position);
    let beat = match entry.get("beat").and_then(Value::as_u64) {
        Some(beat) if beat <= MAX_BEAT as u64 => beat as u32,
        Some(_) => fallback(fallbacks, &field, MAX_BEAT),
        None => fallback(fallbacks, &field, 0),
    };

    // Anything but "Direction" reads back as a tab
    let kind = entry
        .get("noteType")
        .and_then(Value::as_str)
        .map(NoteKind::from_tag)
        .unwrap_or(NoteKind::Tab);

    let direction = match entry.get("direction").and_then(Value::as_str) {
        Some(tag) => Direction::from_tag(tag),
        None => fallback(
            fallbacks,
            &format!("noteList[{}].direction", position),
            Direction::None,
        ),
    };

    Note::new(kind, beat, direction)
}

fn fallback<T>(fallbacks: &mut Vec<String>, field: &str, value: T) -> T {
    warn!(field, "Chart field missing or invalid, using default");
    fallbacks.push(field.to_string());
    value
}
