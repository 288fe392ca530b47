// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Editor state and input handling.
//!
//! The [`Editor`] owns the timeline and everything derived from it: the
//! path cache, the playback session, highlights, the viewport and the
//! selection. Input arrives as [`EditorAction`]s or prompt commands; the
//! terminal loop lives in [`run`].

pub mod command;
pub mod run;

pub use command::Command;
pub use run::run;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::audio::{AudioInfo, ProbeResult};
use crate::chart::{NoteKind, Timeline, MAX_BEAT};
use crate::config::{
    load_chart, save_chart, ChartEvent, ChartWatcher, EditorConfig, ImportedChart, SessionFile,
};
use crate::control::{EditorAction, KeyboardController};
use crate::path::{beat_markers, note_positions, NotePlacement, PathCache, PathNode, Point};
use crate::playback::{Highlights, PlaybackSession, TickReport};
use crate::timing::ClockState;
use crate::ui::path_view::cell_to_screen;
use crate::ui::viewport::Viewport;
use crate::ui::{TransportState, UiState};

/// Geometry derived from the timeline for one frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub nodes: Arc<[PathNode]>,
    pub markers: Vec<Point>,
    pub placements: Vec<NotePlacement>,
}

/// The chart editor
pub struct Editor {
    timeline: Timeline,
    cache: PathCache,
    session: PlaybackSession,
    highlights: Highlights,
    viewport: Viewport,
    keyboard: KeyboardController,
    selected: Option<usize>,
    chart_path: Option<PathBuf>,
    audio: Option<AudioInfo>,
    probe_request: Option<PathBuf>,
    config: EditorConfig,
    autosave_path: Option<PathBuf>,
    watcher: Option<ChartWatcher>,
    ui: UiState,
    last_report: Option<TickReport>,
    drag_from: Option<(u16, u16)>,
    running: bool,
}

impl Editor {
    /// Create an editor with an empty chart. `autosave_path` is only used
    /// when autosave is enabled in the config.
    pub fn new(config: EditorConfig, autosave_path: Option<PathBuf>) -> Self {
        Self {
            timeline: Timeline::new(config.timing()),
            cache: PathCache::new(),
            session: PlaybackSession::new(),
            highlights: Highlights::new(),
            viewport: Viewport::new(config.initial_zoom()),
            keyboard: KeyboardController::with_defaults(),
            selected: None,
            chart_path: None,
            audio: None,
            probe_request: None,
            config,
            autosave_path,
            watcher: None,
            ui: UiState::default(),
            last_report: None,
            drag_from: None,
            running: true,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn keyboard(&self) -> &KeyboardController {
        &self.keyboard
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    pub fn chart_path(&self) -> Option<&Path> {
        self.chart_path.as_deref()
    }

    pub fn audio(&self) -> Option<&AudioInfo> {
        self.audio.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of path rebuilds so far
    pub fn path_rebuilds(&self) -> u64 {
        self.cache.rebuild_count()
    }

    /// Path, markers and note placements for drawing
    pub fn scene(&mut self) -> Scene {
        let nodes = self.cache.get(&self.timeline);
        let markers = beat_markers(&nodes, self.timeline.timing().subdivisions);
        let placements = note_positions(&self.timeline, &nodes);
        Scene {
            nodes,
            markers,
            placements,
        }
    }

    /// Cursor to draw, only while a session is active
    pub fn cursor(&self) -> Option<Point> {
        (self.session.state() != ClockState::Stopped).then(|| self.session.cursor())
    }

    /// Transport readout as of `now`
    pub fn transport_state(&self, now: Instant) -> TransportState {
        let timing = self.timeline.timing();
        let elapsed = self.session.elapsed_at(now);
        TransportState {
            clock: self.session.state(),
            elapsed,
            total: self.session.total_time(timing.pre_delay_seconds()),
            current_beat: self
                .last_report
                .as_ref()
                .map(|r| r.current_beat)
                .unwrap_or_else(|| timing.seconds_to_beat(elapsed)),
            bpm: timing.bpm,
            subdivisions: timing.subdivisions,
            pre_delay_ms: timing.pre_delay_ms,
            audio: self.audio.as_ref().map(|a| a.file_name()),
        }
    }

    // ==================== Files ====================

    /// Restore the autosaved session, if autosave is on and one exists
    pub fn restore_session(&mut self) {
        if !self.config.autosave {
            return;
        }
        let Some(path) = self.autosave_path.clone() else {
            return;
        };
        if !path.exists() {
            return;
        }
        match SessionFile::load(&path) {
            Ok(session) => {
                self.replace_timeline(session.to_timeline());
                info!(path = ?path, notes = self.timeline.len(), "Restored autosave");
                match session.audio_file_name {
                    Some(name) => self.ui.set_status(format!("Restored session (last audio: {})", name)),
                    None => self.ui.set_status("Restored session"),
                }
            }
            Err(e) => {
                warn!("Could not restore autosave: {:#}", e);
                self.ui.set_status("Autosave could not be restored");
            }
        }
    }

    /// Open a chart file, replacing the current timeline
    pub fn open_chart(&mut self, path: &Path) -> Result<()> {
        let chart = load_chart(path)?;
        self.session.stop();
        self.install_chart(chart);
        self.chart_path = Some(path.to_path_buf());
        self.selected = None;
        self.watch_chart();
        self.autosave();
        self.ui.set_status(format!("Opened {}", path.display()));
        Ok(())
    }

    /// Export the chart. Without a path the current chart path is used.
    pub fn save_chart(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .chart_path
                .clone()
                .ok_or_else(|| anyhow!("No chart file; use :w <path>"))?,
        };
        save_chart(&path, &self.timeline)?;
        if self.chart_path.as_deref() != Some(path.as_path()) {
            self.chart_path = Some(path.clone());
            self.watch_chart();
        }
        self.ui.set_status(format!("Exported {}", path.display()));
        Ok(path)
    }

    /// Start watching the current chart file when enabled
    fn watch_chart(&mut self) {
        if !self.config.watch_chart {
            return;
        }
        let Some(path) = self.chart_path.clone() else {
            return;
        };
        if self.watcher.as_ref().map(|w| w.watched_path()) == Some(path.as_path()) {
            return;
        }
        match ChartWatcher::new(&path, Some(self.config.reload_debounce_ms)) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(e) => {
                warn!("Chart hot reload disabled: {:#}", e);
                self.watcher = None;
            }
        }
    }

    /// Drain pending hot-reload events
    pub fn poll_watcher(&mut self) -> bool {
        let events = match self.watcher {
            Some(ref watcher) => watcher.recv_all(),
            None => return false,
        };
        let changed = !events.is_empty();
        for event in events {
            self.handle_chart_event(event);
        }
        changed
    }

    /// Apply a hot-reload event. Playback keeps running across a reload.
    pub fn handle_chart_event(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::Reloaded(chart) => {
                let same = chart.timeline.notes() == self.timeline.notes()
                    && chart.timeline.timing() == self.timeline.timing();
                if same {
                    return;
                }
                self.install_chart(*chart);
                self.autosave();
                self.ui.set_status("Chart reloaded from disk");
            }
            ChartEvent::Error(e) => {
                warn!("Chart reload failed: {}", e);
                self.ui.set_status(format!("Reload failed: {}", e));
            }
            ChartEvent::Removed(path) => {
                self.ui.set_status(format!("{} was removed", path.display()));
            }
        }
    }

    fn install_chart(&mut self, chart: ImportedChart) {
        for field in &chart.fallbacks {
            warn!("Chart field fell back to its default: {}", field);
        }
        self.replace_timeline(chart.timeline);
    }

    fn replace_timeline(&mut self, timeline: Timeline) {
        self.timeline = timeline;
        self.highlights.retain_within(self.timeline.len());
        self.clamp_selection();
    }

    /// Ask the run loop to probe an audio file
    pub fn request_audio(&mut self, path: PathBuf) {
        self.ui.set_status(format!("Reading {}...", path.display()));
        self.probe_request = Some(path);
    }

    /// Pending audio probe, if any
    pub fn take_probe_request(&mut self) -> Option<PathBuf> {
        self.probe_request.take()
    }

    /// Accept a finished probe
    pub fn handle_probe(&mut self, probe: ProbeResult) {
        match probe.result {
            Ok(info) => {
                info!(path = ?info.path, duration = info.duration, "Audio loaded");
                self.ui.set_status(format!("{} ({:.2}s)", info.file_name(), info.duration));
                self.session.set_audio_duration(Some(info.duration));
                self.audio = Some(info);
                self.autosave();
            }
            Err(e) => {
                warn!("Audio probe failed for {:?}: {}", probe.path, e);
                self.ui.set_status(format!("{}", e));
            }
        }
    }

    /// Write the autosave session when enabled
    pub fn autosave(&self) {
        if !self.config.autosave {
            return;
        }
        let Some(ref path) = self.autosave_path else {
            return;
        };
        let audio = self.audio.as_ref().map(|a| a.path.as_path());
        if let Err(e) = SessionFile::from_timeline(&self.timeline, audio).save(path) {
            warn!("Autosave failed: {:#}", e);
        }
    }

    // ==================== Playback ====================

    /// Advance playback. Hits raise their note highlight.
    pub fn tick(&mut self, now: Instant) -> Option<&TickReport> {
        let report = self.session.tick(now, &self.timeline, &mut self.cache)?;
        for hit in &report.hits {
            self.highlights.note_hit(hit.index);
        }
        self.last_report = Some(report);
        self.last_report.as_ref()
    }

    /// Advance highlight animation. Returns whether a redraw is needed.
    pub fn animate(&mut self) -> bool {
        self.highlights.decay()
    }

    // ==================== Actions ====================

    /// Apply one action. Edits that change the timeline are autosaved.
    pub fn apply(&mut self, action: EditorAction, now: Instant) {
        let revision = self.timeline.revision();
        let timeline_id = self.timeline.id();

        match action {
            EditorAction::None => {}

            EditorAction::TogglePlay => match self.session.state() {
                ClockState::Stopped => {
                    self.last_report = None;
                    self.session.play(now);
                }
                _ => self.session.toggle_pause(now),
            },
            EditorAction::Stop => {
                self.session.stop();
                self.last_report = None;
            }
            EditorAction::SeekBy(delta) => self.session.seek_by(now, delta),

            EditorAction::AddTab => match self.timeline.add_tab() {
                Ok(index) => self.selected = Some(index),
                Err(e) => self.reject(e),
            },
            EditorAction::AddDirection => match self.timeline.add_direction() {
                Ok(index) => self.selected = Some(index),
                Err(e) => self.reject(e),
            },
            EditorAction::DeleteNote => {
                if let Some(index) = self.selected {
                    match self.timeline.remove(index) {
                        Ok(_) => {
                            self.highlights.retain_within(self.timeline.len());
                            self.clamp_selection();
                        }
                        Err(e) => self.reject(e),
                    }
                }
            }
            EditorAction::SortNotes => self.sort_notes(),
            EditorAction::ClearAll => {
                self.timeline.clear();
                self.selected = None;
                self.highlights.retain_within(self.timeline.len());
            }
            EditorAction::AdjustBeat(delta) => self.adjust_beat(delta),
            EditorAction::StepBeat(steps) => {
                let delta = steps * self.timeline.timing().subdivisions as i64;
                self.adjust_beat(delta);
            }
            EditorAction::NextDirection => self.rotate_direction(true),
            EditorAction::PrevDirection => self.rotate_direction(false),
            EditorAction::ToggleKind => {
                if let Some(index) = self.selected {
                    let kind = match self.timeline.note(index).map(|n| n.kind) {
                        Some(NoteKind::Tab) => NoteKind::Direction,
                        Some(NoteKind::Direction) => NoteKind::Tab,
                        None => return,
                    };
                    if let Err(e) = self.timeline.set_kind(index, kind) {
                        self.reject(e);
                    }
                }
            }

            EditorAction::AdjustBpm(delta) => {
                let timing = *self.timeline.timing();
                match timing.with_bpm(timing.bpm + delta) {
                    Ok(timing) => {
                        self.timeline.set_timing(timing);
                    }
                    Err(e) => self.ui.set_status(e.to_string()),
                }
            }
            EditorAction::AdjustSubdivisions(delta) => {
                let timing = *self.timeline.timing();
                let subdivisions = (timing.subdivisions as i64 + delta as i64).max(1) as u32;
                if let Ok(timing) = timing.with_subdivisions(subdivisions) {
                    self.timeline.set_timing(timing);
                }
            }
            EditorAction::AdjustPreDelay(delta) => {
                let timing = *self.timeline.timing();
                let pre_delay = (timing.pre_delay_ms as i64 + delta).clamp(0, u32::MAX as i64) as u32;
                self.timeline.set_timing(timing.with_pre_delay_ms(pre_delay));
            }

            EditorAction::ZoomIn => self.viewport.zoom_in(Point::ORIGIN),
            EditorAction::ZoomOut => self.viewport.zoom_out(Point::ORIGIN),
            EditorAction::Pan(dx, dy) => self.viewport.pan_by(dx, dy),
            EditorAction::ResetView => self.viewport.reset(),
            EditorAction::FocusSelected => self.focus_selected(),
            EditorAction::FlashPath => self.highlights.flash_path(),

            EditorAction::SelectPrev => {
                self.selected = match self.selected {
                    Some(index) => Some(index.saturating_sub(1)),
                    None => self.timeline.len().checked_sub(1),
                };
            }
            EditorAction::SelectNext => {
                let last = self.timeline.len().saturating_sub(1);
                self.selected = match self.selected {
                    Some(index) => Some((index + 1).min(last)),
                    None => Some(0),
                };
            }

            EditorAction::Save => {
                if let Err(e) = self.save_chart(None) {
                    self.ui.set_status(format!("{:#}", e));
                }
            }
            EditorAction::Command => self.ui.open_prompt(),
            EditorAction::ToggleHelp => self.ui.show_help = !self.ui.show_help,
            EditorAction::Quit => self.running = false,
        }

        if self.timeline.id() == timeline_id && self.timeline.revision() != revision {
            self.autosave();
        }
    }

    fn reject(&mut self, error: crate::chart::EditError) {
        warn!("Edit rejected: {}", error);
        self.ui.set_status(error.to_string());
    }

    fn clamp_selection(&mut self) {
        let len = self.timeline.len();
        self.selected = match (self.selected, len) {
            (None, _) | (Some(_), 0) => None,
            (Some(index), len) => Some(index.min(len - 1)),
        };
    }

    fn adjust_beat(&mut self, delta: i64) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(note) = self.timeline.note(index) else {
            return;
        };
        let beat = (note.beat as i64 + delta).clamp(0, MAX_BEAT as i64) as u32;
        if let Err(e) = self.timeline.set_beat(index, beat) {
            self.reject(e);
        }
    }

    fn rotate_direction(&mut self, clockwise: bool) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(note) = self.timeline.note(index) else {
            return;
        };
        let direction = if clockwise {
            note.direction.next()
        } else {
            note.direction.prev()
        };
        if let Err(e) = self.timeline.set_direction(index, direction) {
            self.reject(e);
        }
    }

    /// Stable sort by beat; the selection follows its note
    fn sort_notes(&mut self) {
        let selected = self.selected.and_then(|sel| {
            let mut order: Vec<(u32, usize)> = self
                .timeline
                .notes()
                .iter()
                .map(|n| (n.beat, n.index()))
                .collect();
            order.sort_by_key(|&(beat, _)| beat);
            order.iter().position(|&(_, index)| index == sel)
        });
        self.timeline.sort_by_beat();
        self.selected = selected;
        self.highlights.retain_within(self.timeline.len());
    }

    /// Centre the view on the selected note and highlight it
    fn focus_selected(&mut self) {
        let Some(index) = self.selected else {
            return;
        };
        let scene = self.scene();
        if let Some(placement) = scene.placements.iter().find(|p| p.index == index) {
            self.viewport.center_on(placement.position);
            self.highlights.focus(index);
        }
    }

    // ==================== Prompt ====================

    /// Run a prompt command
    pub fn run_command(&mut self, line: &str, now: Instant) -> Result<()> {
        let command = Command::parse(line)?;
        let revision = self.timeline.revision();
        let timeline_id = self.timeline.id();

        match command {
            Command::Bpm(value) => {
                let timing = *self.timeline.timing();
                let changed = self.timeline.apply_timing_input(
                    &value,
                    &timing.subdivisions.to_string(),
                    &timing.pre_delay_ms.to_string(),
                );
                self.report_timing(changed);
            }
            Command::Subdivisions(value) => {
                let timing = *self.timeline.timing();
                let changed = self.timeline.apply_timing_input(
                    &timing.bpm.to_string(),
                    &value,
                    &timing.pre_delay_ms.to_string(),
                );
                self.report_timing(changed);
            }
            Command::PreDelay(value) => {
                let timing = *self.timeline.timing();
                let changed = self.timeline.apply_timing_input(
                    &timing.bpm.to_string(),
                    &timing.subdivisions.to_string(),
                    &value,
                );
                self.report_timing(changed);
            }
            Command::Beat(beat) => {
                let index = self.selected.ok_or_else(|| anyhow!("No note selected"))?;
                self.timeline.set_beat(index, beat)?;
            }
            Command::Direction(direction) => {
                let index = self.selected.ok_or_else(|| anyhow!("No note selected"))?;
                self.timeline.set_direction(index, direction)?;
            }
            Command::Seek(seconds) => self.session.seek(now, seconds),
            Command::Write(path) => {
                self.save_chart(path.as_deref())?;
            }
            Command::Edit(path) => self.open_chart(&path)?,
            Command::Audio(path) => self.request_audio(path),
            Command::Quit => self.running = false,
        }

        if self.timeline.id() == timeline_id && self.timeline.revision() != revision {
            self.autosave();
        }
        Ok(())
    }

    fn report_timing(&mut self, changed: bool) {
        if changed {
            let timing = self.timeline.timing();
            self.ui.set_status(format!(
                "{:.1} BPM, 1/{}, {}ms pre-delay",
                timing.bpm, timing.subdivisions, timing.pre_delay_ms
            ));
        } else {
            self.ui.set_status("Timing unchanged");
        }
    }

    // ==================== Input ====================

    /// Handle a key press
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind, now: Instant) {
        if kind == KeyEventKind::Release {
            return;
        }

        if self.ui.prompt.is_some() {
            match code {
                KeyCode::Enter => {
                    if let Some(line) = self.ui.close_prompt() {
                        if let Err(e) = self.run_command(&line, now) {
                            self.ui.set_status(format!("{:#}", e));
                        }
                    }
                }
                KeyCode::Esc => {
                    self.ui.close_prompt();
                }
                KeyCode::Backspace => self.ui.prompt_backspace(),
                KeyCode::Char(c) => self.ui.prompt_push(c),
                _ => {}
            }
            return;
        }

        if self.ui.show_help && matches!(code, KeyCode::Esc) {
            self.ui.show_help = false;
            return;
        }

        if let Some(action) = self.keyboard.process_key(code, modifiers, kind) {
            self.apply(action, now);
        }
    }

    /// Handle a mouse event over the path area
    pub fn handle_mouse(&mut self, event: MouseEvent, path_area: Rect) {
        let inside = event.column >= path_area.x
            && event.column < path_area.x + path_area.width
            && event.row >= path_area.y
            && event.row < path_area.y + path_area.height;
        let screen = cell_to_screen(path_area, event.column, event.row);

        match event.kind {
            MouseEventKind::ScrollUp if inside => self.viewport.zoom_in(screen),
            MouseEventKind::ScrollDown if inside => self.viewport.zoom_out(screen),
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let scene = self.scene();
                match self.viewport.pick(&scene.placements, screen) {
                    Some(index) => {
                        self.selected = Some(index);
                        self.highlights.focus(index);
                    }
                    None => self.drag_from = Some((event.column, event.row)),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((column, row)) = self.drag_from {
                    let dx = event.column as f64 - column as f64;
                    let dy = 2.0 * (event.row as f64 - row as f64);
                    self.viewport.pan_by(dx, dy);
                    self.drag_from = Some((event.column, event.row));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_from = None,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Direction, Note};
    use crate::timing::TimingParams;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config() -> EditorConfig {
        EditorConfig {
            autosave: false,
            watch_chart: false,
            pre_delay_ms: 0,
            ..EditorConfig::default()
        }
    }

    fn editor() -> Editor {
        Editor::new(config(), None)
    }

    fn press(editor: &mut Editor, code: KeyCode, now: Instant) {
        editor.handle_key(code, KeyModifiers::NONE, KeyEventKind::Press, now);
    }

    #[test]
    fn test_new_editor_has_anchor() {
        let editor = editor();
        assert_eq!(editor.timeline().len(), 1);
        assert!(editor.timeline().notes()[0].is_anchor());
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_add_notes_selects_them() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::AddTab, now);
        assert_eq!(editor.selected(), Some(1));
        assert_eq!(editor.timeline().notes()[1].beat, 16);

        editor.apply(EditorAction::AddDirection, now);
        assert_eq!(editor.selected(), Some(2));
        assert_eq!(editor.timeline().notes()[2].kind, NoteKind::Direction);
        assert_eq!(editor.timeline().notes()[2].beat, 16);
    }

    #[test]
    fn test_delete_keeps_anchor() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::SelectNext, now);
        assert_eq!(editor.selected(), Some(0));
        editor.apply(EditorAction::DeleteNote, now);
        assert_eq!(editor.timeline().len(), 1);
        assert!(editor.ui().status_message.is_some());

        editor.apply(EditorAction::AddTab, now);
        editor.apply(EditorAction::DeleteNote, now);
        assert_eq!(editor.timeline().len(), 1);
        assert_eq!(editor.selected(), Some(0));
    }

    #[test]
    fn test_beat_and_direction_edits() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::AddDirection, now);
        editor.apply(EditorAction::AdjustBeat(3), now);
        assert_eq!(editor.timeline().notes()[1].beat, 19);
        editor.apply(EditorAction::StepBeat(-1), now);
        assert_eq!(editor.timeline().notes()[1].beat, 3);

        let before = editor.timeline().notes()[1].direction;
        editor.apply(EditorAction::NextDirection, now);
        assert_eq!(editor.timeline().notes()[1].direction, before.next());
        editor.apply(EditorAction::PrevDirection, now);
        assert_eq!(editor.timeline().notes()[1].direction, before);
    }

    #[test]
    fn test_anchor_edits_rejected() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::SelectNext, now);
        editor.apply(EditorAction::AdjustBeat(5), now);
        assert_eq!(editor.timeline().notes()[0].beat, 0);
        editor.apply(EditorAction::ToggleKind, now);
        assert_eq!(editor.timeline().notes()[0].kind, NoteKind::Direction);
    }

    #[test]
    fn test_sort_keeps_selection_on_note() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::AddTab, now); // beat 16
        editor.apply(EditorAction::AddTab, now); // beat 32
        editor.apply(EditorAction::AdjustBeat(-30), now); // beat 2, selected index 2
        editor.apply(EditorAction::SortNotes, now);

        assert_eq!(editor.selected(), Some(1));
        assert_eq!(editor.timeline().notes()[1].beat, 2);
    }

    #[test]
    fn test_timing_actions() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::AdjustBpm(10.0), now);
        assert_eq!(editor.timeline().timing().bpm, 130.0);

        editor.apply(EditorAction::AdjustSubdivisions(-100), now);
        assert_eq!(editor.timeline().timing().subdivisions, 1);

        editor.apply(EditorAction::AdjustPreDelay(-500), now);
        assert_eq!(editor.timeline().timing().pre_delay_ms, 0);
        editor.apply(EditorAction::AdjustPreDelay(250), now);
        assert_eq!(editor.timeline().timing().pre_delay_ms, 250);
    }

    #[test]
    fn test_commands_absorb_bad_timing() {
        let mut editor = editor();
        let now = Instant::now();

        editor.run_command("bpm 90", now).unwrap();
        assert_eq!(editor.timeline().timing().bpm, 90.0);

        editor.run_command("bpm abc", now).unwrap();
        assert_eq!(editor.timeline().timing().bpm, 90.0);
        assert_eq!(editor.ui().status_message.as_deref(), Some("Timing unchanged"));

        editor.run_command("sub 0", now).unwrap();
        assert_eq!(editor.timeline().timing().subdivisions, 16);

        editor.run_command("delay 1500", now).unwrap();
        assert_eq!(editor.timeline().timing().pre_delay_ms, 1500);
    }

    #[test]
    fn test_command_beat_needs_selection() {
        let mut editor = editor();
        let now = Instant::now();

        assert!(editor.run_command("beat 8", now).is_err());
        editor.apply(EditorAction::AddTab, now);
        editor.run_command("beat 8", now).unwrap();
        assert_eq!(editor.timeline().notes()[1].beat, 8);

        editor.apply(EditorAction::ToggleKind, now);
        editor.run_command("dir down", now).unwrap();
        assert_eq!(editor.timeline().notes()[1].direction, Direction::Down);
    }

    #[test]
    fn test_add_at_grid_end_is_rejected() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::AddTab, now);
        assert!(editor.run_command("beat 4294967295", now).is_err());
        editor.run_command(&format!("beat {}", MAX_BEAT), now).unwrap();

        editor.apply(EditorAction::AddTab, now);
        assert_eq!(editor.timeline().len(), 2);
        assert_eq!(editor.selected(), Some(1));
        assert!(editor.ui().status_message.is_some());

        // Nudging past the end clamps to the last beat
        editor.apply(EditorAction::AdjustBeat(100), now);
        assert_eq!(editor.timeline().notes()[1].beat, MAX_BEAT);
    }

    #[test]
    fn test_prompt_keys() {
        let mut editor = editor();
        let now = Instant::now();

        press(&mut editor, KeyCode::Char(':'), now);
        assert!(editor.ui().prompt.is_some());
        for c in "bpm 100".chars() {
            press(&mut editor, KeyCode::Char(c), now);
        }
        press(&mut editor, KeyCode::Enter, now);

        assert!(editor.ui().prompt.is_none());
        assert_eq!(editor.timeline().timing().bpm, 100.0);

        // Keys typed into the prompt never reach the bindings
        press(&mut editor, KeyCode::Char(':'), now);
        press(&mut editor, KeyCode::Char('t'), now);
        press(&mut editor, KeyCode::Esc, now);
        assert_eq!(editor.timeline().len(), 1);
    }

    #[test]
    fn test_play_pause_stop() {
        let mut editor = Editor::new(config(), None);
        let start = Instant::now();

        editor.apply(EditorAction::TogglePlay, start);
        assert_eq!(editor.session().state(), ClockState::Running);
        assert_eq!(editor.cursor(), Some(Point::ORIGIN));

        editor.apply(EditorAction::TogglePlay, start + Duration::from_millis(100));
        assert_eq!(editor.session().state(), ClockState::Paused);

        editor.apply(EditorAction::Stop, start + Duration::from_millis(200));
        assert_eq!(editor.session().state(), ClockState::Stopped);
        assert_eq!(editor.cursor(), None);
    }

    #[test]
    fn test_tick_highlights_hits() {
        let mut editor = editor();
        let start = Instant::now();
        editor.apply(EditorAction::AddTab, start); // beat 16 at 0.5s

        editor.apply(EditorAction::TogglePlay, start);
        assert!(editor.tick(start + Duration::from_millis(200)).unwrap().hits.is_empty());

        let report = editor.tick(start + Duration::from_millis(510)).unwrap();
        assert_eq!(report.hits.len(), 1);
        assert_eq!(editor.highlights().note().map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_view_actions() {
        let mut editor = editor();
        let now = Instant::now();

        editor.apply(EditorAction::ZoomIn, now);
        assert!(editor.viewport().zoom() > 1.0);
        editor.apply(EditorAction::Pan(4.0, 0.0), now);
        assert_eq!(editor.viewport().pan().x, 4.0);
        editor.apply(EditorAction::ResetView, now);
        assert_eq!(editor.viewport().zoom(), 1.0);

        editor.apply(EditorAction::FlashPath, now);
        assert!(editor.highlights().path() > 0.0);
        assert!(editor.animate());
    }

    #[test]
    fn test_focus_selected_centres_note() {
        let mut editor = editor();
        let now = Instant::now();
        editor.apply(EditorAction::AddDirection, now);
        editor.apply(EditorAction::NextDirection, now);
        editor.apply(EditorAction::AddDirection, now);
        editor.apply(EditorAction::FocusSelected, now);

        let scene = editor.scene();
        let placement = scene.placements.iter().find(|p| p.index == 2).unwrap();
        assert_eq!(placement.position, Point::new(0.0, -8.0));
        let screen = editor.viewport().to_screen(placement.position);
        assert!(screen.distance(Point::ORIGIN) < 1e-9);
        assert_eq!(editor.highlights().note().map(|(i, _)| i), Some(2));
    }

    #[test]
    fn test_save_and_open_chart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let now = Instant::now();

        let mut editor = editor();
        assert!(editor.save_chart(None).is_err());
        editor.apply(EditorAction::AddTab, now);
        editor.run_command(&format!("w {}", path.display()), now).unwrap();
        assert_eq!(editor.chart_path(), Some(path.as_path()));

        let mut other = Editor::new(config(), None);
        other.open_chart(&path).unwrap();
        assert_eq!(other.timeline().notes(), editor.timeline().notes());
    }

    #[test]
    fn test_autosave_and_restore() {
        let dir = tempdir().unwrap();
        let autosave = dir.path().join("autosave.yaml");
        let config = EditorConfig {
            autosave: true,
            ..config()
        };
        let now = Instant::now();

        let mut editor = Editor::new(config.clone(), Some(autosave.clone()));
        editor.apply(EditorAction::AddTab, now);
        editor.apply(EditorAction::AdjustBpm(20.0), now);
        assert!(autosave.exists());

        let mut restored = Editor::new(config, Some(autosave));
        restored.restore_session();
        assert_eq!(restored.timeline().notes(), editor.timeline().notes());
        assert_eq!(restored.timeline().timing().bpm, 140.0);
    }

    #[test]
    fn test_reload_ignores_identical_chart() {
        let mut editor = editor();
        let now = Instant::now();
        editor.apply(EditorAction::AddTab, now);

        let same = ImportedChart {
            timeline: Timeline::from_notes(
                editor.timeline().notes().to_vec(),
                *editor.timeline().timing(),
            ),
            fallbacks: Vec::new(),
        };
        let id = editor.timeline().id();
        editor.handle_chart_event(ChartEvent::Reloaded(Box::new(same)));
        assert_eq!(editor.timeline().id(), id);

        let changed = ImportedChart {
            timeline: Timeline::from_notes(
                vec![Note::direction(0, Direction::Down)],
                TimingParams::new(100.0, 8, 0).unwrap(),
            ),
            fallbacks: vec!["bpm".to_string()],
        };
        editor.handle_chart_event(ChartEvent::Reloaded(Box::new(changed)));
        assert_ne!(editor.timeline().id(), id);
        assert_eq!(editor.timeline().len(), 1);
        assert_eq!(editor.selected(), Some(0));
    }

    #[test]
    fn test_audio_request_and_probe() {
        let mut editor = editor();
        editor
            .run_command("audio music/song.wav", Instant::now())
            .unwrap();
        assert_eq!(editor.take_probe_request(), Some(PathBuf::from("music/song.wav")));
        assert_eq!(editor.take_probe_request(), None);

        editor.handle_probe(ProbeResult {
            path: PathBuf::from("music/song.wav"),
            result: Ok(AudioInfo {
                path: PathBuf::from("music/song.wav"),
                duration: 90.0,
                sample_rate: 44100,
                channels: 2,
                file_size: 1024,
            }),
        });
        let transport = editor.transport_state(Instant::now());
        assert_eq!(transport.total, Some(90.0));
        assert_eq!(transport.audio.as_deref(), Some("song.wav"));
    }

    #[test]
    fn test_mouse_pick_and_zoom() {
        let mut editor = editor();
        let area = Rect::new(0, 0, 41, 21);

        let click = |column, row, kind| MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        // The anchor sits at the centre of the area
        editor.handle_mouse(click(20, 10, MouseEventKind::Down(MouseButton::Left)), area);
        assert_eq!(editor.selected(), Some(0));

        editor.handle_mouse(click(20, 10, MouseEventKind::ScrollUp), area);
        assert!(editor.viewport().zoom() > 1.0);

        // Outside the area nothing happens
        let zoom = editor.viewport().zoom();
        editor.handle_mouse(click(60, 30, MouseEventKind::ScrollUp), area);
        assert_eq!(editor.viewport().zoom(), zoom);
    }
}
