// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Control system for keyboard input.
//!
//! Key events are translated into [`EditorAction`]s through a configurable
//! binding table; the editor applies them.

pub mod keyboard;

pub use keyboard::{format_shortcut, KeyBinding, KeyboardController, Shortcut};

/// Action that can be triggered by controls
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// No action
    None,

    // Transport
    /// Play from the start, or pause/resume a running session
    TogglePlay,
    /// Stop playback and rewind
    Stop,
    /// Seek by a number of seconds
    SeekBy(f64),

    // Editing
    /// Append a tab note one grid step past the last note
    AddTab,
    /// Append a direction note one grid step past the last direction note
    AddDirection,
    /// Delete the selected note
    DeleteNote,
    /// Sort notes by beat
    SortNotes,
    /// Remove everything but the anchor
    ClearAll,
    /// Move the selected note by raw beats
    AdjustBeat(i64),
    /// Move the selected note by whole grid steps
    StepBeat(i64),
    /// Rotate the selected note's direction clockwise
    NextDirection,
    /// Rotate the selected note's direction counter-clockwise
    PrevDirection,
    /// Switch the selected note between tab and direction
    ToggleKind,

    // Timing
    /// Adjust tempo by delta
    AdjustBpm(f64),
    /// Adjust subdivisions by delta
    AdjustSubdivisions(i32),
    /// Adjust pre-delay by delta (milliseconds)
    AdjustPreDelay(i64),

    // View
    /// Zoom in around the view centre
    ZoomIn,
    /// Zoom out around the view centre
    ZoomOut,
    /// Pan by a screen-space delta
    Pan(f64, f64),
    /// Reset zoom and pan
    ResetView,
    /// Centre on the selected note and highlight it
    FocusSelected,
    /// Flash the whole path
    FlashPath,

    // Navigation
    /// Select the previous note
    SelectPrev,
    /// Select the next note
    SelectNext,

    // UI
    /// Export the chart to its file
    Save,
    /// Open the command prompt
    Command,
    /// Toggle help display
    ToggleHelp,
    /// Quit application
    Quit,
}

impl EditorAction {
    /// Check if this is a transport action
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EditorAction::TogglePlay | EditorAction::Stop | EditorAction::SeekBy(_)
        )
    }

    /// Check if this action edits the timeline
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            EditorAction::AddTab
                | EditorAction::AddDirection
                | EditorAction::DeleteNote
                | EditorAction::SortNotes
                | EditorAction::ClearAll
                | EditorAction::AdjustBeat(_)
                | EditorAction::StepBeat(_)
                | EditorAction::NextDirection
                | EditorAction::PrevDirection
                | EditorAction::ToggleKind
                | EditorAction::AdjustBpm(_)
                | EditorAction::AdjustSubdivisions(_)
                | EditorAction::AdjustPreDelay(_)
        )
    }

    /// Check if this action only changes the view
    pub fn is_view(&self) -> bool {
        matches!(
            self,
            EditorAction::ZoomIn
                | EditorAction::ZoomOut
                | EditorAction::Pan(_, _)
                | EditorAction::ResetView
                | EditorAction::FocusSelected
                | EditorAction::FlashPath
        )
    }

    /// Whether holding the key should keep firing the action
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            EditorAction::SeekBy(_)
                | EditorAction::AdjustBeat(_)
                | EditorAction::StepBeat(_)
                | EditorAction::AdjustBpm(_)
                | EditorAction::AdjustPreDelay(_)
                | EditorAction::ZoomIn
                | EditorAction::ZoomOut
                | EditorAction::Pan(_, _)
                | EditorAction::SelectPrev
                | EditorAction::SelectNext
        )
    }
}
