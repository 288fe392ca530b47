// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chart data model.
//!
//! A chart is an ordered list of authored notes plus the timing parameters
//! used to place them in time. Direction notes steer the path, tab notes
//! sit on it.

pub mod timeline;

pub use timeline::{EditError, Timeline, MAX_BEAT};

use std::fmt;

use crate::path::Point;
use crate::timing::TimingParams;

/// Kind of an authored note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// Changes the travel direction of the path from this note onward
    Direction,
    /// Hit marker placed on the path
    Tab,
}

impl NoteKind {
    /// Tag used in exported chart files
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::Direction => "Direction",
            NoteKind::Tab => "Tab",
        }
    }

    /// Parse an exported tag. Anything that is not "Direction" is a tab,
    /// matching how charts have always been read back.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("direction") {
            NoteKind::Direction
        } else {
            NoteKind::Tab
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the eight compass directions, or none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Clockwise order used when cycling through directions
    pub const CYCLE: [Direction; 9] = [
        Direction::None,
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// Raw (unnormalized) vector in path space. Y grows downward.
    pub fn vector(&self) -> Point {
        let (x, y) = match self {
            Direction::None => (0.0, 0.0),
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
            Direction::UpLeft => (-1.0, -1.0),
            Direction::UpRight => (1.0, -1.0),
            Direction::DownLeft => (-1.0, 1.0),
            Direction::DownRight => (1.0, 1.0),
        };
        Point::new(x, y)
    }

    /// Unit vector for this direction; `None` stays the zero vector
    pub fn unit_vector(&self) -> Point {
        self.vector().normalized()
    }

    /// Tag used in chart files
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpLeft => "upleft",
            Direction::UpRight => "upright",
            Direction::DownLeft => "downleft",
            Direction::DownRight => "downright",
        }
    }

    /// Parse a direction tag. Separators and case are ignored and
    /// unrecognized tags fall back to `None`.
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            "upleft" => Direction::UpLeft,
            "upright" => Direction::UpRight,
            "downleft" => Direction::DownLeft,
            "downright" => Direction::DownRight,
            _ => Direction::None,
        }
    }

    /// Next direction clockwise
    pub fn next(&self) -> Self {
        let pos = Self::CYCLE.iter().position(|d| d == self).unwrap_or(0);
        Self::CYCLE[(pos + 1) % Self::CYCLE.len()]
    }

    /// Previous direction clockwise
    pub fn prev(&self) -> Self {
        let pos = Self::CYCLE.iter().position(|d| d == self).unwrap_or(0);
        Self::CYCLE[(pos + Self::CYCLE.len() - 1) % Self::CYCLE.len()]
    }

    /// Arrow glyph for list display
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::None => "·",
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
            Direction::UpLeft => "↖",
            Direction::UpRight => "↗",
            Direction::DownLeft => "↙",
            Direction::DownRight => "↘",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authored chart event
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Position in authoring order, maintained by the timeline
    index: usize,
    /// Note kind
    pub kind: NoteKind,
    /// Authoring beat (in subdivisions)
    pub beat: u32,
    /// Travel direction, only meaningful for direction notes
    pub direction: Direction,
}

impl Note {
    /// Create a new note. The index is assigned once it joins a timeline.
    pub fn new(kind: NoteKind, beat: u32, direction: Direction) -> Self {
        Self {
            index: 0,
            kind,
            beat,
            direction,
        }
    }

    /// Create a tab note
    pub fn tab(beat: u32) -> Self {
        Self::new(NoteKind::Tab, beat, Direction::None)
    }

    /// Create a direction note
    pub fn direction(beat: u32, direction: Direction) -> Self {
        Self::new(NoteKind::Direction, beat, direction)
    }

    /// The origin anchor: direction note at beat 0
    pub fn anchor() -> Self {
        Self::direction(0, Direction::None)
    }

    /// Position in authoring order
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Whether this note is the path origin anchor
    pub fn is_anchor(&self) -> bool {
        self.kind == NoteKind::Direction && self.beat == 0
    }

    /// Playback time (seconds) at which this note should be hit
    pub fn target_time(&self, timing: &TimingParams) -> f64 {
        timing.target_time(self)
    }

    /// Formatted target time for note lists, e.g. `"3.500s"`
    pub fn time_display(&self, timing: &TimingParams) -> String {
        format!("{:.3}s", self.target_time(timing))
    }
}
