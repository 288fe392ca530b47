// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Beat-to-path engine.
//!
//! This module turns the timeline's direction notes into a polyline and
//! answers position queries against it:
//! - Path builder: direction notes → absolute node positions
//! - Position resolver: path beat → interpolated point
//! - Path cache: memoized builder output keyed on timeline revision

pub mod builder;
pub mod cache;
pub mod resolver;

pub use builder::{build_path, build_timeline_path, path_beat_notes, PathBeatNote, STEP_DISTANCE};
pub use cache::PathCache;
pub use resolver::{beat_markers, note_positions, resolve, NotePlacement, MAX_BEAT_MARKERS};

use std::ops::{Add, Mul, Sub};

use crate::chart::Direction;

/// 2D point in path space (Y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The path origin
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit-length copy. A zero vector divides by 1 and stays zero.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        let mag = if mag == 0.0 { 1.0 } else { mag };
        Point::new(self.x / mag, self.y / mag)
    }

    /// Linear interpolation towards `other`
    pub fn lerp(&self, other: Point, t: f64) -> Self {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).magnitude()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A vertex of the reconstructed path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    /// Absolute position in path space
    pub position: Point,
    /// Interpolation key
    pub path_beat: f64,
    /// Direction of the note that owns this node (the travel direction
    /// of the following segment)
    pub direction: Direction,
    /// Authoring index of the owning direction note
    pub note_index: usize,
}

impl PathNode {
    /// The origin node for the anchor
    pub fn origin(note_index: usize, direction: Direction) -> Self {
        Self {
            position: Point::ORIGIN,
            path_beat: 0.0,
            direction,
            note_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ops() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -2.0);
        assert_eq!(a + b, Point::new(4.0, 0.0));
        assert_eq!(b - a, Point::new(2.0, -4.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
    }

    #[test]
    fn test_normalized_zero() {
        assert_eq!(Point::ORIGIN.normalized(), Point::ORIGIN);
        let n = Point::new(3.0, 4.0).normalized();
        assert!((n.x - 0.6).abs() < 1e-12);
        assert!((n.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_lerp() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(8.0, -4.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(4.0, -2.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
