// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Zoom and pan for the path view.
//!
//! Screen space is centred on the drawing area and, like path space, has y
//! growing downward. `screen = world * zoom + pan`.

use crate::path::{NotePlacement, Point};

/// Smallest allowed zoom
pub const MIN_ZOOM: f64 = 1.0;
/// Largest allowed zoom
pub const MAX_ZOOM: f64 = 200.0;
/// Zoom factor per zoom-in step
pub const ZOOM_IN_FACTOR: f64 = 1.1;
/// Zoom factor per zoom-out step
pub const ZOOM_OUT_FACTOR: f64 = 0.9;
/// Screen distance within which a click picks a note
pub const PICK_RADIUS: f64 = 10.0;

/// Clamp a zoom value to the allowed range
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return MIN_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// View transform for the path canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan: Point,
    initial_zoom: f64,
}

impl Viewport {
    pub fn new(zoom: f64) -> Self {
        let zoom = clamp_zoom(zoom);
        Self {
            zoom,
            pan: Point::ORIGIN,
            initial_zoom: zoom,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Map a path coordinate to screen space
    pub fn to_screen(&self, world: Point) -> Point {
        world * self.zoom + self.pan
    }

    /// Map a screen coordinate back to path space
    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.pan) * (1.0 / self.zoom)
    }

    /// Multiply the zoom by `factor`, keeping the world point under
    /// `anchor` fixed on screen
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        let world = self.to_world(anchor);
        self.zoom = clamp_zoom(self.zoom * factor);
        self.pan = anchor - world * self.zoom;
    }

    pub fn zoom_in(&mut self, anchor: Point) {
        self.zoom_at(ZOOM_IN_FACTOR, anchor);
    }

    pub fn zoom_out(&mut self, anchor: Point) {
        self.zoom_at(ZOOM_OUT_FACTOR, anchor);
    }

    /// Shift the view by a screen-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan = self.pan + Point::new(dx, dy);
    }

    /// Centre the view on a path coordinate
    pub fn center_on(&mut self, world: Point) {
        self.pan = Point::ORIGIN - world * self.zoom;
    }

    /// Back to the initial zoom with the origin centred
    pub fn reset(&mut self) {
        self.zoom = self.initial_zoom;
        self.pan = Point::ORIGIN;
    }

    /// Note nearest to a screen point, if one lies within [`PICK_RADIUS`]
    pub fn pick(&self, placements: &[NotePlacement], screen: Point) -> Option<usize> {
        placements
            .iter()
            .map(|p| (p.index, self.to_screen(p.position).distance(screen)))
            .filter(|(_, d)| *d <= PICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(MIN_ZOOM)
    }
}
