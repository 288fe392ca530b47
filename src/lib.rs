// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! WLCHART - rhythm chart editor.
//!
//! Notes are authored on a beat grid. Direction notes steer a path that
//! starts at the origin; tab notes are hit markers placed along it. The
//! library turns a timeline of notes into path geometry, answers "where
//! is beat N" by interpolation, and drives playback against it.

pub mod audio;
pub mod chart;
pub mod config;
pub mod control;
pub mod editor;
pub mod path;
pub mod playback;
pub mod timing;
pub mod ui;
