// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration and persistence for WLCHART.
//!
//! This module provides:
//! - Editor settings (TOML)
//! - Chart export/import (JSON)
//! - The autosave session (YAML)
//! - A file watcher for chart hot reload

pub mod chart_file;
pub mod session;
pub mod watcher;

pub use chart_file::{
    load_chart, parse_chart, platform_delay_offset_ms, save_chart, ChartDocument, ChartMetadata,
    ExportedNote, ImportedChart, MAC_DELAY_OFFSET_MS,
};
pub use session::{SessionFile, SessionNote};
pub use watcher::{ChartEvent, ChartWatcher};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::timing::{TimingParams, DEFAULT_BPM, DEFAULT_PRE_DELAY_MS, DEFAULT_SUBDIVISIONS};

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "wlchart";

/// Editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Tempo for new charts
    pub bpm: f64,
    /// Grid subdivisions for new charts
    pub subdivisions: u32,
    /// Pre-delay for new charts (milliseconds)
    pub pre_delay_ms: u32,
    /// Initial path zoom
    pub zoom: f64,
    /// Music volume (0-100)
    pub music_volume: u8,
    /// Tap sound volume (0-100)
    pub sfx_volume: u8,
    /// Save the session after every edit
    pub autosave: bool,
    /// Reload the open chart when it changes on disk
    pub watch_chart: bool,
    /// Hot reload debounce (milliseconds)
    pub reload_debounce_ms: u64,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Log file used while the terminal UI is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            subdivisions: DEFAULT_SUBDIVISIONS,
            pre_delay_ms: DEFAULT_PRE_DELAY_MS,
            zoom: 1.0,
            music_volume: 50,
            sfx_volume: 50,
            autosave: true,
            watch_chart: true,
            reload_debounce_ms: 300,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl EditorConfig {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml(&contents)
    }

    /// Load settings, falling back to defaults when the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Save settings to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = self.to_toml()?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        fs::write(path.as_ref(), text)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Default settings location: `<config dir>/wlchart/wlchart.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("wlchart.toml"))
    }

    /// Timing parameters for new charts. Invalid values fall back to the
    /// built-in defaults.
    pub fn timing(&self) -> TimingParams {
        match TimingParams::new(self.bpm, self.subdivisions, self.pre_delay_ms) {
            Ok(timing) => timing,
            Err(e) => {
                warn!("Config timing rejected ({}), using defaults", e);
                TimingParams::default()
            }
        }
    }

    /// Zoom clamped to the viewport range
    pub fn initial_zoom(&self) -> f64 {
        crate::ui::viewport::clamp_zoom(self.zoom)
    }

    /// Log file location: configured path, else `<data dir>/wlchart/wlchart.log`
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("wlchart.log")
        })
    }
}

/// `<data dir>/wlchart`, if the platform has one
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}
