// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Path cache.
//!
//! Memoizes the builder output for one timeline revision. The playback
//! tick queries positions ~30 times a second; without the cache each query
//! would rebuild the whole path.

use std::sync::Arc;

use tracing::debug;

use crate::chart::Timeline;

use super::builder::build_timeline_path;
use super::{resolve, PathNode, Point};

/// Memoized path nodes
#[derive(Debug, Default)]
pub struct PathCache {
    /// (timeline id, revision) the nodes were built from
    key: Option<(u64, u64)>,
    nodes: Arc<[PathNode]>,
    rebuilds: u64,
}

impl PathCache {
    /// Create an empty (invalid) cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Node list for the timeline, rebuilt only if the timeline changed
    /// since the last call
    pub fn get(&mut self, timeline: &Timeline) -> Arc<[PathNode]> {
        let key = (timeline.id(), timeline.revision());
        if self.key != Some(key) {
            self.nodes = build_timeline_path(timeline).into();
            self.key = Some(key);
            self.rebuilds += 1;
            debug!(
                nodes = self.nodes.len(),
                revision = timeline.revision(),
                "Rebuilt path cache"
            );
        }
        Arc::clone(&self.nodes)
    }

    /// Resolve a path beat against the (possibly rebuilt) path
    pub fn resolve(&mut self, timeline: &Timeline, path_beat: f64) -> Option<Point> {
        let nodes = self.get(timeline);
        resolve(path_beat, &nodes)
    }

    /// Force the next `get` to rebuild
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Whether the cached nodes match the timeline's current state
    pub fn is_valid_for(&self, timeline: &Timeline) -> bool {
        self.key == Some((timeline.id(), timeline.revision()))
    }

    /// Number of rebuilds so far
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}
