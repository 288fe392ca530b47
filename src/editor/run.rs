// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal event loop.
//!
//! Everything runs on one task. Two ~30 Hz timers drive playback and the
//! highlight animation; audio probes run on the blocking pool and report
//! back over a channel.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use super::Editor;
use crate::audio::spawn_probe;
use crate::ui::App;

/// Playback tick period
const PLAYBACK_INTERVAL: Duration = Duration::from_millis(33);
/// Highlight animation period
const ANIMATION_INTERVAL: Duration = Duration::from_millis(33);

/// Run the editor until it quits
pub async fn run(mut editor: Editor) -> Result<()> {
    let mut app = App::new()?;
    let (probe_tx, mut probe_rx) = mpsc::unbounded_channel();

    let mut playback = time::interval(PLAYBACK_INTERVAL);
    playback.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut animation = time::interval(ANIMATION_INTERVAL);
    animation.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Editor started");
    app.draw(&mut editor, Instant::now())?;

    while editor.is_running() {
        let mut dirty = false;

        tokio::select! {
            _ = playback.tick() => {
                let now = Instant::now();

                // Input is drained without blocking the tick
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) => {
                            editor.handle_key(key.code, key.modifiers, key.kind, now);
                            dirty = true;
                        }
                        Event::Mouse(mouse) => {
                            editor.handle_mouse(mouse, app.path_area());
                            dirty = true;
                        }
                        Event::Resize(_, _) => dirty = true,
                        _ => {}
                    }
                }

                if let Some(path) = editor.take_probe_request() {
                    spawn_probe(path, probe_tx.clone());
                }

                dirty |= editor.poll_watcher();
                dirty |= editor.tick(now).is_some();
                dirty |= editor.ui_mut().clear_expired_status();
            }
            _ = animation.tick(), if editor.highlights().is_active() => {
                dirty |= editor.animate();
            }
            Some(probe) = probe_rx.recv() => {
                editor.handle_probe(probe);
                dirty = true;
            }
        }

        if dirty {
            app.draw(&mut editor, Instant::now())?;
        }
    }

    info!("Editor stopped");
    Ok(())
}
