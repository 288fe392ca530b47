// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transport display widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Paragraph, Widget},
};

use super::TransportState;
use crate::timing::{format_clock, ClockState};

/// Transport widget for displaying playback state
pub struct TransportWidget<'a> {
    state: &'a TransportState,
    block: Option<Block<'a>>,
}

impl<'a> TransportWidget<'a> {
    /// Create a new transport widget
    pub fn new(state: &'a TransportState) -> Self {
        Self { state, block: None }
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// `elapsed / total`, with dashes while the audio length is unknown
pub fn position_text(elapsed: f64, total: Option<f64>) -> String {
    let total = total
        .map(format_clock)
        .unwrap_or_else(|| "--:--:--".to_string());
    format!("{} / {}", format_clock(elapsed), total)
}

impl Widget for TransportWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        // Layout for transport elements
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(10), // Play/Pause/Stop indicator
                Constraint::Length(2),  // Spacer
                Constraint::Length(19), // Elapsed / total
                Constraint::Length(2),  // Spacer
                Constraint::Length(12), // Current beat
                Constraint::Length(2),  // Spacer
                Constraint::Length(28), // Timing
                Constraint::Min(0),     // Audio
            ])
            .split(area);

        let (indicator, style) = match self.state.clock {
            ClockState::Running => (
                "▶ PLAY",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            ClockState::Paused => (
                "❚❚ PAUSE",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            ClockState::Stopped => ("■ STOP", Style::default().fg(Color::Yellow)),
        };
        Paragraph::new(indicator).style(style).render(chunks[0], buf);

        Paragraph::new(position_text(self.state.elapsed, self.state.total))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .render(chunks[2], buf);

        Paragraph::new(format!("beat {}", self.state.current_beat))
            .style(Style::default().fg(Color::White))
            .render(chunks[4], buf);

        let timing = format!(
            "{:.1} BPM  1/{}  {}ms",
            self.state.bpm, self.state.subdivisions, self.state.pre_delay_ms
        );
        Paragraph::new(timing)
            .style(Style::default().fg(Color::Magenta))
            .render(chunks[6], buf);

        let audio = self.state.audio.as_deref().unwrap_or("no audio");
        Paragraph::new(audio)
            .style(Style::default().fg(Color::DarkGray))
            .render(chunks[7], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_text() {
        assert_eq!(position_text(0.0, None), "00:00:00 / --:--:--");
        assert_eq!(position_text(65.5, Some(125.25)), "01:05:50 / 02:05:25");
    }

    #[test]
    fn test_render_states() {
        let mut state = TransportState::default();
        let area = Rect::new(0, 0, 100, 1);

        let mut buf = Buffer::empty(area);
        TransportWidget::new(&state).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("STOP"));
        assert!(text.contains("no audio"));

        state.clock = ClockState::Running;
        state.audio = Some("song.wav".to_string());
        let mut buf = Buffer::empty(area);
        TransportWidget::new(&state).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("PLAY"));
        assert!(text.contains("song.wav"));
    }
}
