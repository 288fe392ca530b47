// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for WLCHART.
//!
//! Provides a ratatui-based terminal interface with a transport bar, the
//! path canvas, the note list, a status line and a `:` command prompt.

pub mod notes;
pub mod path_view;
pub mod transport;
pub mod viewport;

pub use notes::NoteListWidget;
pub use path_view::PathView;
pub use transport::TransportWidget;
pub use viewport::Viewport;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::control::{format_shortcut, KeyboardController};
use crate::editor::{Editor, Scene};
use crate::timing::ClockState;

/// How long a status message stays up
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Help categories, left column then right column
const HELP_COLUMNS: [&[&str]; 2] = [&["Transport", "Notes", "Navigation"], &["Timing", "View", "UI"]];

/// UI-only state owned by the editor
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
    /// Command prompt text while the prompt is open
    pub prompt: Option<String>,
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message. Returns whether one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match self.status_time {
            Some(time) if time.elapsed() > STATUS_TIMEOUT => {
                self.status_message = None;
                self.status_time = None;
                true
            }
            _ => false,
        }
    }

    /// Open an empty command prompt
    pub fn open_prompt(&mut self) {
        self.prompt = Some(String::new());
    }

    /// Close the prompt, returning what was typed
    pub fn close_prompt(&mut self) -> Option<String> {
        self.prompt.take()
    }

    pub fn prompt_push(&mut self, c: char) {
        if let Some(ref mut prompt) = self.prompt {
            prompt.push(c);
        }
    }

    /// Delete the last character; an empty prompt closes
    pub fn prompt_backspace(&mut self) {
        match self.prompt {
            Some(ref mut prompt) if !prompt.is_empty() => {
                prompt.pop();
            }
            Some(_) => self.prompt = None,
            None => {}
        }
    }
}

/// Transport state for UI display
#[derive(Debug, Clone)]
pub struct TransportState {
    /// Clock state
    pub clock: ClockState,
    /// Elapsed playback seconds
    pub elapsed: f64,
    /// Audio duration plus pre-delay, when audio is loaded
    pub total: Option<f64>,
    /// Beat under the playhead
    pub current_beat: i64,
    pub bpm: f64,
    pub subdivisions: u32,
    pub pre_delay_ms: u32,
    /// Loaded audio file name
    pub audio: Option<String>,
}

impl Default for TransportState {
    fn default() -> Self {
        Self {
            clock: ClockState::Stopped,
            elapsed: 0.0,
            total: None,
            current_beat: 0,
            bpm: 120.0,
            subdivisions: 16,
            pre_delay_ms: 0,
            audio: None,
        }
    }
}

/// Terminal UI application
pub struct App {
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Inner area of the path canvas on the last frame, for mouse mapping
    path_area: Rect,
}

impl App {
    /// Take over the terminal
    pub fn new() -> io::Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            path_area: Rect::default(),
        })
    }

    /// Path canvas area from the last draw
    pub fn path_area(&self) -> Rect {
        self.path_area
    }

    /// Draw the UI
    pub fn draw(&mut self, editor: &mut Editor, now: Instant) -> io::Result<()> {
        let scene = editor.scene();
        let transport = editor.transport_state(now);
        let editor: &Editor = editor;
        let mut path_area = self.path_area;

        self.terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: transport, content, status
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Transport
                    Constraint::Min(8),    // Path + notes
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            frame.render_widget(
                TransportWidget::new(&transport)
                    .block(Block::default().borders(Borders::ALL).title(" Transport ")),
                chunks[0],
            );

            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(30), Constraint::Length(40)])
                .split(chunks[1]);

            path_area = render_path(frame, content[0], editor, &scene);
            render_notes(frame, content[1], editor);
            render_status_bar(frame, chunks[2], editor);

            // Help overlay
            if editor.ui().show_help {
                render_help_overlay(frame, area, editor.keyboard());
            }
        })?;

        self.path_area = path_area;
        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render the path canvas, returning its inner area
fn render_path(frame: &mut Frame, area: Rect, editor: &Editor, scene: &Scene) -> Rect {
    let title = match editor.chart_path() {
        Some(path) => format!(" {} ", path.display()),
        None => " Path ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(format!(" zoom {:.1}x ", editor.viewport().zoom()));
    let inner = block.inner(area);

    let view = PathView::new(&scene.nodes, &scene.markers, &scene.placements, editor.viewport())
        .highlights(editor.highlights())
        .cursor(editor.cursor())
        .selected(editor.selected())
        .block(block);
    frame.render_widget(view, area);
    inner
}

/// Render the note list
fn render_notes(frame: &mut Frame, area: Rect, editor: &Editor) {
    let timeline = editor.timeline();
    let title = format!(" Notes ({}) ", timeline.len());
    let widget = NoteListWidget::new(timeline.notes(), timeline.timing())
        .selected(editor.selected())
        .highlighted(editor.highlights().note().map(|(index, _)| index))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

/// Render status bar or the open prompt
fn render_status_bar(frame: &mut Frame, area: Rect, editor: &Editor) {
    let ui = editor.ui();
    let text = if let Some(ref prompt) = ui.prompt {
        Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(prompt.as_str(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ])
    } else if let Some(ref msg) = ui.status_message {
        Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Yellow)))
    } else {
        Line::from(Span::styled(
            " Space: Play/Pause | Esc: Stop | t/d: Add Note | : Command | ?: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Help lines for a column of categories
pub fn help_lines(keyboard: &KeyboardController, categories: &[&str]) -> Vec<Line<'static>> {
    let grouped = keyboard.bindings_by_category();
    let mut lines = Vec::new();

    for category in categories {
        let Some(bindings) = grouped.get(*category) else {
            continue;
        };
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            category.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for binding in bindings {
            lines.push(Line::from(format!(
                "  {:<12}{}",
                format_shortcut(&binding.shortcut),
                binding.description
            )));
        }
    }
    lines
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect, keyboard: &KeyboardController) {
    let columns: Vec<Vec<Line>> = HELP_COLUMNS
        .iter()
        .map(|categories| help_lines(keyboard, categories))
        .collect();
    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0) as u16;

    // Calculate centered area
    let width = 84.min(area.width.saturating_sub(4));
    let height = (rows + 2).min(area.height.saturating_sub(2));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    // Clear background
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Black)),
        help_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    for (lines, half) in columns.into_iter().zip(halves.iter()) {
        frame.render_widget(Paragraph::new(lines), *half);
    }
}
