// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note list widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::chart::{Note, NoteKind};
use crate::timing::TimingParams;

/// Widget listing every note with its beat, direction and target time
pub struct NoteListWidget<'a> {
    notes: &'a [Note],
    timing: &'a TimingParams,
    selected: Option<usize>,
    highlighted: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> NoteListWidget<'a> {
    /// Create a new note list widget
    pub fn new(notes: &'a [Note], timing: &'a TimingParams) -> Self {
        Self {
            notes,
            timing,
            selected: None,
            highlighted: None,
            block: None,
        }
    }

    /// Set selected note index
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the note currently flashing
    pub fn highlighted(mut self, index: Option<usize>) -> Self {
        self.highlighted = index;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

/// First row to show so that `selected` stays inside a window of `height`
/// rows
pub fn scroll_offset(selected: Option<usize>, len: usize, height: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    let selected = selected.unwrap_or(0).min(len - 1);
    (selected + 1).saturating_sub(height).min(len - height)
}

impl Widget for NoteListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.notes.is_empty() {
            Paragraph::new("No notes")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let header = Line::from(Span::styled(
            "  #  Kind       Beat  Dir  Time",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        ));

        let rows = area.height.saturating_sub(1) as usize;
        let first = scroll_offset(self.selected, self.notes.len(), rows);

        let mut lines = vec![header];
        for note in self.notes.iter().skip(first).take(rows) {
            let index = note.index();
            let selected = self.selected == Some(index);

            let mut style = match note.kind {
                NoteKind::Tab => Style::default().fg(Color::Green),
                NoteKind::Direction => Style::default().fg(Color::Magenta),
            };
            if note.is_anchor() {
                style = style.add_modifier(Modifier::DIM);
            }
            if self.highlighted == Some(index) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            if selected {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let arrow = match note.kind {
                NoteKind::Direction => note.direction.arrow(),
                NoteKind::Tab => " ",
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "{}{:>3}  {:<9} {:>5}  {:<3}  {}",
                    if selected { ">" } else { " " },
                    index,
                    note.kind.as_str(),
                    note.beat,
                    arrow,
                    note.time_display(self.timing),
                ),
                style,
            )));
        }

        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Direction, Timeline};

    #[test]
    fn test_scroll_offset() {
        assert_eq!(scroll_offset(None, 5, 10), 0);
        assert_eq!(scroll_offset(Some(3), 20, 5), 0);
        assert_eq!(scroll_offset(Some(4), 20, 5), 0);
        assert_eq!(scroll_offset(Some(5), 20, 5), 1);
        assert_eq!(scroll_offset(Some(19), 20, 5), 15);
        assert_eq!(scroll_offset(Some(99), 20, 5), 15);
        assert_eq!(scroll_offset(Some(3), 20, 0), 0);
    }

    #[test]
    fn test_render_lists_notes() {
        let timeline = Timeline::from_notes(
            vec![Note::direction(0, Direction::Right), Note::tab(16)],
            TimingParams::new(120.0, 16, 0).unwrap(),
        );
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        NoteListWidget::new(timeline.notes(), timeline.timing())
            .selected(Some(1))
            .render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Tab"));
        assert!(text.contains("0.500s"));
    }
}
