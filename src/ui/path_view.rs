// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Path canvas widget.
//!
//! One canvas unit is one column horizontally and half a row vertically, so
//! the path keeps its proportions on a terminal. The canvas y axis points
//! up and path space points down; everything is flipped on the way in.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points},
        Block, Widget,
    },
};

use super::viewport::Viewport;
use crate::chart::NoteKind;
use crate::path::{NotePlacement, PathNode, Point};
use crate::playback::{Highlights, HIT_HIGHLIGHT_SECONDS};

/// Map a terminal cell inside `area` to viewport screen space
pub fn cell_to_screen(area: Rect, column: u16, row: u16) -> Point {
    let x = column.saturating_sub(area.x) as f64 - area.width as f64 / 2.0 + 0.5;
    let y = 2.0 * row.saturating_sub(area.y) as f64 + 1.0 - area.height as f64;
    Point::new(x, y)
}

/// Widget drawing the path, its beat markers, the notes and the cursor
pub struct PathView<'a> {
    nodes: &'a [PathNode],
    markers: &'a [Point],
    placements: &'a [NotePlacement],
    viewport: &'a Viewport,
    highlights: Option<&'a Highlights>,
    cursor: Option<Point>,
    selected: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> PathView<'a> {
    pub fn new(
        nodes: &'a [PathNode],
        markers: &'a [Point],
        placements: &'a [NotePlacement],
        viewport: &'a Viewport,
    ) -> Self {
        Self {
            nodes,
            markers,
            placements,
            viewport,
            highlights: None,
            cursor: None,
            selected: None,
            block: None,
        }
    }

    pub fn highlights(mut self, highlights: &'a Highlights) -> Self {
        self.highlights = Some(highlights);
        self
    }

    /// Show the playback cursor
    pub fn cursor(mut self, cursor: Option<Point>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn canvas_point(&self, world: Point) -> (f64, f64) {
        let screen = self.viewport.to_screen(world);
        (screen.x, -screen.y)
    }

    fn draw_path(&self, ctx: &mut Context<'_>) {
        let flashing = self.highlights.map(|h| h.path() > 0.0).unwrap_or(false);
        let color = if flashing { Color::Yellow } else { Color::DarkGray };

        for pair in self.nodes.windows(2) {
            let (x1, y1) = self.canvas_point(pair[0].position);
            let (x2, y2) = self.canvas_point(pair[1].position);
            ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
        }

        let markers: Vec<(f64, f64)> = self.markers.iter().map(|m| self.canvas_point(*m)).collect();
        ctx.draw(&Points {
            coords: &markers,
            color: Color::Gray,
        });
    }

    fn draw_highlight(&self, ctx: &mut Context<'_>) {
        let Some((index, remaining)) = self.highlights.and_then(|h| h.note()) else {
            return;
        };
        let Some(placement) = self.placements.iter().find(|p| p.index == index) else {
            return;
        };
        let (x, y) = self.canvas_point(placement.position);
        ctx.draw(&Circle {
            x,
            y,
            radius: 2.0 + 4.0 * (remaining / HIT_HIGHLIGHT_SECONDS).min(1.0),
            color: Color::Yellow,
        });
    }

    fn draw_notes(&self, ctx: &mut Context<'_>) {
        for placement in self.placements {
            let (x, y) = self.canvas_point(placement.position);
            let glyph = if placement.anchor {
                "◆"
            } else {
                match placement.kind {
                    NoteKind::Tab => "●",
                    NoteKind::Direction => placement.direction.arrow(),
                }
            };
            let mut style = match placement.kind {
                NoteKind::Tab => Style::default().fg(Color::Green),
                NoteKind::Direction => Style::default().fg(Color::Magenta),
            };
            if self.selected == Some(placement.index) {
                style = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            ctx.print(x, y, Span::styled(glyph, style));
        }
    }

    fn draw_cursor(&self, ctx: &mut Context<'_>) {
        if let Some(cursor) = self.cursor {
            let (x, y) = self.canvas_point(cursor);
            ctx.draw(&Circle {
                x,
                y,
                radius: 1.5,
                color: Color::Red,
            });
        }
    }
}

impl Widget for PathView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };
        if area.width == 0 || area.height == 0 {
            return;
        }

        let half_width = area.width as f64 / 2.0;
        let half_height = area.height as f64;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-half_width, half_width])
            .y_bounds([-half_height, half_height])
            .paint(|ctx| {
                self.draw_path(ctx);
                ctx.layer();
                self.draw_highlight(ctx);
                self.draw_cursor(ctx);
                ctx.layer();
                self.draw_notes(ctx);
            })
            .render(area, buf);
    }
}
