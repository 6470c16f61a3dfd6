//! Floating diagnostic overlay.
//!
//! A small always-available panel drawn over the active screen. Pure reader
//! of the sink: every frame is a full redraw from `snapshot()`. Position and
//! the minimized flag are transient UI state.

use onboard_core::diag::DiagSink;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::style::severity_color;

const PANEL_WIDTH: u16 = 46;
const PANEL_HEIGHT: u16 = 14;
const MINIMIZED_HEIGHT: u16 = 3;
const MAX_X_OFFSET: u16 = 200;
const MAX_Y_OFFSET: u16 = 100;

pub struct OverlayPanel {
    pub visible: bool,
    pub minimized: bool,
    x: u16,
    y: u16,
    /// Sink generation when the panel was minimized; newer content shows an
    /// unread marker in the collapsed title.
    seen_generation: u64,
}

impl OverlayPanel {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            minimized: false,
            x: 2,
            y: 4,
            seen_generation: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn toggle_minimized(&mut self, sink: &DiagSink) {
        self.minimized = !self.minimized;
        if self.minimized {
            self.seen_generation = sink.generation();
        }
    }

    /// Keyboard drag. Offsets are kept loose here and clamped to the real
    /// frame at render time, so the panel can never escape a small terminal.
    pub fn nudge(&mut self, dx: i16, dy: i16) {
        self.x = clamp_offset(self.x, dx, MAX_X_OFFSET);
        self.y = clamp_offset(self.y, dy, MAX_Y_OFFSET);
    }

    fn size(&self) -> (u16, u16) {
        if self.minimized {
            (PANEL_WIDTH, MINIMIZED_HEIGHT)
        } else {
            (PANEL_WIDTH, PANEL_HEIGHT)
        }
    }

    fn area(&self, frame: Rect) -> Rect {
        let (w, h) = self.size();
        let w = w.min(frame.width);
        let h = h.min(frame.height);
        let x = self.x.min(frame.width.saturating_sub(w));
        let y = self.y.min(frame.height.saturating_sub(h));
        Rect::new(frame.x + x, frame.y + y, w, h)
    }

    pub fn render(&self, f: &mut Frame, sink: &DiagSink) {
        if !self.visible {
            return;
        }
        let area = self.area(f.area());
        f.render_widget(Clear, area);

        let count = sink.len();
        let title = if self.minimized {
            let unread = if sink.generation() != self.seen_generation {
                " ●"
            } else {
                ""
            };
            format!("Diagnostics ({}){}", count, unread)
        } else {
            format!("Diagnostics ({})", count)
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.minimized {
            f.render_widget(block, area);
            return;
        }

        let inner_height = area.height.saturating_sub(3) as usize; // borders + hint row
        let snapshot = sink.snapshot();
        // Tail view: the newest entries are always in sight.
        let skip = snapshot.len().saturating_sub(inner_height);
        let mut lines: Vec<Line> = snapshot[skip..]
            .iter()
            .map(|entry| {
                Line::from(Span::styled(
                    entry.display_line(),
                    Style::default().fg(severity_color(entry.severity)),
                ))
            })
            .collect();
        lines.push(Line::from(Span::styled(
            "m min · x clear · s export · C-arrows move",
            Style::default().fg(Color::DarkGray),
        )));

        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn clamp_offset(current: u16, delta: i16, max: u16) -> u16 {
    let moved = current as i32 + delta as i32;
    moved.clamp(0, max as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_never_goes_negative_and_render_area_stays_inside_the_frame() {
        let mut panel = OverlayPanel::new(true);

        panel.nudge(-100, -100);
        assert_eq!((panel.x, panel.y), (0, 0));

        panel.nudge(500, 500);
        let frame = Rect::new(0, 0, 80, 24);
        let area = panel.area(frame);
        assert!(area.right() <= frame.right());
        assert!(area.bottom() <= frame.bottom());
    }

    #[test]
    fn minimizing_tracks_the_seen_generation() {
        let sink = DiagSink::new();
        sink.info("one");
        let mut panel = OverlayPanel::new(true);

        panel.toggle_minimized(&sink);
        assert!(panel.minimized);
        assert_eq!(panel.seen_generation, sink.generation());

        sink.info("two");
        assert_ne!(panel.seen_generation, sink.generation());
    }
}
