//! Modal full-screen log viewer.
//!
//! Opened on demand from any screen; read-only (no clear here) with line and
//! page scrolling, export, and explicit dismiss.

use crossterm::event::{KeyCode, KeyEvent};
use onboard_core::diag::DiagSink;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::style::severity_color;

const PAGE: usize = 10;

/// What the owner should do after a key was handled.
pub enum ViewerAction {
    None,
    Close,
    Export,
}

pub struct LogViewer {
    scroll: usize,
}

impl LogViewer {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent, entry_count: usize) -> ViewerAction {
        let max = entry_count.saturating_sub(1);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => ViewerAction::Close,
            KeyCode::Char('s') => ViewerAction::Export,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                ViewerAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(max);
                ViewerAction::None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE);
                ViewerAction::None
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + PAGE).min(max);
                ViewerAction::None
            }
            KeyCode::Home => {
                self.scroll = 0;
                ViewerAction::None
            }
            KeyCode::End => {
                self.scroll = max;
                ViewerAction::None
            }
            _ => ViewerAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame, sink: &DiagSink) {
        let area = f.area();
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
            .split(area);

        let snapshot = sink.snapshot();
        let lines: Vec<Line> = snapshot
            .iter()
            .map(|entry| {
                Line::from(Span::styled(
                    entry.display_line(),
                    Style::default().fg(severity_color(entry.severity)),
                ))
            })
            .collect();
        let body = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Logs"))
            .scroll((self.scroll as u16, 0));
        f.render_widget(body, chunks[0]);

        let footer = Paragraph::new(Line::from(Span::styled(
            format!(
                "{} entries · j/k scroll · PgUp/PgDn page · s export · Esc close",
                snapshot.len()
            ),
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, chunks[1]);
    }
}

impl Default for LogViewer {
    fn default() -> Self {
        Self::new()
    }
}
