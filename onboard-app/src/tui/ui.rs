//! Screen rendering.

use onboard_core::relay::RelayState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, Screen};
use super::style::{emoji, severity_color};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn draw(f: &mut Frame, app: &App) {
    // Main layout: Title | Body | Status | Key Legend
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    // Title bar: product + screen + session badge.
    let (badge, badge_color) = match &app.signed_in_account {
        Some(account) => (account.clone(), Color::Green),
        None => ("SIGNED OUT".to_string(), Color::DarkGray),
    };
    let title_line = Line::from(vec![
        Span::styled(
            format!("{} onboard", emoji::BADGE),
            Style::default().fg(Color::White),
        ),
        Span::raw(" | "),
        Span::styled(app.screen.title(), Style::default().fg(Color::Cyan)),
        Span::raw(" | "),
        Span::styled(badge, Style::default().fg(badge_color)),
    ]);
    f.render_widget(Block::default().borders(Borders::ALL).title(title_line), chunks[0]);

    let body = Paragraph::new(body_lines(app))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(app.screen.title()));
    f.render_widget(body, chunks[1]);

    let status = Paragraph::new(Line::from(Span::styled(
        app.status_message.clone(),
        Style::default().fg(severity_color(app.status_severity)),
    )))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);

    let legend = Paragraph::new(key_legend(app))
        .block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(legend, chunks[3]);

    // Overlay above the screen, viewer above everything.
    app.overlay.render(f, &app.sink);
    if let Some(viewer) = &app.viewer {
        viewer.render(f, &app.sink);
    }
}

fn spinner_char(app: &App) -> char {
    SPINNER[(app.spinner_frame / 2) % SPINNER.len()]
}

pub fn body_lines(app: &App) -> Vec<Line<'static>> {
    match app.screen {
        Screen::SignIn => {
            let mut lines = vec![
                Line::from(""),
                Line::from("🛂"),
                Line::from(Span::styled(
                    "Welcome to onboard",
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Sign in with your organization account",
                    Style::default().fg(Color::Gray),
                )),
                Line::from(""),
            ];
            if app.signing_in {
                lines.push(Line::from(Span::styled(
                    format!("{} Signing in...", spinner_char(app)),
                    Style::default().fg(Color::Yellow),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "[ Enter ]  Sign in",
                    Style::default().fg(Color::Blue),
                )));
            }
            lines
        }
        Screen::Enrollment => {
            let (symbol, color) = if app.enroll_failed {
                ("✗".to_string(), Color::Red)
            } else if matches!(app.relay.state(), RelayState::Enrolled) {
                ("✓".to_string(), Color::Green)
            } else {
                (spinner_char(app).to_string(), Color::Yellow)
            };
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    symbol,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    app.enroll_headline.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    app.enroll_detail.clone(),
                    Style::default().fg(Color::Gray),
                )),
            ]
        }
    }
}

pub fn key_legend(app: &App) -> String {
    if app.viewer.is_some() {
        return "j/k scroll · PgUp/PgDn page · s export · Esc close".to_string();
    }
    let mut legend = match app.screen {
        Screen::SignIn => "Enter sign in · l logs · F2 console · q quit".to_string(),
        Screen::Enrollment => "r retry · l logs · b back · F2 console · q quit".to_string(),
    };
    if app.overlay.visible {
        legend.push_str(" · m/x/s console");
    }
    legend
}

/// Plain-text render of the current screen, for `--dump-tui`.
pub fn dump_screen(app: &App) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", app.screen.title()));
    for line in body_lines(app) {
        let text: String = line
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out.push_str(&format!("[keys] {}\n", key_legend(app)));
    out
}
