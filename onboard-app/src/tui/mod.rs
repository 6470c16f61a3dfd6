//! TUI module: terminal lifecycle and the main loop.
//!
//! Sign-in and enrollment screens with a floating diagnostic console.
//! Worker threads deliver SDK results over channels; the loop folds them
//! into app state on every 100 ms tick.

pub mod app;
pub mod overlay;
pub mod style;
mod ui;
pub mod viewer;

use std::io;
use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::cli::Cli;

pub fn ensure_interactive_terminal() -> Result<()> {
    if io::stdout().is_terminal() {
        return Ok(());
    }

    anyhow::bail!(
        "No TTY detected. The TUI requires an interactive terminal.\n\
         Try running directly in a terminal (not piped or via script)."
    );
}

/// Run the interactive TUI.
pub fn run(cli: &Cli) -> Result<()> {
    ensure_interactive_terminal()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = app::App::from_cli(cli);

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut app::App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }
                if let app::InputResult::Quit = app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        app.tick(Instant::now());
    }
}

/// Print every screen's render text to stdout (`--dump-tui`).
pub fn dump_all_screens(cli: &Cli) -> Result<()> {
    let mut app = app::App::from_cli(cli);
    for screen in [app::Screen::SignIn, app::Screen::Enrollment] {
        app.screen = screen;
        println!("{}", ui::dump_screen(&app));
    }
    Ok(())
}
