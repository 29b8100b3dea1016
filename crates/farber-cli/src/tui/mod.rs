//! Farber TUI
//!
//! Terminal front end for the panel.
//!
//! ## Layout
//!
//! - Left: sidebar with one entry per section
//! - Right: the current section (header cards, filters, form, table)
//! - Top-right: toast notifications
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - Tab / Shift+Tab: Cycle through panes
//! - 1-7: Jump to a section
//! - Enter: Open section / edit field / next filter option
//! - h/l or ←/→: Change a select filter
//! - s / r: Save / clear the form
//! - Table rows: the key shown next to each action
//! - ?: Help
//! - q: Quit

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use farber_core::{build_router, Config, FileNamespace, KeyValueStore};

use app::{ActivePane, App, InputMode};

/// Redraw and input polling interval
const TICK: Duration = Duration::from_millis(50);

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if FARBER_LOG is set)
    init_tui_logging(&config);

    let namespace: Rc<dyn KeyValueStore> = Rc::new(FileNamespace::new(&config.data_dir));
    let mut app = App::new(build_router(namespace, &config.default_section))?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::time::sleep(TICK).await;

        // Drain pending terminal events (non-blocking)
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key dismisses the splash
    if app.is_loading() {
        app.dismiss_loader();
        return;
    }

    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.accept_confirm(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
            _ => {}
        }
        return;
    }

    match app.input_mode {
        InputMode::Editing => handle_editing_mode(app, key.code),
        InputMode::Normal => handle_normal_mode(app, key.code),
    }
}

fn handle_editing_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter | KeyCode::Esc => app.stop_editing(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab => app.next_pane(),
        KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Enter => app.activate(),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            app.open_section_number(c.to_digit(10).unwrap_or(0) as usize);
        }
        code => handle_pane_key(app, code),
    }
}

/// Keys whose meaning depends on the focused pane
fn handle_pane_key(app: &mut App, code: KeyCode) {
    match (app.active_pane, code) {
        (ActivePane::Controls, KeyCode::Char('l') | KeyCode::Right) => app.cycle_option(true),
        (ActivePane::Controls, KeyCode::Char('h') | KeyCode::Left) => app.cycle_option(false),
        (ActivePane::Form, KeyCode::Char(' ')) => app.toggle_checkbox(),
        (ActivePane::Form, KeyCode::Char('s')) => app.submit_form(),
        (ActivePane::Form, KeyCode::Char('r')) => app.reset_form(),
        (ActivePane::Table, KeyCode::Char(c)) => {
            app.row_action(c);
        }
        _ => {}
    }
}

/// Initialize file-based logging for TUI mode
///
/// Only logs if FARBER_LOG environment variable is set (e.g., FARBER_LOG=debug).
/// Logs go to `log_file` from the config, or `<data_dir>/debug.log`.
fn init_tui_logging(config: &Config) {
    // Only log if FARBER_LOG is set
    let Ok(log_level) = std::env::var("FARBER_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "farber_core={},farber_cli={}",
        log_level, log_level
    ));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
