mod app;
mod config;
mod error;
mod timer;
mod ui;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{fs, io, path::{Path, PathBuf}, sync::Mutex, time::{Duration, Instant}};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::{Config, ThemeName};
use crate::error::Result;

/// Upper bound on how long the loop sleeps, so the clock in the status line stays fresh.
const IDLE_POLL: Duration = Duration::from_millis(250);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "🍅 tomatick - a terminal Pomodoro timer")]
struct Args {
    /// Work phase length in minutes
    #[arg(short, long, value_name = "MIN")]
    work: Option<u32>,
    /// Break phase length in minutes
    #[arg(short = 'b', long = "break", value_name = "MIN")]
    break_minutes: Option<u32>,
    #[arg(short, long, value_enum)]
    theme: Option<ThemeName>,
    /// JSON file with work_minutes, break_minutes and theme
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write logs here; filter with RUST_LOG
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_overrides(args.work, args.break_minutes, args.theme);

    let mut app = App::new(&config)?;
    tracing::info!(?config, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tracing::info!(sessions = app.timer().completed_sessions(), "exiting");
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let timeout = app
            .next_wakeup(Instant::now())
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key, Instant::now()) {
                    return Ok(());
                }
            }
        }

        app.on_tick(Instant::now());
    }
}
