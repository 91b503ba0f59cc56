mod app;
mod board;
mod cli;
mod config;
mod error;
mod logging;
mod models;
mod source;
mod theme;
mod ui;
mod utils;
mod watcher;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::{info, warn};

use app::App;
use cli::{CliArgs, VERSION};
use config::BoardConfig;
use source::open_source;
use watcher::setup_workbook_watcher;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = BoardConfig::from_args(args)?;

    // Flushes the log file on exit
    let _log_guard = logging::init_logging(&config.log_dir)?;
    info!(version = VERSION, "sheetboard starting");

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let source = open_source(&config.source)?;
    info!(source = %source.describe(), "workbook source ready");

    let mut app = App::new(config, source.clone(), runtime.handle().clone());

    // Keep the watcher alive for the whole session
    let _watcher = source.watch_path().and_then(|path| {
        let watcher = setup_workbook_watcher(path.to_path_buf(), app.needs_refresh.clone());
        if watcher.is_none() {
            warn!(path = %path.display(), "live reload unavailable");
        }
        watcher
    });

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run the app
    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    // A pass may still be waiting on the network
    runtime.shutdown_background();
    info!("sheetboard exiting");
    result.map_err(Into::into)
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    app.request_refresh();

    while !app.should_quit {
        app.poll_pass();
        app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}
