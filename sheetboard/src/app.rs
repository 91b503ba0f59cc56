//! Application state and core logic for sheetboard.
//!
//! This module contains the `App` struct which holds the latest render-pass
//! snapshot, the sheet selection and table scroll state, and drives render
//! passes on a background worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use crate::board::render_pass;
use crate::config::BoardConfig;
use crate::error::SourceError;
use crate::models::{Board, DetailPanel, RefreshState};
use crate::source::SheetSource;

/// Rows moved by one PgUp/PgDn press
const PAGE_SIZE: usize = 10;

type PassOutcome = Result<Board, SourceError>;

/// Application state
pub struct App {
    pub config: Arc<BoardConfig>,
    source: Arc<dyn SheetSource>,
    runtime: Handle,
    pub source_label: String,
    // Latest successful pass, if any
    pub board: Option<Board>,
    // Page-level failure of the latest pass
    pub connection_error: Option<String>,
    pub refresh_state: RefreshState,
    // Sheet the next pass should select
    pub requested_sheet: Option<String>,
    // Set by the file watcher
    pub needs_refresh: Arc<AtomicBool>,
    pub last_refresh: Option<Instant>,
    // Scroll offset for the task table
    pub table_scroll_offset: usize,
    pub should_quit: bool,
    pass_tx: UnboundedSender<PassOutcome>,
    pass_rx: UnboundedReceiver<PassOutcome>,
}

impl App {
    pub fn new(config: BoardConfig, source: Arc<dyn SheetSource>, runtime: Handle) -> Self {
        let (pass_tx, pass_rx) = mpsc::unbounded_channel();
        let requested_sheet = config.initial_sheet.clone();
        let source_label = source.describe();

        Self {
            config: Arc::new(config),
            source,
            runtime,
            source_label,
            board: None,
            connection_error: None,
            refresh_state: RefreshState::Idle,
            requested_sheet,
            needs_refresh: Arc::new(AtomicBool::new(false)),
            last_refresh: None,
            table_scroll_offset: 0,
            should_quit: false,
            pass_tx,
            pass_rx,
        }
    }

    /// Ask for a new render pass. A request made while one is running is
    /// coalesced into a single follow-up pass.
    pub fn request_refresh(&mut self) {
        match self.refresh_state {
            RefreshState::Idle => self.spawn_pass(),
            RefreshState::Loading => self.refresh_state = RefreshState::Queued,
            RefreshState::Queued => {}
        }
    }

    fn spawn_pass(&mut self) {
        let source = Arc::clone(&self.source);
        let config = Arc::clone(&self.config);
        let requested = self.requested_sheet.clone();
        let tx = self.pass_tx.clone();

        self.refresh_state = RefreshState::Loading;
        self.runtime.spawn_blocking(move || {
            let outcome = render_pass(source.as_ref(), &config, requested.as_deref());
            // The receiver only goes away when the app shuts down
            let _ = tx.send(outcome);
        });
    }

    /// Apply finished passes; start the queued one if there is one
    pub fn poll_pass(&mut self) {
        while let Ok(outcome) = self.pass_rx.try_recv() {
            self.apply_outcome(outcome);
            self.refresh_state = match self.refresh_state {
                RefreshState::Queued => {
                    self.spawn_pass();
                    RefreshState::Loading
                }
                _ => RefreshState::Idle,
            };
        }
    }

    fn apply_outcome(&mut self, outcome: PassOutcome) {
        self.last_refresh = Some(Instant::now());
        match outcome {
            Ok(board) => {
                // Adopt the fallback only when the requested sheet is gone. A
                // sheet picked while this pass ran is still listed and stays
                // requested for the queued pass.
                let still_listed = self
                    .requested_sheet
                    .as_ref()
                    .is_some_and(|wanted| board.sheet_names.contains(wanted));
                if !still_listed && self.requested_sheet != board.selected {
                    self.requested_sheet = board.selected.clone();
                    self.table_scroll_offset = 0;
                }
                self.connection_error = None;
                self.board = Some(board);
            }
            Err(err) => {
                error!(error = %err, "render pass failed");
                self.connection_error = Some(err.to_string());
                self.board = None;
            }
        }
    }

    /// Periodic housekeeping: file changes and auto refresh
    pub fn tick(&mut self) {
        if self.needs_refresh.swap(false, Ordering::SeqCst) {
            info!("workbook changed on disk, refreshing");
            self.request_refresh();
        }

        if let (Some(interval), Some(last)) = (self.config.auto_refresh, self.last_refresh) {
            if !self.refresh_state.is_busy() && last.elapsed() >= interval {
                self.request_refresh();
            }
        }
    }

    /// Index of the highlighted sheet in the latest board
    pub fn selected_index(&self) -> Option<usize> {
        let board = self.board.as_ref()?;
        self.requested_sheet
            .as_deref()
            .and_then(|wanted| board.sheet_names.iter().position(|name| name == wanted))
            .or_else(|| board.selected_index())
    }

    /// Move the sheet selection by `delta`, wrapping around, and start a pass
    pub fn select_relative(&mut self, delta: isize) {
        let Some(board) = self.board.as_ref() else {
            return;
        };
        let count = board.sheet_names.len();
        if count == 0 {
            return;
        }
        let current = self.selected_index().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(count as isize) as usize;
        let name = board.sheet_names[next].clone();

        if self.requested_sheet.as_deref() != Some(name.as_str()) {
            self.requested_sheet = Some(name);
            self.table_scroll_offset = 0;
            self.request_refresh();
        }
    }

    /// Number of rows in the table of the current detail panel
    fn table_len(&self) -> usize {
        match self.board.as_ref().map(|b| &b.detail) {
            Some(DetailPanel::Ready(view)) => view.rows.len(),
            Some(DetailPanel::MissingStatusColumn { rows, .. }) => rows.len(),
            _ => 0,
        }
    }

    pub fn scroll_table(&mut self, delta: isize) {
        let max = self.table_len().saturating_sub(1);
        let next = self.table_scroll_offset as isize + delta;
        self.table_scroll_offset = next.clamp(0, max as isize) as usize;
    }

    /// Time since the last finished pass
    pub fn since_refresh(&self) -> Option<Duration> {
        self.last_refresh.map(|last| last.elapsed())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Down | KeyCode::Char('j') => self.select_relative(1),
            KeyCode::Up | KeyCode::Char('k') => self.select_relative(-1),
            KeyCode::PageDown => self.scroll_table(PAGE_SIZE as isize),
            KeyCode::PageUp => self.scroll_table(-(PAGE_SIZE as isize)),
            KeyCode::Home => self.table_scroll_offset = 0,
            _ => {}
        }
    }
}
