//! A 3D card stack for browsing notes in the terminal.
//!
//! Run with a JSON notes file, or without arguments to browse a few sample
//! notes.  Run with `--write-config` to create the config file.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Frame, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    frame_runtime, handler,
    state::{ActiveView, AppState},
};
use crate::core::filter::{NoteFilter, TagMode};
use crate::core::note::{self, Note};
use crate::core::scroll::ScrollViewport;
use crate::core::simulator::InputProfile;
use crate::ui::{detail::DetailPopup, layout::AppLayout, stack_widget::StackWidget, theme::Theme};

/// Longest frame delta fed to the engine; longer gaps (suspend, a stalled
/// terminal) are treated as one slow frame.
const MAX_FRAME_DT: Duration = Duration::from_millis(100);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Browse notes as a 3D card stack")]
struct Cli {
    /// JSON array of notes (`id`, `content`, `createdAt`, optional `analysis`).
    /// Sample notes are shown when omitted.
    notes: Option<PathBuf>,

    /// Use the touch input profile (gentler motion).
    #[arg(long)]
    touch: bool,

    /// Only show notes carrying this tag (repeatable; any tag matches).
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Require every `--tag` instead of any one of them.
    #[arg(long, requires = "tags")]
    all_tags: bool,

    /// Hide notes created before this day (YYYY-MM-DD, local time).
    #[arg(long, value_name = "DATE")]
    since: Option<NaiveDate>,

    /// Hide notes created after this day (YYYY-MM-DD, local time).
    #[arg(long, value_name = "DATE")]
    until: Option<NaiveDate>,

    /// Start in export view on this note id.  The filter is ignored there.
    #[arg(long, value_name = "ID")]
    export: Option<String>,

    /// Write tracing output to this file.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Write the config file (defaults merged with existing settings) and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

// ───────────────────────────────────────── setup ────────────

fn init_tracing(log: Option<&Path>) -> Result<()> {
    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notestack=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        // Only when asked for: stderr is also the UI's terminal.
        None if std::env::var_os("RUST_LOG").is_some() => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn load_notes(path: Option<&Path>) -> Result<Vec<Note>> {
    match path {
        Some(path) => note::load_notes(path)
            .with_context(|| format!("loading notes from {}", path.display())),
        None => Ok(note::sample_notes(chrono::Utc::now().timestamp_millis())),
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    let mut config = config::AppConfig::load();
    if cli.write_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }
    if cli.touch {
        config.input_profile = InputProfile::Touch;
    }

    let notes = load_notes(cli.notes.as_deref())?;
    tracing::info!(count = notes.len(), profile = config.input_profile.label(), "starting");

    let mut state = AppState::new(notes, config);
    state.set_filter(NoteFilter {
        tags: cli.tags,
        tag_mode: if cli.all_tags { TagMode::All } else { TagMode::Any },
        since: cli.since,
        until: cli.until,
    });
    if let Some(id) = cli.export {
        state.export_id = Some(id);
        handler::toggle_export(&mut state);
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let (bells, haptics) = state.feedback.counts();
    tracing::debug!(bells, haptics, "exiting");
    result
}

// ───────────────────────────────────────── event loop ───────

async fn run(terminal: &mut Terminal<CrosstermBackend<Stderr>>, state: &mut AppState) -> Result<()> {
    let frame_interval = Duration::from_millis(state.config.frame_ms);
    let mut events = spawn_event_reader(frame_interval);
    let mut last_frame = Instant::now();
    let mut bell = stderr();

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        dispatch(state, event, Instant::now());
        // Drain everything already queued before the next frame.
        while let Ok(event) = events.try_recv() {
            dispatch(state, event, Instant::now());
        }
        if state.should_quit {
            break;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_frame);
        if elapsed >= frame_interval {
            last_frame = now;
            frame_runtime::advance_frame(state, elapsed.min(MAX_FRAME_DT), now, &mut bell);
        }
    }
    Ok(())
}

fn dispatch(state: &mut AppState, event: AppEvent, now: Instant) {
    match event {
        AppEvent::Key(k) => handler::handle_key(state, k, now),
        AppEvent::Mouse(m) => handler::handle_mouse(state, m, now),
        // The next draw picks up the new size.
        AppEvent::Resize(_, _) | AppEvent::Tick => {}
    }
}

fn draw(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.terminal_area = area;
    let layout = AppLayout::from_area(area);
    frame_runtime::sync_layout(state, layout.stack_area);

    state.hit_zones = StackWidget::new(
        &state.engine,
        state.viewport.scroll_top(),
        state.config.px_per_row,
    )
    .render_and_hit(layout.stack_area, frame.buffer_mut());

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Stack => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::Detail => "",
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    if let (ActiveView::Detail, Some(note)) = (state.active_view, &state.detail) {
        frame.render_widget(DetailPopup { note }, area);
    }
}
