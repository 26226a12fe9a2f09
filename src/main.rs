//! Shiplog - a terminal logbook
//!
//! A terminal UI application for keeping dated journal entries, with an
//! exported HTML page and a background mirror that keeps the hosted copy
//! of the page available offline.

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use shiplog::app::{App, AppState};
use shiplog::cache::{AssetCache, CacheWorker, HttpFetcher};
use shiplog::cli::{Cli, StartupConfig};
use shiplog::clipboard::SystemClipboard;
use shiplog::install::LauncherInstaller;
use shiplog::journal::JournalStore;
use shiplog::mirror::{self, MirrorConfig, MirrorHandle};
use shiplog::ui;

/// Version tag naming the current cache bucket; bump on shell changes
const CACHE_VERSION_TAG: &str = "shiplog-v1";

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Initializes file-based logging in the data directory
///
/// A TUI owns the terminal, so logs go to `shiplog.log` instead of stdout.
/// Returns the appender guard that must stay alive for the process, or
/// `None` when no log location is available (the app runs unlogged).
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let project_dirs = directories::ProjectDirs::from("", "", "shiplog")?;
    let log_dir = project_dirs.data_dir();
    std::fs::create_dir_all(log_dir).ok()?;

    let appender = tracing_appender::rolling::never(log_dir, "shiplog.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_journal(frame, app);
    if app.state == AppState::ConfirmClear {
        ui::render_confirm_clear(frame);
    }
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let _log_guard = setup_logging();

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    let store = match &config.data_dir {
        Some(dir) => JournalStore::with_path(dir.join("entries.json")),
        None => JournalStore::new().ok_or("could not determine a data directory")?,
    };

    let mut app = App::new(
        store,
        Box::new(SystemClipboard::new()),
        LauncherInstaller::new(),
    );

    // Spawn the offline mirror unless disabled or no cache dir exists
    let mut mirror_handle = if config.mirror_enabled {
        AssetCache::new().map(|cache| {
            let worker = CacheWorker::new(
                config.origin.clone(),
                CACHE_VERSION_TAG,
                cache,
                Arc::new(HttpFetcher::new()),
            );
            MirrorHandle::spawn(MirrorConfig::default(), worker)
        })
    } else {
        None
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Drain background mirror progress
        if let Some(handle) = mirror_handle.as_mut() {
            while let Some(message) = mirror::try_recv(handle) {
                app.apply_mirror_message(message);
            }
        }

        app.tick();

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Some(handle) = mirror_handle.take() {
        handle.shutdown().await;
    }

    Ok(())
}
