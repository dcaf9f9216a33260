//! cardgrid - A card layout manager for the terminal.
//!
//! This is the main binary that launches the TUI application.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use cardgrid_config::Config;
use cardgrid_config::persistence::{default_data_dir, log_file_path};
use cardgrid_protocol::deck::sample_deck;
use cardgrid_store::{FileStorage, LayoutStore, SyncHub};
use cardgrid_tui::{App, terminal};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CARDGRID_LOG";

/// Capacity of the in-process storage event channel.
const SYNC_CAPACITY: usize = 64;

/// Sends logs to a file, since the terminal belongs to the UI.
fn init_logging(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(dir))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&default_data_dir()?)?;

    let config = Config::load()?;
    let storage = FileStorage::with_path(config.resolved_storage_dir()?)?;
    // Other processes are noticed through the shared storage directory.
    let hub = SyncHub::new(SYNC_CAPACITY);
    let store = Arc::new(LayoutStore::new(Arc::new(storage)).with_sync(&hub));

    tracing::info!(deck = config.deck.name(), "Starting cardgrid");
    let mut app = App::new(&config, sample_deck(config.deck), store);

    // Install panic hook to restore terminal on panic
    terminal::install_panic_hook();
    let mut terminal = terminal::setup_terminal()?;

    let result = app.run(&mut terminal).await;

    // Always restore terminal, even if app.run() failed
    terminal::restore_terminal(&mut terminal)?;

    result
}
