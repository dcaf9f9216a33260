//! Terminal host for the cardgrid layout engine.
//!
//! This crate renders a deck of cards as a responsive grid with Ratatui and
//! drives the layout components from keyboard and mouse input.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`app`]: Main application struct and run loop
//! - [`state`]: Card collection, focus, and toasts; the layout host
//! - [`layout`]: Mapping between terminal cells and layout pixels
//! - [`import_prompt`]: The path field of the import dialog
//! - [`terminal`]: Terminal setup, teardown, panic handling, and the bell
//! - [`event`]: Event handling and key mappings
//! - [`widgets`]: Rendering functions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cardgrid_config::Config;
//! use cardgrid_protocol::deck::sample_deck;
//! use cardgrid_store::{FileStorage, LayoutStore};
//! use cardgrid_tui::{App, terminal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = Arc::new(LayoutStore::new(Arc::new(FileStorage::new()?)));
//!     let mut app = App::new(&config, sample_deck(config.deck), store);
//!
//!     terminal::install_panic_hook();
//!     let mut terminal = terminal::setup_terminal()?;
//!     let result = app.run(&mut terminal).await;
//!
//!     terminal::restore_terminal(&mut terminal)?;
//!     result
//! }
//! ```

pub mod app;
pub mod event;
pub mod import_prompt;
pub mod layout;
pub mod state;
pub mod terminal;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use app::App;
pub use state::{AppState, Toast};
