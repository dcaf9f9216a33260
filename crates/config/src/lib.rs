//! Configuration management for the cardgrid application.
//!
//! This crate handles loading, validating, and persisting configuration
//! from files and defaults.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`space`]: Crowding thresholds for the grid
//! - [`autosave`]: Autosave debounce configuration
//! - [`persistence`]: Config file reading and writing, data directory
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Local config (`./cardgrid.json5` or `./cardgrid.json`)
//! 2. User config (`~/.config/cardgrid/config.json5` or `~/.config/cardgrid/config.json`)
//! 3. Built-in defaults
//!
//! # File Format
//!
//! ```json5
//! {
//!   deck: "creator",
//!   space: { min_card_width: 280, min_card_height: 180, gap: 16 },
//!   autosave: { debounce_ms: 1000 },
//!   // Same shape as the autoCollapseSettings of a saved layout
//!   auto_collapse: { enabled: true, threshold: 6, collapsePercentage: 0.4 },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use cardgrid_config::Config;
//!
//! # fn example() -> cardgrid_config::Result<()> {
//! let config = Config::load()?;
//! println!("Autosave after {:?}", config.autosave.debounce());
//! println!("Layouts in {}", config.resolved_storage_dir()?.display());
//! # Ok(())
//! # }
//! ```

pub mod autosave;
pub mod config;
pub mod error;
pub mod persistence;
pub mod space;

// Re-export primary types at crate root for convenience
pub use autosave::AutosaveConfig;
pub use config::{Config, validate_auto_collapse};
pub use error::{ConfigError, Result};
pub use space::SpaceSettings;
