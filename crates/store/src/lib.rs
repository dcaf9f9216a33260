//! Layout persistence for the cardgrid application.
//!
//! This crate stores the card layout under a single key, debounces writes
//! while the user is still arranging cards, moves layouts in and out of JSON
//! files, and keeps several contexts sharing one storage in step.
//!
//! # Overview
//!
//! - [`storage`]: the `Storage` trait with file and in-memory backends
//! - [`store`]: save, load, reset, export, and import of layouts
//! - [`autosave`]: the debounced autosaver
//! - [`sync`]: cross-context change notifications
//! - [`error`]: error types for storage and layout operations
//!
//! Failures never reach the user as panics. Save, load, and reset report
//! success as a `bool` and log what went wrong; only the explicit import and
//! export operations return errors, since a person is waiting on them.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cardgrid_protocol::{Card, CardMode};
//! use cardgrid_store::{LayoutSnapshot, LayoutStore, MemoryStorage};
//!
//! let store = LayoutStore::new(Arc::new(MemoryStorage::new()));
//! let cards = vec![Card::new("a", 0), Card::new("b", 1).with_mode(CardMode::Compact)];
//!
//! assert!(store.save_layout(&LayoutSnapshot::new(cards, 2, None)));
//! let layout = store.load_layout().expect("stored layout");
//! assert_eq!(layout.grid_columns, 2);
//! assert_eq!(layout.cards[1].mode, CardMode::Compact);
//! ```

pub mod autosave;
pub mod error;
pub mod storage;
pub mod store;
pub mod sync;

// Re-export primary types at crate root for convenience
pub use autosave::Autosaver;
pub use error::{Result, StorageError, StoreError};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{LayoutSnapshot, LayoutStore, export_file_name, export_json};
pub use sync::{ContextId, LayoutSync, StorageEvent, SyncHub};
