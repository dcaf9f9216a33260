//! Shared protocol types for the cardgrid application.
//!
//! This crate defines the core types used across all cardgrid components,
//! including cards, the persisted layout record, host callbacks, and TUI
//! messages.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`card`]: Card identifiers, display modes, priorities, and the `Card` struct
//! - [`layout`]: The persisted `SavedLayout` record and legacy migration
//! - [`host`]: The `LayoutHost` callback trait and notifications
//! - [`message`]: TUI event messages
//! - [`deck`]: Sample card decks for the two site modes
//!
//! # Examples
//!
//! Building a collection and snapshotting it for storage:
//!
//! ```
//! use chrono::Utc;
//! use cardgrid_protocol::{Card, CardMode, Priority, SavedLayout};
//!
//! let cards = vec![
//!     Card::new("hero", 0).with_priority(Priority::Pinned),
//!     Card::new("faq", 1).with_mode(CardMode::Compact),
//! ];
//!
//! let layout = SavedLayout::from_cards(&cards, 3, None, Utc::now());
//! assert!(layout.is_current_version());
//! assert_eq!(layout.cards[1].mode, CardMode::Compact);
//! ```

pub mod card;
pub mod deck;
pub mod host;
pub mod layout;
pub mod message;

// Re-export primary types at crate root for convenience
pub use card::{Card, CardId, CardMode, Priority};
pub use host::{LayoutHost, Notification, NotificationAction, RecordingHost};
pub use layout::{
    AutoCollapseSettings, GridPosition, LAYOUT_VERSION, LegacyCard, PersistedCard, STORAGE_KEY,
    SavedLayout, is_migratable_version, migrate_card,
};
pub use message::Message;
