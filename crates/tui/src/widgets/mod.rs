//! Widget components for the cardgrid TUI.
//!
//! Each widget is a function that renders state into a buffer, so widgets
//! can be tested without a terminal.
//!
//! # Modules
//!
//! - [`grid`]: Renders the visible cards at their laid-out positions
//! - [`card`]: Renders a single card, highlighted by focus and drag state
//! - [`status_bar`]: Renders layout facts and the latest notification
//! - [`help`]: Renders the keybinding overlay
//! - [`import`]: Renders the import path prompt
//!
//! # Card Borders
//!
//! | State | Border |
//! |-------|--------|
//! | Idle | Rounded, gray |
//! | Focused | Thick, cyan |
//! | Dragging | Double, yellow |
//! | Drop target | Thick, green |
//!
//! # Example
//!
//! ```
//! use ratatui::buffer::Buffer;
//! use ratatui::layout::Rect;
//! use cardgrid_protocol::deck::{SiteMode, sample_deck};
//! use cardgrid_tui::layout::GridLayout;
//! use cardgrid_tui::widgets::{GridView, render_grid};
//!
//! let deck = sample_deck(SiteMode::Creator);
//! let layout = GridLayout::compute(&deck.cards, 3, 800.0, 16.0);
//! let view = GridView {
//!     deck: &deck,
//!     cards: &deck.cards,
//!     layout: &layout,
//!     focused: None,
//!     dragging: None,
//!     drop_target: None,
//!     scroll: 0,
//! };
//!
//! let area = Rect::new(0, 0, 100, 30);
//! let mut buf = Buffer::empty(area);
//! render_grid(&view, area, &mut buf);
//! ```

pub mod card;
pub mod grid;
pub mod help;
pub mod import;
pub mod status_bar;

// Re-export primary rendering functions for convenience
pub use card::{CardHighlight, priority_color, render_card};
pub use grid::{GridView, render_grid};
pub use help::render_help_overlay;
pub use import::render_import_prompt;
pub use status_bar::{StatusInfo, render_status_bar};
