//! Layout engine for cardgrid.
//!
//! This crate holds the layout components that sit between a card collection
//! and whatever renders it. Every component reads the current collection from
//! a [`LayoutHost`](cardgrid_protocol::LayoutHost) and hands back a new one
//! through [`on_cards_update`](cardgrid_protocol::LayoutHost::on_cards_update);
//! none of them keeps its own copy.
//!
//! # Overview
//!
//! - [`space`]: viewport breakpoints and the crowding decision
//! - [`collapse`]: auto-collapse selection, debounce, and undo
//! - [`reorder`]: the drag state machine and array moves
//! - [`sensors`]: pointer, touch, and keyboard drag activation
//! - [`geometry`]: grid rectangles and closest-center collision
//! - [`debounce`]: the deadline-driven debounce timer
//! - [`haptics`]: vibration patterns and sinks
//!
//! # Examples
//!
//! Feeding a crowded viewport through detection and collapse:
//!
//! ```
//! use std::time::Instant;
//! use cardgrid_engine::collapse::AutoCollapseEngine;
//! use cardgrid_engine::space::{SpaceConfig, SpaceDetector, Viewport};
//! use cardgrid_protocol::{AutoCollapseSettings, Card, RecordingHost};
//!
//! let cards: Vec<Card> = (0..8).map(|i| Card::new(format!("c{i}"), i)).collect();
//! let detector = SpaceDetector::new(Viewport::new(500.0, 900.0), cards.len(), SpaceConfig::default());
//! let mut host = RecordingHost::new(cards);
//! let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
//!
//! let start = Instant::now();
//! engine.observe(detector.info().should_auto_collapse, start);
//! let collapsed = engine.tick(&mut host, start + std::time::Duration::from_millis(300));
//! assert_eq!(collapsed, 4);
//! ```

pub mod collapse;
pub mod debounce;
pub mod geometry;
pub mod haptics;
pub mod reorder;
pub mod sensors;
pub mod space;

pub use collapse::AutoCollapseEngine;
pub use haptics::{Haptics, NoHaptics};
pub use reorder::DragReorderController;
pub use space::{SpaceConfig, SpaceDetector, SpaceInfo, Viewport};
