//! Application state management.
//!
//! [`AppState`] owns the card collection and implements
//! [`LayoutHost`], so every layout component hands its new collections
//! straight to it. It also tracks focus, overlays, the latest toast, and the
//! user's grid column choice.

use std::time::{Duration, Instant};

use cardgrid_engine::sensors::{Direction, KeyboardSensor};
use cardgrid_protocol::card::sorted_by_order;
use cardgrid_protocol::deck::Deck;
use cardgrid_protocol::{
    AutoCollapseSettings, Card, CardId, LayoutHost, Notification, SavedLayout,
};
use cardgrid_store::LayoutSnapshot;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::layout::MAX_COLUMNS;

/// How long a toast stays in the status bar.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// A notification being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// The notification.
    pub notification: Notification,
    /// When it was raised.
    pub shown_at: Instant,
}

/// The application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Display content for the cards.
    pub deck: Deck,
    /// The card collection, always sorted by `order`.
    pub cards: Vec<Card>,
    /// Index of the focused card in `cards`.
    pub focused: usize,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
    /// The latest notification, until it expires.
    pub toast: Option<Toast>,
    /// Columns chosen by the user, overriding the breakpoint default.
    pub column_override: Option<u32>,
    /// Columns the breakpoints give the current viewport.
    pub detected_columns: u32,
    /// Auto-collapse settings, persisted with the layout.
    pub auto_collapse: AutoCollapseSettings,
    /// Rows scrolled off the top of the grid.
    pub scroll: u16,
}

impl AppState {
    /// Creates state showing the deck's cards in their initial order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::AutoCollapseSettings;
    /// use cardgrid_protocol::deck::{SiteMode, sample_deck};
    /// use cardgrid_tui::AppState;
    ///
    /// let state = AppState::new(sample_deck(SiteMode::Institutional), AutoCollapseSettings::default());
    /// assert_eq!(state.cards.len(), 8);
    /// assert_eq!(state.focused, 0);
    /// ```
    #[must_use]
    pub fn new(deck: Deck, auto_collapse: AutoCollapseSettings) -> Self {
        let cards = sorted_by_order(&deck.cards);
        Self {
            deck,
            cards,
            focused: 0,
            help_visible: false,
            toast: None,
            column_override: None,
            detected_columns: 2,
            auto_collapse,
            scroll: 0,
        }
    }

    /// Returns the column count in effect.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.column_override.unwrap_or(self.detected_columns).max(1)
    }

    /// Adds `delta` columns, clamped to `1..=MAX_COLUMNS`.
    pub fn adjust_columns(&mut self, delta: i32) {
        let current = i64::from(self.columns());
        let next = (current + i64::from(delta)).clamp(1, i64::from(MAX_COLUMNS));
        self.column_override = u32::try_from(next).ok();
    }

    /// Returns the focused card.
    #[must_use]
    pub fn focused_card(&self) -> Option<&Card> {
        self.cards.get(self.focused)
    }

    /// Returns the index of a card.
    #[must_use]
    pub fn index_of(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    /// Moves focus to a card, if present.
    pub fn focus(&mut self, id: &CardId) {
        if let Some(index) = self.index_of(id) {
            self.focused = index;
        }
    }

    /// Moves focus by grid coordinates.
    pub fn navigate(&mut self, direction: Direction) {
        let sensor = KeyboardSensor::new(self.columns() as usize);
        self.focused = sensor.step(self.focused, direction, self.cards.len());
    }

    /// Toggles the focused card between expanded and compact.
    pub fn toggle_focused_mode(&mut self, now: DateTime<Utc>) {
        self.update_focused(now, |card| card.mode = card.mode.toggled());
    }

    /// Moves the focused card to the next priority.
    pub fn cycle_focused_priority(&mut self, now: DateTime<Utc>) {
        self.update_focused(now, |card| card.priority = card.priority.cycle());
    }

    /// Applies an explicit user edit to the focused card and commits the
    /// result as a new collection.
    fn update_focused(&mut self, now: DateTime<Utc>, edit: impl FnOnce(&mut Card)) {
        let mut cards = self.cards.clone();
        let Some(card) = cards.get_mut(self.focused) else {
            return;
        };
        edit(card);
        card.last_interaction = now;
        self.on_cards_update(cards);
    }

    /// Toggles the help overlay visibility.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Dismisses the help overlay if it is visible.
    ///
    /// Returns `true` if help was visible and has been dismissed.
    #[must_use]
    pub fn dismiss_help(&mut self) -> bool {
        std::mem::take(&mut self.help_visible)
    }

    /// Shows a plain message in the status bar.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.on_notification(Notification::new(message));
    }

    /// Drops the toast once it has been shown long enough.
    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| now.duration_since(toast.shown_at) >= TOAST_DURATION)
        {
            self.toast = None;
        }
    }

    /// Returns the state to persist.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::new(self.cards.clone(), self.columns(), Some(self.auto_collapse))
    }

    /// Puts the deck's cards back in their initial order and drops the
    /// column override.
    pub fn reset_cards(&mut self) {
        self.cards = sorted_by_order(&self.deck.cards);
        self.column_override = None;
        self.focused = 0;
        self.scroll = 0;
    }
}

impl LayoutHost for AppState {
    fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn on_cards_update(&mut self, cards: Vec<Card>) {
        let focused = self.focused_card().map(|card| card.id.clone());
        self.cards = sorted_by_order(&cards);
        self.focused = focused
            .and_then(|id| self.index_of(&id))
            .unwrap_or(0)
            .min(self.cards.len().saturating_sub(1));
    }

    fn on_notification(&mut self, notification: Notification) {
        debug!(message = %notification.message, "notification");
        self.toast = Some(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    fn on_layout_restore(&mut self, layout: SavedLayout) {
        let cards = layout.apply_to(&self.cards);
        self.on_cards_update(cards);
        // A saved count matching the breakpoint default is not a user choice.
        self.column_override =
            (layout.grid_columns != self.detected_columns).then_some(layout.grid_columns.max(1));
        if let Some(settings) = layout.auto_collapse_settings {
            self.auto_collapse = settings;
        }
    }
}
