//! Host callbacks and notifications.
//!
//! The layout components never own the card collection. They read it from a
//! [`LayoutHost`] (the component that renders the grid) and hand every new
//! collection back through [`LayoutHost::on_cards_update`]. The host is the
//! single writer of the current collection.

use crate::card::Card;
use crate::layout::SavedLayout;

/// An action offered alongside a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    /// Revert the most recent auto-collapse.
    UndoCollapse,
}

/// A transient message for the host to surface as a toast.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::{Notification, NotificationAction};
///
/// let note = Notification::with_action("3 cards minimized", NotificationAction::UndoCollapse);
/// assert_eq!(note.action, Some(NotificationAction::UndoCollapse));
///
/// let plain = Notification::new("Layout restored");
/// assert!(plain.action.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Text shown to the user.
    pub message: String,
    /// Optional action the host may wire to a button or key.
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// Creates a notification without an action.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: None,
        }
    }

    /// Creates a notification carrying an action.
    #[must_use]
    pub fn with_action(message: impl Into<String>, action: NotificationAction) -> Self {
        Self {
            message: message.into(),
            action: Some(action),
        }
    }
}

/// The owner of the card collection.
///
/// Implemented by whatever renders the grid. Only [`cards`](Self::cards) and
/// [`on_cards_update`](Self::on_cards_update) are required; notification and
/// restore callbacks default to no-ops.
pub trait LayoutHost {
    /// Returns the current card collection.
    fn cards(&self) -> &[Card];

    /// Commits a new card collection.
    fn on_cards_update(&mut self, cards: Vec<Card>);

    /// Surfaces a notification.
    fn on_notification(&mut self, notification: Notification) {
        let _ = notification;
    }

    /// Applies a stored or imported layout.
    fn on_layout_restore(&mut self, layout: SavedLayout) {
        let _ = layout;
    }
}

/// A minimal [`LayoutHost`] that records every callback.
///
/// Useful for tests and for headless use of the layout components.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::{Card, LayoutHost, RecordingHost};
///
/// let mut host = RecordingHost::new(vec![Card::new("a", 0)]);
/// host.on_cards_update(vec![Card::new("b", 0)]);
/// assert_eq!(host.cards()[0].id.as_str(), "b");
/// assert_eq!(host.updates, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    /// The current collection.
    pub cards: Vec<Card>,
    /// Number of `on_cards_update` calls received.
    pub updates: usize,
    /// Notifications received, oldest first.
    pub notifications: Vec<Notification>,
    /// Layouts received, oldest first.
    pub restored: Vec<SavedLayout>,
}

impl RecordingHost {
    /// Creates a host owning the given collection.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }
}

impl LayoutHost for RecordingHost {
    fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn on_cards_update(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.updates += 1;
    }

    fn on_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn on_layout_restore(&mut self, layout: SavedLayout) {
        self.restored.push(layout);
    }
}
