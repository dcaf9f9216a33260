//! Card types for the layout grid.
//!
//! This module defines the unit of layout, the [`Card`], together with its
//! identifier, display mode, and collapse priority.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a card within a collection.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::CardId;
///
/// let id = CardId::from("pricing");
/// assert_eq!(id.as_str(), "pricing");
/// assert_eq!(id.to_string(), "pricing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Creates a card identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The display footprint of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardMode {
    /// Full-size card.
    #[default]
    Expanded,
    /// Minimized card showing only its title.
    Compact,
}

impl CardMode {
    /// Returns the other mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::CardMode;
    ///
    /// assert_eq!(CardMode::Expanded.toggled(), CardMode::Compact);
    /// assert_eq!(CardMode::Compact.toggled(), CardMode::Expanded);
    /// ```
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Expanded => Self::Compact,
            Self::Compact => Self::Expanded,
        }
    }

    /// Returns `true` for [`CardMode::Compact`].
    #[must_use]
    pub const fn is_compact(self) -> bool {
        matches!(self, Self::Compact)
    }
}

/// Collapse priority of a card.
///
/// Variants are declared in rank order, so the derived [`Ord`] gives
/// `Low < Normal < High < Pinned`. Lower-ranked cards are collapsed first;
/// pinned cards are never collapsed automatically.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::Priority;
///
/// assert!(Priority::Low < Priority::Normal);
/// assert!(Priority::High < Priority::Pinned);
/// assert!(Priority::Pinned.is_pinned());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Collapsed first.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// Collapsed last.
    High,
    /// Never collapsed automatically.
    Pinned,
}

impl Priority {
    /// Returns `true` if this priority exempts a card from auto-collapse.
    #[must_use]
    pub const fn is_pinned(self) -> bool {
        matches!(self, Self::Pinned)
    }

    /// Returns the next priority, wrapping from `Pinned` back to `Low`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::Priority;
    ///
    /// assert_eq!(Priority::Low.cycle(), Priority::Normal);
    /// assert_eq!(Priority::Pinned.cycle(), Priority::Low);
    /// ```
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Low => Self::Normal,
            Self::Normal => Self::High,
            Self::High => Self::Pinned,
            Self::Pinned => Self::Low,
        }
    }

    /// Returns a short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Pinned => "pinned",
        }
    }
}

/// A card in the layout grid.
///
/// Cards are owned by the host that renders the grid. Layout components never
/// mutate a card collection in place; they produce new collections and hand
/// them back to the host.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::{Card, CardMode, Priority};
///
/// let card = Card::new("hero", 0).with_priority(Priority::Pinned);
/// assert_eq!(card.mode, CardMode::Expanded);
/// assert!(card.priority.is_pinned());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier within the collection.
    pub id: CardId,
    /// Rank used to sort the grid; ties keep array position.
    pub order: u32,
    /// Current display footprint.
    pub mode: CardMode,
    /// Collapse priority.
    pub priority: Priority,
    /// Most recent user touch. Used as the recency tiebreak for auto-collapse.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_interaction: DateTime<Utc>,
}

impl Card {
    /// Creates an expanded, normal-priority card touched now.
    #[must_use]
    pub fn new(id: impl Into<CardId>, order: u32) -> Self {
        Self {
            id: id.into(),
            order,
            mode: CardMode::Expanded,
            priority: Priority::Normal,
            last_interaction: Utc::now(),
        }
    }

    /// Sets the priority (builder style).
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the display mode (builder style).
    #[must_use]
    pub fn with_mode(mut self, mode: CardMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the last interaction timestamp (builder style).
    #[must_use]
    pub fn touched_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_interaction = at;
        self
    }
}

/// Returns the cards sorted by `order`, ties broken by array position.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::{Card, card::sorted_by_order};
///
/// let cards = vec![Card::new("b", 1), Card::new("a", 0), Card::new("c", 1)];
/// let ids: Vec<_> = sorted_by_order(&cards).iter().map(|c| c.id.to_string()).collect();
/// assert_eq!(ids, ["a", "b", "c"]);
/// ```
#[must_use]
pub fn sorted_by_order(cards: &[Card]) -> Vec<Card> {
    let mut sorted = cards.to_vec();
    // `sort_by_key` is stable, which keeps array position as the tiebreak.
    sorted.sort_by_key(|card| card.order);
    sorted
}
