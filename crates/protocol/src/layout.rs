//! The persisted layout record.
//!
//! A [`SavedLayout`] captures the user's card order, display modes,
//! priorities, grid column count, and auto-collapse settings. It is the shape
//! written to client storage and to exported layout files.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "version": "3.1",
//!   "timestamp": 1736937000000,
//!   "cards": [{ "id": "hero", "order": 0, "mode": "expanded", "priority": "pinned" }],
//!   "gridColumns": 3,
//!   "autoCollapseSettings": { "enabled": true, "threshold": 6, "collapsePercentage": 0.4 }
//! }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId, CardMode, Priority};

/// Current schema version of [`SavedLayout`].
///
/// A stored record carrying any other version is treated as absent.
pub const LAYOUT_VERSION: &str = "3.1";

/// Oldest schema major version whose cards [`LegacyCard`] can still read.
const OLDEST_MIGRATABLE_MAJOR: u32 = 2;

/// Storage key under which the layout record is kept.
pub const STORAGE_KEY: &str = "quickserveit_card_layout_v3.1";

/// Default card-count threshold above which cards are auto-collapsed.
pub const DEFAULT_COLLAPSE_THRESHOLD: u32 = 6;

/// Default fraction of all cards collapsed by one auto-collapse pass.
pub const DEFAULT_COLLAPSE_PERCENTAGE: f64 = 0.4;

/// User settings for automatic collapsing.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::AutoCollapseSettings;
///
/// let settings = AutoCollapseSettings::default();
/// assert!(settings.enabled);
/// assert_eq!(settings.threshold, 6);
/// assert_eq!(settings.collapse_percentage, 0.4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoCollapseSettings {
    /// Whether space pressure triggers collapsing automatically.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Card count above which the grid is considered crowded.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Fraction of all cards that one pass may collapse.
    #[serde(default = "default_collapse_percentage")]
    pub collapse_percentage: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_threshold() -> u32 {
    DEFAULT_COLLAPSE_THRESHOLD
}

fn default_collapse_percentage() -> f64 {
    DEFAULT_COLLAPSE_PERCENTAGE
}

impl AutoCollapseSettings {
    /// Checks the settings, returning the first problem found.
    ///
    /// The threshold must be at least one and the percentage must lie in
    /// `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns a description of the invalid field.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::AutoCollapseSettings;
    ///
    /// let settings = AutoCollapseSettings { collapse_percentage: 5.0, ..Default::default() };
    /// assert!(settings.validate().is_err());
    /// assert!(AutoCollapseSettings::default().validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.threshold == 0 {
            return Err("threshold must be at least 1".to_string());
        }
        let pct = self.collapse_percentage;
        if !(pct > 0.0 && pct <= 1.0) {
            return Err(format!("collapse percentage {pct} must be in (0, 1]"));
        }
        Ok(())
    }
}

impl Default for AutoCollapseSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_COLLAPSE_THRESHOLD,
            collapse_percentage: DEFAULT_COLLAPSE_PERCENTAGE,
        }
    }
}

/// The persisted subset of a [`Card`].
///
/// `last_interaction` is deliberately not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCard {
    /// Card identifier.
    pub id: CardId,
    /// Sort rank.
    pub order: u32,
    /// Display mode.
    pub mode: CardMode,
    /// Collapse priority.
    pub priority: Priority,
}

impl From<&Card> for PersistedCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            order: card.order,
            mode: card.mode,
            priority: card.priority,
        }
    }
}

/// The persisted layout record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    /// Schema version; see [`LAYOUT_VERSION`].
    pub version: String,
    /// Save time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Cards in persisted form.
    pub cards: Vec<PersistedCard>,
    /// The user's grid column count.
    pub grid_columns: u32,
    /// Auto-collapse settings, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_collapse_settings: Option<AutoCollapseSettings>,
}

impl SavedLayout {
    /// Builds a current-version record from a live card collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use cardgrid_protocol::{Card, SavedLayout, LAYOUT_VERSION};
    ///
    /// let cards = vec![Card::new("a", 0), Card::new("b", 1)];
    /// let layout = SavedLayout::from_cards(&cards, 3, None, Utc::now());
    /// assert_eq!(layout.version, LAYOUT_VERSION);
    /// assert_eq!(layout.cards.len(), 2);
    /// ```
    #[must_use]
    pub fn from_cards(
        cards: &[Card],
        grid_columns: u32,
        auto_collapse_settings: Option<AutoCollapseSettings>,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: LAYOUT_VERSION.to_string(),
            timestamp: saved_at.timestamp_millis(),
            cards: cards.iter().map(PersistedCard::from).collect(),
            grid_columns,
            auto_collapse_settings,
        }
    }

    /// Returns `true` if this record carries the current schema version.
    #[must_use]
    pub fn is_current_version(&self) -> bool {
        self.version == LAYOUT_VERSION
    }

    /// Applies the saved order, modes, and priorities onto a live collection.
    ///
    /// Cards are matched by id. Saved entries whose id is not in `cards` are
    /// ignored. Live cards missing from the record keep their relative order
    /// after the saved ones. The result is sorted and its `order` fields are
    /// renumbered from zero. `last_interaction` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use cardgrid_protocol::{Card, CardMode, SavedLayout};
    ///
    /// let saved = SavedLayout::from_cards(
    ///     &[Card::new("b", 0).with_mode(CardMode::Compact), Card::new("a", 1)],
    ///     2,
    ///     None,
    ///     Utc::now(),
    /// );
    /// let live = vec![Card::new("a", 0), Card::new("b", 1), Card::new("new", 2)];
    ///
    /// let applied = saved.apply_to(&live);
    /// let ids: Vec<_> = applied.iter().map(|c| c.id.as_str()).collect();
    /// assert_eq!(ids, ["b", "a", "new"]);
    /// assert_eq!(applied[0].mode, CardMode::Compact);
    /// ```
    #[must_use]
    pub fn apply_to(&self, cards: &[Card]) -> Vec<Card> {
        let saved: HashMap<&CardId, (usize, &PersistedCard)> = self
            .cards
            .iter()
            .enumerate()
            .map(|(position, card)| (&card.id, (position, card)))
            .collect();

        let mut known: Vec<(u32, usize, Card)> = Vec::new();
        let mut unknown: Vec<Card> = Vec::new();
        for card in crate::card::sorted_by_order(cards) {
            match saved.get(&card.id) {
                Some((position, persisted)) => {
                    let mut restored = card;
                    restored.mode = persisted.mode;
                    restored.priority = persisted.priority;
                    known.push((persisted.order, *position, restored));
                }
                None => unknown.push(card),
            }
        }
        known.sort_by_key(|(order, position, _)| (*order, *position));

        known
            .into_iter()
            .map(|(_, _, card)| card)
            .chain(unknown)
            .enumerate()
            .map(|(index, mut card)| {
                card.order = u32::try_from(index).unwrap_or(u32::MAX);
                card
            })
            .collect()
    }
}

/// Returns `true` if a record of `version` can be migrated to the current
/// schema.
///
/// Versions `2.x` and `3.x` share the card shape read by [`LegacyCard`].
///
/// ```
/// use cardgrid_protocol::is_migratable_version;
///
/// assert!(is_migratable_version("3.1"));
/// assert!(is_migratable_version("2.0"));
/// assert!(!is_migratable_version("4.0"));
/// assert!(!is_migratable_version("beta"));
/// ```
#[must_use]
pub fn is_migratable_version(version: &str) -> bool {
    let major = version.split('.').next().unwrap_or_default();
    major
        .parse::<u32>()
        .is_ok_and(|major| (OLDEST_MIGRATABLE_MAJOR..=current_major()).contains(&major))
}

fn current_major() -> u32 {
    LAYOUT_VERSION
        .split('.')
        .next()
        .and_then(|major| major.parse().ok())
        .unwrap_or(OLDEST_MIGRATABLE_MAJOR)
}

/// A grid position used by older layout files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPosition {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub col: u32,
}

/// A card as found in layout files that predate `order`.
///
/// Older files located cards by `position`; newer ones already carry `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCard {
    /// Card identifier.
    pub id: CardId,
    /// Sort rank, if already present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Grid position, for older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GridPosition>,
    /// Display mode.
    #[serde(default)]
    pub mode: CardMode,
    /// Collapse priority.
    #[serde(default)]
    pub priority: Priority,
}

/// Converts a legacy card into its persisted form.
///
/// A card that already carries `order` passes through unchanged. Otherwise
/// the order is derived from its grid position as `row * grid_columns + col`.
/// A card with neither lands at order zero.
///
/// # Examples
///
/// ```
/// use cardgrid_protocol::{CardId, CardMode, GridPosition, LegacyCard, Priority, migrate_card};
///
/// let legacy = LegacyCard {
///     id: CardId::from("faq"),
///     order: None,
///     position: Some(GridPosition { row: 2, col: 1 }),
///     mode: CardMode::Compact,
///     priority: Priority::Low,
/// };
/// let migrated = migrate_card(legacy, 3);
/// assert_eq!(migrated.order, 7);
/// assert_eq!(migrated.mode, CardMode::Compact);
/// ```
#[must_use]
pub fn migrate_card(legacy: LegacyCard, grid_columns: u32) -> PersistedCard {
    let order = match (legacy.order, legacy.position) {
        (Some(order), _) => order,
        (None, Some(GridPosition { row, col })) => {
            row.saturating_mul(grid_columns).saturating_add(col)
        }
        (None, None) => 0,
    };
    PersistedCard {
        id: legacy.id,
        order,
        mode: legacy.mode,
        priority: legacy.priority,
    }
}
