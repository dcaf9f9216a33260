//! Automatic collapsing of cards under space pressure.
//!
//! # Overview
//!
//! When the grid is crowded, the [`AutoCollapseEngine`] switches the least
//! important expanded cards to compact mode:
//!
//! 1. Compact and pinned cards are never candidates.
//! 2. Candidates are ranked by priority (lowest first), then by
//!    `last_interaction` (oldest first). The sort is stable, so equal keys
//!    keep collection order.
//! 3. At most `ceil(total * collapse_percentage)` candidates are collapsed.
//!
//! Every collapse records the previous mode of each changed card so a single
//! [`undo_collapse`](AutoCollapseEngine::undo_collapse) can put them back.
//!
//! # Timing
//!
//! Automatic collapsing is debounced: the engine arms a 300 ms timer when
//! [`observe`](AutoCollapseEngine::observe) sees the grid become crowded and
//! disarms it when the pressure goes away. The host drives the timer through
//! [`tick`](AutoCollapseEngine::tick).
//!
//! # Examples
//!
//! ```
//! use std::time::Instant;
//! use cardgrid_engine::collapse::AutoCollapseEngine;
//! use cardgrid_protocol::{AutoCollapseSettings, Card, CardMode, RecordingHost};
//!
//! let cards = (0..5).map(|i| Card::new(format!("card-{i}"), i)).collect();
//! let mut host = RecordingHost::new(cards);
//! let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
//!
//! let collapsed = engine.trigger_auto_collapse(&mut host, Instant::now());
//! assert_eq!(collapsed, 2);
//! assert!(engine.can_undo());
//!
//! engine.undo_collapse(&mut host);
//! assert!(host.cards.iter().all(|c| c.mode == CardMode::Expanded));
//! ```

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use cardgrid_protocol::{
    AutoCollapseSettings, Card, CardId, CardMode, LayoutHost, Notification, NotificationAction,
};

use crate::debounce::Debouncer;

/// Delay between the grid becoming crowded and the automatic collapse.
pub const COLLAPSE_DEBOUNCE: Duration = Duration::from_millis(300);

/// How long [`AutoCollapseEngine::is_auto_collapsing`] stays true after a collapse.
pub const COLLAPSING_WINDOW: Duration = Duration::from_millis(500);

/// The outcome of a collapse selection, before it is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsePlan {
    /// The full collection with the selected cards switched to compact.
    pub cards: Vec<Card>,
    /// Previous mode of every card that changed.
    pub previous_modes: HashMap<CardId, CardMode>,
}

impl CollapsePlan {
    /// Returns the number of cards this plan collapses.
    #[must_use]
    pub fn collapsed_count(&self) -> usize {
        self.previous_modes.len()
    }
}

/// Returns how many cards a collapse pass may change.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::collapse::collapse_count;
///
/// assert_eq!(collapse_count(8, 6, 0.4), 4); // ceil(3.2)
/// assert_eq!(collapse_count(8, 2, 0.4), 2); // capped by candidates
/// assert_eq!(collapse_count(0, 0, 0.4), 0);
/// ```
#[must_use]
pub fn collapse_count(total: usize, candidates: usize, percentage: f64) -> usize {
    let target = (total as f64 * percentage).ceil();
    if target.is_finite() && target > 0.0 {
        (target as usize).min(candidates)
    } else {
        0
    }
}

/// Selects the cards to collapse and builds the resulting collection.
///
/// The input is not modified.
#[must_use]
pub fn plan_collapse(cards: &[Card], percentage: f64) -> CollapsePlan {
    let mut candidates: Vec<&Card> = cards
        .iter()
        .filter(|card| !card.mode.is_compact() && !card.priority.is_pinned())
        .collect();
    candidates.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.last_interaction.cmp(&b.last_interaction))
    });

    let count = collapse_count(cards.len(), candidates.len(), percentage);
    let selected: HashSet<&CardId> = candidates.iter().take(count).map(|card| &card.id).collect();

    let mut previous_modes = HashMap::with_capacity(count);
    let mut next = Vec::with_capacity(cards.len());
    for card in cards {
        if selected.contains(&card.id) {
            previous_modes.insert(card.id.clone(), card.mode);
            next.push(card.clone().with_mode(CardMode::Compact));
        } else {
            next.push(card.clone());
        }
    }

    CollapsePlan {
        cards: next,
        previous_modes,
    }
}

/// Restores recorded modes onto a collection.
///
/// Cards that are no longer in the collection are skipped.
#[must_use]
pub fn restore_modes(cards: &[Card], previous_modes: &HashMap<CardId, CardMode>) -> Vec<Card> {
    cards
        .iter()
        .map(|card| match previous_modes.get(&card.id) {
            Some(&mode) => card.clone().with_mode(mode),
            None => card.clone(),
        })
        .collect()
}

fn collapsed_message(count: usize) -> String {
    if count == 1 {
        "Minimized 1 card to save space".to_string()
    } else {
        format!("Minimized {count} cards to save space")
    }
}

/// Collapses cards when the grid is crowded, with one level of undo.
#[derive(Debug, Clone)]
pub struct AutoCollapseEngine {
    settings: AutoCollapseSettings,
    debounce: Debouncer,
    armed: bool,
    undo: HashMap<CardId, CardMode>,
    collapsing_until: Option<Instant>,
}

impl AutoCollapseEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(settings: AutoCollapseSettings) -> Self {
        Self {
            settings,
            debounce: Debouncer::new(COLLAPSE_DEBOUNCE),
            armed: false,
            undo: HashMap::new(),
            collapsing_until: None,
        }
    }

    /// Returns the current settings.
    #[must_use]
    pub fn settings(&self) -> &AutoCollapseSettings {
        &self.settings
    }

    /// Replaces the settings.
    ///
    /// Disabling cancels a pending automatic collapse. Re-enabling takes
    /// effect on the next [`observe`](Self::observe).
    pub fn set_settings(&mut self, settings: AutoCollapseSettings) {
        if !settings.enabled {
            self.debounce.cancel();
            self.armed = false;
        }
        self.settings = settings;
    }

    /// Feeds the latest crowding decision.
    ///
    /// Arms the debounce timer on a transition into the crowded state and
    /// disarms it on a transition out.
    pub fn observe(&mut self, should_auto_collapse: bool, now: Instant) {
        let armed = should_auto_collapse && self.settings.enabled;
        if armed && !self.armed {
            tracing::debug!("Grid crowded, scheduling auto-collapse");
            self.debounce.schedule(now);
        } else if !armed && self.debounce.is_pending() {
            tracing::debug!("Grid no longer crowded, cancelling auto-collapse");
            self.debounce.cancel();
        }
        self.armed = armed;
    }

    /// Returns `true` while an automatic collapse is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Runs a scheduled collapse once its deadline has passed.
    ///
    /// Returns the number of cards collapsed (zero when nothing was due).
    pub fn tick<H: LayoutHost + ?Sized>(&mut self, host: &mut H, now: Instant) -> usize {
        if self.debounce.fire(now) {
            self.trigger_auto_collapse(host, now)
        } else {
            0
        }
    }

    /// Collapses cards immediately, regardless of `settings.enabled`.
    ///
    /// Returns the number of cards collapsed. When no card qualifies,
    /// nothing is emitted and the undo buffer is left alone.
    pub fn trigger_auto_collapse<H: LayoutHost + ?Sized>(
        &mut self,
        host: &mut H,
        now: Instant,
    ) -> usize {
        let plan = plan_collapse(host.cards(), self.settings.collapse_percentage);
        let count = plan.collapsed_count();
        if count == 0 {
            tracing::debug!("Auto-collapse found no candidates");
            return 0;
        }

        tracing::info!(count, "Auto-collapsing cards");
        self.undo = plan.previous_modes;
        self.collapsing_until = Some(now + COLLAPSING_WINDOW);
        host.on_cards_update(plan.cards);
        host.on_notification(Notification::with_action(
            collapsed_message(count),
            NotificationAction::UndoCollapse,
        ));
        count
    }

    /// Restores every card changed by the most recent collapse.
    ///
    /// Returns `false` (and does nothing) when there is nothing to undo.
    pub fn undo_collapse<H: LayoutHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.undo.is_empty() {
            return false;
        }

        let previous_modes = std::mem::take(&mut self.undo);
        tracing::info!(count = previous_modes.len(), "Undoing auto-collapse");
        host.on_cards_update(restore_modes(host.cards(), &previous_modes));
        host.on_notification(Notification::new("Card layout restored"));
        true
    }

    /// Returns `true` when an undo buffer is held.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns `true` within the short window following a collapse.
    #[must_use]
    pub fn is_auto_collapsing(&self, now: Instant) -> bool {
        self.collapsing_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardgrid_protocol::{Priority, RecordingHost};
    use chrono::{TimeZone, Utc};

    fn card(id: &str, order: u32, priority: Priority, touched_secs: i64) -> Card {
        Card::new(id, order)
            .with_priority(priority)
            .touched_at(Utc.timestamp_opt(touched_secs, 0).single().expect("valid timestamp"))
    }

    fn compact_ids(cards: &[Card]) -> Vec<&str> {
        cards
            .iter()
            .filter(|c| c.mode.is_compact())
            .map(|c| c.id.as_str())
            .collect()
    }

    #[test]
    fn selects_lowest_priority_then_oldest() {
        let cards = vec![
            card("pinned", 0, Priority::Pinned, 0),
            card("high", 1, Priority::High, 0),
            card("normal-new", 2, Priority::Normal, 200),
            card("normal-old", 3, Priority::Normal, 100),
            card("low", 4, Priority::Low, 300),
        ];

        // ceil(5 * 0.4) = 2
        let plan = plan_collapse(&cards, 0.4);
        assert_eq!(compact_ids(&plan.cards), ["normal-old", "low"]);
        assert_eq!(plan.previous_modes.len(), 2);
    }

    #[test]
    fn pinned_and_compact_are_never_candidates() {
        let cards = vec![
            card("a", 0, Priority::Pinned, 0),
            card("b", 1, Priority::Pinned, 0),
            card("c", 2, Priority::Low, 0).with_mode(CardMode::Compact),
        ];

        let plan = plan_collapse(&cards, 1.0);
        assert_eq!(plan.collapsed_count(), 0);
        assert_eq!(plan.cards, cards);
    }

    #[test]
    fn stable_tiebreak_keeps_collection_order() {
        let cards = vec![
            card("x", 0, Priority::Normal, 10),
            card("y", 1, Priority::Normal, 10),
            card("z", 2, Priority::Normal, 10),
        ];

        // ceil(3 * 0.4) = 2
        let plan = plan_collapse(&cards, 0.4);
        assert_eq!(compact_ids(&plan.cards), ["x", "y"]);
    }

    #[test]
    fn ten_cards_with_two_pinned() {
        let mut cards: Vec<Card> = (0..10)
            .map(|i| card(&format!("c{i}"), i, Priority::Normal, i64::from(i)))
            .collect();
        cards[0].priority = Priority::Pinned;
        cards[1].priority = Priority::Pinned;

        let mut host = RecordingHost::new(cards);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
        let now = Instant::now();

        assert_eq!(engine.trigger_auto_collapse(&mut host, now), 4);
        assert_eq!(compact_ids(&host.cards), ["c2", "c3", "c4", "c5"]);
        assert!(host.cards.iter().filter(|c| c.priority.is_pinned()).all(|c| !c.mode.is_compact()));
        assert_eq!(host.notifications.len(), 1);
        assert_eq!(host.notifications[0].message, "Minimized 4 cards to save space");
        assert_eq!(
            host.notifications[0].action,
            Some(NotificationAction::UndoCollapse)
        );
    }

    #[test]
    fn undo_restores_exact_previous_modes() {
        let cards: Vec<Card> = (0..10)
            .map(|i| card(&format!("c{i}"), i, Priority::Normal, i64::from(i)))
            .collect();
        let mut host = RecordingHost::new(cards.clone());
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());

        engine.trigger_auto_collapse(&mut host, Instant::now());
        assert!(engine.undo_collapse(&mut host));

        assert_eq!(host.cards, cards);
        assert!(!engine.can_undo());
        assert_eq!(host.updates, 2);
        assert_eq!(host.notifications[1].message, "Card layout restored");
        assert_eq!(host.notifications[1].action, None);
    }

    #[test]
    fn undo_without_buffer_is_noop() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Low, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());

        assert!(!engine.undo_collapse(&mut host));
        assert_eq!(host.updates, 0);
        assert!(host.notifications.is_empty());
    }

    #[test]
    fn undo_skips_removed_cards() {
        let cards = vec![card("a", 0, Priority::Low, 0), card("b", 1, Priority::Low, 1)];
        let mut host = RecordingHost::new(cards);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings {
            collapse_percentage: 1.0,
            ..AutoCollapseSettings::default()
        });

        engine.trigger_auto_collapse(&mut host, Instant::now());
        host.cards.retain(|c| c.id.as_str() != "a");
        engine.undo_collapse(&mut host);

        assert_eq!(host.cards.len(), 1);
        assert_eq!(host.cards[0].mode, CardMode::Expanded);
    }

    #[test]
    fn zero_candidates_emit_nothing() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Pinned, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());

        assert_eq!(engine.trigger_auto_collapse(&mut host, Instant::now()), 0);
        assert_eq!(host.updates, 0);
        assert!(host.notifications.is_empty());
        assert!(!engine.can_undo());
    }

    #[test]
    fn manual_trigger_ignores_enabled_flag() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Low, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings {
            enabled: false,
            ..AutoCollapseSettings::default()
        });

        assert_eq!(engine.trigger_auto_collapse(&mut host, Instant::now()), 1);
        assert_eq!(host.notifications[0].message, "Minimized 1 card to save space");
    }

    #[test]
    fn collapsing_window() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Low, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
        let now = Instant::now();

        assert!(!engine.is_auto_collapsing(now));
        engine.trigger_auto_collapse(&mut host, now);
        assert!(engine.is_auto_collapsing(now + Duration::from_millis(499)));
        assert!(!engine.is_auto_collapsing(now + COLLAPSING_WINDOW));
    }

    #[test]
    fn debounced_trigger_fires_after_delay() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Low, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
        let start = Instant::now();

        engine.observe(true, start);
        assert!(engine.is_pending());
        assert_eq!(engine.tick(&mut host, start + Duration::from_millis(299)), 0);
        assert_eq!(engine.tick(&mut host, start + COLLAPSE_DEBOUNCE), 1);
        assert!(!engine.is_pending());
    }

    #[test]
    fn repeated_crowded_observations_do_not_reset_timer() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Low, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
        let start = Instant::now();

        engine.observe(true, start);
        engine.observe(true, start + Duration::from_millis(200));
        assert_eq!(engine.tick(&mut host, start + COLLAPSE_DEBOUNCE), 1);
    }

    #[test]
    fn relief_cancels_pending_collapse() {
        let mut host = RecordingHost::new(vec![card("a", 0, Priority::Low, 0)]);
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
        let start = Instant::now();

        engine.observe(true, start);
        engine.observe(false, start + Duration::from_millis(100));
        assert_eq!(engine.tick(&mut host, start + Duration::from_secs(1)), 0);
        assert_eq!(host.updates, 0);
    }

    #[test]
    fn disabled_engine_never_schedules() {
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings {
            enabled: false,
            ..AutoCollapseSettings::default()
        });
        engine.observe(true, Instant::now());
        assert!(!engine.is_pending());
    }

    #[test]
    fn reenabling_while_crowded_schedules() {
        let mut engine = AutoCollapseEngine::new(AutoCollapseSettings::default());
        let now = Instant::now();

        engine.observe(true, now);
        engine.set_settings(AutoCollapseSettings {
            enabled: false,
            ..AutoCollapseSettings::default()
        });
        assert!(!engine.is_pending());

        engine.set_settings(AutoCollapseSettings::default());
        engine.observe(true, now);
        assert!(engine.is_pending());
    }
}
