//! Drag-and-drop reordering.
//!
//! # Overview
//!
//! The [`DragReorderController`] is a two-state machine:
//!
//! ```text
//! Idle --drag_start--> Dragging { active, over } --drag_end / drag_cancel--> Idle
//! ```
//!
//! While dragging, [`drag_over`](DragReorderController::drag_over) only tracks
//! the drop target; nothing is committed until the drop. A drop onto a
//! different card moves the dragged card to the target's position, renumbers
//! every `order` to match its index, and stamps every card as touched.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use cardgrid_engine::reorder::DragReorderController;
//! use cardgrid_protocol::{Card, RecordingHost};
//!
//! let cards = ["a", "b", "c", "d"].iter().enumerate()
//!     .map(|(i, id)| Card::new(*id, i as u32))
//!     .collect();
//! let mut host = RecordingHost::new(cards);
//! let mut drag = DragReorderController::new();
//!
//! drag.drag_start("a".into());
//! drag.drag_over(Some("d".into()));
//! assert!(drag.drag_end(&mut host, Utc::now()));
//!
//! let ids: Vec<_> = host.cards.iter().map(|c| c.id.as_str()).collect();
//! assert_eq!(ids, ["b", "c", "d", "a"]);
//! ```

use chrono::{DateTime, Utc};

use cardgrid_protocol::card::sorted_by_order;
use cardgrid_protocol::{Card, CardId, LayoutHost};

use crate::haptics::{DRAG_START_PATTERN, DROP_PATTERN, Haptics, NoHaptics};

/// Moves the element at `from` to `to`, shifting the elements in between.
///
/// Out-of-range indices leave the slice untouched.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::reorder::array_move;
///
/// let mut items = vec!['a', 'b', 'c', 'd'];
/// array_move(&mut items, 3, 1);
/// assert_eq!(items, ['a', 'd', 'b', 'c']);
/// ```
pub fn array_move<T>(items: &mut [T], from: usize, to: usize) {
    if from >= items.len() || to >= items.len() {
        return;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
}

/// Computes the collection after dropping `active` onto `over`.
///
/// Returns `None` when the drop is a no-op: same card, or either id missing.
/// Orders are renumbered to indices and every card is stamped with `now`.
#[must_use]
pub fn reorder_cards(
    cards: &[Card],
    active: &CardId,
    over: &CardId,
    now: DateTime<Utc>,
) -> Option<Vec<Card>> {
    if active == over {
        return None;
    }
    let mut sorted = sorted_by_order(cards);
    let from = sorted.iter().position(|card| &card.id == active)?;
    let to = sorted.iter().position(|card| &card.id == over)?;

    array_move(&mut sorted, from, to);
    for (index, card) in sorted.iter_mut().enumerate() {
        card.order = u32::try_from(index).unwrap_or(u32::MAX);
        card.last_interaction = now;
    }
    Some(sorted)
}

/// Returns the visual sequence of ids as it would look after the drop.
///
/// Used to render the grid while dragging. Falls back to the current order
/// when there is no valid target.
#[must_use]
pub fn preview_order(cards: &[Card], active: &CardId, over: Option<&CardId>) -> Vec<CardId> {
    let mut ids: Vec<CardId> = sorted_by_order(cards)
        .into_iter()
        .map(|card| card.id)
        .collect();
    if let Some(over) = over {
        let from = ids.iter().position(|id| id == active);
        let to = ids.iter().position(|id| id == over);
        if let (Some(from), Some(to)) = (from, to) {
            array_move(&mut ids, from, to);
        }
    }
    ids
}

/// Drag state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A card is being dragged.
    Dragging {
        /// The dragged card.
        active: CardId,
        /// The current drop target, if any.
        over: Option<CardId>,
    },
}

/// Turns drag gestures into a single reorder of the card collection.
#[derive(Debug, Clone, Default)]
pub struct DragReorderController<H = NoHaptics> {
    state: DragState,
    haptics: H,
}

impl DragReorderController {
    /// Creates an idle controller without haptic feedback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: Haptics> DragReorderController<H> {
    /// Creates an idle controller with the given haptics sink.
    #[must_use]
    pub fn with_haptics(haptics: H) -> Self {
        Self {
            state: DragState::Idle,
            haptics,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns the haptics sink.
    #[must_use]
    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    /// Returns `true` while a card is being dragged.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Returns the dragged card.
    #[must_use]
    pub fn active(&self) -> Option<&CardId> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    /// Returns the current drop target.
    #[must_use]
    pub fn over(&self) -> Option<&CardId> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Starts dragging a card and plays a short pulse.
    ///
    /// A new start replaces any drag in progress.
    pub fn drag_start(&mut self, active: CardId) {
        tracing::debug!(card = %active, "Drag started");
        self.state = DragState::Dragging { active, over: None };
        self.haptics.vibrate(DRAG_START_PATTERN);
    }

    /// Updates the drop target. Ignored when idle.
    pub fn drag_over(&mut self, target: Option<CardId>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// Drops the dragged card onto the current target.
    ///
    /// Returns `true` if the collection was reordered and committed.
    pub fn drag_end<L: LayoutHost + ?Sized>(&mut self, host: &mut L, now: DateTime<Utc>) -> bool {
        let DragState::Dragging { active, over } = std::mem::take(&mut self.state) else {
            return false;
        };
        let Some(over) = over else {
            tracing::debug!(card = %active, "Dropped outside any card");
            return false;
        };
        let Some(cards) = reorder_cards(host.cards(), &active, &over, now) else {
            tracing::debug!(card = %active, target = %over, "Drop left order unchanged");
            return false;
        };

        tracing::debug!(card = %active, target = %over, "Reordered cards");
        host.on_cards_update(cards);
        self.haptics.vibrate(DROP_PATTERN);
        true
    }

    /// Abandons the drag without touching the collection.
    pub fn drag_cancel(&mut self) {
        if let DragState::Dragging { active, .. } = std::mem::take(&mut self.state) {
            tracing::debug!(card = %active, "Drag cancelled");
        }
    }
}
