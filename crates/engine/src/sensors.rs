//! Input sensors that decide when a gesture becomes a drag.
//!
//! # Overview
//!
//! - [`PointerSensor`]: mouse or pen. Activates once the pointer travels more
//!   than 8 px from where it was pressed, so plain clicks never drag.
//! - [`TouchSensor`]: activates after a 250 ms hold. Moving more than 5 px
//!   before then aborts the gesture so the page can scroll instead.
//! - [`KeyboardSensor`]: moves the drop target through grid coordinates.
//!
//! Sensors only report activation. The
//! [`DragReorderController`](crate::reorder::DragReorderController) owns the
//! drag state itself.

use std::time::{Duration, Instant};

use cardgrid_protocol::CardId;

use crate::geometry::Point;

/// Distance a pointer must travel before a drag starts.
pub const POINTER_ACTIVATION_DISTANCE: f64 = 8.0;

/// Hold time before a touch becomes a drag.
pub const TOUCH_ACTIVATION_DELAY: Duration = Duration::from_millis(250);

/// Movement allowed during the touch hold.
pub const TOUCH_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone)]
struct Press {
    card: CardId,
    origin: Point,
}

/// Mouse and pen activation.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::geometry::Point;
/// use cardgrid_engine::sensors::PointerSensor;
///
/// let mut sensor = PointerSensor::default();
/// sensor.press("faq".into(), Point::new(0.0, 0.0));
/// assert_eq!(sensor.move_to(Point::new(8.0, 0.0)), None);
/// assert_eq!(sensor.move_to(Point::new(9.0, 0.0)).map(|id| id.to_string()), Some("faq".into()));
/// assert!(sensor.is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PointerSensor {
    press: Option<Press>,
    active: bool,
}

impl PointerSensor {
    /// Records a press on a card.
    pub fn press(&mut self, card: CardId, at: Point) {
        self.press = Some(Press { card, origin: at });
        self.active = false;
    }

    /// Tracks pointer movement.
    ///
    /// Returns the pressed card on the move that activates the drag, and
    /// `None` otherwise (including every move after activation).
    pub fn move_to(&mut self, at: Point) -> Option<CardId> {
        let press = self.press.as_ref()?;
        if self.active || press.origin.distance_to(at) <= POINTER_ACTIVATION_DISTANCE {
            return None;
        }
        let card = press.card.clone();
        self.active = true;
        Some(card)
    }

    /// Ends the gesture. Returns `true` if it had become a drag.
    pub fn release(&mut self) -> bool {
        self.press = None;
        std::mem::take(&mut self.active)
    }

    /// Returns `true` between a press and its release.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Returns `true` once the gesture has become a drag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// What a touch event did to the gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchOutcome {
    /// No touch is being tracked.
    Idle,
    /// Still holding, not yet a drag.
    Pending,
    /// The hold completed and the drag starts now.
    Activated(CardId),
    /// Already dragging.
    Dragging,
    /// The finger moved too far too early. The gesture is dropped.
    Aborted,
}

#[derive(Debug, Clone)]
struct Touch {
    press: Press,
    started: Instant,
}

/// Press-and-hold activation for touch screens.
#[derive(Debug, Clone, Default)]
pub struct TouchSensor {
    touch: Option<Touch>,
    active: bool,
}

impl TouchSensor {
    /// Records a touch on a card.
    pub fn touch_start(&mut self, card: CardId, at: Point, now: Instant) {
        self.touch = Some(Touch {
            press: Press { card, origin: at },
            started: now,
        });
        self.active = false;
    }

    /// Tracks finger movement.
    pub fn touch_move(&mut self, at: Point, now: Instant) -> TouchOutcome {
        let Some(touch) = &self.touch else {
            return TouchOutcome::Idle;
        };
        if self.active {
            return TouchOutcome::Dragging;
        }

        let held = now.duration_since(touch.started) >= TOUCH_ACTIVATION_DELAY;
        let moved_far = touch.press.origin.distance_to(at) > TOUCH_TOLERANCE;
        if held {
            let card = touch.press.card.clone();
            self.active = true;
            return TouchOutcome::Activated(card);
        }
        if moved_far {
            self.touch = None;
            return TouchOutcome::Aborted;
        }
        TouchOutcome::Pending
    }

    /// Activates a stationary hold once the delay has passed.
    ///
    /// Returns the card exactly once, on the poll that activates.
    pub fn poll(&mut self, now: Instant) -> Option<CardId> {
        let touch = self.touch.as_ref()?;
        if self.active || now.duration_since(touch.started) < TOUCH_ACTIVATION_DELAY {
            return None;
        }
        let card = touch.press.card.clone();
        self.active = true;
        Some(card)
    }

    /// Ends the gesture. Returns `true` if it had become a drag.
    pub fn touch_end(&mut self) -> bool {
        self.touch = None;
        std::mem::take(&mut self.active)
    }

    /// Returns `true` once the gesture has become a drag.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Previous card.
    Left,
    /// Next card.
    Right,
    /// One row up.
    Up,
    /// One row down.
    Down,
}

/// Grid-coordinate movement for keyboard dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardSensor {
    /// Cards per grid row.
    pub columns: usize,
}

impl KeyboardSensor {
    /// Creates a sensor for a grid with the given column count.
    #[must_use]
    pub const fn new(columns: usize) -> Self {
        Self { columns }
    }

    /// Returns the index reached by moving from `current` in `direction`,
    /// clamped to `0..len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_engine::sensors::{Direction, KeyboardSensor};
    ///
    /// let sensor = KeyboardSensor::new(3);
    /// assert_eq!(sensor.step(1, Direction::Down, 8), 4);
    /// assert_eq!(sensor.step(6, Direction::Down, 8), 7);
    /// assert_eq!(sensor.step(0, Direction::Left, 8), 0);
    /// ```
    #[must_use]
    pub fn step(&self, current: usize, direction: Direction, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let last = len - 1;
        let stride = self.columns.max(1);
        let next = match direction {
            Direction::Left => current.saturating_sub(1),
            Direction::Right => current.saturating_add(1),
            Direction::Up => current.saturating_sub(stride),
            Direction::Down => current.saturating_add(stride),
        };
        next.min(last)
    }
}
