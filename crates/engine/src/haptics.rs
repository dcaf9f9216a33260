//! Haptic feedback for drag gestures.
//!
//! Patterns are vibration durations in milliseconds, alternating on and off,
//! the same shape as the web vibration API.

/// Pattern played when a drag starts.
pub const DRAG_START_PATTERN: &[u32] = &[10];

/// Pattern played when a drop reorders the grid.
pub const DROP_PATTERN: &[u32] = &[10, 50, 10];

/// A sink for haptic feedback.
pub trait Haptics {
    /// Plays a vibration pattern. Unsupported devices ignore it.
    fn vibrate(&mut self, pattern: &[u32]);
}

/// Haptics for devices without a vibration motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _pattern: &[u32]) {}
}

/// Haptics that remember every pattern played.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::haptics::{DROP_PATTERN, Haptics, RecordingHaptics};
///
/// let mut haptics = RecordingHaptics::default();
/// haptics.vibrate(DROP_PATTERN);
/// assert_eq!(haptics.played, vec![vec![10, 50, 10]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    /// Patterns played, oldest first.
    pub played: Vec<Vec<u32>>,
}

impl Haptics for RecordingHaptics {
    fn vibrate(&mut self, pattern: &[u32]) {
        self.played.push(pattern.to_vec());
    }
}
