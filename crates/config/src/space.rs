//! Grid spacing configuration.

use cardgrid_engine::space::{DEFAULT_GAP, DEFAULT_MIN_CARD_HEIGHT, DEFAULT_MIN_CARD_WIDTH};
use serde::{Deserialize, Serialize};

/// Thresholds used to decide whether the grid is crowded.
///
/// # Examples
///
/// ```
/// use cardgrid_config::SpaceSettings;
///
/// let settings = SpaceSettings::default();
/// assert_eq!(settings.min_card_width, 280.0);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceSettings {
    /// Narrowest acceptable card, in pixels.
    #[serde(default = "default_min_card_width")]
    pub min_card_width: f64,

    /// Shortest acceptable card, in pixels.
    #[serde(default = "default_min_card_height")]
    pub min_card_height: f64,

    /// Gap between cards, in pixels.
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Whether resizes recompute the crowding decision.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_min_card_width() -> f64 {
    DEFAULT_MIN_CARD_WIDTH
}

fn default_min_card_height() -> f64 {
    DEFAULT_MIN_CARD_HEIGHT
}

fn default_gap() -> f64 {
    DEFAULT_GAP
}

fn default_enabled() -> bool {
    true
}

impl Default for SpaceSettings {
    fn default() -> Self {
        Self {
            min_card_width: DEFAULT_MIN_CARD_WIDTH,
            min_card_height: DEFAULT_MIN_CARD_HEIGHT,
            gap: DEFAULT_GAP,
            enabled: true,
        }
    }
}

impl SpaceSettings {
    /// Validates the spacing settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a card dimension is not a positive number or the
    /// gap is negative.
    pub fn validate(&self) -> crate::Result<()> {
        for (name, value) in [
            ("min_card_width", self.min_card_width),
            ("min_card_height", self.min_card_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(crate::ConfigError::InvalidSpace {
                    reason: format!("{name} must be a positive number, got {value}"),
                });
            }
        }

        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(crate::ConfigError::InvalidSpace {
                reason: format!("gap must not be negative, got {}", self.gap),
            });
        }

        Ok(())
    }
}
