//! Autosave debounce configuration.
//!
//! Layout changes are written to storage once the collection has been quiet
//! for the debounce period. Rapid edits (a drag followed by a collapse, say)
//! coalesce into a single write.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default autosave debounce (1 second).
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 1000;

/// Minimum allowed debounce (100 milliseconds).
pub const MIN_AUTOSAVE_DEBOUNCE_MS: u64 = 100;

/// Maximum allowed debounce (10 seconds).
pub const MAX_AUTOSAVE_DEBOUNCE_MS: u64 = 10_000;

/// Configuration for the autosave debounce.
///
/// # Examples
///
/// ```
/// use cardgrid_config::AutosaveConfig;
///
/// let config = AutosaveConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.debounce_ms, 1000);
///
/// let config = AutosaveConfig::with_debounce(250);
/// assert_eq!(config.debounce().as_millis(), 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Quiet period before a changed layout is written, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Whether layout changes are saved automatically at all.
    ///
    /// When false, the layout is only written by explicit export.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_AUTOSAVE_DEBOUNCE_MS
}

fn default_enabled() -> bool {
    true
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            enabled: true,
        }
    }
}

impl AutosaveConfig {
    /// Creates an enabled autosave configuration with the given debounce.
    ///
    /// # Arguments
    ///
    /// * `debounce_ms` - The quiet period in milliseconds
    #[must_use]
    pub fn with_debounce(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            enabled: true,
        }
    }

    /// Returns the debounce as a [`Duration`].
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validates the autosave configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the debounce is outside the allowed range.
    pub fn validate(&self) -> crate::Result<()> {
        if self.debounce_ms < MIN_AUTOSAVE_DEBOUNCE_MS {
            return Err(crate::ConfigError::InvalidAutosave {
                reason: format!(
                    "debounce {} is below minimum of {} ms",
                    self.debounce_ms, MIN_AUTOSAVE_DEBOUNCE_MS
                ),
            });
        }

        if self.debounce_ms > MAX_AUTOSAVE_DEBOUNCE_MS {
            return Err(crate::ConfigError::InvalidAutosave {
                reason: format!(
                    "debounce {} exceeds maximum of {} ms",
                    self.debounce_ms, MAX_AUTOSAVE_DEBOUNCE_MS
                ),
            });
        }

        Ok(())
    }
}
