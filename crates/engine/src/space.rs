//! Viewport space detection.
//!
//! This module derives a [`SpaceInfo`] snapshot from the viewport size and
//! the number of cards on screen, deciding whether the grid is crowded
//! enough to collapse cards.
//!
//! # Breakpoints
//!
//! | Viewport width | Columns | Padding (per side) |
//! |----------------|---------|--------------------|
//! | `< 640`        | 2       | 16 px              |
//! | `640..1024`    | 3       | 24 px              |
//! | `>= 1024`      | 4       | 32 px              |

use cardgrid_protocol::layout::DEFAULT_COLLAPSE_THRESHOLD;

/// Width at which the grid moves from two to three columns.
pub const BREAKPOINT_MEDIUM: f64 = 640.0;

/// Width at which the grid moves from three to four columns.
pub const BREAKPOINT_LARGE: f64 = 1024.0;

/// Vertical space reserved for page chrome (header, footer, toasts).
pub const RESERVED_HEIGHT: f64 = 200.0;

/// Default minimum card width in pixels.
pub const DEFAULT_MIN_CARD_WIDTH: f64 = 280.0;

/// Default minimum card height in pixels.
pub const DEFAULT_MIN_CARD_HEIGHT: f64 = 180.0;

/// Default gap between cards in pixels.
pub const DEFAULT_GAP: f64 = 16.0;

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport of the given size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Inputs of the space computation besides the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceConfig {
    /// Narrowest acceptable card.
    pub min_card_width: f64,
    /// Shortest acceptable card.
    pub min_card_height: f64,
    /// Gap between cards.
    pub gap: f64,
    /// Card count above which the grid is always considered crowded.
    pub collapse_threshold: u32,
    /// When `false`, resizes keep the last computed snapshot.
    pub enabled: bool,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            min_card_width: DEFAULT_MIN_CARD_WIDTH,
            min_card_height: DEFAULT_MIN_CARD_HEIGHT,
            gap: DEFAULT_GAP,
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
            enabled: true,
        }
    }
}

/// A derived snapshot of the available screen space. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceInfo {
    /// Viewport width the snapshot was computed for.
    pub viewport_width: f64,
    /// Viewport height the snapshot was computed for.
    pub viewport_height: f64,
    /// Breakpoint column count.
    pub grid_columns: u32,
    /// Width available to each card.
    pub available_card_space: f64,
    /// Whether cards should be collapsed.
    pub should_auto_collapse: bool,
    /// Rough crowding estimate in `[0, 1]`. Advisory only.
    pub space_utilization: f64,
}

/// Returns the breakpoint column count for a viewport width.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::space::grid_columns_for;
///
/// assert_eq!(grid_columns_for(500.0), 2);
/// assert_eq!(grid_columns_for(640.0), 3);
/// assert_eq!(grid_columns_for(1024.0), 4);
/// ```
#[must_use]
pub fn grid_columns_for(width: f64) -> u32 {
    if width >= BREAKPOINT_LARGE {
        4
    } else if width >= BREAKPOINT_MEDIUM {
        3
    } else {
        2
    }
}

/// Returns the container padding (applied on each side) for a viewport width.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::space::container_padding_for;
///
/// assert_eq!(container_padding_for(320.0), 16.0);
/// assert_eq!(container_padding_for(800.0), 24.0);
/// assert_eq!(container_padding_for(1440.0), 32.0);
/// ```
#[must_use]
pub fn container_padding_for(width: f64) -> f64 {
    if width < BREAKPOINT_MEDIUM {
        16.0
    } else if width < BREAKPOINT_LARGE {
        24.0
    } else {
        32.0
    }
}

/// Computes a [`SpaceInfo`] snapshot.
///
/// The grid is crowded when any of the following holds:
///
/// - each card would be narrower than `min_card_width`
/// - the rows needed at `min_card_height` overflow the usable height
/// - there are more cards than `collapse_threshold`
///
/// # Examples
///
/// ```
/// use cardgrid_engine::space::{SpaceConfig, Viewport, compute_space};
///
/// let info = compute_space(Viewport::new(500.0, 900.0), 8, &SpaceConfig::default());
/// assert_eq!(info.grid_columns, 2);
/// assert!(info.should_auto_collapse);
/// ```
#[must_use]
pub fn compute_space(viewport: Viewport, card_count: usize, config: &SpaceConfig) -> SpaceInfo {
    let Viewport { width, height } = viewport;
    let grid_columns = grid_columns_for(width);
    let columns = f64::from(grid_columns);
    let padding = container_padding_for(width);

    let inner_width = width - 2.0 * padding;
    let usable_height = height - RESERVED_HEIGHT;
    let available_card_space = (inner_width - (columns - 1.0) * config.gap) / columns;

    let rows_needed = card_count.div_ceil(grid_columns as usize) as f64;
    let too_narrow = available_card_space < config.min_card_width;
    let too_tall = rows_needed * (config.min_card_height + config.gap) > usable_height;
    let too_many = card_count > config.collapse_threshold as usize;

    let ideal_space = card_count as f64 * config.min_card_width * config.min_card_height;
    let actual_space = inner_width * usable_height;
    let space_utilization = if actual_space > 0.0 {
        (ideal_space / actual_space).clamp(0.0, 1.0)
    } else {
        1.0
    };

    SpaceInfo {
        viewport_width: width,
        viewport_height: height,
        grid_columns,
        available_card_space,
        should_auto_collapse: too_narrow || too_tall || too_many,
        space_utilization,
    }
}

/// Tracks the viewport and card count and keeps a current [`SpaceInfo`].
///
/// Recomputation is synchronous: the host calls [`on_resize`](Self::on_resize)
/// for every resize event. Debouncing happens downstream, in the
/// auto-collapse engine.
#[derive(Debug, Clone)]
pub struct SpaceDetector {
    config: SpaceConfig,
    viewport: Viewport,
    card_count: usize,
    info: SpaceInfo,
}

impl SpaceDetector {
    /// Creates a detector and computes the initial snapshot immediately.
    ///
    /// The first snapshot is always computed, even when the detector is
    /// disabled, so there is no unset state.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_engine::space::{SpaceConfig, SpaceDetector, Viewport};
    ///
    /// let detector = SpaceDetector::new(Viewport::new(1280.0, 800.0), 4, SpaceConfig::default());
    /// assert_eq!(detector.info().grid_columns, 4);
    /// assert!(!detector.info().should_auto_collapse);
    /// ```
    #[must_use]
    pub fn new(viewport: Viewport, card_count: usize, config: SpaceConfig) -> Self {
        let info = compute_space(viewport, card_count, &config);
        Self {
            config,
            viewport,
            card_count,
            info,
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn info(&self) -> &SpaceInfo {
        &self.info
    }

    /// Returns the last viewport seen.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the detector configuration.
    #[must_use]
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Handles a viewport resize and returns the (possibly unchanged) snapshot.
    pub fn on_resize(&mut self, viewport: Viewport) -> &SpaceInfo {
        self.viewport = viewport;
        self.recompute();
        &self.info
    }

    /// Updates the number of cards on screen.
    pub fn set_card_count(&mut self, card_count: usize) -> &SpaceInfo {
        self.card_count = card_count;
        self.recompute();
        &self.info
    }

    /// Replaces the configuration and recomputes.
    pub fn set_config(&mut self, config: SpaceConfig) -> &SpaceInfo {
        self.config = config;
        self.recompute();
        &self.info
    }

    fn recompute(&mut self) {
        if self.config.enabled {
            self.info = compute_space(self.viewport, self.card_count, &self.config);
        }
    }
}
