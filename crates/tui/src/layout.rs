//! Centralized layout measurements for the TUI.
//!
//! The layout engine thinks in CSS pixels. The terminal host maps one cell to
//! an 8×16 pixel box so the breakpoints and minimum card sizes keep their
//! meaning, then converts the pixel rectangles it lays out back into cells for
//! rendering.

use cardgrid_engine::geometry::{self, GridGeometry, Point};
use cardgrid_engine::space::{Viewport, container_padding_for};
use cardgrid_protocol::{Card, CardId, CardMode};
use ratatui::layout::Rect;

/// Pixels per terminal column.
pub const CELL_WIDTH_PX: f64 = 8.0;

/// Pixels per terminal row.
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Height of the header bar in rows.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the status bar in rows.
pub const STATUS_HEIGHT: u16 = 1;

/// Pixel height of an expanded card.
pub const EXPANDED_CARD_HEIGHT_PX: f64 = 160.0;

/// Pixel height of a compact card.
pub const COMPACT_CARD_HEIGHT_PX: f64 = 48.0;

/// The most grid columns a user can ask for.
pub const MAX_COLUMNS: u32 = 6;

/// Minimum terminal height for useful rendering.
pub const MIN_HEIGHT: u16 = 10;

/// Minimum terminal width for useful rendering.
pub const MIN_WIDTH: u16 = 40;

/// Converts a terminal size in cells to a pixel viewport.
///
/// # Examples
///
/// ```
/// use cardgrid_tui::layout::viewport_for;
///
/// let viewport = viewport_for(80, 24);
/// assert_eq!(viewport.width, 640.0);
/// assert_eq!(viewport.height, 384.0);
/// ```
#[must_use]
pub fn viewport_for(width: u16, height: u16) -> Viewport {
    Viewport::new(
        f64::from(width) * CELL_WIDTH_PX,
        f64::from(height) * CELL_HEIGHT_PX,
    )
}

/// Returns the pixel point at the center of a cell, relative to `origin`.
#[must_use]
pub fn cell_to_point(origin: Rect, column: u16, row: u16, scroll_px: f64) -> Point {
    let dx = f64::from(column.saturating_sub(origin.x)) + 0.5;
    let dy = f64::from(row.saturating_sub(origin.y)) + 0.5;
    Point::new(dx * CELL_WIDTH_PX, dy * CELL_HEIGHT_PX + scroll_px)
}

/// Returns the pixel height of a card in the given mode.
#[must_use]
pub const fn card_height_px(mode: CardMode) -> f64 {
    match mode {
        CardMode::Expanded => EXPANDED_CARD_HEIGHT_PX,
        CardMode::Compact => COMPACT_CARD_HEIGHT_PX,
    }
}

/// Card rectangles for one frame, in pixels relative to the grid area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLayout {
    /// One rectangle per card, in display order.
    pub rects: Vec<(CardId, geometry::Rect)>,
}

impl GridLayout {
    /// Lays out `cards` in display order across `columns` columns of a grid
    /// `width` pixels wide.
    ///
    /// Padding follows the viewport breakpoints and card width fills the
    /// remaining row evenly.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_protocol::Card;
    /// use cardgrid_tui::layout::GridLayout;
    ///
    /// let cards = vec![Card::new("a", 0), Card::new("b", 1), Card::new("c", 2)];
    /// let layout = GridLayout::compute(&cards, 2, 640.0, 16.0);
    /// assert_eq!(layout.rects.len(), 3);
    /// assert_eq!(layout.rects[2].1.x, layout.rects[0].1.x);
    /// ```
    #[must_use]
    pub fn compute(cards: &[Card], columns: u32, width: f64, gap: f64) -> Self {
        let columns = columns.max(1);
        let padding = container_padding_for(width);
        let free = width - 2.0 * padding - f64::from(columns - 1) * gap;
        let grid = GridGeometry {
            columns,
            padding,
            gap,
            card_width: (free / f64::from(columns)).max(CELL_WIDTH_PX),
        };

        let heights: Vec<f64> = cards.iter().map(|card| card_height_px(card.mode)).collect();
        let rects = cards
            .iter()
            .map(|card| card.id.clone())
            .zip(grid.layout(&heights))
            .collect();
        Self { rects }
    }

    /// Returns the rectangle of a card.
    #[must_use]
    pub fn rect_of(&self, id: &CardId) -> Option<&geometry::Rect> {
        self.rects
            .iter()
            .find(|(card, _)| card == id)
            .map(|(_, rect)| rect)
    }

    /// Returns the total pixel height of the grid, bottom padding excluded.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.rects
            .iter()
            .map(|(_, rect)| rect.y + rect.height)
            .fold(0.0, f64::max)
    }
}

/// Converts a pixel rectangle to cells inside `area`, scrolled up by
/// `scroll_rows`.
///
/// Returns `None` when the rectangle starts above the area (scrolled past)
/// or below it. A rectangle overflowing the bottom or right edge is clipped.
#[must_use]
pub fn to_cells(rect: &geometry::Rect, area: Rect, scroll_rows: u16) -> Option<Rect> {
    let left = (rect.x / CELL_WIDTH_PX).round() as i64;
    let top = (rect.y / CELL_HEIGHT_PX).round() as i64 - i64::from(scroll_rows);
    let width = (rect.width / CELL_WIDTH_PX).floor() as i64;
    let height = (rect.height / CELL_HEIGHT_PX).round() as i64;

    if top < 0 || left < 0 {
        return None;
    }
    let right = (left + width).min(i64::from(area.width));
    let bottom = (top + height).min(i64::from(area.height));
    if right <= left || bottom <= top {
        return None;
    }

    Some(Rect {
        x: area.x + u16::try_from(left).ok()?,
        y: area.y + u16::try_from(top).ok()?,
        width: u16::try_from(right - left).ok()?,
        height: u16::try_from(bottom - top).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_maps_cells_to_pixels() {
        let viewport = viewport_for(128, 50);
        assert_eq!(viewport.width, 1024.0);
        assert_eq!(viewport.height, 800.0);
    }

    #[test]
    fn cell_to_point_uses_cell_center_and_scroll() {
        let origin = Rect::new(0, 3, 80, 20);
        let point = cell_to_point(origin, 2, 4, 32.0);
        assert_eq!(point, Point::new(20.0, 24.0 + 32.0));
    }

    #[test]
    fn compute_wraps_rows_by_tallest_card() {
        let cards = vec![
            Card::new("a", 0).with_mode(CardMode::Compact),
            Card::new("b", 1),
            Card::new("c", 2),
        ];
        let layout = GridLayout::compute(&cards, 2, 640.0, 16.0);

        let a = layout.rects[0].1;
        let c = layout.rects[2].1;
        assert_eq!(a.height, COMPACT_CARD_HEIGHT_PX);
        assert_eq!(c.y, a.y + EXPANDED_CARD_HEIGHT_PX + 16.0);
        assert_eq!(
            layout.content_height(),
            c.y + EXPANDED_CARD_HEIGHT_PX
        );
    }

    #[test]
    fn rect_of_finds_card() {
        let cards = vec![Card::new("a", 0), Card::new("b", 1)];
        let layout = GridLayout::compute(&cards, 2, 640.0, 16.0);
        let b = layout.rect_of(&CardId::from("b")).expect("b laid out");
        assert!(b.x > layout.rects[0].1.x);
        assert!(layout.rect_of(&CardId::from("missing")).is_none());
    }

    #[test]
    fn to_cells_converts_and_clips() {
        let area = Rect::new(0, 3, 80, 10);
        let rect = geometry::Rect::new(16.0, 16.0, 160.0, 160.0);

        let cells = to_cells(&rect, area, 0).expect("visible");
        assert_eq!(cells, Rect::new(2, 4, 20, 9));

        let scrolled = to_cells(&rect, area, 1).expect("still visible");
        assert_eq!(scrolled, Rect::new(2, 3, 20, 10));

        assert!(to_cells(&rect, area, 2).is_none());
        assert!(to_cells(&rect, Rect::new(0, 3, 80, 1), 0).is_none());
    }
}
