//! Grid geometry and drop-target collision.
//!
//! Cards are laid out row-major in `columns` equal-width columns. Each row is
//! as tall as its tallest card. Collision detection picks the card whose
//! center is closest to the dragged point.

use cardgrid_protocol::CardId;

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns `true` if the point lies inside (edges inclusive on the top-left).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Column layout of the grid container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Number of columns. Treated as at least one.
    pub columns: u32,
    /// Padding on each side of the container.
    pub padding: f64,
    /// Gap between cards.
    pub gap: f64,
    /// Width of each card.
    pub card_width: f64,
}

impl GridGeometry {
    /// Lays out cards row-major and returns one rectangle per height given.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgrid_engine::geometry::{GridGeometry, Rect};
    ///
    /// let grid = GridGeometry { columns: 2, padding: 10.0, gap: 5.0, card_width: 100.0 };
    /// let rects = grid.layout(&[50.0, 80.0, 30.0]);
    /// assert_eq!(rects[1], Rect::new(115.0, 10.0, 100.0, 80.0));
    /// assert_eq!(rects[2], Rect::new(10.0, 95.0, 100.0, 30.0));
    /// ```
    #[must_use]
    pub fn layout(&self, heights: &[f64]) -> Vec<Rect> {
        let columns = self.columns.max(1) as usize;
        let mut rects = Vec::with_capacity(heights.len());
        let mut y = self.padding;

        for row in heights.chunks(columns) {
            let row_height = row.iter().copied().fold(0.0, f64::max);
            for (col, &height) in row.iter().enumerate() {
                let x = self.padding + col as f64 * (self.card_width + self.gap);
                rects.push(Rect::new(x, y, self.card_width, height));
            }
            y += row_height + self.gap;
        }

        rects
    }
}

/// Returns the id of the target whose center is closest to `point`.
///
/// Ties go to the earliest target. Returns `None` when there are no targets.
///
/// # Examples
///
/// ```
/// use cardgrid_engine::geometry::{Point, Rect, closest_center};
/// use cardgrid_protocol::CardId;
///
/// let targets = vec![
///     (CardId::from("a"), Rect::new(0.0, 0.0, 10.0, 10.0)),
///     (CardId::from("b"), Rect::new(20.0, 0.0, 10.0, 10.0)),
/// ];
/// assert_eq!(closest_center(Point::new(18.0, 5.0), &targets), Some(&CardId::from("b")));
/// ```
#[must_use]
pub fn closest_center(point: Point, targets: &[(CardId, Rect)]) -> Option<&CardId> {
    targets
        .iter()
        .min_by(|(_, a), (_, b)| {
            a.center()
                .distance_to(point)
                .total_cmp(&b.center().distance_to(point))
        })
        .map(|(id, _)| id)
}

/// Returns the id of the target containing `point`, if any.
#[must_use]
pub fn hit_test(point: Point, targets: &[(CardId, Rect)]) -> Option<&CardId> {
    targets
        .iter()
        .find(|(_, rect)| rect.contains(point))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> Vec<(CardId, Rect)> {
        let grid = GridGeometry {
            columns: 3,
            padding: 0.0,
            gap: 0.0,
            card_width: 100.0,
        };
        grid.layout(&[100.0; 6])
            .into_iter()
            .enumerate()
            .map(|(i, rect)| (CardId::new(format!("c{i}")), rect))
            .collect()
    }

    #[test]
    fn layout_is_row_major() {
        let rects = GridGeometry {
            columns: 3,
            padding: 0.0,
            gap: 0.0,
            card_width: 100.0,
        }
        .layout(&[100.0; 4]);

        assert_eq!(rects[2], Rect::new(200.0, 0.0, 100.0, 100.0));
        assert_eq!(rects[3], Rect::new(0.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn rows_take_tallest_height() {
        let rects = GridGeometry {
            columns: 2,
            padding: 0.0,
            gap: 10.0,
            card_width: 50.0,
        }
        .layout(&[20.0, 60.0, 20.0]);

        assert_eq!(rects[2].y, 70.0);
    }

    #[test]
    fn zero_columns_treated_as_one() {
        let rects = GridGeometry {
            columns: 0,
            padding: 0.0,
            gap: 0.0,
            card_width: 10.0,
        }
        .layout(&[10.0, 10.0]);
        assert_eq!(rects[1].y, 10.0);
    }

    #[test]
    fn closest_center_picks_nearest() {
        let targets = targets();
        let hit = closest_center(Point::new(240.0, 160.0), &targets);
        assert_eq!(hit.map(CardId::as_str), Some("c5"));
    }

    #[test]
    fn closest_center_outside_grid() {
        let targets = targets();
        let hit = closest_center(Point::new(-500.0, -500.0), &targets);
        assert_eq!(hit.map(CardId::as_str), Some("c0"));
    }

    #[test]
    fn closest_center_empty() {
        assert_eq!(closest_center(Point::default(), &[]), None);
    }

    #[test]
    fn hit_test_requires_containment() {
        let targets = targets();
        assert_eq!(
            hit_test(Point::new(150.0, 50.0), &targets).map(CardId::as_str),
            Some("c1")
        );
        assert_eq!(hit_test(Point::new(350.0, 50.0), &targets), None);
    }
}
