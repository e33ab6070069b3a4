//! Board geometry and drop-target collision detection.
//!
//! Coordinates are integer pixels. Centers are compared in doubled
//! coordinates so no division or floating point is needed.

use super::{DealId, DropTarget, StageId};
use serde::{Deserialize, Serialize};

/// A pointer position in board pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the squared distance to `other`.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// An axis-aligned rectangle occupied by a droppable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns whether the point lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        let (px, py) = (i64::from(point.x), i64::from(point.y));
        px >= i64::from(self.x) && px <= right && py >= i64::from(self.y) && py <= bottom
    }

    /// Squared distance from the point to the rectangle center, in doubled
    /// coordinates.
    fn doubled_center_distance(&self, point: Point) -> i64 {
        let dx = 2 * i64::from(point.x) - (2 * i64::from(self.x) + i64::from(self.width));
        let dy = 2 * i64::from(point.y) - (2 * i64::from(self.y) + i64::from(self.height));
        dx * dx + dy * dy
    }
}

/// A droppable element under the pointer: a column or a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Droppable {
    /// What dropping here targets.
    pub target: DropTarget,
    /// Where the element is drawn.
    pub rect: Rect,
}

/// Picks the droppable whose center is closest to the pointer among those
/// containing it.
///
/// Ties are broken by preferring cards over columns and then by identifier,
/// so the result never depends on the order of `droppables`.
#[must_use]
pub fn closest_center(point: Point, droppables: &[Droppable]) -> Option<DropTarget> {
    droppables
        .iter()
        .filter(|droppable| droppable.rect.contains(point))
        .min_by_key(|droppable| {
            (
                droppable.rect.doubled_center_distance(point),
                droppable.target.tie_break_key(),
            )
        })
        .map(|droppable| droppable.target)
}

/// Layout of the rendered board, reported by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    bounds: Rect,
    droppables: Vec<Droppable>,
}

impl BoardLayout {
    /// Creates a layout covering `bounds` with no droppables.
    #[must_use]
    pub const fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            droppables: Vec::new(),
        }
    }

    /// Adds a column droppable.
    #[must_use]
    pub fn with_column(mut self, stage_id: StageId, rect: Rect) -> Self {
        self.droppables.push(Droppable {
            target: DropTarget::Column(stage_id),
            rect,
        });
        self
    }

    /// Adds a card droppable.
    #[must_use]
    pub fn with_card(mut self, deal_id: DealId, rect: Rect) -> Self {
        self.droppables.push(Droppable {
            target: DropTarget::Card(deal_id),
            rect,
        });
        self
    }

    /// Returns whether the pointer is over the board at all.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// Resolves the drop target under the pointer.
    #[must_use]
    pub fn target_at(&self, point: Point) -> Option<DropTarget> {
        closest_center(point, &self.droppables)
    }
}
