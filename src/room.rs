//! Room Structure
//!
//! An axis-aligned rectangular room on the dungeon grid.

use glam::IVec2;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{DungeonError, Result};
use crate::geometry::Point;

/// A rectangular room occupying cells `x1..x2` by `y1..y2` (half-open)
///
/// Corners are normalized on construction so `x1 <= x2` and `y1 <= y2`
/// always hold. Rooms are created during placement and never change
/// afterwards; they are consumed by carving and by the Delaunay net.
///
/// # Design Notes
///
/// Rooms only implement `Serialize`. Deserializing would bypass the
/// normalization in [`Room::new`].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Room {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl Room {
    /// Create a room from two opposite corners in any order
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the room has zero width or height.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_maze_dungeon::Room;
    ///
    /// let room = Room::new(7, 5, 1, 1).unwrap();
    /// assert_eq!(room.coords(), (1, 1, 7, 5));
    /// assert_eq!(room.area(), 24);
    /// ```
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self> {
        let (x1, x2) = if x2 < x1 { (x2, x1) } else { (x1, x2) };
        let (y1, y2) = if y2 < y1 { (y2, y1) } else { (y1, y2) };
        if x1 == x2 || y1 == y2 {
            return Err(DungeonError::DegenerateGeometry(format!(
                "zero-area room ({}, {})-({}, {})",
                x1, y1, x2, y2
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Left edge (inclusive)
    #[inline]
    pub fn x1(&self) -> i32 {
        self.x1
    }

    /// Top edge (inclusive)
    #[inline]
    pub fn y1(&self) -> i32 {
        self.y1
    }

    /// Right edge (exclusive)
    #[inline]
    pub fn x2(&self) -> i32 {
        self.x2
    }

    /// Bottom edge (exclusive)
    #[inline]
    pub fn y2(&self) -> i32 {
        self.y2
    }

    /// `(x1, y1, x2, y2)`
    #[inline]
    pub fn coords(&self) -> (i32, i32, i32, i32) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Width in cells
    #[inline]
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height in cells
    #[inline]
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Number of cells covered
    #[inline]
    pub fn area(&self) -> i32 {
        self.width() * self.height()
    }

    /// Centre of the rectangle, `((x1 + x2) / 2, (y1 + y2) / 2)`
    #[inline]
    pub fn centre(&self) -> Point {
        Point::new(
            (self.x1 + self.x2) as f64 / 2.0,
            (self.y1 + self.y2) as f64 / 2.0,
        )
    }

    /// Grid cell holding the centre, rounded down
    #[inline]
    pub fn centre_cell(&self) -> IVec2 {
        IVec2::new((self.x1 + self.x2).div_euclid(2), (self.y1 + self.y2).div_euclid(2))
    }

    /// Check if a grid cell lies inside the room
    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.x1 && cell.x < self.x2 && cell.y >= self.y1 && cell.y < self.y2
    }

    /// Iterate over every cell of the room, row by row
    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let (x1, x2) = (self.x1, self.x2);
        (self.y1..self.y2).flat_map(move |y| (x1..x2).map(move |x| IVec2::new(x, y)))
    }

    /// The room grown by `amount` cells on every side
    pub fn grow(&self, amount: i32) -> Room {
        Room {
            x1: self.x1.saturating_sub(amount),
            y1: self.y1.saturating_sub(amount),
            x2: self.x2.saturating_add(amount),
            y2: self.y2.saturating_add(amount),
        }
    }

    /// Check whether two rooms overlap
    ///
    /// Coordinate ranges must overlap strictly on both axes; rooms that
    /// merely touch do not intersect.
    pub fn intersects(&self, other: &Room) -> bool {
        let x_int = other.x1 < self.x2 && other.x2 > self.x1;
        let y_int = other.y1 < self.y2 && other.y2 > self.y1;
        x_int && y_int
    }

    /// Overlap test after growing both rooms by `padding` cells
    ///
    /// With a padding of 1, rooms separated by a single wall cell count
    /// as intersecting.
    pub fn intersects_padded(&self, other: &Room, padding: i32) -> bool {
        self.grow(padding).intersects(&other.grow(padding))
    }

    /// Overlapping x range `[lo, hi)` shared with another room, if any
    pub(crate) fn x_overlap(&self, other: &Room) -> Option<(i32, i32)> {
        let lo = self.x1.max(other.x1);
        let hi = self.x2.min(other.x2);
        (lo < hi).then_some((lo, hi))
    }

    /// Overlapping y range `[lo, hi)` shared with another room, if any
    pub(crate) fn y_overlap(&self, other: &Room) -> Option<(i32, i32)> {
        let lo = self.y1.max(other.y1);
        let hi = self.y2.min(other.y2);
        (lo < hi).then_some((lo, hi))
    }
}
