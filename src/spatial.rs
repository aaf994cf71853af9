//! Spatial indexing for nearest-room lookups
//!
//! This module is only available with the `spatial-index` feature.

use std::fmt;

use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::geometry::Point;

/// KD-tree over room centres
///
/// Answers "which room is closest to this point" in O(log n), e.g. for
/// placing spawns or mapping a click back to a room.
#[derive(Clone)]
pub struct RoomIndex {
    // kiddo cannot build a tree from zero points
    tree: Option<ImmutableKdTree<f64, usize, 2, 32>>,
    len: usize,
}

impl RoomIndex {
    /// Build the index from room centres, indexed in slice order
    ///
    /// # Example
    ///
    /// ```
    /// use rust_maze_dungeon::geometry::Point;
    /// use rust_maze_dungeon::RoomIndex;
    ///
    /// let centres = [Point::new(2.5, 2.5), Point::new(20.5, 4.5), Point::new(9.0, 15.0)];
    /// let index = RoomIndex::new(&centres);
    ///
    /// assert_eq!(index.find_nearest(Point::new(18.0, 6.0)), Some(1));
    /// assert_eq!(RoomIndex::new(&[]).find_nearest(Point::new(0.0, 0.0)), None);
    /// ```
    pub fn new(centres: &[Point]) -> Self {
        let points: Vec<[f64; 2]> = centres.iter().map(|c| [c.x, c.y]).collect();
        let tree = (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points));

        Self {
            tree,
            len: centres.len(),
        }
    }

    /// Index of the centre closest to `point`, or `None` if there are no rooms
    pub fn find_nearest(&self, point: Point) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let nearest = tree.nearest_one::<SquaredEuclidean>(&[point.x, point.y]);
        Some(nearest.item as usize)
    }

    /// Number of indexed rooms
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no rooms
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for RoomIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomIndex").field("len", &self.len).finish_non_exhaustive()
    }
}
