//! Undirected line segment

use super::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An undirected edge between two points
///
/// Endpoints are stored in lexicographic order, so `Line::new(a, b)` and
/// `Line::new(b, a)` are the same value and hash identically.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    a: Point,
    b: Point,
}

impl Line {
    /// Create a line; endpoint order does not matter
    pub fn new(p1: Point, p2: Point) -> Self {
        if p2.precedes(&p1) {
            Self { a: p2, b: p1 }
        } else {
            Self { a: p1, b: p2 }
        }
    }

    /// The lexicographically smaller endpoint
    #[inline]
    pub fn a(&self) -> Point {
        self.a
    }

    /// The lexicographically larger endpoint
    #[inline]
    pub fn b(&self) -> Point {
        self.b
    }

    /// Get both endpoints in canonical order
    #[inline]
    pub fn endpoints(&self) -> (Point, Point) {
        (self.a, self.b)
    }

    /// Check whether `point` is one of the endpoints
    #[inline]
    pub fn touches(&self, point: Point) -> bool {
        self.a == point || self.b == point
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        self.a.distance_squared(self.b).sqrt()
    }
}
