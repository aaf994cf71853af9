//! 2D point with exact equality

use std::hash::{Hash, Hasher};

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in the plane
///
/// Equality is exact value equality with no tolerance. Points are expected
/// to be finite; room centres on an integer grid always are.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Lexicographic ordering on (x, y)
    #[inline]
    pub(crate) fn precedes(&self, other: &Point) -> bool {
        self.x < other.x || (self.x == other.x && self.y < other.y)
    }

    /// Convert to a glam vector
    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Squared Euclidean distance to `other`
    #[inline]
    pub fn distance_squared(&self, other: Point) -> f64 {
        self.to_dvec2().distance_squared(other.to_dvec2())
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }
}

// -0.0 == 0.0, so both must hash alike
#[inline]
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.to_dvec2()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
