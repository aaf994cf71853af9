//! Triangle with cached circumcircle

use super::{Line, Point};
use crate::error::{DungeonError, Result};
use glam::DVec2;

/// Circle through the three vertices of a triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circumcircle {
    pub center: Point,
    /// Squared radius, kept squared so containment tests avoid a sqrt
    pub radius_squared: f64,
}

impl Circumcircle {
    /// Circumcircle radius
    pub fn radius(&self) -> f64 {
        self.radius_squared.sqrt()
    }

    /// Strict containment: points exactly on the circle are outside
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance_squared(point) < self.radius_squared
    }
}

/// An immutable triangle
///
/// The circumcircle is computed once at construction. Collinear vertices
/// have no circumcircle and are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    p1: Point,
    p2: Point,
    p3: Point,
    circumcircle: Circumcircle,
}

impl Triangle {
    /// Build a triangle from three vertices
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the points are collinear (including
    /// repeated points).
    pub fn new(p1: Point, p2: Point, p3: Point) -> Result<Self> {
        let circumcircle = circumcircle(p1.to_dvec2(), p2.to_dvec2(), p3.to_dvec2()).ok_or_else(|| {
            DungeonError::DegenerateGeometry(format!(
                "collinear triangle ({}, {}), ({}, {}), ({}, {})",
                p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
            ))
        })?;
        Ok(Self { p1, p2, p3, circumcircle })
    }

    /// A triangle comfortably enclosing the box `[0, width] x [0, height]`
    ///
    /// Used as the outer triangle for Bowyer-Watson over points on a grid.
    /// The vertices sit far from the box so hull edges of the inner points
    /// are not stolen by the synthetic vertices.
    pub fn enclosing(width: f64, height: f64) -> Result<Self> {
        let margin = width.max(height).max(1.0) * 10.0;
        Self::new(
            Point::new(-margin, -margin),
            Point::new(5.0 * margin, -margin),
            Point::new(-margin, 5.0 * margin),
        )
    }

    /// Get the three corners
    #[inline]
    pub fn vertices(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// The three edges `p1-p2`, `p2-p3`, `p3-p1`
    #[inline]
    pub fn edges(&self) -> [Line; 3] {
        [
            Line::new(self.p1, self.p2),
            Line::new(self.p2, self.p3),
            Line::new(self.p3, self.p1),
        ]
    }

    /// Check if `point` is one of the corners
    #[inline]
    pub fn has_vertex(&self, point: Point) -> bool {
        self.p1 == point || self.p2 == point || self.p3 == point
    }

    /// Point strictly inside the triangle (not on an edge)
    pub fn contains(&self, point: Point) -> bool {
        let [d1, d2, d3] = self.sides(point);
        (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
    }

    /// Point inside the triangle or on its boundary
    pub fn covers(&self, point: Point) -> bool {
        let [d1, d2, d3] = self.sides(point);
        (d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0) || (d1 <= 0.0 && d2 <= 0.0 && d3 <= 0.0)
    }

    /// Signed side of `point` relative to each directed edge
    fn sides(&self, point: Point) -> [f64; 3] {
        let side =
            |u: Point, v: Point| (v.x - u.x) * (point.y - u.y) - (v.y - u.y) * (point.x - u.x);
        [side(self.p1, self.p2), side(self.p2, self.p3), side(self.p3, self.p1)]
    }

    /// Get the cached circumcircle
    #[inline]
    pub fn circumcircle(&self) -> &Circumcircle {
        &self.circumcircle
    }

    /// Check if `point` lies strictly inside the circumcircle
    #[inline]
    pub fn in_circumcircle(&self, point: Point) -> bool {
        self.circumcircle.contains(point)
    }
}

/// Determinant form of the circumcenter; `None` when the points are collinear
fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> Option<Circumcircle> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d == 0.0 || !d.is_finite() {
        return None;
    }

    let (a2, b2, c2) = (a.length_squared(), b.length_squared(), c.length_squared());
    let center = DVec2::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    );
    if !center.is_finite() {
        return None;
    }

    Some(Circumcircle {
        center: center.into(),
        radius_squared: center.distance_squared(a),
    })
}
