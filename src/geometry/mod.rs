//! Planar geometry primitives
//!
//! Pure value types used by the Delaunay connectivity net: points with
//! exact equality, undirected lines with symmetric equality and hashing,
//! and triangles carrying a precomputed circumcircle.

mod line;
mod point;
mod triangle;

pub use line::Line;
pub use point::Point;
pub use triangle::{Circumcircle, Triangle};
