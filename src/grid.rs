//! Region-labelled dungeon grid
//!
//! Every cell holds a region id: `0` is uncarved wall, anything else is an
//! open cell belonging to that region. Region ids are handed out by
//! [`Grid::new_region`] and only ever increase.

use std::collections::VecDeque;
use std::fmt;

use glam::IVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::{DungeonError, Result};
use crate::room::Room;

/// Region id of an uncarved cell
pub const WALL: u32 = 0;

/// Cardinal step vectors in north, south, east, west order
///
/// North is towards `y = 0`.
pub const CARDINALS: [IVec2; 4] = [IVec2::NEG_Y, IVec2::Y, IVec2::X, IVec2::NEG_X];

/// A 2D grid of region ids
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
    /// Last region id handed out
    regions: u32,
}

/// Unchecked serialized form of [`Grid`]
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
    regions: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = DungeonError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let expected = raw.width.checked_mul(raw.height);
        if expected != Some(raw.cells.len()) {
            return Err(DungeonError::InvalidConfig(format!(
                "grid of {}x{} cannot hold {} cells",
                raw.width,
                raw.height,
                raw.cells.len()
            )));
        }
        if let Some(&max) = raw.cells.iter().max() {
            if max > raw.regions {
                return Err(DungeonError::InvalidConfig(format!(
                    "cell region {} exceeds last issued region {}",
                    max, raw.regions
                )));
            }
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            cells: raw.cells,
            regions: raw.regions,
        })
    }
}

impl Grid {
    /// Create a grid of solid wall
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![WALL; width * height],
            regions: 0,
        }
    }

    /// Get width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Odd width and height, so odd cells line up with the maze's 2-cell stride
    #[inline]
    pub fn is_maze_aligned(&self) -> bool {
        self.width % 2 == 1 && self.height % 2 == 1
    }

    /// Check if `pos` lies on the grid
    #[inline]
    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// On the outermost ring of cells
    #[inline]
    pub fn is_boundary(&self, pos: IVec2) -> bool {
        pos.x == 0
            || pos.y == 0
            || pos.x as usize == self.width - 1
            || pos.y as usize == self.height - 1
    }

    #[inline]
    fn index(&self, pos: IVec2) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    /// Region id at `pos`, `None` outside the grid
    #[inline]
    pub fn get(&self, pos: IVec2) -> Option<u32> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// Open (carved) cell; out-of-bounds cells count as wall
    #[inline]
    pub fn is_open(&self, pos: IVec2) -> bool {
        self.get(pos).is_some_and(|id| id != WALL)
    }

    /// Wall cell; out-of-bounds cells count as wall
    #[inline]
    pub fn is_wall(&self, pos: IVec2) -> bool {
        !self.is_open(pos)
    }

    /// Write a region id; writes outside the grid are ignored
    #[inline]
    pub fn set(&mut self, pos: IVec2, region: u32) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.cells[idx] = region;
        }
    }

    /// Carve a cell into `region`
    #[inline]
    pub fn carve(&mut self, pos: IVec2, region: u32) {
        debug_assert!(region != WALL, "carving with the wall id");
        self.set(pos, region);
    }

    /// Turn a cell back into wall
    #[inline]
    pub fn fill(&mut self, pos: IVec2) {
        self.set(pos, WALL);
    }

    /// Carve every cell of a room with a single region id
    pub fn carve_room(&mut self, room: &Room, region: u32) {
        for cell in room.cells() {
            self.carve(cell, region);
        }
    }

    /// Allocate a fresh region id
    pub fn new_region(&mut self) -> u32 {
        self.regions += 1;
        self.regions
    }

    /// Number of region ids handed out so far
    #[inline]
    pub fn region_count(&self) -> u32 {
        self.regions
    }

    /// Count cells that are not wall
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != WALL).count()
    }

    /// Iterate over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = IVec2> {
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y)))
    }

    /// Interior positions (everything but the outer ring)
    pub fn interior_positions(&self) -> impl Iterator<Item = IVec2> {
        let width = self.width as i32;
        let height = self.height as i32;
        (1..height - 1).flat_map(move |y| (1..width - 1).map(move |x| IVec2::new(x, y)))
    }

    /// Number of 4-connected components of open cells
    pub fn component_count(&self) -> usize {
        let mut seen = vec![false; self.cells.len()];
        let mut components = 0;

        for pos in self.positions() {
            let idx = self.index(pos);
            if seen[idx] || self.cells[idx] == WALL {
                continue;
            }
            components += 1;
            seen[idx] = true;

            let mut queue = VecDeque::from([pos]);
            while let Some(current) = queue.pop_front() {
                for dir in CARDINALS {
                    let next = current + dir;
                    if !self.is_open(next) {
                        continue;
                    }
                    let next_idx = self.index(next);
                    if !seen[next_idx] {
                        seen[next_idx] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        components
    }

    /// Every open cell reaches every other open cell
    ///
    /// A grid without open cells is trivially connected.
    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for &id in row {
                f.write_str(if id == WALL { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_solid() {
        let grid = Grid::new(9, 7);
        assert_eq!(grid.width(), 9);
        assert_eq!(grid.height(), 7);
        assert_eq!(grid.open_cell_count(), 0);
        assert_eq!(grid.region_count(), 0);
        assert!(grid.is_maze_aligned());
        assert!(!Grid::new(8, 7).is_maze_aligned());
    }

    #[test]
    fn test_bounds_and_boundary() {
        let grid = Grid::new(5, 5);
        assert!(grid.in_bounds(IVec2::new(4, 4)));
        assert!(!grid.in_bounds(IVec2::new(5, 0)));
        assert!(!grid.in_bounds(IVec2::new(-1, 2)));
        assert!(grid.is_boundary(IVec2::new(0, 2)));
        assert!(grid.is_boundary(IVec2::new(2, 4)));
        assert!(!grid.is_boundary(IVec2::new(2, 2)));
        assert_eq!(grid.get(IVec2::new(7, 7)), None);
        assert!(grid.is_wall(IVec2::new(7, 7)));
    }

    #[test]
    fn test_regions_are_monotonic() {
        let mut grid = Grid::new(5, 5);
        assert_eq!(grid.new_region(), 1);
        assert_eq!(grid.new_region(), 2);
        assert_eq!(grid.region_count(), 2);
    }

    #[test]
    fn test_carve_room_and_fill() {
        let mut grid = Grid::new(9, 9);
        let room = Room::new(1, 1, 4, 3).unwrap();
        let region = grid.new_region();
        grid.carve_room(&room, region);

        assert_eq!(grid.open_cell_count(), 6);
        assert_eq!(grid.get(IVec2::new(3, 2)), Some(region));

        grid.fill(IVec2::new(3, 2));
        assert!(grid.is_wall(IVec2::new(3, 2)));
        assert_eq!(grid.open_cell_count(), 5);
    }

    #[test]
    fn test_component_count() {
        let mut grid = Grid::new(7, 3);
        assert!(grid.is_connected());

        grid.carve(IVec2::new(1, 1), 1);
        grid.carve(IVec2::new(2, 1), 1);
        grid.carve(IVec2::new(4, 1), 2);
        assert_eq!(grid.component_count(), 2);
        assert!(!grid.is_connected());

        // Connectivity ignores ids, only open versus wall
        grid.carve(IVec2::new(3, 1), 9);
        assert_eq!(grid.component_count(), 1);
    }

    #[test]
    fn test_interior_positions_skip_boundary() {
        let grid = Grid::new(5, 4);
        let interior: Vec<IVec2> = grid.interior_positions().collect();
        assert_eq!(interior.len(), 3 * 2);
        assert!(interior.iter().all(|&p| !grid.is_boundary(p)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip_and_validation() {
        let mut grid = Grid::new(5, 3);
        let region = grid.new_region();
        grid.carve(IVec2::new(2, 1), region);

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);

        let short = r#"{"width":5,"height":3,"cells":[0,0,0],"regions":0}"#;
        assert!(serde_json::from_str::<Grid>(short).is_err());

        let overflow = format!(r#"{{"width":{},"height":2,"cells":[],"regions":0}}"#, usize::MAX);
        assert!(serde_json::from_str::<Grid>(&overflow).is_err());

        let unknown_region = r#"{"width":2,"height":1,"cells":[0,7],"regions":1}"#;
        assert!(serde_json::from_str::<Grid>(unknown_region).is_err());
    }

    #[test]
    fn test_display() {
        let mut grid = Grid::new(3, 3);
        grid.carve(IVec2::new(1, 1), 1);
        assert_eq!(grid.to_string(), "###\n#.#\n###\n");
    }
}
