//! Bit-flag tile output for autotiling
//!
//! Open cells become [`TileFlags::FLOOR`]. Wall cells carry one direction
//! flag per cardinal neighbour that is open, so a renderer can pick edge
//! and corner sprites without re-deriving adjacency. A wall with no open
//! neighbour is `0`.

use bitflags::bitflags;
use glam::IVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, CARDINALS};

bitflags! {
    /// Tile code bits
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u8 {
        const FLOOR = 1;
        /// Open cell to the north (towards y = 0)
        const NORTH = 2;
        const SOUTH = 4;
        const EAST = 8;
        const WEST = 16;
    }
}

impl TileFlags {
    /// Direction flags in [`CARDINALS`] order
    pub const DIRECTIONS: [TileFlags; 4] = [
        TileFlags::NORTH,
        TileFlags::SOUTH,
        TileFlags::EAST,
        TileFlags::WEST,
    ];

    /// Check if this tile is walkable floor
    #[inline]
    pub fn is_floor(self) -> bool {
        self.contains(TileFlags::FLOOR)
    }

    /// Wall cell with at least one open neighbour
    #[inline]
    pub fn is_edge(self) -> bool {
        !self.is_floor() && !self.is_empty()
    }
}

/// A grid of tile codes derived from a region grid
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileFlags>,
}

impl TileGrid {
    /// Compute tile flags for every cell of `grid`
    pub fn from_grid(grid: &Grid) -> Self {
        let tiles = grid
            .positions()
            .map(|pos| {
                if grid.is_open(pos) {
                    return TileFlags::FLOOR;
                }
                CARDINALS
                    .iter()
                    .zip(TileFlags::DIRECTIONS)
                    .filter(|&(&dir, _)| grid.is_open(pos + dir))
                    .fold(TileFlags::empty(), |acc, (_, flag)| acc | flag)
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            tiles,
        }
    }

    /// Get width in tiles
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get height in tiles
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get flags at `pos`, or `None` off the grid
    pub fn get(&self, pos: IVec2) -> Option<TileFlags> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height {
            return None;
        }
        self.tiles.get(pos.y as usize * self.width + pos.x as usize).copied()
    }

    /// Raw tile code at `pos`
    pub fn code(&self, pos: IVec2) -> Option<u8> {
        self.get(pos).map(|tile| tile.bits())
    }

    /// Tile codes row by row, `rows()[y][x]`
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.tiles
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|t| t.bits()).collect())
            .collect()
    }
}
