//! Growing-tree maze carving
//!
//! Corridors are carved on odd coordinates with walls on even ones, so a
//! grid with odd dimensions splits into a lattice of corridor cells
//! separated by single wall cells. Each call to [`grow_maze`] floods one
//! connected component of that lattice with a single region id.
//!
//! # Algorithm
//!
//! Keep a stack holding the current path. At the top cell, a direction is
//! valid when the cell two steps away is still wall and the cell three
//! steps away is inside the grid. No valid direction pops the stack.
//! Otherwise the previous direction is kept with probability
//! `1 - 1/windingness` (when still valid), else one is drawn uniformly;
//! the intermediate and destination cells are carved and the destination
//! is pushed.

use std::time::Instant;

use glam::IVec2;
use rand::Rng;

use crate::error::{DungeonError, Result};
use crate::grid::{Grid, CARDINALS, WALL};

/// Grow a maze region from `start`, labelling every carved cell `region`
///
/// `start` is carved even when no move is possible from it. Each cell is
/// carved at most once, so the returned count of carve operations never
/// exceeds the number of cells in the grid.
///
/// # Arguments
///
/// * `grid` - Grid to carve into
/// * `start` - Starting cell, normally odd-aligned and still wall
/// * `region` - Region id for every carved cell
/// * `windingness` - Straightness bias; `1` never prefers the previous direction
/// * `rng` - Random source
pub fn grow_maze<R: Rng + ?Sized>(
    grid: &mut Grid,
    start: IVec2,
    region: u32,
    windingness: u32,
    rng: &mut R,
) -> usize {
    let mut carved = 0;
    let mut stack = vec![start];
    let mut last_dir: Option<IVec2> = None;

    grid.carve(start, region);
    carved += 1;

    while let Some(&cell) = stack.last() {
        let open: Vec<IVec2> = CARDINALS
            .iter()
            .copied()
            .filter(|&dir| can_carve(grid, cell, dir))
            .collect();

        if open.is_empty() {
            stack.pop();
            last_dir = None;
            continue;
        }

        let dir = match last_dir {
            Some(last) if open.contains(&last) && !rng.gen_ratio(1, windingness.max(1)) => last,
            _ => open[rng.gen_range(0..open.len())],
        };

        grid.carve(cell + dir, region);
        grid.carve(cell + dir * 2, region);
        carved += 2;

        stack.push(cell + dir * 2);
        last_dir = Some(dir);
    }

    carved
}

/// Fill every odd-aligned wall cell with maze corridors
///
/// Each connected maze component gets a fresh region id from the grid,
/// continuing after whatever ids the rooms already took.
///
/// # Errors
///
/// Returns `InvalidConfig` if the grid does not have odd dimensions.
///
/// # Returns
///
/// Number of maze regions carved
pub fn fill_maze<R: Rng + ?Sized>(grid: &mut Grid, windingness: u32, rng: &mut R) -> Result<usize> {
    if !grid.is_maze_aligned() {
        return Err(DungeonError::InvalidConfig(format!(
            "maze carving needs odd dimensions (got {}x{})",
            grid.width(),
            grid.height()
        )));
    }

    let start = Instant::now();
    let mut regions = 0;
    let mut carved = 0;

    for y in (1..grid.height() as i32).step_by(2) {
        for x in (1..grid.width() as i32).step_by(2) {
            let pos = IVec2::new(x, y);
            if grid.get(pos) != Some(WALL) {
                continue;
            }
            let region = grid.new_region();
            carved += grow_maze(grid, pos, region, windingness, rng);
            regions += 1;
        }
    }

    log::debug!(
        "[maze] {} regions, {} cells carved in {:?}",
        regions,
        carved,
        start.elapsed()
    );

    Ok(regions)
}

/// Two steps away is wall and three steps away is still on the grid
#[inline]
fn can_carve(grid: &Grid, cell: IVec2, dir: IVec2) -> bool {
    grid.in_bounds(cell + dir * 3) && grid.get(cell + dir * 2) == Some(WALL)
}
