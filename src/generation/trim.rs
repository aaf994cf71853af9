//! Dead-end removal
//!
//! A dead end is an open cell with exactly three wall neighbours. Filling
//! one can turn its single open neighbour into a new dead end, so removal
//! runs as a worklist until no dead ends remain. The fixed point depends
//! only on the dead-end predicate, not on processing order.

use std::time::Instant;

use glam::IVec2;

use crate::grid::{Grid, CARDINALS};

/// Open cell with exactly one open cardinal neighbour
///
/// Cells outside the grid count as wall.
pub fn is_dead_end(grid: &Grid, pos: IVec2) -> bool {
    grid.is_open(pos) && CARDINALS.iter().filter(|&&dir| grid.is_wall(pos + dir)).count() == 3
}

/// Repeatedly fill dead ends until none are left
///
/// Returns the number of cells filled. Running it again on the result
/// fills nothing.
pub fn remove_dead_ends(grid: &mut Grid) -> usize {
    let start = Instant::now();
    let mut worklist: Vec<IVec2> = grid.positions().filter(|&pos| is_dead_end(grid, pos)).collect();
    let mut removed = 0;

    while let Some(pos) = worklist.pop() {
        // Earlier removals may have changed this cell's neighbourhood
        if !is_dead_end(grid, pos) {
            continue;
        }

        grid.fill(pos);
        removed += 1;

        for dir in CARDINALS {
            let next = pos + dir;
            if is_dead_end(grid, next) {
                worklist.push(next);
            }
        }
    }

    log::debug!("[trim] removed {} dead-end cells in {:?}", removed, start.elapsed());

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::connector::connect_regions;
    use crate::generation::maze::fill_maze;
    use crate::room::Room;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_dead_end_predicate() {
        let mut grid = Grid::new(7, 3);
        for x in 1..6 {
            grid.carve(IVec2::new(x, 1), 1);
        }
        assert!(is_dead_end(&grid, IVec2::new(1, 1)));
        assert!(is_dead_end(&grid, IVec2::new(5, 1)));
        assert!(!is_dead_end(&grid, IVec2::new(3, 1)));
        assert!(!is_dead_end(&grid, IVec2::new(0, 1)));
    }

    #[test]
    fn test_isolated_cell_is_not_a_dead_end() {
        let mut grid = Grid::new(3, 3);
        grid.carve(IVec2::new(1, 1), 1);
        assert!(!is_dead_end(&grid, IVec2::new(1, 1)));
        assert_eq!(remove_dead_ends(&mut grid), 0);
    }

    #[test]
    fn test_corridor_between_rooms_survives() {
        let mut grid = Grid::new(13, 5);
        let left = Room::new(1, 1, 4, 4).unwrap();
        let right = Room::new(9, 1, 12, 4).unwrap();
        grid.carve_room(&left, 1);
        grid.carve_room(&right, 2);
        for x in 4..9 {
            grid.carve(IVec2::new(x, 2), 3);
        }
        // A spur off the corridor
        grid.carve(IVec2::new(6, 3), 3);

        let removed = remove_dead_ends(&mut grid);

        assert_eq!(removed, 1);
        assert!(grid.is_wall(IVec2::new(6, 3)));
        for x in 4..9 {
            assert!(grid.is_open(IVec2::new(x, 2)));
        }
    }

    #[test]
    fn test_corridor_collapses_to_its_room() {
        let mut grid = Grid::new(11, 5);
        let room = Room::new(1, 1, 4, 4).unwrap();
        grid.carve_room(&room, 1);
        for x in 4..10 {
            grid.carve(IVec2::new(x, 2), 2);
        }

        assert_eq!(remove_dead_ends(&mut grid), 6);
        assert_eq!(grid.open_cell_count(), 9);
    }

    #[test]
    fn test_trimming_is_idempotent_and_keeps_connectivity() {
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = Grid::new(31, 21);
            let room = Room::new(11, 7, 18, 14).unwrap();
            let region = grid.new_region();
            grid.carve_room(&room, region);
            fill_maze(&mut grid, 20, &mut rng).unwrap();
            connect_regions(&mut grid, 20, &mut rng).unwrap();

            let before = grid.open_cell_count();
            let removed = remove_dead_ends(&mut grid);
            assert_eq!(grid.open_cell_count(), before - removed);
            assert!(grid.is_connected());
            assert!(grid.positions().all(|p| !is_dead_end(&grid, p)));

            let snapshot = grid.clone();
            assert_eq!(remove_dead_ends(&mut grid), 0);
            assert_eq!(grid, snapshot);
        }
    }
}
