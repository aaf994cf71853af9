//! Region connector: merges every region into one connected component
//!
//! A connector is a wall cell whose cardinal neighbours belong to two or
//! more different regions. Connectors are carved one at a time, picked
//! uniformly at random, and the touched regions are merged in a
//! [`UnionFind`]. After each merge, connectors that now join only one
//! merged region are dropped; each dropped connector is still carved with
//! probability `1/extra_connections`, which adds loops but never carries
//! the connectivity guarantee.

use std::time::Instant;

use glam::IVec2;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::union_find::UnionFind;
use crate::error::{DungeonError, Result};
use crate::grid::{Grid, CARDINALS, WALL};

/// A wall cell adjoining at least two distinct regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub position: IVec2,
    /// Distinct neighbouring region ids, sorted ascending
    pub regions: Vec<u32>,
}

/// Cells carved by [`connect_regions`]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionReport {
    /// Connectors that merged regions, in carve order
    pub connectors: Vec<IVec2>,
    /// Redundant connectors carved anyway
    pub extra_connectors: Vec<IVec2>,
}

/// Scan every interior wall cell for connector candidates
pub fn find_connectors(grid: &Grid) -> Vec<Connector> {
    grid.interior_positions()
        .filter(|&pos| grid.get(pos) == Some(WALL))
        .filter_map(|pos| {
            let mut regions: Vec<u32> = CARDINALS
                .iter()
                .filter_map(|&dir| grid.get(pos + dir))
                .filter(|&id| id != WALL)
                .collect();
            regions.sort_unstable();
            regions.dedup();
            (regions.len() >= 2).then_some(Connector {
                position: pos,
                regions,
            })
        })
        .collect()
}

/// Carve connectors until every region belongs to one component
///
/// Regions whose open cells already touch are merged before any connector
/// is carved. A carved connector takes the id of the region it fused into.
///
/// # Arguments
///
/// * `grid` - Grid labelled with room and maze regions
/// * `extra_connections` - Redundant connectors are carved with probability
///   `1/extra_connections`; `0` disables extra loops
/// * `rng` - Random source
///
/// # Errors
///
/// Returns `Disconnected` if the candidates run out while regions remain
/// separate, e.g. a region walled in with no shared connector.
pub fn connect_regions<R: Rng + ?Sized>(
    grid: &mut Grid,
    extra_connections: u32,
    rng: &mut R,
) -> Result<ConnectionReport> {
    let start = Instant::now();
    let mut sets = region_sets(grid);
    let mut candidates = find_connectors(grid);
    let mut report = ConnectionReport::default();

    log::debug!(
        "[connect] {} components, {} connector candidates",
        sets.components(),
        candidates.len()
    );

    loop {
        // Drop connectors that no longer join separate components
        candidates.retain(|candidate| {
            if !sets.all_connected(&candidate.regions) {
                return true;
            }
            if extra_connections > 0 && rng.gen_ratio(1, extra_connections) {
                let region = sets.find(candidate.regions[0]);
                grid.carve(candidate.position, region);
                report.extra_connectors.push(candidate.position);
            }
            false
        });

        if sets.components() <= 1 || candidates.is_empty() {
            break;
        }

        let connector = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        let target = sets.find(connector.regions[rng.gen_range(0..connector.regions.len())]);
        grid.carve(connector.position, target);
        for &region in &connector.regions {
            sets.union(target, region);
        }
        report.connectors.push(connector.position);
    }

    if sets.components() > 1 {
        log::warn!(
            "[connect] ran out of connectors with {} components left",
            sets.components()
        );
        return Err(DungeonError::Disconnected {
            regions: sets.components(),
        });
    }

    log::debug!(
        "[connect] carved {} connectors, {} extra in {:?}",
        report.connectors.len(),
        report.extra_connectors.len(),
        start.elapsed()
    );

    Ok(report)
}

/// One set per region present on the grid, with touching regions pre-merged
fn region_sets(grid: &Grid) -> UnionFind {
    let max_region = grid
        .positions()
        .filter_map(|pos| grid.get(pos))
        .max()
        .unwrap_or(WALL)
        .max(grid.region_count());

    let mut present = vec![false; max_region as usize + 1];
    for pos in grid.positions() {
        if let Some(id) = grid.get(pos) {
            present[id as usize] = true;
        }
    }

    let mut sets = UnionFind::new(max_region);
    for region in 1..=max_region {
        if !present[region as usize] {
            sets.discard(region);
        }
    }

    for pos in grid.positions() {
        let Some(id) = grid.get(pos).filter(|&id| id != WALL) else {
            continue;
        };
        for dir in [IVec2::X, IVec2::Y] {
            if let Some(other) = grid.get(pos + dir).filter(|&other| other != WALL) {
                sets.union(id, other);
            }
        }
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::maze::fill_maze;
    use crate::generation::rooms::{place_rooms, RoomPolicy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_cells(gap: i32) -> Grid {
        let mut grid = Grid::new(3 + gap as usize + 1, 3);
        let a = grid.new_region();
        let b = grid.new_region();
        grid.carve(IVec2::new(1, 1), a);
        grid.carve(IVec2::new(2 + gap, 1), b);
        grid
    }

    #[test]
    fn test_find_connectors() {
        let grid = two_cells(1);
        let connectors = find_connectors(&grid);
        assert_eq!(
            connectors,
            vec![Connector {
                position: IVec2::new(2, 1),
                regions: vec![1, 2],
            }]
        );
    }

    #[test]
    fn test_single_wall_between_two_regions_is_carved() {
        let mut grid = two_cells(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = connect_regions(&mut grid, 20, &mut rng).unwrap();

        assert_eq!(report.connectors, vec![IVec2::new(2, 1)]);
        assert!(report.extra_connectors.is_empty());
        assert!(grid.is_open(IVec2::new(2, 1)));
        assert!(grid.is_connected());
    }

    #[test]
    fn test_unreachable_region_is_reported() {
        let mut grid = two_cells(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = connect_regions(&mut grid, 20, &mut rng);

        assert_eq!(result, Err(DungeonError::Disconnected { regions: 2 }));
        assert!(result.unwrap_err().is_retryable());
    }

    #[test]
    fn test_touching_regions_need_no_connector() {
        let mut grid = Grid::new(5, 3);
        let a = grid.new_region();
        let b = grid.new_region();
        grid.carve(IVec2::new(1, 1), a);
        grid.carve(IVec2::new(2, 1), b);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = connect_regions(&mut grid, 20, &mut rng).unwrap();
        assert!(report.connectors.is_empty());
    }

    /// Two corridors separated by a wall row of five connectors
    fn parallel_corridors() -> Grid {
        let mut grid = Grid::new(7, 5);
        let a = grid.new_region();
        let b = grid.new_region();
        for x in 1..6 {
            grid.carve(IVec2::new(x, 1), a);
            grid.carve(IVec2::new(x, 3), b);
        }
        grid
    }

    #[test]
    fn test_extra_connections_disabled() {
        let mut grid = parallel_corridors();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = connect_regions(&mut grid, 0, &mut rng).unwrap();

        assert_eq!(report.connectors.len(), 1);
        assert!(report.extra_connectors.is_empty());
        assert_eq!(grid.open_cell_count(), 11);
    }

    #[test]
    fn test_extra_connections_always() {
        let mut grid = parallel_corridors();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = connect_regions(&mut grid, 1, &mut rng).unwrap();

        assert_eq!(report.connectors.len(), 1);
        assert_eq!(report.extra_connectors.len(), 4);
        assert_eq!(grid.open_cell_count(), 15);
    }

    #[test]
    fn test_rooms_and_maze_become_connected() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = Grid::new(41, 31);
            for room in place_rooms(41, 31, &RoomPolicy::aligned(200), &mut rng) {
                let region = grid.new_region();
                grid.carve_room(&room, region);
            }
            fill_maze(&mut grid, 20, &mut rng).unwrap();
            assert!(grid.component_count() > 1 || grid.region_count() == 1);

            connect_regions(&mut grid, 20, &mut rng).unwrap();
            assert!(grid.is_connected(), "seed {} left the grid disconnected", seed);
        }
    }

    #[test]
    fn test_single_region_is_already_connected() {
        let mut grid = Grid::new(9, 9);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        fill_maze(&mut grid, 20, &mut rng).unwrap();
        let report = connect_regions(&mut grid, 20, &mut rng).unwrap();
        assert!(report.connectors.is_empty());
    }
}
