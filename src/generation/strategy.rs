//! Pluggable connectivity strategies
//!
//! A [`Connectivity`] takes a grid with rooms already carved and makes
//! every open cell reachable. Intermediate grids are recorded as
//! [`Stage`] snapshots so callers can inspect or render each step.

use glam::IVec2;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::connector::connect_regions;
use super::delaunay::connect_rooms_with_net;
use super::maze::fill_maze;
use super::trim::remove_dead_ends;
use crate::config::{DungeonConfig, DEFAULT_EXTRA_CONNECTIONS, DEFAULT_WINDINGNESS};
use crate::error::Result;
use crate::grid::Grid;
use crate::room::Room;

/// Generation steps that leave a grid snapshot behind
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Rooms carved, nothing else
    Rooms,
    /// Maze filled around the rooms
    Maze,
    /// All regions merged through connectors
    Connected,
    /// Dead ends removed
    Trimmed,
    /// Rooms joined by net corridors
    Corridors,
}

impl Stage {
    /// Get display name
    pub fn name(self) -> &'static str {
        match self {
            Stage::Rooms => "rooms",
            Stage::Maze => "maze",
            Stage::Connected => "connected",
            Stage::Trimmed => "trimmed",
            Stage::Corridors => "corridors",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Grid snapshots in the order they were recorded
#[derive(Debug, Clone, Default)]
pub struct Stages {
    snapshots: Vec<(Stage, Grid)>,
}

impl Stages {
    /// Create an empty snapshot list
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `grid` for `stage`, replacing an earlier snapshot
    pub fn record(&mut self, stage: Stage, grid: &Grid) {
        match self.snapshots.iter_mut().find(|(s, _)| *s == stage) {
            Some((_, snapshot)) => *snapshot = grid.clone(),
            None => self.snapshots.push((stage, grid.clone())),
        }
    }

    /// Snapshot recorded for `stage`, if that step ran
    pub fn get(&self, stage: Stage) -> Option<&Grid> {
        self.snapshots.iter().find(|(s, _)| *s == stage).map(|(_, grid)| grid)
    }

    /// Iterate snapshots in the order they were recorded
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Grid)> {
        self.snapshots.iter().map(|(stage, grid)| (*stage, grid))
    }

    /// Number of recorded snapshots
    #[inline]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if no snapshot has been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// What a connectivity pass carved
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSummary {
    /// Maze regions grown around the rooms
    pub maze_regions: usize,
    /// Connectors that merged separate regions
    pub carved_connectors: Vec<IVec2>,
    /// Redundant connectors kept as loops
    pub extra_connectors: Vec<IVec2>,
    /// Cells filled by dead-end trimming
    pub dead_ends_removed: usize,
    /// Room index pairs joined by a direct corridor
    pub room_links: Vec<(usize, usize)>,
}

/// Strategy that makes a room-carved grid fully connected
///
/// Implement this to plug a custom corridor layout into
/// [`Dungeon::generate_with`](crate::Dungeon::generate_with).
pub trait Connectivity {
    /// Carve corridors into `grid`, recording snapshots into `stages`
    ///
    /// `rooms` are already carved, each with its own region id.
    fn connect<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rooms: &[Room],
        stages: &mut Stages,
        rng: &mut R,
    ) -> Result<ConnectionSummary>;
}

/// Maze fill, region merging and optional dead-end trimming
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeConnectivity {
    pub windingness: u32,
    pub extra_connections: u32,
    pub trim_dead_ends: bool,
}

impl MazeConnectivity {
    /// Take the maze parameters from a dungeon configuration
    pub fn from_config(config: &DungeonConfig) -> Self {
        Self {
            windingness: config.windingness,
            extra_connections: config.extra_connections,
            trim_dead_ends: config.trim_dead_ends,
        }
    }
}

impl Default for MazeConnectivity {
    fn default() -> Self {
        Self {
            windingness: DEFAULT_WINDINGNESS,
            extra_connections: DEFAULT_EXTRA_CONNECTIONS,
            trim_dead_ends: true,
        }
    }
}

impl Connectivity for MazeConnectivity {
    fn connect<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        _rooms: &[Room],
        stages: &mut Stages,
        rng: &mut R,
    ) -> Result<ConnectionSummary> {
        let maze_regions = fill_maze(grid, self.windingness, rng)?;
        stages.record(Stage::Maze, grid);

        let report = connect_regions(grid, self.extra_connections, rng)?;
        stages.record(Stage::Connected, grid);

        let dead_ends_removed = if self.trim_dead_ends {
            let removed = remove_dead_ends(grid);
            stages.record(Stage::Trimmed, grid);
            removed
        } else {
            0
        };

        Ok(ConnectionSummary {
            maze_regions,
            carved_connectors: report.connectors,
            extra_connectors: report.extra_connectors,
            dead_ends_removed,
            room_links: Vec::new(),
        })
    }
}

/// Direct room-to-room corridors along a Delaunay net of room centres
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelaunayConnectivity;

impl Connectivity for DelaunayConnectivity {
    fn connect<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rooms: &[Room],
        stages: &mut Stages,
        rng: &mut R,
    ) -> Result<ConnectionSummary> {
        let room_links = connect_rooms_with_net(grid, rooms, rng)?;
        stages.record(Stage::Corridors, grid);

        Ok(ConnectionSummary {
            room_links,
            ..ConnectionSummary::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::rooms::{place_rooms, RoomPolicy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rooms_grid(policy: &RoomPolicy, seed: u64) -> (Grid, Vec<Room>, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(41, 31);
        let rooms = place_rooms(41, 31, policy, &mut rng);
        for room in &rooms {
            let region = grid.new_region();
            grid.carve_room(room, region);
        }
        (grid, rooms, rng)
    }

    #[test]
    fn test_stages_replace_and_keep_order() {
        let mut stages = Stages::new();
        let mut grid = Grid::new(5, 5);
        stages.record(Stage::Rooms, &grid);
        stages.record(Stage::Maze, &grid);

        grid.carve(IVec2::new(1, 1), 1);
        stages.record(Stage::Rooms, &grid);

        assert_eq!(stages.len(), 2);
        assert_eq!(stages.get(Stage::Rooms), Some(&grid));
        assert!(stages.get(Stage::Trimmed).is_none());
        let order: Vec<Stage> = stages.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Stage::Rooms, Stage::Maze]);
    }

    #[test]
    fn test_maze_connectivity_records_each_step() {
        let (mut grid, rooms, mut rng) = rooms_grid(&RoomPolicy::aligned(200), 5);
        let mut stages = Stages::new();

        let summary = MazeConnectivity::default()
            .connect(&mut grid, &rooms, &mut stages, &mut rng)
            .unwrap();

        assert!(summary.maze_regions >= 1);
        assert!(summary.room_links.is_empty());
        assert!(grid.is_connected());
        assert_eq!(stages.get(Stage::Trimmed), Some(&grid));
        let order: Vec<Stage> = stages.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Stage::Maze, Stage::Connected, Stage::Trimmed]);
    }

    #[test]
    fn test_maze_connectivity_without_trimming() {
        let (mut grid, rooms, mut rng) = rooms_grid(&RoomPolicy::aligned(200), 6);
        let mut stages = Stages::new();
        let maze = MazeConnectivity {
            trim_dead_ends: false,
            ..MazeConnectivity::default()
        };

        let summary = maze.connect(&mut grid, &rooms, &mut stages, &mut rng).unwrap();

        assert_eq!(summary.dead_ends_removed, 0);
        assert!(stages.get(Stage::Trimmed).is_none());
        assert_eq!(stages.get(Stage::Connected), Some(&grid));
    }

    #[test]
    fn test_delaunay_connectivity_links_rooms() {
        let (mut grid, rooms, mut rng) = rooms_grid(&RoomPolicy::scattered(), 9);
        let mut stages = Stages::new();

        let summary = DelaunayConnectivity
            .connect(&mut grid, &rooms, &mut stages, &mut rng)
            .unwrap();

        assert_eq!(summary.maze_regions, 0);
        assert!(rooms.len() < 2 || !summary.room_links.is_empty());
        assert!(grid.is_connected());
        assert_eq!(stages.len(), 1);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Connected.to_string(), "connected");
        assert_eq!(Stage::Corridors.name(), "corridors");
    }
}
