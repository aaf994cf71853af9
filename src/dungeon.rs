//! Dungeon main structure

use std::time::Instant;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{ConnectorStrategy, DungeonConfig};
use crate::error::{DungeonError, Result};
use crate::generation::{
    carve_rooms, place_rooms, ConnectionSummary, Connectivity, DelaunayConnectivity,
    MazeConnectivity, Stage, Stages,
};
use crate::grid::Grid;
use crate::room::Room;
use crate::tiles::TileGrid;

#[cfg(feature = "spatial-index")]
use crate::geometry::Point;
#[cfg(feature = "spatial-index")]
use crate::spatial::RoomIndex;

/// A generated dungeon
///
/// Holds the final grid, the rooms it was built around, and a snapshot of
/// the grid after every generation step. Every open cell is reachable from
/// every other; generation fails rather than return a disconnected grid.
///
/// # Examples
///
/// ```
/// use rust_maze_dungeon::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .size(DungeonSize::Small)
///     .build()
///     .unwrap();
///
/// let dungeon = Dungeon::generate(config).unwrap();
/// assert!(dungeon.grid().is_connected());
/// println!("{} rooms\n{}", dungeon.rooms().len(), dungeon.grid());
/// ```
#[derive(Debug, Clone)]
pub struct Dungeon {
    /// Configuration used to generate this dungeon
    config: DungeonConfig,

    rooms: Vec<Room>,

    /// Final region grid
    grid: Grid,

    summary: ConnectionSummary,

    /// Grid after each step, starting with the bare rooms
    stages: Stages,

    /// Nearest-room lookups over room centres (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    room_index: RoomIndex,
}

impl Dungeon {
    /// Generate a dungeon seeded from `config.seed`
    ///
    /// The same configuration always produces the same dungeon.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration does not validate
    /// - `DegenerateGeometry` if the Delaunay net cannot be built
    /// - `Disconnected` if some region could not be joined; retrying with
    ///   another seed may succeed
    pub fn generate(config: DungeonConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generate a dungeon drawing from an injected random source
    ///
    /// `config.seed` is ignored; the strategy named by `config.strategy`
    /// is used.
    pub fn generate_with_rng<R: Rng + ?Sized>(config: DungeonConfig, rng: &mut R) -> Result<Self> {
        match config.strategy {
            ConnectorStrategy::Maze => {
                Self::generate_with(config, &MazeConnectivity::from_config(&config), rng)
            }
            ConnectorStrategy::Delaunay => Self::generate_with(config, &DelaunayConnectivity, rng),
        }
    }

    /// Generate a dungeon with a custom connectivity strategy
    ///
    /// Rooms are placed and carved as usual, then handed to
    /// `connectivity`. The finished grid is flood-filled to confirm that
    /// every open cell is reachable.
    ///
    /// # Example
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    /// use rust_maze_dungeon::*;
    ///
    /// let config = DungeonConfigBuilder::new()
    ///     .size(DungeonSize::Small)
    ///     .build()
    ///     .unwrap();
    /// let winding = MazeConnectivity {
    ///     windingness: 1,
    ///     extra_connections: 0,
    ///     trim_dead_ends: false,
    /// };
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(3);
    /// let dungeon = Dungeon::generate_with(config, &winding, &mut rng).unwrap();
    /// assert!(dungeon.summary().extra_connectors.is_empty());
    /// ```
    pub fn generate_with<C, R>(config: DungeonConfig, connectivity: &C, rng: &mut R) -> Result<Self>
    where
        C: Connectivity,
        R: Rng + ?Sized,
    {
        config.validate()?;

        let start = Instant::now();
        let (width, height) = (config.width(), config.height());
        let mut grid = Grid::new(width, height);
        let mut stages = Stages::new();

        let rooms = place_rooms(width, height, &config.room_policy, rng);
        carve_rooms(&mut grid, &rooms);
        stages.record(Stage::Rooms, &grid);

        let summary = connectivity.connect(&mut grid, &rooms, &mut stages, rng)?;

        let components = grid.component_count();
        if components > 1 {
            log::warn!("[dungeon] {} components left after connecting", components);
            return Err(DungeonError::Disconnected { regions: components });
        }

        log::debug!(
            "[dungeon] {}x{} {}: {} rooms, {} open cells in {:?}",
            width,
            height,
            config.size.name(),
            rooms.len(),
            grid.open_cell_count(),
            start.elapsed()
        );

        #[cfg(feature = "spatial-index")]
        let room_index = {
            let centres: Vec<Point> = rooms.iter().map(Room::centre).collect();
            RoomIndex::new(&centres)
        };

        Ok(Self {
            config,
            rooms,
            grid,
            summary,
            stages,
            #[cfg(feature = "spatial-index")]
            room_index,
        })
    }

    /// Configuration the dungeon was generated from
    #[inline]
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Placed rooms, in placement order
    #[inline]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The final, fully connected grid
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// What the connectivity step carved
    #[inline]
    pub fn summary(&self) -> &ConnectionSummary {
        &self.summary
    }

    /// Grid snapshots taken after each generation step
    #[inline]
    pub fn stages(&self) -> &Stages {
        &self.stages
    }

    /// Grid snapshot after `stage`, if that step ran
    pub fn stage(&self, stage: Stage) -> Option<&Grid> {
        self.stages.get(stage)
    }

    /// Tile codes for the final grid
    pub fn tiles(&self) -> TileGrid {
        TileGrid::from_grid(&self.grid)
    }

    /// Index of the room containing `cell`
    pub fn room_at(&self, cell: IVec2) -> Option<usize> {
        self.rooms.iter().position(|room| room.contains(cell))
    }

    /// Index of the room whose centre is closest to `point`
    ///
    /// `None` when no rooms were placed.
    #[cfg(feature = "spatial-index")]
    pub fn nearest_room(&self, point: Point) -> Option<usize> {
        self.room_index.find_nearest(point)
    }
}
