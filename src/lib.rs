//! Procedural dungeon generation on a 2D tile grid
//!
//! Rooms are placed by rejection sampling, then joined into a single
//! connected layout. The primary strategy fills the remaining space with a
//! growing-tree maze, merges every region through randomly chosen
//! connector cells and trims the dead ends. The alternative strategy joins
//! rooms directly along a Delaunay net of their centres.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_maze_dungeon::*;
//!
//! let config = DungeonConfigBuilder::new()
//!     .seed(42)
//!     .size(DungeonSize::Small)
//!     .windingness(20).unwrap()
//!     .build().unwrap();
//!
//! let dungeon = Dungeon::generate(config).unwrap();
//!
//! // Inspect intermediate steps
//! for (stage, grid) in dungeon.stages().iter() {
//!     println!("{}: {} open cells", stage, grid.open_cell_count());
//! }
//!
//! // Bit-flag codes for autotiling
//! let rows = dungeon.tiles().rows();
//! assert_eq!(rows.len(), 31);
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): nearest-room lookups using a KD-tree
//! - `serde`: serialization support for configuration, grids and tiles

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod room;
pub mod grid;
pub mod generation;
pub mod dungeon;
pub mod tiles;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{DungeonError, Result};
pub use config::{ConnectorStrategy, DungeonConfig, DungeonConfigBuilder, DungeonSize};
pub use room::Room;
pub use grid::{Grid, CARDINALS, WALL};
pub use dungeon::Dungeon;
pub use tiles::{TileFlags, TileGrid};
pub use generation::{
    ConnectionSummary, Connectivity, DelaunayConnectivity, MazeConnectivity, RoomPolicy,
    RoomSampling, Stage, Stages,
};

#[cfg(feature = "spatial-index")]
pub use spatial::RoomIndex;

// Re-export glam::IVec2 for convenience
pub use glam::IVec2;
