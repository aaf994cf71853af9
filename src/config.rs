//! Dungeon configuration and builder
//!
//! A [`DungeonConfig`] fully determines a dungeon: the same configuration
//! always regenerates the identical grid.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::generation::RoomPolicy;

/// Smallest accepted width or height
pub const MIN_DIMENSION: usize = 5;

/// Default straightness bias for maze corridors
pub const DEFAULT_WINDINGNESS: u32 = 20;

/// Default inverse probability of carving a redundant connector
pub const DEFAULT_EXTRA_CONNECTIONS: u32 = 20;

/// Dungeon size presets
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DungeonSize {
    /// 41 x 31 cells
    Small,
    /// 61 x 41 cells
    #[default]
    Medium,
    /// 81 x 61 cells
    Large,
    /// Explicit dimensions; odd values are needed for maze carving
    Custom { width: usize, height: usize },
}

impl DungeonSize {
    /// Grid width in cells
    pub fn width(self) -> usize {
        match self {
            DungeonSize::Small => 41,
            DungeonSize::Medium => 61,
            DungeonSize::Large => 81,
            DungeonSize::Custom { width, .. } => width,
        }
    }

    /// Grid height in cells
    pub fn height(self) -> usize {
        match self {
            DungeonSize::Small => 31,
            DungeonSize::Medium => 41,
            DungeonSize::Large => 61,
            DungeonSize::Custom { height, .. } => height,
        }
    }

    /// Get a human-readable name for this size
    pub fn name(self) -> &'static str {
        match self {
            DungeonSize::Small => "Small",
            DungeonSize::Medium => "Medium",
            DungeonSize::Large => "Large",
            DungeonSize::Custom { .. } => "Custom",
        }
    }
}

/// How rooms get joined together
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectorStrategy {
    /// Fill the space between rooms with a maze, merge every region
    /// through connectors, then trim dead ends
    #[default]
    Maze,
    /// Join rooms directly with corridors along a Delaunay net of their
    /// centres; no maze is carved
    Delaunay,
}

impl ConnectorStrategy {
    /// Whether this strategy carves on the odd 2-cell lattice
    pub fn needs_odd_dimensions(self) -> bool {
        matches!(self, ConnectorStrategy::Maze)
    }
}

/// Configuration for deterministic dungeon generation
///
/// # Example
///
/// ```rust
/// use rust_maze_dungeon::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .size(DungeonSize::Small)
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: DungeonConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DungeonConfig {
    /// Random seed; the same seed and settings give the same dungeon
    pub seed: u64,

    /// Grid dimensions
    pub size: DungeonSize,

    /// Connectivity strategy
    pub strategy: ConnectorStrategy,

    /// Room placement constraints
    pub room_policy: RoomPolicy,

    /// Maze straightness bias
    ///
    /// The previous direction is abandoned with probability
    /// `1/windingness`; 1 turns at every step, larger values give longer
    /// straight runs.
    pub windingness: u32,

    /// Redundant connectors are carved with probability
    /// `1/extra_connections`; 0 never adds loops
    pub extra_connections: u32,

    /// Remove dead-end corridors after connecting (maze strategy only)
    pub trim_dead_ends: bool,
}

impl DungeonConfig {
    /// Grid width for the configured size
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width()
    }

    /// Grid height for the configured size
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height()
    }

    /// Check the whole configuration before any generation work
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is below 5, a dimension
    /// is even while the maze strategy or an aligned room policy is
    /// selected, `windingness` is 0, or the room policy is inconsistent.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width(), self.height());

        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(DungeonError::InvalidConfig(format!(
                "dungeon must be at least {}x{} (got {}x{})",
                MIN_DIMENSION, MIN_DIMENSION, width, height
            )));
        }

        let needs_odd = self.strategy.needs_odd_dimensions() || self.room_policy.aligned;
        if needs_odd && (width % 2 == 0 || height % 2 == 0) {
            return Err(DungeonError::InvalidConfig(format!(
                "maze-aligned generation needs odd dimensions (got {}x{})",
                width, height
            )));
        }

        if self.windingness == 0 {
            return Err(DungeonError::InvalidConfig(
                "windingness must be >= 1 (got 0)".to_string(),
            ));
        }

        self.room_policy.validate()
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            size: DungeonSize::default(),
            strategy: ConnectorStrategy::default(),
            room_policy: RoomPolicy::default(),
            windingness: DEFAULT_WINDINGNESS,
            extra_connections: DEFAULT_EXTRA_CONNECTIONS,
            trim_dead_ends: true,
        }
    }
}

/// Builder for [`DungeonConfig`] with validation
///
/// Setters that can reject a value return `Result<Self>`; dimension
/// checks that depend on several settings happen in [`build`](Self::build).
///
/// # Example
///
/// ```rust
/// use rust_maze_dungeon::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(7)
///     .size(DungeonSize::Custom { width: 31, height: 21 })
///     .windingness(5)
///     .unwrap()
///     .extra_connections(0)
///     .trim_dead_ends(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.width(), 31);
///
/// // Maze carving needs odd dimensions
/// let even = DungeonConfigBuilder::new()
///     .size(DungeonSize::Custom { width: 30, height: 21 })
///     .build();
/// assert!(even.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DungeonConfigBuilder {
    seed: Option<u64>,
    size: DungeonSize,
    strategy: ConnectorStrategy,
    room_policy: RoomPolicy,
    windingness: u32,
    extra_connections: u32,
    trim_dead_ends: bool,
}

impl DungeonConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - size: Medium (61 x 41)
    /// - strategy: Maze
    /// - room_policy: aligned, 200 attempts
    /// - windingness: 20
    /// - extra_connections: 20
    /// - trim_dead_ends: true
    pub fn new() -> Self {
        Self {
            seed: None,
            size: DungeonSize::default(),
            strategy: ConnectorStrategy::default(),
            room_policy: RoomPolicy::default(),
            windingness: DEFAULT_WINDINGNESS,
            extra_connections: DEFAULT_EXTRA_CONNECTIONS,
            trim_dead_ends: true,
        }
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the grid size preset
    pub fn size(mut self, size: DungeonSize) -> Self {
        self.size = size;
        self
    }

    /// Set how rooms are joined together
    pub fn strategy(mut self, strategy: ConnectorStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the room placement policy
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for inverted or non-positive aspect bounds,
    /// a minimum span below 1, or negative sizes.
    pub fn room_policy(mut self, policy: RoomPolicy) -> Result<Self> {
        policy.validate()?;
        self.room_policy = policy;
        Ok(self)
    }

    /// Set the maze straightness bias
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `windingness` is 0
    pub fn windingness(mut self, windingness: u32) -> Result<Self> {
        if windingness == 0 {
            return Err(DungeonError::InvalidConfig(
                "windingness must be >= 1 (got 0)".to_string(),
            ));
        }
        self.windingness = windingness;
        Ok(self)
    }

    /// Set the inverse probability of keeping a redundant connector
    ///
    /// 0 disables extra loops entirely.
    pub fn extra_connections(mut self, extra_connections: u32) -> Self {
        self.extra_connections = extra_connections;
        self
    }

    /// Enable or disable dead-end trimming after connection
    pub fn trim_dead_ends(mut self, trim: bool) -> Self {
        self.trim_dead_ends = trim;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either dimension is below 5, or is even
    /// while the maze strategy or an aligned room policy is selected.
    pub fn build(self) -> Result<DungeonConfig> {
        let config = DungeonConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            size: self.size,
            strategy: self.strategy,
            room_policy: self.room_policy,
            windingness: self.windingness,
            extra_connections: self.extra_connections,
            trim_dead_ends: self.trim_dead_ends,
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for DungeonConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
