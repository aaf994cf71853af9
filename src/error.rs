//! Error types for dungeon generation

use thiserror::Error;

/// Errors that can occur during dungeon generation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DungeonError {
    /// Configuration validation failed (bad dimensions or tunables)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A geometric primitive could not be constructed
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// Connection finished with regions still unreachable from each other
    #[error("generation integrity: {regions} regions remain mutually unreachable")]
    Disconnected {
        /// Number of separate components left in the grid
        regions: usize,
    },
}

impl DungeonError {
    /// Whether generating again with a different seed may succeed
    ///
    /// Configuration and geometry errors are deterministic, a disconnected
    /// grid is a property of the random draw.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DungeonError::Disconnected { .. })
    }
}

/// Result type alias for dungeon operations
pub type Result<T> = std::result::Result<T, DungeonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_disconnection_is_retryable() {
        assert!(DungeonError::Disconnected { regions: 2 }.is_retryable());
        assert!(!DungeonError::InvalidConfig("width".into()).is_retryable());
        assert!(!DungeonError::DegenerateGeometry("collinear".into()).is_retryable());
    }

    #[test]
    fn test_error_messages() {
        let err = DungeonError::Disconnected { regions: 3 };
        assert_eq!(
            err.to_string(),
            "generation integrity: 3 regions remain mutually unreachable"
        );
        let err = DungeonError::InvalidConfig("width must be odd".into());
        assert_eq!(err.to_string(), "invalid configuration: width must be odd");
    }
}
