//! Error types for rover_planner

use std::fmt;

use crate::common::types::Direction;

/// Main error type for planning and command generation.
#[derive(Debug)]
pub enum PlannerError {
    /// Consecutive waypoints imply a turn between incompatible facings,
    /// which means the input sequence violates the adjacency invariant
    /// the planner guarantees.
    InvalidTurn { from: Direction, to: Direction },
    /// A command code could not be parsed back into a command.
    InvalidCommand(String),
    /// Rendering a route plot failed
    VisualizationError(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidTurn { from, to } => {
                write!(f, "Invalid turning direction: {} -> {}", from, to)
            }
            PlannerError::InvalidCommand(msg) => write!(f, "Invalid command: {}", msg),
            PlannerError::VisualizationError(msg) => write!(f, "Visualization error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::InvalidTurn {
            from: Direction::North,
            to: Direction::South,
        };
        assert_eq!(
            format!("{}", err),
            "Invalid turning direction: North -> South"
        );
    }
}
