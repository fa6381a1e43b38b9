//! Planner configuration
//!
//! All tunables consumed by the planning and command-generation entry
//! points. Callers own the lifecycle: build one value (usually from
//! `Default`), hand it to the planner, and treat it as immutable for
//! the duration of a call.

/// Configuration for route planning and command generation.
#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// Obstacle inflation buffer, in cells. Observation distances and
    /// turning clearances derive from it.
    pub expanded_cell: i32,
    /// Field width in cells, border included.
    pub width_buffer: i32,
    /// Field height in cells, border included.
    pub height_buffer: i32,
    /// Penalty for the lateral (off-center) observation variants.
    pub screenshot_cost: i32,
    /// Cost of passing a cell that grazes an obstacle corner.
    pub safe_cost: i32,
    /// Base turning radius unit of the drive geometry.
    pub turn_radius: i32,
    /// Scale factor applied to rotation costs in the search.
    pub turn_factor: i32,
    /// Budget for the observation-combination enumeration.
    pub iterations: usize,
    /// Left-wheel multiple of the turn radius for the default turn.
    pub left_wheel: i32,
    /// Right-wheel multiple of the turn radius for the default turn.
    pub right_wheel: i32,
    /// Cap straight-run compression at 90 distance units.
    pub limit_max90: bool,
    /// Emit turn commands with the outside distance (30) instead of 0.
    pub outside_command: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            expanded_cell: 1,
            width_buffer: 20,
            height_buffer: 20,
            screenshot_cost: 50,
            safe_cost: 1000,
            turn_radius: 1,
            turn_factor: 1,
            iterations: 2000,
            left_wheel: 3,
            right_wheel: 2,
            limit_max90: true,
            outside_command: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.expanded_cell, 1);
        assert_eq!(config.iterations, 2000);
        assert!(config.limit_max90);
        assert!(!config.outside_command);
    }
}
