//! rover_planner - turn-aware survey route planning on a bounded grid
//!
//! This crate plans a collision-free route for a grid-bound rover that
//! must photograph the marked faces of known obstacles, in the order
//! that minimizes total travel and turning cost, and translates the
//! winning route into discrete movement commands.

// Core modules
pub mod commands;
pub mod common;
pub mod field;
pub mod path_planning;
pub mod utils;

// Re-export common types for convenience
pub use commands::{generate_commands, Command, SnapOffset};
pub use common::{Direction, GridPoint, Neighbor, Waypoint, WaypointPair};
pub use common::{PlannerConfig, PlannerError, PlannerResult};
pub use field::{CellKind, Grid, GridObject, ObjectKind};
pub use path_planning::{AStarPathfinder, CancelToken, TourPlanner, TurnGeometry};
pub use utils::render_route;
