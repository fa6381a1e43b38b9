//! Utility modules for rover_planner

pub mod visualization;

pub use visualization::{colors, render_route};
