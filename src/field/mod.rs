//! Field model: grid objects and the obstacle grid

pub mod grid;
pub mod objects;

pub use grid::*;
pub use objects::*;
