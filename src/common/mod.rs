//! Common types, configuration, and error definitions for rover_planner
//!
//! This module provides the foundational building blocks used across
//! the planning and command-generation modules.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
