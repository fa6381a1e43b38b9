// Path planning module: pairwise A* search, exact tour solving, and
// the route optimizer that combines them.

pub mod a_star;
pub mod tour_planner;
pub mod tsp;

pub use a_star::*;
pub use tour_planner::*;
pub use tsp::TourResult;
