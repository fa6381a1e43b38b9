//! Common types for rover_planner
//!
//! Integer grid geometry and the oriented-state model shared by the
//! grid, the pathfinder, the tour planner and the command generator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Facing direction on the grid, cyclically ordered N -> E -> S -> W.
///
/// `None` marks an obstacle face that carries no marker; rover states
/// always carry one of the four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    None,
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Rotation units on the 0/2/4/6 scale used for turn-cost computation.
    pub fn rotation_units(self) -> i32 {
        match self {
            Direction::None | Direction::North => 0,
            Direction::East => 2,
            Direction::South => 4,
            Direction::West => 6,
        }
    }

    /// The 180-degree opposite; `None` has no opposite.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit displacement of a single straight move in this direction.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::None => "None",
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        };
        write!(f, "{}", name)
    }
}

/// Angular distance between two facings on the 0/2/4/6 rotation scale.
pub fn rotation_cost(a: Direction, b: Direction) -> i32 {
    let diff = (a.rotation_units() - b.rotation_units()).abs();
    diff.min(8 - diff)
}

/// Integer cell coordinate on the planning grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(&self, other: &GridPoint) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn chebyshev_distance(&self, other: &GridPoint) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn offset(&self, dx: i32, dy: i32) -> GridPoint {
        GridPoint::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An oriented state the rover passes through: a cell plus a facing.
///
/// `penalty` and `snapshot_id` are payload carried along from the
/// observation geometry; identity (equality, hashing, ordering) is
/// defined on (position, facing) only, which makes `Waypoint` the key
/// for every path and cost cache.
#[derive(Debug, Clone, Copy)]
pub struct Waypoint {
    pub position: GridPoint,
    pub facing: Direction,
    pub penalty: i32,
    pub snapshot_id: Option<i32>,
}

impl Waypoint {
    pub fn new(position: GridPoint, facing: Direction) -> Self {
        Self {
            position,
            facing,
            penalty: 0,
            snapshot_id: None,
        }
    }

    /// A candidate observation state for the obstacle `snapshot_id`.
    pub fn observation(
        position: GridPoint,
        facing: Direction,
        snapshot_id: i32,
        penalty: i32,
    ) -> Self {
        Self {
            position,
            facing,
            penalty,
            snapshot_id: Some(snapshot_id),
        }
    }
}

impl PartialEq for Waypoint {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.facing == other.facing
    }
}

impl Eq for Waypoint {}

impl Hash for Waypoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.facing.hash(state);
    }
}

// One consistent total order: lexicographic (x, y, facing).
impl Ord for Waypoint {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.position.x, self.position.y, self.facing).cmp(&(
            other.position.x,
            other.position.y,
            other.facing,
        ))
    }
}

impl PartialOrd for Waypoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{x:{}, y:{}, facing:{}}}",
            self.position.x, self.position.y, self.facing
        )
    }
}

/// Directional (start, end) key for the pairwise path and cost caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaypointPair {
    pub start: Waypoint,
    pub end: Waypoint,
}

impl WaypointPair {
    pub fn new(start: Waypoint, end: Waypoint) -> Self {
        Self { start, end }
    }

    pub fn reversed(&self) -> WaypointPair {
        WaypointPair::new(self.end, self.start)
    }
}

/// A reachable adjacent oriented state plus the incremental cost of
/// moving there (safety-margin cost, and the turn surcharge for turn
/// maneuvers). Rotation cost is added by the search when the edge is
/// consumed.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub position: GridPoint,
    pub facing: Direction,
    pub cost: i32,
}

impl Neighbor {
    pub fn new(position: GridPoint, facing: Direction, cost: i32) -> Self {
        Self {
            position,
            facing,
            cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_rotation_cost() {
        assert_eq!(rotation_cost(Direction::North, Direction::North), 0);
        assert_eq!(rotation_cost(Direction::North, Direction::East), 2);
        assert_eq!(rotation_cost(Direction::North, Direction::South), 4);
        // West wraps around: |0 - 6| = 6, 8 - 6 = 2
        assert_eq!(rotation_cost(Direction::North, Direction::West), 2);
        assert_eq!(rotation_cost(Direction::East, Direction::West), 4);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::West.opposite(), Direction::East);
        assert_eq!(Direction::None.opposite(), Direction::None);
    }

    #[test]
    fn test_grid_point_distances() {
        let a = GridPoint::new(1, 2);
        let b = GridPoint::new(4, 6);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert_eq!(a.chebyshev_distance(&b), 4);
    }

    #[test]
    fn test_waypoint_identity_ignores_payload() {
        let a = Waypoint::observation(GridPoint::new(3, 4), Direction::East, 2, 50);
        let b = Waypoint::new(GridPoint::new(3, 4), Direction::East);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let c = Waypoint::new(GridPoint::new(3, 4), Direction::West);
        assert_ne!(a, c);
    }

    #[test]
    fn test_waypoint_total_order() {
        let a = Waypoint::new(GridPoint::new(1, 5), Direction::West);
        let b = Waypoint::new(GridPoint::new(2, 0), Direction::North);
        let c = Waypoint::new(GridPoint::new(2, 0), Direction::South);
        assert!(a < b);
        assert!(b < c);
    }
}
