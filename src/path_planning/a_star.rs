//! A* search between oriented rover states
//!
//! Finds the cheapest command-realizable path between two (cell,
//! facing) states. Straight moves keep the current facing and cost one
//! unit plus any safety surcharge; 90-degree turns follow the
//! differential-drive geometry, displace the rover by a wheel-dependent
//! offset and pay a flat surcharge plus a rotation cost. Results are
//! memoized symmetrically per pair, so repeated planning calls reuse
//! earlier searches.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::common::{
    rotation_cost, Direction, GridPoint, Neighbor, PlannerConfig, Waypoint, WaypointPair,
};
use crate::field::Grid;

/// Flat surcharge on turn-maneuver edges.
const TURN_SURCHARGE: i32 = 10;

/// Displacement of a 90-degree turn in cells: the outer wheel track
/// travels `major` cells, the inner one `minor`.
#[derive(Debug, Clone, Copy)]
pub struct TurnGeometry {
    pub major: i32,
    pub minor: i32,
}

impl TurnGeometry {
    pub fn from_config(config: &PlannerConfig, big_turn: bool) -> Self {
        if big_turn {
            Self {
                major: 4 * config.turn_radius,
                minor: 2 * config.turn_radius,
            }
        } else {
            Self {
                major: config.left_wheel * config.turn_radius,
                minor: config.right_wheel * config.turn_radius,
            }
        }
    }

    /// The two candidate displacements of a turn from `from` facing to
    /// `to` facing, or `None` when the facings are not 90 degrees
    /// apart.
    fn offsets(&self, from: Direction, to: Direction) -> Option<[(i32, i32); 2]> {
        let (major, minor) = (self.major, self.minor);
        match (from, to) {
            (Direction::North, Direction::East) => Some([(major, minor), (-minor, -major)]),
            (Direction::North, Direction::West) => Some([(minor, -major), (-major, minor)]),
            (Direction::East, Direction::North) => Some([(minor, major), (-major, -minor)]),
            (Direction::East, Direction::South) => Some([(minor, -major), (-major, minor)]),
            (Direction::South, Direction::East) => Some([(major, -minor), (-minor, major)]),
            (Direction::South, Direction::West) => Some([(-major, -minor), (minor, major)]),
            (Direction::West, Direction::South) => Some([(-minor, -major), (major, minor)]),
            (Direction::West, Direction::North) => Some([(-minor, major), (major, -minor)]),
            _ => None,
        }
    }
}

/// Open-set entry ordered by f = g + h.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    state: Waypoint,
    f: i64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.state == other.state
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior; ties broken on the
        // waypoint's (x, y, facing) order to keep the search
        // deterministic.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pairwise shortest-path searcher with memoizing path/cost tables.
pub struct AStarPathfinder {
    config: PlannerConfig,
    turn: TurnGeometry,
    cost_table: HashMap<WaypointPair, i64>,
    path_table: HashMap<WaypointPair, Vec<Waypoint>>,
    searches: usize,
}

impl AStarPathfinder {
    pub fn new(config: PlannerConfig, big_turn: bool) -> Self {
        Self {
            turn: TurnGeometry::from_config(&config, big_turn),
            config,
            cost_table: HashMap::new(),
            path_table: HashMap::new(),
            searches: 0,
        }
    }

    /// Number of real searches run so far; cache hits do not count.
    pub fn searches(&self) -> usize {
        self.searches
    }

    /// Cached travel cost between two states, if a path is known.
    pub fn cost(&self, start: &Waypoint, end: &Waypoint) -> Option<i64> {
        self.cost_table
            .get(&WaypointPair::new(*start, *end))
            .copied()
    }

    /// Cached path between two states, if one is known.
    pub fn path(&self, start: &Waypoint, end: &Waypoint) -> Option<&Vec<Waypoint>> {
        self.path_table.get(&WaypointPair::new(*start, *end))
    }

    /// Search for a path between `start` and `end`, recording cost and
    /// path in both directions. A pair already in the cache returns
    /// immediately; a pair with no path leaves no entry behind.
    pub fn search(&mut self, grid: &Grid, start: &Waypoint, end: &Waypoint) {
        if self
            .path_table
            .contains_key(&WaypointPair::new(*start, *end))
        {
            return;
        }
        self.searches += 1;

        let mut open = BinaryHeap::new();
        let mut visited: HashSet<Waypoint> = HashSet::new();
        let mut g: HashMap<Waypoint, i64> = HashMap::new();
        let mut parent: HashMap<Waypoint, Waypoint> = HashMap::new();

        g.insert(*start, 0);
        open.push(OpenNode {
            state: *start,
            f: start.position.manhattan_distance(&end.position) as i64,
        });

        while let Some(OpenNode { state, .. }) = open.pop() {
            if visited.contains(&state) {
                continue;
            }
            if state == *end {
                let distance = g[&state];
                self.record_path(start, end, &parent, distance);
                return;
            }
            visited.insert(state);
            let current = g[&state];
            for neighbor in self.neighbors(grid, &state) {
                let next = Waypoint::new(neighbor.position, neighbor.facing);
                if visited.contains(&next) {
                    continue;
                }
                let move_cost = (rotation_cost(neighbor.facing, state.facing)
                    * self.config.turn_factor
                    + 1
                    + neighbor.cost) as i64;
                let tentative = current + move_cost;
                if g.get(&next).map_or(true, |&known| known > tentative) {
                    g.insert(next, tentative);
                    parent.insert(next, state);
                    open.push(OpenNode {
                        state: next,
                        f: tentative
                            + next.position.manhattan_distance(&end.position) as i64,
                    });
                }
            }
        }
        // Queue exhausted: the pair stays absent from the tables.
    }

    /// Reachable one-move successors of `state`.
    fn neighbors(&self, grid: &Grid, state: &Waypoint) -> Vec<Neighbor> {
        const MOVE_DIRECTIONS: [Direction; 4] = [
            Direction::East,
            Direction::West,
            Direction::North,
            Direction::South,
        ];
        let mut result = Vec::new();
        for &direction in &MOVE_DIRECTIONS {
            if direction == state.facing {
                // Straight line: one cell forward or backward.
                let (dx, dy) = direction.step();
                for &(sx, sy) in &[(dx, dy), (-dx, -dy)] {
                    let target = state.position.offset(sx, sy);
                    if grid.reachable(&target, false, false) {
                        result.push(Neighbor::new(target, direction, self.safe_cost(grid, &target)));
                    }
                }
            } else if let Some(offsets) = self.turn.offsets(state.facing, direction) {
                // Turn maneuver: both the destination and the origin
                // need the widened clearance.
                for &(dx, dy) in &offsets {
                    let target = state.position.offset(dx, dy);
                    if grid.reachable(&target, true, false)
                        && grid.reachable(&state.position, false, true)
                    {
                        result.push(Neighbor::new(
                            target,
                            direction,
                            self.safe_cost(grid, &target) + TURN_SURCHARGE,
                        ));
                    }
                }
            }
        }
        result
    }

    /// Near-miss penalty for cells that graze an obstacle corner at
    /// Chebyshev offsets (2,2), (1,2) or (2,1).
    fn safe_cost(&self, grid: &Grid, p: &GridPoint) -> i32 {
        for object in grid.objects() {
            let dx = (object.position.x - p.x).abs();
            let dy = (object.position.y - p.y).abs();
            if (dx == 2 && dy == 2) || (dx == 1 && dy == 2) || (dx == 2 && dy == 1) {
                return self.config.safe_cost;
            }
        }
        0
    }

    fn record_path(
        &mut self,
        start: &Waypoint,
        end: &Waypoint,
        parent: &HashMap<Waypoint, Waypoint>,
        distance: i64,
    ) {
        let pair = WaypointPair::new(*start, *end);
        self.cost_table.insert(pair, distance);
        self.cost_table.insert(pair.reversed(), distance);

        let mut backward = Vec::new();
        let mut cursor = *end;
        while let Some(&previous) = parent.get(&cursor) {
            backward.push(cursor);
            cursor = previous;
        }
        backward.push(cursor);

        let mut forward = backward.clone();
        forward.reverse();
        self.path_table.insert(pair, forward);
        self.path_table.insert(pair.reversed(), backward);
    }
}
