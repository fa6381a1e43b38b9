//! Route optimization over obstacle observation points
//!
//! Decides which obstacles to visit, from which observation state each
//! one is photographed, and in what order, minimizing travel cost plus
//! the fixed observation penalties. Subsets of obstacles are tried in
//! descending coverage order; within a subset every per-obstacle choice
//! of observation state is enumerated under the configured budget and
//! scored with the exact tour solver over cached pairwise path costs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use itertools::Itertools;
use nalgebra::DMatrix;

use crate::common::{Direction, GridPoint, PlannerConfig, Waypoint};
use crate::field::{Grid, GridObject};
use crate::path_planning::a_star::AStarPathfinder;
use crate::path_planning::tsp;

/// Sentinel cost for waypoint pairs with no known path.
const INFINITE_COST: i64 = 0x7FFF_FFFF;

/// Cooperative cancellation flag threaded through the subset and
/// combination loops; cancelling returns the best route found so far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Obstacle-subset bitmasks ordered by descending popcount: full
/// coverage is always tried before dropping obstacles.
fn visit_options(count: usize) -> Vec<u64> {
    let mut options: Vec<u64> = (0..(1u64 << count)).collect();
    options.sort_by_key(|mask| std::cmp::Reverse(mask.count_ones()));
    options
}

/// Every per-obstacle choice of one observation state, enumerated by
/// recursive backtracking under `budget`. The budget is spent on
/// branch expansions; when it runs out the partial result stands.
fn enumerate_choices(
    candidates: &[&Vec<Waypoint>],
    slot: usize,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
    budget: &mut usize,
) {
    if slot == candidates.len() {
        result.push(current.clone());
        return;
    }
    if *budget == 0 {
        return;
    }
    *budget -= 1;
    for index in 0..candidates[slot].len() {
        current.push(index);
        enumerate_choices(candidates, slot + 1, current, result, budget);
        current.pop();
    }
}

/// Plans the obstacle-visiting route for one field layout.
///
/// Obstacles and the rover are fixed for the planner's lifetime; the
/// pairwise path caches persist across `plan` calls so a retry pass
/// reuses every search already done.
pub struct TourPlanner {
    config: PlannerConfig,
    grid: Grid,
    robot: GridObject,
    pathfinder: AStarPathfinder,
}

impl TourPlanner {
    pub fn new(
        grid_size: GridPoint,
        robot_position: GridPoint,
        robot_facing: Direction,
        big_turn: bool,
        config: PlannerConfig,
    ) -> Self {
        Self {
            config,
            grid: Grid::new(grid_size, config),
            robot: GridObject::robot(robot_position, robot_facing),
            pathfinder: AStarPathfinder::new(config, big_turn),
        }
    }

    /// Register an obstacle; chainable.
    pub fn add_obstacle(&mut self, position: GridPoint, facing: Direction) -> &mut Self {
        self.grid.add_obstacle(position, facing);
        self
    }

    /// Register a preconstructed object, keeping its snapshot id
    /// (editor/persistence interface); chainable.
    pub fn add_object(&mut self, object: GridObject) -> &mut Self {
        self.grid.add_object(object);
        self
    }

    /// The obstacle list, with stable snapshot ids, for command
    /// generation and display layers.
    pub fn obstacles(&self) -> &[GridObject] {
        self.grid.objects()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn robot(&self) -> &GridObject {
        &self.robot
    }

    pub fn pathfinder(&self) -> &AStarPathfinder {
        &self.pathfinder
    }

    /// Plan the optimal visiting route. Empty when no tour exists.
    pub fn plan(&mut self, retrying: bool) -> Vec<Waypoint> {
        self.plan_cancellable(retrying, &CancelToken::new())
    }

    /// As `plan`, but checks `cancel` between subsets and combinations
    /// and returns the best route found so far when it trips.
    pub fn plan_cancellable(&mut self, retrying: bool, cancel: &CancelToken) -> Vec<Waypoint> {
        let all_positions = self.grid.observation_positions(retrying);
        let mut best_total = INFINITE_COST;
        let mut best_route: Vec<Waypoint> = Vec::new();

        for mask in visit_options(all_positions.len()) {
            if cancel.is_cancelled() {
                break;
            }
            let mut items = vec![self.robot.state()];
            let mut selected: Vec<&Vec<Waypoint>> = Vec::new();
            for (index, positions) in all_positions.iter().enumerate() {
                if (mask >> index) & 1 == 1 {
                    items.extend(positions.iter().copied());
                    selected.push(positions);
                }
            }
            self.fill_pair_costs(&items);

            let mut choices = Vec::new();
            let mut budget = self.config.iterations;
            enumerate_choices(&selected, 0, &mut Vec::new(), &mut choices, &mut budget);

            for choice in &choices {
                if cancel.is_cancelled() {
                    break;
                }
                // Map the per-slot choice to indices into `items`.
                let mut chosen = vec![0usize];
                let mut fixed_penalty = 0i64;
                let mut base = 1usize;
                for (slot, positions) in selected.iter().enumerate() {
                    chosen.push(base + choice[slot]);
                    fixed_penalty += positions[choice[slot]].penalty as i64;
                    base += positions.len();
                }

                let n = chosen.len();
                let mut matrix = DMatrix::from_element(n, n, 0i64);
                for y in 0..n {
                    for x in (y + 1)..n {
                        let cost = self
                            .pathfinder
                            .cost(&items[chosen[y]], &items[chosen[x]])
                            .unwrap_or(INFINITE_COST);
                        matrix[(y, x)] = cost;
                        matrix[(x, y)] = cost;
                    }
                }
                // The tour ends at its last waypoint: returning to the
                // home node costs nothing.
                for y in 0..n {
                    matrix[(y, 0)] = 0;
                }

                let result = tsp::solve(&matrix);
                let total = result.best_distance.saturating_add(fixed_penalty);
                if total >= best_total {
                    continue;
                }
                best_total = total;
                best_route = vec![items[0]];
                for (from, to) in result.order.iter().tuple_windows() {
                    if let Some(segment) = self
                        .pathfinder
                        .path(&items[chosen[*from]], &items[chosen[*to]])
                    {
                        // The segment starts where the previous one
                        // ended; skip the shared endpoint.
                        best_route.extend(segment.iter().skip(1).copied());
                    }
                }
            }

            if !best_route.is_empty() {
                break;
            }
        }
        best_route
    }

    /// Pre-populate the pairwise caches for every item pair.
    fn fill_pair_costs(&mut self, items: &[Waypoint]) {
        for (i, j) in (0..items.len()).tuple_combinations() {
            self.pathfinder.search(&self.grid, &items[i], &items[j]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_planner() -> TourPlanner {
        let mut planner = TourPlanner::new(
            GridPoint::new(20, 20),
            GridPoint::new(1, 1),
            Direction::North,
            false,
            PlannerConfig::default(),
        );
        planner
            .add_obstacle(GridPoint::new(10, 10), Direction::North)
            .add_obstacle(GridPoint::new(10, 17), Direction::East)
            .add_obstacle(GridPoint::new(4, 17), Direction::South)
            .add_obstacle(GridPoint::new(18, 14), Direction::West)
            .add_obstacle(GridPoint::new(18, 5), Direction::West)
            .add_obstacle(GridPoint::new(12, 5), Direction::North);
        planner
    }

    #[test]
    fn test_visit_options_ordered_by_coverage() {
        let options = visit_options(3);
        assert_eq!(options.len(), 8);
        assert_eq!(options[0], 0b111);
        assert_eq!(options[7], 0);
        let popcounts: Vec<u32> = options.iter().map(|m| m.count_ones()).collect();
        let mut sorted = popcounts.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(popcounts, sorted);
    }

    #[test]
    fn test_choice_enumeration_respects_budget() {
        let a = vec![
            Waypoint::new(GridPoint::new(1, 1), Direction::North),
            Waypoint::new(GridPoint::new(2, 2), Direction::North),
        ];
        let b = vec![
            Waypoint::new(GridPoint::new(3, 3), Direction::South),
            Waypoint::new(GridPoint::new(4, 4), Direction::South),
        ];
        let candidates = vec![&a, &b];

        let mut all = Vec::new();
        let mut budget = 100;
        enumerate_choices(&candidates, 0, &mut Vec::new(), &mut all, &mut budget);
        assert_eq!(all.len(), 4);

        let mut capped = Vec::new();
        let mut tight = 1;
        enumerate_choices(&candidates, 0, &mut Vec::new(), &mut capped, &mut tight);
        assert!(capped.len() < 4);
    }

    #[test]
    fn test_choice_enumeration_empty_slot_yields_nothing() {
        let a = vec![Waypoint::new(GridPoint::new(1, 1), Direction::North)];
        let empty: Vec<Waypoint> = Vec::new();
        let candidates = vec![&a, &empty];
        let mut all = Vec::new();
        let mut budget = 100;
        enumerate_choices(&candidates, 0, &mut Vec::new(), &mut all, &mut budget);
        assert!(all.is_empty());
    }

    #[test]
    fn test_plan_without_obstacles_stays_home() {
        let mut planner = TourPlanner::new(
            GridPoint::new(20, 20),
            GridPoint::new(1, 1),
            Direction::North,
            false,
            PlannerConfig::default(),
        );
        let route = planner.plan(false);
        assert_eq!(route, vec![planner.robot().state()]);
    }

    #[test]
    fn test_plan_single_obstacle() {
        let mut planner = TourPlanner::new(
            GridPoint::new(20, 20),
            GridPoint::new(1, 1),
            Direction::North,
            false,
            PlannerConfig::default(),
        );
        planner.add_obstacle(GridPoint::new(10, 10), Direction::North);

        let route = planner.plan(false);
        assert!(!route.is_empty());
        assert_eq!(route[0], planner.robot().state());
        let last = route.last().unwrap();
        assert_eq!(last.snapshot_id, Some(1));
        // The route ends on one of the obstacle's observation states.
        assert_eq!(last.facing, Direction::South);
    }

    #[test]
    fn test_plan_reference_scenario() {
        let mut planner = reference_planner();
        let route = planner.plan(false);
        assert!(!route.is_empty());
        assert_eq!(route[0], planner.robot().state());
        assert!(route.last().unwrap().snapshot_id.is_some());
        // Consecutive waypoints always differ.
        for pair in route.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_preconstructed_obstacle_keeps_its_id() {
        let mut planner = TourPlanner::new(
            GridPoint::new(20, 20),
            GridPoint::new(1, 1),
            Direction::North,
            false,
            PlannerConfig::default(),
        );
        planner.add_object(GridObject::block(
            GridPoint::new(10, 10),
            Direction::North,
            42,
        ));
        let route = planner.plan(false);
        assert_eq!(route.last().unwrap().snapshot_id, Some(42));
    }

    #[test]
    fn test_reference_route_translates_to_commands() {
        let mut planner = reference_planner();
        let route = planner.plan(false);
        let commands =
            crate::commands::generate_commands(&route, planner.obstacles(), &PlannerConfig::default())
                .unwrap();
        assert_eq!(commands.last(), Some(&crate::commands::Command::Finish));
        assert!(commands
            .iter()
            .any(|c| matches!(c, crate::commands::Command::Snap { .. })));
    }

    #[test]
    fn test_retry_reuses_cached_searches() {
        let mut planner = TourPlanner::new(
            GridPoint::new(20, 20),
            GridPoint::new(1, 1),
            Direction::North,
            false,
            PlannerConfig::default(),
        );
        planner.add_obstacle(GridPoint::new(10, 10), Direction::North);

        let first = planner.plan(false);
        let searched = planner.pathfinder().searches();
        let again = planner.plan(false);
        assert_eq!(first, again);
        assert_eq!(planner.pathfinder().searches(), searched);
    }

    #[test]
    fn test_cancelled_plan_returns_immediately() {
        let mut planner = reference_planner();
        let cancel = CancelToken::new();
        cancel.cancel();
        let route = planner.plan_cancellable(false, &cancel);
        assert!(route.is_empty());
        assert_eq!(planner.pathfinder().searches(), 0);
    }
}
