//! Obstacle registry and reachability queries
//!
//! The grid owns the obstacle list and answers the two questions the
//! pathfinder asks of it: may the rover center occupy a cell (plain or
//! while turning), and from where may each obstacle's marked face be
//! observed.

use crate::common::{Direction, GridPoint, PlannerConfig, Waypoint};
use crate::field::objects::GridObject;

/// Inherited boundary exception: obstacles on the x = 4 column at or
/// below y = 4 do not constrain cells in the low corner region
/// (x < 4, y < 4). Kept as-is from the competition field layout this
/// planner was tuned on.
fn low_corner_carve_out(obstacle: &GridPoint, p: &GridPoint) -> bool {
    obstacle.x == 4 && obstacle.y <= 4 && p.x < 4 && p.y < 4
}

/// Bounded planning grid holding the obstacle list.
#[derive(Debug, Clone)]
pub struct Grid {
    size: GridPoint,
    config: PlannerConfig,
    objects: Vec<GridObject>,
}

impl Grid {
    pub fn new(size: GridPoint, config: PlannerConfig) -> Self {
        Self {
            size,
            config,
            objects: Vec::new(),
        }
    }

    pub fn size(&self) -> GridPoint {
        self.size
    }

    pub fn objects(&self) -> &[GridObject] {
        &self.objects
    }

    /// Register an obstacle block with the next sequential snapshot id.
    /// Placements outside the grid are dropped silently.
    pub fn add_obstacle(&mut self, position: GridPoint, facing: Direction) {
        if position.x < 0
            || position.x >= self.size.x
            || position.y < 0
            || position.y >= self.size.y
        {
            return;
        }
        let snapshot_id = self.objects.len() as i32 + 1;
        self.objects
            .push(GridObject::block(position, facing, snapshot_id));
    }

    /// Register a preconstructed object (editor/persistence interface).
    pub fn add_object(&mut self, object: GridObject) {
        self.objects.push(object);
    }

    /// Strictly inside the 1-cell border.
    pub fn is_valid_coordinate(&self, p: &GridPoint) -> bool {
        p.x >= 1 && p.x < self.size.x - 1 && p.y >= 1 && p.y < self.size.y - 1
    }

    /// May the rover center occupy `p`?
    ///
    /// Obstacles further than Manhattan distance 4 never constrain a
    /// cell. Within that radius the cell must keep Chebyshev distance 2
    /// from each obstacle, widened to 2 x expanded_cell + 1 when the
    /// cell is the destination (`turning`) or origin (`pre_turning`) of
    /// a turn maneuver.
    pub fn reachable(&self, p: &GridPoint, turning: bool, pre_turning: bool) -> bool {
        if !self.is_valid_coordinate(p) {
            return false;
        }
        let turn_margin = self.config.expanded_cell * 2 + 1;
        for object in &self.objects {
            if low_corner_carve_out(&object.position, p) {
                continue;
            }
            if object.position.manhattan_distance(p) >= 4 {
                continue;
            }
            let separation = object.position.chebyshev_distance(p);
            if turning || pre_turning {
                if separation < turn_margin {
                    return false;
                }
            } else if separation < 2 {
                return false;
            }
        }
        true
    }

    /// Per-obstacle candidate observation states, keeping only the
    /// reachable ones. Obstacles with no marked face contribute no
    /// list; a marked obstacle whose candidates are all unreachable
    /// contributes an empty one.
    pub fn observation_positions(&self, retrying: bool) -> Vec<Vec<Waypoint>> {
        let mut all = Vec::new();
        for object in &self.objects {
            if object.facing == Direction::None {
                continue;
            }
            let candidates = object
                .observation_states(retrying, &self.config)
                .into_iter()
                .filter(|s| self.reachable(&s.position, false, false))
                .collect();
            all.push(candidates);
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_20() -> Grid {
        Grid::new(GridPoint::new(20, 20), PlannerConfig::default())
    }

    #[test]
    fn test_valid_coordinate_excludes_border() {
        let grid = grid_20();
        assert!(grid.is_valid_coordinate(&GridPoint::new(1, 1)));
        assert!(grid.is_valid_coordinate(&GridPoint::new(18, 18)));
        assert!(!grid.is_valid_coordinate(&GridPoint::new(0, 5)));
        assert!(!grid.is_valid_coordinate(&GridPoint::new(19, 5)));
        assert!(!grid.is_valid_coordinate(&GridPoint::new(5, 0)));
    }

    #[test]
    fn test_add_obstacle_assigns_sequential_ids() {
        let mut grid = grid_20();
        grid.add_obstacle(GridPoint::new(5, 5), Direction::North);
        grid.add_obstacle(GridPoint::new(10, 10), Direction::East);
        let ids: Vec<_> = grid.objects().iter().map(|o| o.snapshot_id()).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_add_obstacle_out_of_bounds_is_dropped() {
        let mut grid = grid_20();
        grid.add_obstacle(GridPoint::new(-1, 5), Direction::North);
        grid.add_obstacle(GridPoint::new(5, 20), Direction::North);
        assert!(grid.objects().is_empty());
    }

    #[test]
    fn test_reachable_margins() {
        let mut grid = grid_20();
        grid.add_obstacle(GridPoint::new(10, 10), Direction::North);

        // Adjacent cell: inside the plain safety margin.
        assert!(!grid.reachable(&GridPoint::new(11, 10), false, false));
        // Chebyshev 2 with Manhattan < 4: allowed when not turning...
        assert!(grid.reachable(&GridPoint::new(12, 10), false, false));
        // ...but inside the widened turning margin.
        assert!(!grid.reachable(&GridPoint::new(12, 10), true, false));
        assert!(!grid.reachable(&GridPoint::new(12, 10), false, true));
        // Manhattan 4 or more: the obstacle is ignored entirely.
        assert!(grid.reachable(&GridPoint::new(12, 12), true, false));
    }

    #[test]
    fn test_reachable_turning_implies_plain() {
        let mut grid = grid_20();
        grid.add_obstacle(GridPoint::new(6, 6), Direction::South);
        grid.add_obstacle(GridPoint::new(14, 9), Direction::West);
        for x in 0..20 {
            for y in 0..20 {
                let p = GridPoint::new(x, y);
                if grid.reachable(&p, true, false) {
                    assert!(grid.reachable(&p, false, false), "at {}", p);
                }
            }
        }
    }

    #[test]
    fn test_low_corner_carve_out() {
        let mut grid = grid_20();
        grid.add_obstacle(GridPoint::new(4, 3), Direction::North);
        // Adjacent, but inside the exempted corner region.
        assert!(grid.reachable(&GridPoint::new(3, 3), false, false));
        // Adjacent on the non-exempted side.
        assert!(!grid.reachable(&GridPoint::new(5, 3), false, false));
    }

    #[test]
    fn test_observation_positions_skip_unmarked_and_filter() {
        let mut grid = grid_20();
        grid.add_obstacle(GridPoint::new(10, 10), Direction::North);
        grid.add_obstacle(GridPoint::new(5, 5), Direction::None);

        let all = grid.observation_positions(false);
        // Unmarked obstacle contributes no list at all.
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].len(), 4);

        // A preconstructed block sitting on the canonical viewing spot
        // eliminates candidates around it.
        grid.add_object(GridObject::block(GridPoint::new(10, 14), Direction::None, 7));
        let filtered = grid.observation_positions(false);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].len() < 4);
    }
}
