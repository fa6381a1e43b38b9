//! Grid objects: obstacle blocks and the rover
//!
//! Both object kinds share an oriented, odd-sized rectangular footprint.
//! Blocks additionally own a stable snapshot id and generate the
//! candidate observation states the tour planner chooses between; the
//! rover contributes its camera-marker geometry for display layers.

use crate::common::{Direction, GridPoint, PlannerConfig, Waypoint};

/// Penalty of the close-by observation variant.
const NEAR_VIEW_PENALTY: i32 = 5;

/// Classification of a grid cell relative to one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Not inside this object's footprint.
    Invalid,
    /// Inside an unmarked block.
    Blank,
    /// Inside a block whose marked face points the given way.
    Face(Direction),
    /// Inside the rover body.
    RobotBody,
    /// The rover's camera marker cell.
    Camera,
}

/// Variant-specific data of a grid object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Block { snapshot_id: i32 },
    Robot,
}

/// An oriented object occupying an odd-by-odd footprint on the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridObject {
    pub position: GridPoint,
    pub facing: Direction,
    size: GridPoint,
    kind: ObjectKind,
}

impl GridObject {
    /// Footprint dimensions must be odd so the object has a center cell.
    pub fn new(position: GridPoint, size: GridPoint, facing: Direction, kind: ObjectKind) -> Self {
        assert!(size.x % 2 == 1, "footprint width must be odd");
        assert!(size.y % 2 == 1, "footprint height must be odd");
        Self {
            position,
            facing,
            size,
            kind,
        }
    }

    /// A 1x1 obstacle block with a stable snapshot id.
    pub fn block(position: GridPoint, facing: Direction, snapshot_id: i32) -> Self {
        Self::new(
            position,
            GridPoint::new(1, 1),
            facing,
            ObjectKind::Block { snapshot_id },
        )
    }

    /// The 3x3 rover.
    pub fn robot(position: GridPoint, facing: Direction) -> Self {
        Self::new(position, GridPoint::new(3, 3), facing, ObjectKind::Robot)
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn size(&self) -> GridPoint {
        self.size
    }

    pub fn snapshot_id(&self) -> Option<i32> {
        match self.kind {
            ObjectKind::Block { snapshot_id } => Some(snapshot_id),
            ObjectKind::Robot => None,
        }
    }

    /// The object's oriented center state.
    pub fn state(&self) -> Waypoint {
        Waypoint::new(self.position, self.facing)
    }

    pub fn update(&mut self, position: GridPoint, facing: Direction) {
        self.position = position;
        self.facing = facing;
    }

    /// Cycle to the next facing. Blocks pass through the unmarked
    /// `None` state; the rover always faces a cardinal direction.
    pub fn cycle_facing(&mut self) {
        self.facing = match (self.kind, self.facing) {
            (ObjectKind::Block { .. }, Direction::West) => Direction::None,
            (ObjectKind::Robot, Direction::West) => Direction::North,
            (_, Direction::None) => Direction::North,
            (_, Direction::North) => Direction::East,
            (_, Direction::East) => Direction::South,
            (_, Direction::South) => Direction::West,
        };
    }

    pub fn contains(&self, p: &GridPoint) -> bool {
        let half_x = self.size.x / 2;
        let half_y = self.size.y / 2;
        p.x >= self.position.x - half_x
            && p.x <= self.position.x + half_x
            && p.y >= self.position.y - half_y
            && p.y <= self.position.y + half_y
    }

    /// All cells covered by the footprint.
    pub fn footprint(&self) -> Vec<GridPoint> {
        let start_x = self.position.x - self.size.x / 2;
        let start_y = self.position.y - self.size.y / 2;
        let mut cells = Vec::with_capacity((self.size.x * self.size.y) as usize);
        for x in start_x..start_x + self.size.x {
            for y in start_y..start_y + self.size.y {
                cells.push(GridPoint::new(x, y));
            }
        }
        cells
    }

    /// Classify a grid cell relative to this object.
    pub fn cell_kind(&self, p: &GridPoint) -> CellKind {
        if !self.contains(p) {
            return CellKind::Invalid;
        }
        match self.kind {
            ObjectKind::Block { .. } => match self.facing {
                Direction::None => CellKind::Blank,
                facing => CellKind::Face(facing),
            },
            ObjectKind::Robot => {
                if self.facing == Direction::None {
                    return CellKind::RobotBody;
                }
                let (dx, dy) = self.facing.step();
                let camera = self
                    .position
                    .offset(dx * (self.size.x / 2), dy * (self.size.y / 2));
                if *p == camera {
                    CellKind::Camera
                } else {
                    CellKind::RobotBody
                }
            }
        }
    }

    /// Candidate observation states for a block's marked face.
    ///
    /// Candidates sit outward of the face, at distances derived from
    /// the expanded-cell buffer: one near variant, one canonical
    /// variant and two penalized lateral variants. Retrying shifts the
    /// set one cell further out and drops the near variant. Candidates
    /// outside the configured field bounds are discarded; the rover
    /// (and unmarked blocks) contribute none.
    pub fn observation_states(&self, retrying: bool, config: &PlannerConfig) -> Vec<Waypoint> {
        let snapshot_id = match self.kind {
            ObjectKind::Block { snapshot_id } => snapshot_id,
            ObjectKind::Robot => return Vec::new(),
        };
        let (outward, lateral) = match self.facing {
            Direction::North => ((0, 1), (1, 0)),
            Direction::East => ((1, 0), (0, 1)),
            Direction::South => ((0, -1), (1, 0)),
            Direction::West => ((-1, 0), (0, 1)),
            Direction::None => return Vec::new(),
        };
        let reach = 2 * config.expanded_cell;
        let at = |steps: i32, side: i32| {
            self.position.offset(
                outward.0 * steps + lateral.0 * side,
                outward.1 * steps + lateral.1 * side,
            )
        };

        let mut candidates = Vec::with_capacity(4);
        let observer = self.facing.opposite();
        let mut push = |position: GridPoint, penalty: i32| {
            if within_field(&position, config) {
                candidates.push(Waypoint::observation(
                    position, observer, snapshot_id, penalty,
                ));
            }
        };

        if retrying {
            push(at(reach + 2, 0), 0);
            push(at(reach + 3, 0), 0);
        } else {
            push(at(reach + 1, 0), NEAR_VIEW_PENALTY);
            push(at(reach + 2, 0), 0);
        }
        push(at(reach + 2, 1), config.screenshot_cost);
        push(at(reach + 2, -1), config.screenshot_cost);
        candidates
    }
}

/// Strictly inside the configured field bounds (1-cell border excluded).
fn within_field(p: &GridPoint, config: &PlannerConfig) -> bool {
    p.x > 0 && p.y > 0 && p.x < config.width_buffer - 1 && p.y < config.height_buffer - 1
}
