//! Movement command generation
//!
//! Translates a planned waypoint route into the discrete commands the
//! rover executes: straight moves, quarter-circle turns, snapshot
//! triggers and a terminal marker. Adjacent straight runs are
//! compressed into single commands, optionally capped at 90 distance
//! units. Each command serializes to a short textual code and parses
//! back losslessly.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::common::{Direction, PlannerConfig, PlannerError, PlannerResult, Waypoint};
use crate::field::GridObject;

/// Distance covered by one straight move, in command units.
const MOVE_STEP: i32 = 10;
/// Turn-command distance when outside commands are enabled.
const OUTSIDE_TURN_DISTANCE: i32 = 30;
/// Longest straight run a single command may carry when capped.
const MAX_STRAIGHT_RUN: i32 = 90;

/// Lateral offset of the rover relative to the photographed face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapOffset {
    Left,
    Center,
    Right,
}

impl SnapOffset {
    fn code(self) -> char {
        match self {
            SnapOffset::Left => 'L',
            SnapOffset::Center => 'C',
            SnapOffset::Right => 'R',
        }
    }
}

/// One discrete rover command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ForwardLeft { distance: i32 },
    ForwardRight { distance: i32 },
    BackwardLeft { distance: i32 },
    BackwardRight { distance: i32 },
    Forward { distance: i32 },
    Backward { distance: i32 },
    Snap { id: i32, offset: Option<SnapOffset> },
    Finish,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ForwardLeft { distance } => write!(f, "FL{:02}", distance),
            Command::ForwardRight { distance } => write!(f, "FR{:02}", distance),
            Command::BackwardLeft { distance } => write!(f, "BL{:02}", distance),
            Command::BackwardRight { distance } => write!(f, "BR{:02}", distance),
            Command::Forward { distance } => write!(f, "FW{:02}", distance),
            Command::Backward { distance } => write!(f, "BW{:02}", distance),
            Command::Snap { id, offset } => {
                write!(f, "SNAP{}", id)?;
                if let Some(offset) = offset {
                    write!(f, "_{}", offset.code())?;
                }
                Ok(())
            }
            Command::Finish => write!(f, "FIN"),
        }
    }
}

impl FromStr for Command {
    type Err = PlannerError;

    fn from_str(code: &str) -> PlannerResult<Self> {
        if code == "FIN" {
            return Ok(Command::Finish);
        }
        if let Some(rest) = code.strip_prefix("SNAP") {
            let (id_part, offset) = match rest.find('_') {
                Some(split) => {
                    let offset = match &rest[split + 1..] {
                        "L" => SnapOffset::Left,
                        "C" => SnapOffset::Center,
                        "R" => SnapOffset::Right,
                        other => {
                            return Err(PlannerError::InvalidCommand(format!(
                                "unknown snap offset '{}'",
                                other
                            )))
                        }
                    };
                    (&rest[..split], Some(offset))
                }
                None => (rest, None),
            };
            let id = id_part
                .parse()
                .map_err(|_| PlannerError::InvalidCommand(format!("bad snapshot id in '{}'", code)))?;
            return Ok(Command::Snap { id, offset });
        }
        if code.len() < 2 {
            return Err(PlannerError::InvalidCommand(format!("'{}' is too short", code)));
        }
        let (prefix, rest) = code.split_at(2);
        let distance: i32 = rest
            .parse()
            .map_err(|_| PlannerError::InvalidCommand(format!("bad distance in '{}'", code)))?;
        match prefix {
            "FL" => Ok(Command::ForwardLeft { distance }),
            "FR" => Ok(Command::ForwardRight { distance }),
            "BL" => Ok(Command::BackwardLeft { distance }),
            "BR" => Ok(Command::BackwardRight { distance }),
            "FW" => Ok(Command::Forward { distance }),
            "BW" => Ok(Command::Backward { distance }),
            _ => Err(PlannerError::InvalidCommand(format!(
                "unknown command code '{}'",
                code
            ))),
        }
    }
}

/// The turn command for a facing change, picked from the 8 valid
/// (previous, current) facing pairs by the sign of the y displacement.
fn turn_command(
    previous: &Waypoint,
    current: &Waypoint,
    distance: i32,
) -> PlannerResult<Command> {
    let crossed_up = current.position.y > previous.position.y;
    let command = match (previous.facing, current.facing) {
        (Direction::North, Direction::East) => {
            if crossed_up {
                Command::ForwardRight { distance }
            } else {
                Command::BackwardLeft { distance }
            }
        }
        (Direction::North, Direction::West) => {
            if crossed_up {
                Command::ForwardLeft { distance }
            } else {
                Command::BackwardRight { distance }
            }
        }
        (Direction::East, Direction::North) => {
            if crossed_up {
                Command::ForwardLeft { distance }
            } else {
                Command::BackwardRight { distance }
            }
        }
        (Direction::East, Direction::South) => {
            if crossed_up {
                Command::BackwardLeft { distance }
            } else {
                Command::ForwardRight { distance }
            }
        }
        (Direction::South, Direction::East) => {
            if crossed_up {
                Command::BackwardRight { distance }
            } else {
                Command::ForwardLeft { distance }
            }
        }
        (Direction::South, Direction::West) => {
            if crossed_up {
                Command::BackwardLeft { distance }
            } else {
                Command::ForwardRight { distance }
            }
        }
        (Direction::West, Direction::North) => {
            if crossed_up {
                Command::ForwardRight { distance }
            } else {
                Command::BackwardLeft { distance }
            }
        }
        (Direction::West, Direction::South) => {
            if crossed_up {
                Command::BackwardRight { distance }
            } else {
                Command::ForwardLeft { distance }
            }
        }
        (from, to) => return Err(PlannerError::InvalidTurn { from, to }),
    };
    Ok(command)
}

/// Snap command for an observation waypoint, tagged with the rover's
/// lateral offset along the face. No command when the obstacle face
/// and the rover facing are not opposite.
fn snapshot_command(obstacle: &GridObject, waypoint: &Waypoint) -> Option<Command> {
    let id = waypoint.snapshot_id?;
    let offset = match (obstacle.facing, waypoint.facing) {
        (Direction::West, Direction::East) => {
            match obstacle.position.y.cmp(&waypoint.position.y) {
                Ordering::Greater => SnapOffset::Left,
                Ordering::Equal => SnapOffset::Center,
                Ordering::Less => SnapOffset::Right,
            }
        }
        (Direction::East, Direction::West) => {
            match obstacle.position.y.cmp(&waypoint.position.y) {
                Ordering::Greater => SnapOffset::Right,
                Ordering::Equal => SnapOffset::Center,
                Ordering::Less => SnapOffset::Left,
            }
        }
        (Direction::North, Direction::South) => {
            match obstacle.position.x.cmp(&waypoint.position.x) {
                Ordering::Greater => SnapOffset::Left,
                Ordering::Equal => SnapOffset::Center,
                Ordering::Less => SnapOffset::Right,
            }
        }
        (Direction::South, Direction::North) => {
            match obstacle.position.x.cmp(&waypoint.position.x) {
                Ordering::Greater => SnapOffset::Right,
                Ordering::Equal => SnapOffset::Center,
                Ordering::Less => SnapOffset::Left,
            }
        }
        _ => return None,
    };
    Some(Command::Snap {
        id,
        offset: Some(offset),
    })
}

/// Translate a waypoint route into compressed rover commands.
pub fn generate_commands(
    route: &[Waypoint],
    obstacles: &[GridObject],
    config: &PlannerConfig,
) -> PlannerResult<Vec<Command>> {
    let snapshot_targets: HashMap<i32, &GridObject> = obstacles
        .iter()
        .filter_map(|o| o.snapshot_id().map(|id| (id, o)))
        .collect();
    let turn_distance = if config.outside_command {
        OUTSIDE_TURN_DISTANCE
    } else {
        0
    };

    let mut commands = Vec::new();
    for pair in route.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        if current.facing == previous.facing {
            // Forward iff the displacement matches the facing; every
            // other same-facing transition is a reverse move.
            let forward = match current.facing {
                Direction::East => current.position.x > previous.position.x,
                Direction::West => current.position.x < previous.position.x,
                Direction::North => current.position.y > previous.position.y,
                Direction::South => current.position.y < previous.position.y,
                Direction::None => false,
            };
            commands.push(if forward {
                Command::Forward { distance: MOVE_STEP }
            } else {
                Command::Backward { distance: MOVE_STEP }
            });
        } else {
            commands.push(turn_command(previous, current, turn_distance)?);
        }
        if let Some(id) = current.snapshot_id {
            if let Some(obstacle) = snapshot_targets.get(&id) {
                if let Some(snap) = snapshot_command(obstacle, current) {
                    commands.push(snap);
                }
            }
        }
    }
    commands.push(Command::Finish);
    Ok(compress_commands(commands, config))
}

/// Merge adjacent same-kind straight runs, respecting the 90-unit cap
/// when it is enabled.
fn compress_commands(commands: Vec<Command>, config: &PlannerConfig) -> Vec<Command> {
    let mut result: Vec<Command> = Vec::new();
    for command in commands {
        if let Some(last) = result.last_mut() {
            let merged = match (last, &command) {
                (Command::Forward { distance }, Command::Forward { distance: step })
                | (Command::Backward { distance }, Command::Backward { distance: step }) => {
                    if *distance < MAX_STRAIGHT_RUN || !config.limit_max90 {
                        *distance += *step;
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            };
            if merged {
                continue;
            }
        }
        result.push(command);
    }
    result
}
