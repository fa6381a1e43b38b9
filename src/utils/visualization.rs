//! Visualization utilities for rover_planner
//!
//! Renders the obstacle field and a planned route to a PNG using
//! gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, PointSize, PointSymbol};

use crate::common::{GridPoint, PlannerError, PlannerResult, Waypoint};
use crate::field::Grid;

/// Color palette for consistent styling
pub mod colors {
    pub const OBSTACLE: &str = "#000000";
    pub const FACE: &str = "#0000FF";
    pub const START: &str = "#00FF00";
    pub const ROUTE: &str = "#FF0000";
    pub const OBSERVATION: &str = "#FFA500";
}

fn xs_ys<I: IntoIterator<Item = GridPoint>>(points: I) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for p in points {
        xs.push(p.x as f64);
        ys.push(p.y as f64);
    }
    (xs, ys)
}

/// Marked-face indicator points, nudged a fraction of a cell outward
/// so the facing stays readable next to the obstacle square.
fn face_markers(grid: &Grid) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for object in grid.objects() {
        let (dx, dy) = object.facing.step();
        if (dx, dy) == (0, 0) {
            continue;
        }
        xs.push(object.position.x as f64 + 0.4 * dx as f64);
        ys.push(object.position.y as f64 + 0.4 * dy as f64);
    }
    (xs, ys)
}

/// Render the field and route to `output` (PNG).
pub fn render_route(
    grid: &Grid,
    route: &[Waypoint],
    title: &str,
    output: &str,
) -> PlannerResult<()> {
    let (ox, oy) = xs_ys(grid.objects().iter().map(|o| o.position));
    let (fx, fy) = face_markers(grid);
    let (rx, ry) = xs_ys(route.iter().map(|w| w.position));
    let (sx, sy) = xs_ys(route.first().map(|w| w.position));
    let (vx, vy) = xs_ys(
        route
            .iter()
            .filter(|w| w.snapshot_id.is_some())
            .map(|w| w.position),
    );

    let size = grid.size();
    let mut fg = Figure::new();
    fg.axes2d()
        .points(
            &ox,
            &oy,
            &[
                Caption("Obstacles"),
                Color(colors::OBSTACLE),
                PointSymbol('S'),
                PointSize(2.0),
            ],
        )
        .points(
            &fx,
            &fy,
            &[Caption("Faces"), Color(colors::FACE), PointSymbol('T')],
        )
        .lines(&rx, &ry, &[Caption("Route"), Color(colors::ROUTE)])
        .points(
            &vx,
            &vy,
            &[
                Caption("Observations"),
                Color(colors::OBSERVATION),
                PointSymbol('O'),
            ],
        )
        .points(
            &sx,
            &sy,
            &[
                Caption("Start"),
                Color(colors::START),
                PointSymbol('D'),
                PointSize(2.0),
            ],
        )
        .set_x_range(AutoOption::Fix(0.0), AutoOption::Fix(size.x as f64))
        .set_y_range(AutoOption::Fix(0.0), AutoOption::Fix(size.y as f64))
        .set_aspect_ratio(AutoOption::Fix(1.0))
        .set_title(title, &[])
        .set_x_label("X [cell]", &[])
        .set_y_label("Y [cell]", &[]);

    fg.save_to_png(output, 800, 800)
        .map_err(|e| PlannerError::VisualizationError(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Direction, PlannerConfig};

    #[test]
    fn test_xs_ys_split() {
        let (xs, ys) = xs_ys(vec![GridPoint::new(1, 2), GridPoint::new(3, 4)]);
        assert_eq!(xs, vec![1.0, 3.0]);
        assert_eq!(ys, vec![2.0, 4.0]);
    }

    #[test]
    fn test_face_markers_skip_unmarked() {
        let mut grid = Grid::new(GridPoint::new(20, 20), PlannerConfig::default());
        grid.add_obstacle(GridPoint::new(5, 5), Direction::East);
        grid.add_obstacle(GridPoint::new(8, 8), Direction::None);
        let (xs, ys) = face_markers(&grid);
        assert_eq!(xs, vec![5.4]);
        assert_eq!(ys, vec![5.0]);
    }
}
