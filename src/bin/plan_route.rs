// Survey route planning demo on the reference obstacle layout.

use std::time::Instant;

use rover_planner::{
    generate_commands, render_route, Direction, GridPoint, PlannerConfig, TourPlanner,
};

fn main() {
    println!("Survey route planning start!!");

    let config = PlannerConfig::default();
    let mut planner = TourPlanner::new(
        GridPoint::new(20, 20),
        GridPoint::new(1, 1),
        Direction::North,
        false,
        config,
    );
    planner
        .add_obstacle(GridPoint::new(10, 10), Direction::North)
        .add_obstacle(GridPoint::new(10, 17), Direction::East)
        .add_obstacle(GridPoint::new(4, 17), Direction::South)
        .add_obstacle(GridPoint::new(18, 14), Direction::West)
        .add_obstacle(GridPoint::new(18, 5), Direction::West)
        .add_obstacle(GridPoint::new(12, 5), Direction::North);

    let started = Instant::now();
    let route = planner.plan(false);
    println!(
        "Planned {} waypoints in {:?} ({} searches)",
        route.len(),
        started.elapsed(),
        planner.pathfinder().searches()
    );
    for waypoint in &route {
        println!("  {}", waypoint);
    }

    match generate_commands(&route, planner.obstacles(), &config) {
        Ok(commands) => {
            let codes: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
            println!("Commands: {}", codes.join(", "));
        }
        Err(e) => eprintln!("Command generation failed: {}", e),
    }

    let output = "img/plan_route_result.png";
    match render_route(planner.grid(), &route, "Survey route", output) {
        Ok(()) => println!("Plot saved to: {}", output),
        Err(e) => eprintln!("Plotting skipped: {}", e),
    }

    println!("Survey route planning finish!!");
}
