use roboarena_shared::*;

use crate::robot::{armor_plates, chassis};

/// Whether the tentative pose of `robots[idx]` must be rejected.
///
/// Checks run in a fixed order and stop at the first hit: field boundary,
/// barriers (low then high, each in layout order), then other robots by
/// ascending index. Only the robot-robot case bumps the mover's
/// `robot_hits` counter. Dead robots still count as obstacles.
pub fn check_interference(
    robots: &mut [RobotState],
    idx: usize,
    layout: &ArenaLayout,
    config: &SimConfig,
) -> bool {
    let robot = &robots[idx];
    let body = chassis(robot, config);

    if !layout.field.contains_rect(&body) {
        return true;
    }

    let reach = config.robot_radius + config.barrier_reach;
    let plates = armor_plates(robot, config);
    for barrier in layout.barriers() {
        if robot.center.distance(barrier.center) >= reach {
            continue;
        }
        if body.overlaps(barrier) || plates.iter().any(|(_, plate)| plate.overlaps(barrier)) {
            return true;
        }
    }

    let center = robot.center;
    let min_gap = 2.0 * config.robot_radius;
    let bumped = robots
        .iter()
        .any(|other| other.index != idx && center.distance(other.center) < min_gap);
    if bumped {
        robots[idx].robot_hits += 1;
    }
    bumped
}
