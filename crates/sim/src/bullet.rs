use roboarena_shared::*;

use crate::robot::{bullet_impact, Impact};

/// Result of advancing one bullet by one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletFate {
    InFlight,
    LeftField,
    HitBarrier,
    HitRobot { target: usize, impact: Impact },
}

impl BulletFate {
    pub fn is_spent(&self) -> bool {
        !matches!(self, BulletFate::InFlight)
    }
}

/// Move `bullet` one step along its heading and test the travel segment.
///
/// Checks, first match wins: field exit, high barriers, then robots in
/// ascending index order skipping the owner. Low barriers never stop bullets.
pub fn advance_bullet(
    bullet: &mut Bullet,
    robots: &[RobotState],
    layout: &ArenaLayout,
    config: &SimConfig,
) -> BulletFate {
    let old_center = bullet.center;
    bullet.center += bullet.direction() * config.bullet_step;
    let path = Segment::new(old_center, bullet.center);

    if !layout.field.contains(bullet.center, false) {
        return BulletFate::LeftField;
    }
    if layout.high_barriers.iter().any(|b| b.intersects(&path)) {
        return BulletFate::HitBarrier;
    }
    for robot in robots {
        if robot.index == bullet.owner {
            continue;
        }
        if let Some(impact) = bullet_impact(robot, &path, config) {
            return BulletFate::HitRobot {
                target: robot.index,
                impact,
            };
        }
    }
    BulletFate::InFlight
}
