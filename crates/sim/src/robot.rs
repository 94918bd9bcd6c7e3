//! Per-robot rules: hit geometry, command latching, chassis and gimbal
//! integration, firing and barrel heat.

use glam::Vec2;
use roboarena_shared::*;

/// Chassis collision footprint at the robot's current pose.
pub fn chassis(robot: &RobotState, config: &SimConfig) -> Rect {
    Rect::new(
        config.chassis_length,
        config.chassis_width,
        robot.center.x,
        robot.center.y,
    )
    .rotated(robot.rotation)
}

/// One armor plate, mounted flush on the outside of a chassis edge.
pub fn armor_plate(robot: &RobotState, side: ArmorSide, config: &SimConfig) -> Rect {
    let half_len = config.chassis_length * 0.5;
    let half_width = config.chassis_width * 0.5;
    let t = config.armor_thickness;
    let span = config.armor_span;
    let (offset, size) = match side {
        ArmorSide::Front => (Vec2::new(half_len + t * 0.5, 0.0), Vec2::new(t, span)),
        ArmorSide::Rear => (Vec2::new(-(half_len + t * 0.5), 0.0), Vec2::new(t, span)),
        ArmorSide::Left => (Vec2::new(0.0, half_width + t * 0.5), Vec2::new(span, t)),
        ArmorSide::Right => (Vec2::new(0.0, -(half_width + t * 0.5)), Vec2::new(span, t)),
    };
    Rect {
        center: chassis(robot, config).to_world(offset),
        size,
        rotation: robot.rotation,
    }
}

pub fn armor_plates(robot: &RobotState, config: &SimConfig) -> [(ArmorSide, Rect); 4] {
    ArmorSide::ALL.map(|side| (side, armor_plate(robot, side, config)))
}

/// What a bullet path struck first on a robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Armor(ArmorSide),
    /// Bare chassis: the bullet is stopped but deals no damage.
    Chassis,
}

/// First contact of `path` with the robot's hit region, if any.
///
/// Plates are checked in `ArmorSide::ALL` order and win ties against the
/// chassis, so a grazing hit on a plate edge still counts.
pub fn bullet_impact(robot: &RobotState, path: &Segment, config: &SimConfig) -> Option<Impact> {
    let mut best: Option<(f32, Impact)> = None;
    for (side, plate) in armor_plates(robot, config) {
        if let Some(t) = plate.entry_param(path) {
            if best.map_or(true, |(bt, _)| t < bt) {
                best = Some((t, Impact::Armor(side)));
            }
        }
    }
    if let Some(t) = chassis(robot, config).entry_param(path) {
        if best.map_or(true, |(bt, _)| t < bt) {
            best = Some((t, Impact::Chassis));
        }
    }
    best.map(|(_, impact)| impact)
}

/// Latch a command: magnitudes become per-epoch speeds.
pub fn latch_command(robot: &mut RobotState, command: Command, config: &SimConfig) {
    let command = command.sanitized();
    robot.command = command;
    robot.x_speed = command.forward * config.max_forward_speed;
    robot.y_speed = command.strafe * config.max_strafe_speed;
    robot.rotation_speed = command.rotate * config.max_rotation_speed;
    robot.yaw_speed = command.yaw * config.max_yaw_speed;
}

/// Pose after one epoch of the latched chassis velocities.
///
/// The local velocity is rotated by the heading held *before* the move.
pub fn candidate_pose(robot: &RobotState) -> (Vec2, f32) {
    let (sin, cos) = robot.rotation.to_radians().sin_cos();
    let delta = Vec2::new(
        robot.x_speed * cos - robot.y_speed * sin,
        robot.x_speed * sin + robot.y_speed * cos,
    );
    (
        robot.center + delta,
        wrap_degrees(robot.rotation + robot.rotation_speed),
    )
}

/// Bounce off an obstacle: every chassis speed reverses and loses energy.
pub fn rebound(robot: &mut RobotState, coeff: f32) {
    robot.rotation_speed = -robot.rotation_speed * coeff;
    robot.x_speed = -robot.x_speed * coeff;
    robot.y_speed = -robot.y_speed * coeff;
}

pub fn integrate_gimbal(robot: &mut RobotState) {
    if robot.yaw_speed != 0.0 {
        robot.yaw = (robot.yaw + robot.yaw_speed).clamp(-YAW_LIMIT, YAW_LIMIT);
    }
}

/// Fire if the latched command asks for it and the weapon is ready.
pub fn try_fire(robot: &mut RobotState, config: &SimConfig) -> Option<Bullet> {
    if !robot.command.fire || !robot.can_shoot || robot.ammo == 0 || robot.shot_cooldown != 0 {
        return None;
    }
    robot.ammo -= 1;
    robot.shot_cooldown = config.shot_cooldown;
    robot.heat = robot.heat.saturating_add(config.bullet_heat);
    robot.shots_fired += 1;
    Some(Bullet::new(robot.center, robot.gimbal_heading(), robot.index))
}

/// Barrel heat settlement, run on the heat cadence.
pub fn settle_heat(robot: &mut RobotState, rules: &HeatRules) {
    if robot.heat >= rules.high_threshold {
        let excess = robot.heat - rules.high_threshold;
        robot.hp = robot.hp.saturating_sub(excess.saturating_mul(rules.high_damage));
        robot.heat = rules.high_threshold;
    } else if robot.heat > rules.low_threshold {
        let excess = robot.heat - rules.low_threshold;
        robot.hp = robot.hp.saturating_sub(excess.saturating_mul(rules.low_damage));
    }
    robot.heat -= if robot.hp >= rules.healthy_hp {
        rules.cooling_healthy
    } else {
        rules.cooling_wounded
    };
}

/// Restore the per-robot invariants.
pub fn clamp_floors(robot: &mut RobotState) {
    robot.hp = robot.hp.max(0);
    robot.heat = robot.heat.max(0);
    robot.yaw = robot.yaw.clamp(-YAW_LIMIT, YAW_LIMIT);
    robot.rotation = wrap_degrees(robot.rotation);
}

/// Apply an armor hit to `target`. Returns true if the hit counted.
pub fn take_hit(target: &mut RobotState, side: ArmorSide, rules: &HitRules) -> bool {
    if !target.is_alive() {
        return false;
    }
    target.hp = target.hp.saturating_sub(rules.damage(side)).max(0);
    target.hits_taken += 1;
    true
}
