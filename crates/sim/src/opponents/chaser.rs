use roboarena_shared::*;

use crate::policy::Policy;

/// Gimbal error (degrees) under which the chaser pulls the trigger.
const FIRE_CONE: f32 = 4.0;
/// Stops closing in once this near the target.
const STANDOFF: f32 = 150.0;
/// Only drives once the chassis points roughly at the target.
const DRIVE_CONE: f32 = 30.0;

/// Baseline opponent: turns toward the nearest live enemy, tracks it with
/// the gimbal and fires when aligned, as long as the shot keeps the barrel
/// under the low heat threshold. No barrier avoidance, no zone play.
pub struct ChaserPolicy;

impl ChaserPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChaserPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for ChaserPolicy {
    fn name(&self) -> &str {
        "chaser"
    }

    fn act(&mut self, robot: usize, state: &WorldState) -> Command {
        let Some(me) = state.robots.get(robot) else {
            return Command::none();
        };
        let Some(target) = nearest_enemy(me, state) else {
            return Command::none();
        };

        let to_target = target.center() - me.center();
        let distance = to_target.length();
        let bearing = to_target.y.atan2(to_target.x).to_degrees();

        // Commands hold for a whole step, so plan in per-step increments.
        let per_step = STEP_EPOCHS as f32;
        let turn_step = MAX_ROTATION_SPEED * per_step;
        let yaw_step = MAX_YAW_SPEED * per_step;

        let chassis_error = angle_diff(bearing, me.rotation);
        let rotate = (chassis_error / turn_step).clamp(-1.0, 1.0);

        // Aim the gimbal for where the chassis will point after this step.
        let next_rotation = me.rotation + rotate * turn_step;
        let wanted_yaw = angle_diff(bearing, next_rotation).clamp(-YAW_LIMIT, YAW_LIMIT);
        let yaw = ((wanted_yaw - me.yaw) / yaw_step).clamp(-1.0, 1.0);

        let forward = if distance > STANDOFF && chassis_error.abs() < DRIVE_CONE {
            1.0
        } else {
            0.0
        };

        let aim_error = angle_diff(bearing, me.rotation + me.yaw);
        let cool_enough = me.heat + BULLET_HEAT <= HEAT_LOW_THRESHOLD;
        let fire = aim_error.abs() < FIRE_CONE && cool_enough && me.ammo > 0 && me.can_shoot;

        Command {
            forward,
            strafe: 0.0,
            rotate,
            yaw,
            fire,
        }
    }
}

fn nearest_enemy<'a>(me: &RobotStatus, state: &'a WorldState) -> Option<&'a RobotStatus> {
    state
        .team_robots(me.team.opponent())
        .filter(|r| r.alive)
        .min_by(|a, b| {
            let da = a.center().distance_squared(me.center());
            let db = b.center().distance_squared(me.center());
            da.total_cmp(&db)
        })
}

/// Shortest signed difference `target - current`, in `(-180, 180]`.
fn angle_diff(target: f32, current: f32) -> f32 {
    let diff = wrap_degrees(target - current);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}
