use roboarena_shared::*;

use crate::physics::SimState;

impl SimState {
    /// Read-only view of the world for observers and policies.
    pub fn observe(&self) -> WorldState {
        WorldState {
            epoch: self.epoch,
            time: self.time,
            status: self.status,
            zones: self.zones.snapshot(),
            robots: self.robots.iter().map(RobotStatus::from).collect(),
            bullets: self.bullets.iter().map(BulletSnapshot::from).collect(),
        }
    }
}

/// Per-robot progress reward between two observations: how much closer each
/// robot got to the opposing team's spawn.
pub fn progress_reward(prev: &WorldState, next: &WorldState, layout: &ArenaLayout) -> Vec<f32> {
    prev.robots
        .iter()
        .zip(&next.robots)
        .map(|(before, after)| {
            let goal = layout.spawn_center(before.team.opponent());
            before.center().distance(goal) - after.center().distance(goal)
        })
        .collect()
}
