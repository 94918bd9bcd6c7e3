//! The epoch engine.
//!
//! Iteration order is part of the contract: robots are always visited by
//! ascending index and bullets in insertion order. Interference checks,
//! zone triggering and hit application short-circuit or bump shared
//! counters, so this order decides which robot wins a simultaneous
//! interaction and keeps replays value-for-value reproducible.

use std::sync::Arc;

use log::{debug, info, trace, warn};
use roboarena_shared::*;

use crate::bullet::{advance_bullet, BulletFate};
use crate::collision::check_interference;
use crate::error::SimError;
use crate::robot::*;
use crate::zones::Zones;

/// Full simulation state for one match.
#[derive(Debug, Clone)]
pub struct SimState {
    layout: Arc<ArenaLayout>,
    config: SimConfig,
    zone_seed: Option<u64>,
    pub robots: Vec<RobotState>,
    pub bullets: Vec<Bullet>,
    pub zones: Zones,
    pub epoch: u32,
    /// Remaining match clock in units.
    pub time: i32,
    pub status: MatchStatus,
    /// Commands latched on the next step-cadence epoch, one per robot.
    commands: Vec<Command>,
}

impl SimState {
    pub fn new(
        layout: Arc<ArenaLayout>,
        config: SimConfig,
        robot_count: usize,
    ) -> Result<Self, SimError> {
        if let Some(problem) = config.problem() {
            return Err(SimError::InvalidConfig(problem));
        }
        if !(MIN_ROBOTS..=MAX_ROBOTS).contains(&robot_count) {
            return Err(SimError::InvalidRoster(robot_count));
        }
        let robots = spawn_roster(&layout, &config, robot_count);
        let zones = Zones::new(&layout, None);
        Ok(Self {
            layout,
            config,
            zone_seed: None,
            robots,
            bullets: Vec::new(),
            zones,
            epoch: 0,
            time: config.match_units,
            status: MatchStatus::Running,
            commands: vec![Command::none(); robot_count],
        })
    }

    /// Standard field with default rules.
    pub fn standard(robot_count: usize) -> Result<Self, SimError> {
        Self::new(
            Arc::new(ArenaLayout::standard()),
            SimConfig::default(),
            robot_count,
        )
    }

    /// Re-deal zone categories from `seed` on every zone reset.
    pub fn with_zone_shuffle(mut self, seed: u64) -> Self {
        self.zone_seed = Some(seed);
        self.zones = Zones::new(&self.layout, self.zone_seed);
        self
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_ended()
    }

    pub fn is_zone_active(&self, kind: ZoneKind) -> bool {
        self.zones.is_zone_active(kind)
    }

    /// Return every entity to its match-start values.
    pub fn reset(&mut self) -> WorldState {
        self.robots = spawn_roster(&self.layout, &self.config, self.robots.len());
        self.bullets.clear();
        self.zones = Zones::new(&self.layout, self.zone_seed);
        self.epoch = 0;
        self.time = self.config.match_units;
        self.status = MatchStatus::Running;
        self.commands.fill(Command::none());
        self.observe()
    }

    /// Queue one command per robot for the next step-cadence latch.
    pub fn set_commands(&mut self, commands: &[Command]) -> Result<(), SimError> {
        if commands.len() != self.robots.len() {
            return Err(SimError::CommandCount {
                expected: self.robots.len(),
                got: commands.len(),
            });
        }
        for (i, (slot, cmd)) in self.commands.iter_mut().zip(commands).enumerate() {
            if !cmd.is_sanitized() {
                warn!("robot {i}: sanitizing malformed command {cmd:?}");
            }
            *slot = cmd.sanitized();
        }
        Ok(())
    }

    /// Apply `commands` and advance one step cadence worth of epochs.
    ///
    /// Stops early if the match ends part-way through.
    pub fn step(&mut self, commands: &[Command]) -> Result<WorldState, SimError> {
        if self.status.is_ended() {
            return Err(SimError::MatchEnded);
        }
        self.set_commands(commands)?;
        for _ in 0..self.config.step_epochs {
            self.tick();
            if self.status.is_ended() {
                break;
            }
        }
        Ok(self.observe())
    }

    /// Advance exactly one epoch.
    pub fn tick(&mut self) {
        let config = self.config;

        if self.epoch % config.step_epochs == 0 {
            for (robot, cmd) in self.robots.iter_mut().zip(&self.commands) {
                if robot.is_alive() {
                    latch_command(robot, *cmd, &config);
                }
            }
        }

        self.zones.apply(&mut self.robots, &config.zones);

        for idx in 0..self.robots.len() {
            if self.robots[idx].is_alive() {
                self.move_robot(idx);
            }
        }

        if self.epoch % config.heat_epochs == 0 {
            for robot in self.robots.iter_mut().filter(|r| r.is_alive()) {
                settle_heat(robot, &config.heat);
                if !robot.is_alive() {
                    debug!("robot {} burned out at epoch {}", robot.index, self.epoch);
                }
            }
        }
        for robot in &mut self.robots {
            clamp_floors(robot);
        }

        if !self.status.is_ended() {
            self.check_elimination();
        }

        if self.epoch % config.unit_epochs == 0 {
            self.time -= 1;
            for robot in self.robots.iter_mut().filter(|r| r.is_alive()) {
                robot.timeout = robot.timeout.saturating_sub(1);
            }
            if !self.status.is_ended() && self.time <= 0 {
                self.check_clock();
            }
        }

        if self.epoch % config.zone_reset_epochs == 0 {
            self.zones.reset();
        }

        self.step_bullets();
        self.epoch += 1;
    }

    fn move_robot(&mut self, idx: usize) {
        let config = self.config;
        let robot = &mut self.robots[idx];
        if robot.timeout == 0 {
            robot.can_move = true;
            robot.can_shoot = true;
        }

        if robot.can_move && robot.is_moving() {
            let (old_center, old_rotation) = (robot.center, robot.rotation);
            let (center, rotation) = candidate_pose(robot);
            robot.center = center;
            robot.rotation = rotation;
            if check_interference(&mut self.robots, idx, &self.layout, &config) {
                let robot = &mut self.robots[idx];
                robot.center = old_center;
                robot.rotation = old_rotation;
                rebound(robot, config.rebound_coeff);
            }
        }

        let robot = &mut self.robots[idx];
        integrate_gimbal(robot);
        robot.shot_cooldown = robot.shot_cooldown.saturating_sub(1);
        if let Some(bullet) = try_fire(robot, &config) {
            self.bullets.push(bullet);
        }
    }

    fn step_bullets(&mut self) {
        let config = self.config;
        for bullet in &mut self.bullets {
            let fate = advance_bullet(bullet, &self.robots, &self.layout, &config);
            if let BulletFate::HitRobot {
                target,
                impact: Impact::Armor(side),
            } = fate
            {
                if take_hit(&mut self.robots[target], side, &config.hits) {
                    if let Some(shooter) = self.robots.get_mut(bullet.owner) {
                        shooter.hits_landed += 1;
                    }
                    trace!(
                        "epoch {}: robot {} hit robot {} on {:?}",
                        self.epoch,
                        bullet.owner,
                        target,
                        side
                    );
                    if !self.robots[target].is_alive() {
                        debug!("robot {target} destroyed at epoch {}", self.epoch);
                    }
                }
            }
            bullet.spent = fate.is_spent();
        }
        self.bullets.retain(|b| !b.spent);
    }

    fn check_elimination(&mut self) {
        let alive = |team: Team| {
            self.robots
                .iter()
                .any(|r| r.team == team && r.is_alive())
        };
        let outcome = match (alive(Team::Blue), alive(Team::Red)) {
            (true, true) => return,
            (true, false) => MatchOutcome::BlueWin,
            (false, true) => MatchOutcome::RedWin,
            (false, false) => MatchOutcome::Draw,
        };
        self.finish(outcome, MatchEndReason::Elimination);
    }

    fn check_clock(&mut self) {
        let balance: i64 = self
            .robots
            .iter()
            .map(|r| r.team.sign() * i64::from(r.hp))
            .sum();
        let outcome = match balance.signum() {
            1 => MatchOutcome::BlueWin,
            -1 => MatchOutcome::RedWin,
            _ => MatchOutcome::Draw,
        };
        self.finish(outcome, MatchEndReason::Timeout);
    }

    fn finish(&mut self, outcome: MatchOutcome, reason: MatchEndReason) {
        info!(
            "match ended at epoch {}: {:?} by {:?}",
            self.epoch, outcome, reason
        );
        self.status = MatchStatus::Ended { outcome, reason };
    }
}

/// Blue takes the first half of the indices (rounded up), red the rest.
/// Each team cycles through its spawn rectangles; blue faces 0°, red 180°.
fn spawn_roster(layout: &ArenaLayout, config: &SimConfig, count: usize) -> Vec<RobotState> {
    let blue_count = count.div_ceil(2);
    (0..count)
        .map(|index| {
            let (team, slot, rotation) = if index < blue_count {
                (Team::Blue, index, 0.0)
            } else {
                (Team::Red, index - blue_count, 180.0)
            };
            let spawns = layout.spawns(team);
            let center = spawns
                .get(slot % spawns.len().max(1))
                .map(|r| r.center)
                .unwrap_or_else(|| layout.spawn_center(team));
            RobotState::spawn(index, team, center, rotation, config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn idle(state: &SimState) -> Vec<Command> {
        vec![Command::none(); state.robots.len()]
    }

    fn fire_from(robot: usize, count: usize) -> Vec<Command> {
        let mut commands = vec![Command::none(); count];
        commands[robot].fire = true;
        commands
    }

    #[test]
    fn test_initial_state() {
        let state = SimState::standard(4).unwrap();
        assert_eq!(state.robots.len(), 4);
        assert_eq!(state.robots[0].team, Team::Blue);
        assert_eq!(state.robots[1].team, Team::Blue);
        assert_eq!(state.robots[2].team, Team::Red);
        assert_eq!(state.robots[0].center, Vec2::new(-354.0, -174.0));
        assert_eq!(state.robots[2].center, Vec2::new(354.0, 174.0));
        assert_eq!(state.robots[2].rotation, 180.0);
        assert_eq!(state.time, MATCH_DURATION_UNITS);
        assert_eq!(state.epoch, 0);
        assert!(state.bullets.is_empty());
        assert_eq!(state.status, MatchStatus::Running);
    }

    #[test]
    fn test_odd_roster_favors_blue() {
        let state = SimState::standard(3).unwrap();
        let blue = state.robots.iter().filter(|r| r.team == Team::Blue).count();
        assert_eq!(blue, 2);
    }

    #[test]
    fn test_rejects_bad_roster_and_config() {
        assert_eq!(SimState::standard(1).unwrap_err(), SimError::InvalidRoster(1));
        assert_eq!(SimState::standard(5).unwrap_err(), SimError::InvalidRoster(5));

        let config = SimConfig {
            step_epochs: 0,
            ..Default::default()
        };
        let err = SimState::new(Arc::new(ArenaLayout::standard()), config, 2).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_step_runs_one_cadence() {
        let mut state = SimState::standard(4).unwrap();
        let world = state.step(&idle(&state)).unwrap();
        assert_eq!(world.epoch, STEP_EPOCHS);
        // Epoch 0 is on the unit cadence
        assert_eq!(world.time, MATCH_DURATION_UNITS - 1);
        assert_eq!(world.robots.len(), 4);
    }

    #[test]
    fn test_command_count_rejected() {
        let mut state = SimState::standard(4).unwrap();
        let err = state.step(&[Command::none(); 3]).unwrap_err();
        assert_eq!(err, SimError::CommandCount { expected: 4, got: 3 });
        assert_eq!(state.epoch, 0);
    }

    #[test]
    fn test_collision_rollback_is_exact() {
        let mut state = SimState::standard(2).unwrap();
        let config = *state.config();
        // Facing the left wall with the chassis 0.5 from it
        state.robots[0].center = Vec2::new(-373.5, 0.0);
        state.robots[0].rotation = 180.0;
        let mut commands = idle(&state);
        commands[0].forward = 1.0;
        state.set_commands(&commands).unwrap();
        state.tick();

        let robot = &state.robots[0];
        assert_eq!(robot.center, Vec2::new(-373.5, 0.0));
        assert_eq!(robot.rotation, 180.0);
        assert_eq!(robot.x_speed, -config.max_forward_speed * config.rebound_coeff);
    }

    /// Drive robot 0 forward while turning for one tick from a pose whose
    /// candidate is blocked; returns the config for the expected speeds.
    fn blocked_turn(state: &mut SimState, center: Vec2) -> SimConfig {
        state.robots[0].center = center;
        state.robots[0].rotation = 30.0;
        let mut commands = idle(state);
        commands[0].forward = 1.0;
        commands[0].rotate = 0.5;
        state.set_commands(&commands).unwrap();
        state.tick();
        *state.config()
    }

    #[test]
    fn test_rollback_against_barrier_restores_pose() {
        let mut state = SimState::standard(2).unwrap();
        // Straddling the top edge of B2 (y -10..10)
        let center = Vec2::new(-214.0, 30.0);
        let config = blocked_turn(&mut state, center);

        let robot = &state.robots[0];
        assert_eq!(robot.center, center);
        assert_eq!(robot.rotation, 30.0);
        assert_eq!(
            robot.rotation_speed,
            -(0.5 * config.max_rotation_speed) * config.rebound_coeff
        );
        assert_eq!(robot.x_speed, -config.max_forward_speed * config.rebound_coeff);
        assert_eq!(robot.robot_hits, 0);
    }

    #[test]
    fn test_rollback_against_robot_counts_bump() {
        let mut state = SimState::standard(2).unwrap();
        state.robots[1].center = Vec2::new(-50.0, -150.0);
        let center = Vec2::new(-100.0, -150.0);
        let config = blocked_turn(&mut state, center);

        let robot = &state.robots[0];
        assert_eq!(robot.center, center);
        assert_eq!(robot.rotation, 30.0);
        assert_eq!(
            robot.rotation_speed,
            -(0.5 * config.max_rotation_speed) * config.rebound_coeff
        );
        assert_eq!(robot.robot_hits, 1);
        // The idle robot never tested a move
        assert_eq!(state.robots[1].robot_hits, 0);
    }

    #[test]
    fn test_free_move_commits() {
        let mut state = SimState::standard(2).unwrap();
        let start = state.robots[0].center;
        let mut commands = idle(&state);
        commands[0].forward = 1.0;
        state.step(&commands).unwrap();
        let expected = start.x + STEP_EPOCHS as f32 * MAX_FORWARD_SPEED;
        assert!((state.robots[0].center.x - expected).abs() < 1e-3);
        assert_eq!(state.robots[0].center.y, start.y);
    }

    #[test]
    fn test_fire_once_per_cooldown() {
        let mut state = SimState::standard(2).unwrap();
        state.set_commands(&fire_from(0, 2)).unwrap();
        state.tick();
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].owner, 0);
        assert_eq!(state.bullets[0].heading, 0.0);
        assert_eq!(state.robots[0].ammo, START_AMMO - 1);
        // Epoch 0 is also a heat settlement
        assert_eq!(state.robots[0].heat, BULLET_HEAT - HEAT_COOLING_HEALTHY);

        for _ in 1..STEP_EPOCHS {
            state.tick();
        }
        assert_eq!(state.robots[0].shots_fired, 1);
    }

    #[test]
    fn test_bullet_hits_enemy_front_armor() {
        let mut state = SimState::standard(2).unwrap();
        state.robots[0].center = Vec2::new(-100.0, -150.0);
        state.robots[1].center = Vec2::new(0.0, -150.0);
        state.robots[1].rotation = 180.0;
        state.step(&fire_from(0, 2)).unwrap();

        assert_eq!(state.robots[1].hp, START_HP - FRONT_ARMOR_DAMAGE);
        assert_eq!(state.robots[1].hits_taken, 1);
        assert_eq!(state.robots[0].hits_landed, 1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_heat_settles_on_cadence() {
        let mut state = SimState::standard(2).unwrap();
        state.robots[0].heat = 300;
        state.tick();
        let rules = HeatRules::default();
        assert_eq!(state.robots[0].hp, START_HP - 60 * rules.low_damage);
        assert_eq!(state.robots[0].heat, 300 - rules.cooling_healthy);

        // Off-cadence epochs leave heat alone
        state.tick();
        assert_eq!(state.robots[0].heat, 300 - rules.cooling_healthy);
    }

    #[test]
    fn test_elimination_ends_match() {
        let mut state = SimState::standard(4).unwrap();
        state.robots[2].hp = 0;
        state.robots[3].hp = 0;
        let world = state.step(&idle(&state)).unwrap();
        assert_eq!(
            world.status,
            MatchStatus::Ended {
                outcome: MatchOutcome::BlueWin,
                reason: MatchEndReason::Elimination
            }
        );
        // Stopped after the deciding epoch
        assert_eq!(world.epoch, 1);
        assert_eq!(state.step(&idle(&state)).unwrap_err(), SimError::MatchEnded);
    }

    #[test]
    fn test_mutual_elimination_is_draw() {
        let mut state = SimState::standard(2).unwrap();
        state.robots[0].hp = 0;
        state.robots[1].hp = 0;
        let world = state.step(&idle(&state)).unwrap();
        assert_eq!(world.status.outcome(), Some(MatchOutcome::Draw));
    }

    #[test]
    fn test_clock_expiry_tie_is_draw() {
        let mut state = SimState::standard(4).unwrap();
        state.time = 1;
        let world = state.step(&idle(&state)).unwrap();
        assert_eq!(
            world.status,
            MatchStatus::Ended {
                outcome: MatchOutcome::Draw,
                reason: MatchEndReason::Timeout
            }
        );
    }

    #[test]
    fn test_clock_expiry_compares_team_hp() {
        let mut state = SimState::standard(4).unwrap();
        state.time = 1;
        state.robots[0].hp = 500;
        let world = state.step(&idle(&state)).unwrap();
        assert_eq!(world.status.outcome(), Some(MatchOutcome::RedWin));
    }

    #[test]
    fn test_outcome_is_never_revised() {
        let mut state = SimState::standard(2).unwrap();
        state.robots[1].hp = 0;
        state.tick();
        assert_eq!(state.status.outcome(), Some(MatchOutcome::BlueWin));
        state.robots[0].hp = 0;
        state.time = 0;
        for _ in 0..EPOCHS_PER_UNIT {
            state.tick();
        }
        assert_eq!(state.status.outcome(), Some(MatchOutcome::BlueWin));
    }

    #[test]
    fn test_dead_robot_is_frozen() {
        let mut state = SimState::standard(4).unwrap();
        state.robots[0].hp = 0;
        let start = state.robots[0].center;
        let mut commands = idle(&state);
        commands[0] = Command {
            forward: 1.0,
            fire: true,
            ..Command::none()
        };
        state.step(&commands).unwrap();
        assert_eq!(state.robots[0].center, start);
        assert!(state.bullets.is_empty());
        assert_eq!(state.robots[0].ammo, START_AMMO);
    }

    #[test]
    fn test_zone_reset_cadence() {
        let config = SimConfig {
            zone_reset_epochs: 40,
            ..Default::default()
        };
        let mut state = SimState::new(Arc::new(ArenaLayout::standard()), config, 2).unwrap();
        let kind = ZoneKind::HpBuff(Team::Blue);
        let spawn = state.robots[0].center;
        state.robots[0].center = Vec2::new(-354.0, 55.0);

        // Epoch 0 triggers and then resets; epoch 1 triggers again
        state.tick();
        assert!(!state.is_zone_active(kind));
        state.tick();
        assert!(state.is_zone_active(kind));
        assert_eq!(state.robots[0].hp, START_HP + 2 * ZONE_HP_BUFF);

        state.robots[0].center = spawn;
        while state.epoch < 40 {
            state.tick();
        }
        assert!(state.is_zone_active(kind));
        state.tick();
        assert!(state.zones.iter().all(|z| !z.active));
    }

    #[test]
    fn test_debuff_lock_lifts_after_timeout() {
        let mut state = SimState::standard(2).unwrap();
        state.robots[0].can_shoot = false;
        state.robots[0].timeout = 1;
        state.set_commands(&fire_from(0, 2)).unwrap();
        // Epoch 0 counts the timeout down to zero
        state.tick();
        assert!(state.bullets.is_empty());
        assert_eq!(state.robots[0].timeout, 0);
        state.tick();
        assert!(state.robots[0].can_shoot);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut state = SimState::standard(2).unwrap();
        let initial = state.observe();
        let mut commands = fire_from(0, 2);
        commands[1].forward = 1.0;
        for _ in 0..5 {
            state.step(&commands).unwrap();
        }
        assert_ne!(state.observe(), initial);
        assert_eq!(state.reset(), initial);
    }
}
