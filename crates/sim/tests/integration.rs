use std::sync::Arc;

use glam::Vec2;
use roboarena_shared::*;
use roboarena_sim::opponents::ChaserPolicy;
use roboarena_sim::{run_match, DoNothingPolicy, Policy, ScriptedPolicy, SimError, SimState};

fn standard() -> Arc<ArenaLayout> {
    Arc::new(ArenaLayout::standard())
}

fn zone_center(layout: &ArenaLayout, kind: ZoneKind) -> Vec2 {
    layout
        .zones
        .iter()
        .find(|z| z.kind == kind)
        .map(|z| z.rect.center)
        .expect("standard layout has every zone kind")
}

#[test]
fn test_chaser_vs_do_nothing_runs_to_the_end() {
    let config = MatchConfig {
        seed: 42,
        blue_policy: "chaser".into(),
        red_policy: "do_nothing".into(),
        ..Default::default()
    };
    let mut blue = ChaserPolicy::new();
    let mut red = DoNothingPolicy;

    let record = run_match(&config, standard(), &mut blue, &mut red).unwrap();
    let result = &record.result;

    assert!(
        result.status.is_ended(),
        "match should end within {} steps, got {:?} at epoch {}",
        config.max_steps,
        result.status,
        result.final_epoch
    );
    let blue_shots: u32 = result
        .robots
        .iter()
        .filter(|r| r.team == Team::Blue)
        .map(|r| r.shots_fired)
        .sum();
    assert!(blue_shots > 0, "chaser never fired");
    for r in result.robots.iter().filter(|r| r.team == Team::Red) {
        assert_eq!(r.shots_fired, 0);
        assert_eq!(r.ammo, START_AMMO);
    }
}

#[test]
fn test_deterministic_records() {
    let config = MatchConfig {
        seed: 123,
        robot_count: 3,
        shuffle_zones: true,
        record_transitions: true,
        max_steps: 300,
        ..Default::default()
    };

    let run = || {
        let mut blue = ChaserPolicy::new();
        let mut red = ChaserPolicy::new();
        run_match(&config, standard(), &mut blue, &mut red).unwrap()
    };
    let first = run();
    let second = run();

    assert_eq!(first.result.status, second.result.status);
    assert_eq!(first.result.final_epoch, second.result.final_epoch);
    assert_eq!(first.result.robots, second.result.robots);
    assert_eq!(first.transitions.len(), second.transitions.len());
    for (a, b) in first.transitions.iter().zip(&second.transitions) {
        assert_eq!(a.state, b.state);
        assert_eq!(a.actions, b.actions);
        assert_eq!(a.reward, b.reward);
    }
}

#[test]
fn test_record_serialization() {
    let config = MatchConfig {
        seed: 1,
        robot_count: 2,
        blue_policy: "chaser".into(),
        red_policy: "do_nothing".into(),
        record_transitions: true,
        max_steps: 24,
        ..Default::default()
    };
    let mut blue = ChaserPolicy::new();
    let mut red = DoNothingPolicy;

    let record = run_match(&config, standard(), &mut blue, &mut red).unwrap();

    let json = serde_json::to_string(&record).expect("record should serialize");
    assert!(json.len() > 100);

    let back: MatchRecord = serde_json::from_str(&json).expect("record should deserialize");
    assert_eq!(back.result.final_epoch, record.result.final_epoch);
    assert_eq!(back.result.robots, record.result.robots);
    assert_eq!(back.transitions.len(), 24);
    assert_eq!(back.transitions[3].state, record.transitions[3].state);
    assert_eq!(back.config.sim_config, config.sim_config);
}

#[test]
fn test_partial_sim_config_json() {
    let config: MatchConfig = serde_json::from_str(
        r#"{
            "seed": 9,
            "robot_count": 2,
            "blue_policy": "chaser",
            "red_policy": "chaser",
            "shuffle_zones": false,
            "record_transitions": false,
            "max_steps": 10,
            "sim_config": { "start_hp": 100, "hits": { "front": 50 } }
        }"#,
    )
    .expect("config should parse");
    assert_eq!(config.sim_config.start_hp, 100);
    assert_eq!(config.sim_config.hits.front, 50);
    assert_eq!(config.sim_config.hits.rear, REAR_ARMOR_DAMAGE);
    assert_eq!(config.sim_config.step_epochs, STEP_EPOCHS);

    let state = SimState::new(standard(), config.sim_config, config.robot_count).unwrap();
    assert!(state.robots.iter().all(|r| r.hp == 100));
}

#[test]
fn test_elimination_of_one_team() {
    let mut state = SimState::standard(4).unwrap();
    for robot in state.robots.iter_mut().filter(|r| r.team == Team::Blue) {
        robot.hp = 0;
    }
    let world = state.step(&[Command::none(); 4]).unwrap();
    assert_eq!(
        world.status,
        MatchStatus::Ended {
            outcome: MatchOutcome::RedWin,
            reason: MatchEndReason::Elimination,
        }
    );
    assert_eq!(state.step(&[Command::none(); 4]), Err(SimError::MatchEnded));
}

#[test]
fn test_full_clock_runs_out() {
    let config = MatchConfig {
        robot_count: 2,
        ..Default::default()
    };
    let record = run_match(&config, standard(), &mut DoNothingPolicy, &mut DoNothingPolicy)
        .unwrap();
    assert_eq!(
        record.result.status,
        MatchStatus::Ended {
            outcome: MatchOutcome::Draw,
            reason: MatchEndReason::Timeout,
        }
    );
    assert_eq!(record.result.time_remaining, 0);
    // The clock ticks on epoch 0, so the last unit closes one unit early
    assert_eq!(
        record.result.final_epoch,
        (MATCH_DURATION_UNITS as u32 - 1) * EPOCHS_PER_UNIT + 1
    );
}

#[test]
fn test_ammo_zone_supplies_own_team() {
    let mut state = SimState::standard(2).unwrap();
    let idle = [Command::none(); 2];
    // Get past the epoch-0 zone reset first
    state.step(&idle).unwrap();

    let kind = ZoneKind::AmmoSupply(Team::Blue);
    state.robots[0].center = zone_center(state.layout(), kind);
    let world = state.step(&idle).unwrap();

    assert!(world.is_zone_active(kind));
    assert!(!world.is_zone_active(ZoneKind::AmmoSupply(Team::Red)));
    assert_eq!(world.robots[0].ammo, START_AMMO + ZONE_AMMO_SUPPLY);

    // Spent until the next reset
    let world = state.step(&idle).unwrap();
    assert_eq!(world.robots[0].ammo, START_AMMO + ZONE_AMMO_SUPPLY);
}

#[test]
fn test_no_move_zone_pins_robot() {
    let mut state = SimState::standard(2).unwrap();
    let drive = [
        Command::none(),
        Command {
            forward: 1.0,
            ..Command::none()
        },
    ];
    state.step(&[Command::none(); 2]).unwrap();

    let pinned = zone_center(state.layout(), ZoneKind::NoMove);
    state.robots[1].center = pinned;
    let world = state.step(&drive).unwrap();

    assert!(world.is_zone_active(ZoneKind::NoMove));
    assert!(!world.robots[1].can_move);
    assert_eq!(world.robots[1].timeout, DEBUFF_DURATION_UNITS);
    assert_eq!(world.robots[1].center(), pinned);
}

#[test]
fn test_scripted_blue_moves_toward_red() {
    let config = MatchConfig {
        robot_count: 2,
        record_transitions: true,
        max_steps: 10,
        ..Default::default()
    };
    let forward = Command {
        forward: 1.0,
        ..Command::none()
    };
    let mut blue = ScriptedPolicy::constant(forward, 10);
    let mut red = DoNothingPolicy;
    assert_eq!(blue.name(), "scripted");

    let record = run_match(&config, standard(), &mut blue, &mut red).unwrap();
    let total: f32 = record.transitions.iter().map(|t| t.reward[0]).sum();
    assert!(total > 0.0);
    assert!(record.transitions.iter().all(|t| t.reward[1] == 0.0));
}

#[test]
fn test_scripted_team_replays_per_robot() {
    let config = MatchConfig {
        robot_count: 4,
        record_transitions: true,
        max_steps: 3,
        ..Default::default()
    };
    let strafe = Command {
        strafe: 0.5,
        ..Command::none()
    };
    let turn = Command {
        rotate: 0.5,
        ..Command::none()
    };
    let mut blue = ScriptedPolicy::new(vec![strafe, turn]);
    let mut red = DoNothingPolicy;

    let record = run_match(&config, standard(), &mut blue, &mut red).unwrap();
    assert_eq!(record.transitions.len(), 3);

    // Robots 0 and 1 are blue and each replays the full list
    let expected = [strafe, turn, Command::none()];
    for (t, want) in record.transitions.iter().zip(expected) {
        assert_eq!(t.actions[0], want);
        assert_eq!(t.actions[1], want);
        assert_eq!(t.actions[2], Command::none());
        assert_eq!(t.actions[3], Command::none());
    }
}
