use std::sync::Arc;

use log::debug;
use roboarena_shared::*;

use crate::error::SimError;
use crate::observation::progress_reward;
use crate::physics::SimState;
use crate::policy::Policy;

/// Run a deterministic match. `blue` commands every blue robot and `red`
/// every red one; both are queried once per step cadence.
///
/// Stops when the match ends or after `config.max_steps` decision cycles,
/// whichever comes first.
pub fn run_match(
    config: &MatchConfig,
    layout: Arc<ArenaLayout>,
    blue: &mut dyn Policy,
    red: &mut dyn Policy,
) -> Result<MatchRecord, SimError> {
    let mut state = SimState::new(layout, config.sim_config, config.robot_count)?;
    if config.shuffle_zones {
        state = state.with_zone_shuffle(config.seed);
    }
    debug!(
        "match seed={} robots={}: {} vs {}",
        config.seed,
        config.robot_count,
        blue.name(),
        red.name()
    );

    let mut world = state.reset();
    let mut transitions = Vec::new();

    for _ in 0..config.max_steps {
        let actions: Vec<Command> = world
            .robots
            .iter()
            .map(|r| match r.team {
                Team::Blue => blue.act(r.index, &world),
                Team::Red => red.act(r.index, &world),
            })
            .collect();

        let next = state.step(&actions)?;
        let reward = progress_reward(&world, &next, state.layout());
        let prev = std::mem::replace(&mut world, next);

        if config.record_transitions {
            transitions.push(Transition {
                state: world.clone(),
                prev_state: prev,
                actions,
                reward,
            });
        }

        if state.is_terminal() {
            break;
        }
    }

    Ok(MatchRecord {
        config: config.clone(),
        result: MatchResult {
            status: world.status,
            final_epoch: world.epoch,
            time_remaining: world.time,
            robots: world.robots,
        },
        transitions,
    })
}
