use roboarena_shared::{Command, WorldState};

/// Opaque command source for one robot. Called once per step cadence.
pub trait Policy: Send {
    fn name(&self) -> &str;
    fn act(&mut self, robot: usize, state: &WorldState) -> Command;
}

/// Policy that does nothing - useful for testing.
pub struct DoNothingPolicy;

impl Policy for DoNothingPolicy {
    fn name(&self) -> &str {
        "do_nothing"
    }

    fn act(&mut self, _robot: usize, _state: &WorldState) -> Command {
        Command::none()
    }
}

/// Replays a fixed command list, then idles. Every robot it drives walks
/// the list on its own cursor.
pub struct ScriptedPolicy {
    commands: Vec<Command>,
    cursors: Vec<usize>,
}

impl ScriptedPolicy {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            cursors: Vec::new(),
        }
    }

    /// The same command on every call.
    pub fn constant(command: Command, steps: usize) -> Self {
        Self::new(vec![command; steps])
    }
}

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn act(&mut self, robot: usize, _state: &WorldState) -> Command {
        if self.cursors.len() <= robot {
            self.cursors.resize(robot + 1, 0);
        }
        let cursor = &mut self.cursors[robot];
        let command = self.commands.get(*cursor).copied().unwrap_or_default();
        *cursor += 1;
        command
    }
}
