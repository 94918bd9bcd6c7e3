use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::COMMAND_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    /// Sign used when totalling hp at clock expiry: positive favors blue.
    pub fn sign(&self) -> i64 {
        match self {
            Team::Blue => 1,
            Team::Red => -1,
        }
    }

    pub fn opponent(&self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
        }
    }
}

/// One control-cycle command for one robot.
///
/// Magnitudes are normalized to `[-1, 1]` and scaled by the configured motion
/// limits when the command is latched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Command {
    pub forward: f32,
    pub strafe: f32,
    pub rotate: f32,
    pub yaw: f32,
    pub fire: bool,
}

impl Command {
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from a raw `[forward, strafe, rotate, yaw, fire]` vector.
    /// Missing trailing entries read as zero, extra entries are ignored.
    pub fn from_raw(raw: &[f32]) -> Self {
        let at = |i: usize| raw.get(i).copied().unwrap_or(0.0);
        Self {
            forward: at(0),
            strafe: at(1),
            rotate: at(2),
            yaw: at(3),
            fire: at(4) > 0.0,
        }
        .sanitized()
    }

    pub fn to_raw(&self) -> [f32; COMMAND_SIZE] {
        [
            self.forward,
            self.strafe,
            self.rotate,
            self.yaw,
            if self.fire { 1.0 } else { 0.0 },
        ]
    }

    /// Non-finite magnitudes become 0, the rest are clamped to `[-1, 1]`.
    pub fn sanitized(self) -> Self {
        Self {
            forward: clean(self.forward),
            strafe: clean(self.strafe),
            rotate: clean(self.rotate),
            yaw: clean(self.yaw),
            fire: self.fire,
        }
    }

    pub fn is_sanitized(&self) -> bool {
        *self == self.sanitized()
    }
}

fn clean(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Armor plate struck by a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorSide {
    Front,
    Left,
    Right,
    Rear,
}

impl ArmorSide {
    pub const ALL: [ArmorSide; 4] = [
        ArmorSide::Front,
        ArmorSide::Left,
        ArmorSide::Right,
        ArmorSide::Rear,
    ];
}

/// Full mutable state of one robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    pub index: usize,
    pub team: Team,
    pub center: Vec2,
    /// Chassis heading in degrees, always in `[0, 360)`.
    pub rotation: f32,
    /// Gimbal heading relative to the chassis, always in `[-90, 90]`.
    pub yaw: f32,
    // Chassis-local velocities latched from the last command (per epoch).
    pub x_speed: f32,
    pub y_speed: f32,
    pub rotation_speed: f32,
    pub yaw_speed: f32,
    pub hp: i32,
    pub ammo: u32,
    pub heat: i32,
    pub shot_cooldown: u32,
    pub can_move: bool,
    pub can_shoot: bool,
    /// Remaining debuff duration in clock units.
    pub timeout: u32,
    pub command: Command,
    pub robot_hits: u32,
    pub shots_fired: u32,
    pub hits_landed: u32,
    pub hits_taken: u32,
}

impl RobotState {
    pub fn spawn(index: usize, team: Team, center: Vec2, rotation: f32, config: &SimConfig) -> Self {
        Self {
            index,
            team,
            center,
            rotation,
            yaw: 0.0,
            x_speed: 0.0,
            y_speed: 0.0,
            rotation_speed: 0.0,
            yaw_speed: 0.0,
            hp: config.start_hp,
            ammo: config.start_ammo,
            heat: 0,
            shot_cooldown: 0,
            can_move: true,
            can_shoot: true,
            timeout: 0,
            command: Command::none(),
            robot_hits: 0,
            shots_fired: 0,
            hits_landed: 0,
            hits_taken: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// World heading of the gimbal (and of any bullet it fires).
    pub fn gimbal_heading(&self) -> f32 {
        self.yaw + self.rotation
    }

    pub fn is_moving(&self) -> bool {
        self.x_speed != 0.0 || self.y_speed != 0.0 || self.rotation_speed != 0.0
    }
}

/// Projectile in flight. Inactive bullets are compacted out at epoch end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub center: Vec2,
    /// World heading in degrees, fixed at spawn.
    pub heading: f32,
    pub owner: usize,
    #[serde(skip)]
    pub spent: bool,
}

impl Bullet {
    pub fn new(center: Vec2, heading: f32, owner: usize) -> Self {
        Self {
            center,
            heading,
            owner,
            spent: false,
        }
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading.to_radians())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    HpBuff(Team),
    AmmoSupply(Team),
    NoShoot,
    NoMove,
}

impl ZoneKind {
    pub fn name(&self) -> &'static str {
        match self {
            ZoneKind::HpBuff(Team::Blue) => "hp_blue",
            ZoneKind::HpBuff(Team::Red) => "hp_red",
            ZoneKind::AmmoSupply(Team::Blue) => "ammo_blue",
            ZoneKind::AmmoSupply(Team::Red) => "ammo_red",
            ZoneKind::NoShoot => "no_shoot",
            ZoneKind::NoMove => "no_move",
        }
    }

    /// Whether a robot of `team` can trigger this zone.
    pub fn qualifies(&self, team: Team) -> bool {
        match self {
            ZoneKind::HpBuff(t) | ZoneKind::AmmoSupply(t) => *t == team,
            ZoneKind::NoShoot | ZoneKind::NoMove => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Observable state
// ---------------------------------------------------------------------------

/// Fixed status record of one robot, as seen by render/record collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotStatus {
    pub index: usize,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub yaw: f32,
    pub hp: i32,
    pub ammo: u32,
    pub heat: i32,
    pub shot_cooldown: u32,
    pub can_move: bool,
    pub can_shoot: bool,
    pub timeout: u32,
    pub alive: bool,
    pub robot_hits: u32,
    pub shots_fired: u32,
    pub hits_landed: u32,
    pub hits_taken: u32,
}

impl RobotStatus {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<&RobotState> for RobotStatus {
    fn from(r: &RobotState) -> Self {
        Self {
            index: r.index,
            team: r.team,
            x: r.center.x,
            y: r.center.y,
            rotation: r.rotation,
            yaw: r.yaw,
            hp: r.hp,
            ammo: r.ammo,
            heat: r.heat,
            shot_cooldown: r.shot_cooldown,
            can_move: r.can_move,
            can_shoot: r.can_shoot,
            timeout: r.timeout,
            alive: r.is_alive(),
            robot_hits: r.robot_hits,
            shots_fired: r.shots_fired,
            hits_landed: r.hits_landed,
            hits_taken: r.hits_taken,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletSnapshot {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub owner: usize,
}

impl From<&Bullet> for BulletSnapshot {
    fn from(b: &Bullet) -> Self {
        Self {
            x: b.center.x,
            y: b.center.y,
            heading: b.heading,
            owner: b.owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub kind: ZoneKind,
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    BlueWin,
    RedWin,
    Draw,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<Team> {
        match self {
            MatchOutcome::BlueWin => Some(Team::Blue),
            MatchOutcome::RedWin => Some(Team::Red),
            MatchOutcome::Draw => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEndReason {
    Elimination,
    Timeout,
}

/// Match state machine: `Running` is the undecided outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Running,
    Ended {
        outcome: MatchOutcome,
        reason: MatchEndReason,
    },
}

impl MatchStatus {
    pub fn is_ended(&self) -> bool {
        matches!(self, MatchStatus::Ended { .. })
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        match self {
            MatchStatus::Running => None,
            MatchStatus::Ended { outcome, .. } => Some(*outcome),
        }
    }
}

/// Observable world state returned by `reset` and `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub epoch: u32,
    /// Remaining match clock in units.
    pub time: i32,
    pub status: MatchStatus,
    pub zones: Vec<ZoneSnapshot>,
    pub robots: Vec<RobotStatus>,
    pub bullets: Vec<BulletSnapshot>,
}

impl WorldState {
    pub fn is_zone_active(&self, kind: ZoneKind) -> bool {
        self.zones.iter().any(|z| z.kind == kind && z.active)
    }

    pub fn team_robots(&self, team: Team) -> impl Iterator<Item = &RobotStatus> {
        self.robots.iter().filter(move |r| r.team == team)
    }
}

// ---------------------------------------------------------------------------
// Match records
// ---------------------------------------------------------------------------

/// One decision cycle, as consumed by an external recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub state: WorldState,
    pub prev_state: WorldState,
    pub actions: Vec<Command>,
    /// Per-robot progress toward the opposing spawn during this cycle.
    pub reward: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub seed: u64,
    pub robot_count: usize,
    pub blue_policy: String,
    pub red_policy: String,
    pub shuffle_zones: bool,
    pub record_transitions: bool,
    pub max_steps: u32,
    #[serde(default)]
    pub sim_config: SimConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            robot_count: crate::MAX_ROBOTS,
            blue_policy: "blue".into(),
            red_policy: "red".into(),
            shuffle_zones: false,
            record_transitions: false,
            max_steps: crate::MAX_STEPS,
            sim_config: SimConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// `Running` when the match was cut off by `max_steps`.
    pub status: MatchStatus,
    pub final_epoch: u32,
    pub time_remaining: i32,
    pub robots: Vec<RobotStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub config: MatchConfig,
    pub result: MatchResult,
    pub transitions: Vec<Transition>,
}
