// Cadences (all in epochs)
pub const EPOCHS_PER_UNIT: u32 = 200; // one match-clock second
pub const STEP_EPOCHS: u32 = 10; // command re-latch, 20Hz decisions
pub const HEAT_EPOCHS: u32 = 20; // barrel heat settlement, 10Hz
pub const ZONE_RESET_EPOCHS: u32 = 60 * EPOCHS_PER_UNIT;

// Match
pub const MATCH_DURATION_UNITS: i32 = 180;
pub const MAX_STEPS: u32 = MATCH_DURATION_UNITS as u32 * EPOCHS_PER_UNIT / STEP_EPOCHS;

// Roster
pub const MIN_ROBOTS: usize = 2;
pub const MAX_ROBOTS: usize = 4;

// Field (cm, origin at arena center, x to the red side)
pub const FIELD_LENGTH: f32 = 808.0;
pub const FIELD_WIDTH: f32 = 448.0;

// Robot geometry
pub const CHASSIS_LENGTH: f32 = 60.0;
pub const CHASSIS_WIDTH: f32 = 45.0;
pub const ARMOR_THICKNESS: f32 = 3.0;
pub const ARMOR_SPAN: f32 = 14.0;
pub const ROBOT_RADIUS: f32 = 30.0;
// Must exceed the half-diagonal of the largest barrier plus the armor overhang.
pub const BARRIER_REACH: f32 = 60.0;

// Motion limits per epoch at full command
pub const MAX_FORWARD_SPEED: f32 = 1.5;
pub const MAX_STRAFE_SPEED: f32 = 1.0;
pub const MAX_ROTATION_SPEED: f32 = 0.9; // degrees
pub const MAX_YAW_SPEED: f32 = 1.5; // degrees
pub const YAW_LIMIT: f32 = 90.0;
pub const REBOUND_COEFF: f32 = 0.4;

// Combat
pub const START_HP: i32 = 2000;
pub const START_AMMO: u32 = 50;
pub const SHOT_COOLDOWN_EPOCHS: u32 = 20;
pub const BULLET_STEP: f32 = 12.5; // 25 m/s at 200 epochs per second
pub const BULLET_HEAT: i32 = 25;

// Barrel heat (settled every HEAT_EPOCHS)
pub const HEAT_LOW_THRESHOLD: i32 = 240;
pub const HEAT_HIGH_THRESHOLD: i32 = 360;
pub const HEAT_LOW_DAMAGE: i32 = 4;
pub const HEAT_HIGH_DAMAGE: i32 = 40;
pub const HEAT_COOLING_HEALTHY: i32 = 12;
pub const HEAT_COOLING_WOUNDED: i32 = 24;
pub const HEALTHY_HP: i32 = 400;

// Zones
pub const ZONE_HP_BUFF: i32 = 200;
pub const ZONE_AMMO_SUPPLY: u32 = 100;
pub const DEBUFF_DURATION_UNITS: u32 = 10;

// Armor hit damage
pub const FRONT_ARMOR_DAMAGE: i32 = 20;
pub const SIDE_ARMOR_DAMAGE: i32 = 40;
pub const REAR_ARMOR_DAMAGE: i32 = 60;

// Command vector layout: [forward, strafe, rotate, yaw, fire]
pub const COMMAND_SIZE: usize = 5;
