use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::ArmorSide;

/// Tunable rules of the simulation. Every field has a competition default, so
/// a JSON file only needs the fields it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub step_epochs: u32,
    pub heat_epochs: u32,
    pub unit_epochs: u32,
    pub zone_reset_epochs: u32,
    pub match_units: i32,

    pub chassis_length: f32,
    pub chassis_width: f32,
    pub armor_thickness: f32,
    pub armor_span: f32,
    pub robot_radius: f32,
    pub barrier_reach: f32,

    pub max_forward_speed: f32,
    pub max_strafe_speed: f32,
    pub max_rotation_speed: f32,
    pub max_yaw_speed: f32,
    pub rebound_coeff: f32,

    pub start_hp: i32,
    pub start_ammo: u32,
    pub shot_cooldown: u32,
    pub bullet_step: f32,
    pub bullet_heat: i32,

    pub heat: HeatRules,
    pub zones: ZoneRules,
    pub hits: HitRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_epochs: STEP_EPOCHS,
            heat_epochs: HEAT_EPOCHS,
            unit_epochs: EPOCHS_PER_UNIT,
            zone_reset_epochs: ZONE_RESET_EPOCHS,
            match_units: MATCH_DURATION_UNITS,

            chassis_length: CHASSIS_LENGTH,
            chassis_width: CHASSIS_WIDTH,
            armor_thickness: ARMOR_THICKNESS,
            armor_span: ARMOR_SPAN,
            robot_radius: ROBOT_RADIUS,
            barrier_reach: BARRIER_REACH,

            max_forward_speed: MAX_FORWARD_SPEED,
            max_strafe_speed: MAX_STRAFE_SPEED,
            max_rotation_speed: MAX_ROTATION_SPEED,
            max_yaw_speed: MAX_YAW_SPEED,
            rebound_coeff: REBOUND_COEFF,

            start_hp: START_HP,
            start_ammo: START_AMMO,
            shot_cooldown: SHOT_COOLDOWN_EPOCHS,
            bullet_step: BULLET_STEP,
            bullet_heat: BULLET_HEAT,

            heat: HeatRules::default(),
            zones: ZoneRules::default(),
            hits: HitRules::default(),
        }
    }
}

impl SimConfig {
    /// First rule that makes the configuration unusable, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if self.step_epochs == 0
            || self.heat_epochs == 0
            || self.unit_epochs == 0
            || self.zone_reset_epochs == 0
        {
            return Some("cadences must be at least one epoch");
        }
        if self.match_units <= 0 {
            return Some("match must last at least one unit");
        }
        let geometry = [
            self.chassis_length,
            self.chassis_width,
            self.armor_thickness,
            self.armor_span,
            self.robot_radius,
            self.barrier_reach,
        ];
        if geometry.iter().any(|&v| !(v > 0.0)) {
            return Some("robot geometry and barrier reach must be positive");
        }
        if !(0.0..1.0).contains(&self.rebound_coeff) {
            return Some("rebound coefficient must be in [0, 1)");
        }
        if !(self.bullet_step > 0.0) {
            return Some("bullet step must be positive");
        }
        if self.heat.low_threshold > self.heat.high_threshold {
            return Some("heat low threshold above high threshold");
        }
        None
    }
}

/// Barrel heat settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatRules {
    pub low_threshold: i32,
    pub high_threshold: i32,
    /// hp lost per heat point above the low threshold.
    pub low_damage: i32,
    /// hp lost per heat point above the high threshold.
    pub high_damage: i32,
    pub cooling_healthy: i32,
    pub cooling_wounded: i32,
    pub healthy_hp: i32,
}

impl Default for HeatRules {
    fn default() -> Self {
        Self {
            low_threshold: HEAT_LOW_THRESHOLD,
            high_threshold: HEAT_HIGH_THRESHOLD,
            low_damage: HEAT_LOW_DAMAGE,
            high_damage: HEAT_HIGH_DAMAGE,
            cooling_healthy: HEAT_COOLING_HEALTHY,
            cooling_wounded: HEAT_COOLING_WOUNDED,
            healthy_hp: HEALTHY_HP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneRules {
    pub hp_buff: i32,
    pub ammo_supply: u32,
    pub debuff_units: u32,
}

impl Default for ZoneRules {
    fn default() -> Self {
        Self {
            hp_buff: ZONE_HP_BUFF,
            ammo_supply: ZONE_AMMO_SUPPLY,
            debuff_units: DEBUFF_DURATION_UNITS,
        }
    }
}

/// Damage dealt by a bullet, by the armor plate it strikes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitRules {
    pub front: i32,
    pub side: i32,
    pub rear: i32,
}

impl Default for HitRules {
    fn default() -> Self {
        Self {
            front: FRONT_ARMOR_DAMAGE,
            side: SIDE_ARMOR_DAMAGE,
            rear: REAR_ARMOR_DAMAGE,
        }
    }
}

impl HitRules {
    pub fn damage(&self, side: ArmorSide) -> i32 {
        match side {
            ArmorSide::Front => self.front,
            ArmorSide::Left | ArmorSide::Right => self.side,
            ArmorSide::Rear => self.rear,
        }
    }
}
