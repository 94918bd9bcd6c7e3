//! Buff/debuff zone tracker.

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use roboarena_shared::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub kind: ZoneKind,
    pub rect: Rect,
    /// Triggered since the last reset; an active zone is on cooldown.
    pub active: bool,
}

/// Zone state for one match.
///
/// Footprints come from the layout and never move. With a shuffle seed, the
/// zone categories are dealt to footprint pairs anew on every reset.
#[derive(Debug, Clone)]
pub struct Zones {
    zones: Vec<Zone>,
    canonical: Vec<ZoneKind>,
    shuffle_seed: Option<u64>,
    resets: u64,
}

impl Zones {
    pub fn new(layout: &ArenaLayout, shuffle_seed: Option<u64>) -> Self {
        let zones: Vec<Zone> = layout
            .zones
            .iter()
            .map(|f| Zone {
                kind: f.kind,
                rect: f.rect,
                active: false,
            })
            .collect();
        let canonical = zones.iter().map(|z| z.kind).collect();
        let mut tracker = Self {
            zones,
            canonical,
            shuffle_seed,
            resets: 0,
        };
        tracker.reset();
        tracker
    }

    /// Deactivate every zone (and re-deal categories when shuffling).
    pub fn reset(&mut self) {
        if let Some(seed) = self.shuffle_seed {
            let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(self.resets));
            let mut pairs: Vec<&[ZoneKind]> = self.canonical.chunks(2).collect();
            pairs.shuffle(&mut rng);
            for (zone, kind) in self.zones.iter_mut().zip(pairs.into_iter().flatten()) {
                zone.kind = *kind;
            }
        }
        for zone in &mut self.zones {
            zone.active = false;
        }
        self.resets += 1;
        debug!("zones reset (#{})", self.resets);
    }

    /// Trigger inactive zones occupied by a qualifying live robot.
    ///
    /// Zones are visited in layout order. The lowest-index qualifying robot
    /// whose center is inside triggers a zone, and on that epoch every
    /// qualifying occupant receives the effect, in ascending index order.
    pub fn apply(&mut self, robots: &mut [RobotState], rules: &ZoneRules) {
        for zone in &mut self.zones {
            if zone.active {
                continue;
            }
            let (kind, rect) = (zone.kind, zone.rect);
            let occupants = robots
                .iter_mut()
                .filter(|r| r.is_alive() && kind.qualifies(r.team) && rect.contains(r.center, false));
            for robot in occupants {
                if !zone.active {
                    zone.active = true;
                    debug!("robot {} triggered zone {}", robot.index, kind.name());
                }
                apply_effect(kind, robot, rules);
            }
        }
    }

    pub fn is_zone_active(&self, kind: ZoneKind) -> bool {
        self.zones.iter().any(|z| z.kind == kind && z.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn snapshot(&self) -> Vec<ZoneSnapshot> {
        self.zones
            .iter()
            .map(|z| ZoneSnapshot {
                kind: z.kind,
                x: z.rect.center.x,
                y: z.rect.center.y,
                active: z.active,
            })
            .collect()
    }
}

fn apply_effect(kind: ZoneKind, robot: &mut RobotState, rules: &ZoneRules) {
    match kind {
        ZoneKind::HpBuff(_) => robot.hp = robot.hp.saturating_add(rules.hp_buff),
        ZoneKind::AmmoSupply(_) => robot.ammo = robot.ammo.saturating_add(rules.ammo_supply),
        ZoneKind::NoShoot => {
            robot.can_shoot = false;
            robot.timeout = robot.timeout.max(rules.debuff_units);
        }
        ZoneKind::NoMove => {
            robot.can_move = false;
            robot.timeout = robot.timeout.max(rules.debuff_units);
        }
    }
}
