use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::types::{Team, ZoneKind};
use crate::{FIELD_LENGTH, FIELD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneFootprint {
    pub kind: ZoneKind,
    pub rect: Rect,
}

/// Static arena geometry. Built once and shared read-only between matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaLayout {
    pub field: Rect,
    pub blue_spawns: Vec<Rect>,
    pub red_spawns: Vec<Rect>,
    /// Block chassis only; bullets pass over them.
    pub low_barriers: Vec<Rect>,
    /// Block both chassis and bullets.
    pub high_barriers: Vec<Rect>,
    pub zones: Vec<ZoneFootprint>,
}

impl ArenaLayout {
    /// The 808 x 448 competition field, authored for the blue half and
    /// mirrored for red.
    pub fn standard() -> Self {
        let c1 = Rect::new(100.0, 100.0, -354.0, -174.0);
        let c3 = c1.mirror(true);

        let b1 = Rect::new(100.0, 20.0, -354.0, 114.0);
        let b2 = Rect::new(80.0, 20.0, -214.0, 0.0);
        let b3 = Rect::new(20.0, 100.0, -244.0, -174.0);
        let b4 = Rect::new(100.0, 20.0, 0.0, 120.5);
        let b5 = Rect::new(25.0, 25.0, 0.0, 0.0).rotated(45.0);

        let hp = Rect::new(54.0, 48.0, -354.0, 55.0);
        let ammo = Rect::new(54.0, 48.0, -214.0, -59.5);
        let debuff = Rect::new(54.0, 48.0, 0.0, 193.5);

        Self {
            field: Rect::new(FIELD_LENGTH, FIELD_WIDTH, 0.0, 0.0),
            blue_spawns: vec![c1, c1.mirror(false)],
            red_spawns: vec![c3, c3.mirror(false)],
            low_barriers: vec![b2, b2.mirror(true), b5],
            high_barriers: vec![
                b1,
                b3,
                b4,
                b4.mirror(true),
                b3.mirror(true),
                b1.mirror(true),
            ],
            zones: vec![
                ZoneFootprint { kind: ZoneKind::HpBuff(Team::Blue), rect: hp },
                ZoneFootprint { kind: ZoneKind::HpBuff(Team::Red), rect: hp.mirror(true) },
                ZoneFootprint { kind: ZoneKind::AmmoSupply(Team::Blue), rect: ammo },
                ZoneFootprint { kind: ZoneKind::AmmoSupply(Team::Red), rect: ammo.mirror(true) },
                ZoneFootprint { kind: ZoneKind::NoShoot, rect: debuff },
                ZoneFootprint { kind: ZoneKind::NoMove, rect: debuff.mirror(true) },
            ],
        }
    }

    pub fn spawns(&self, team: Team) -> &[Rect] {
        match team {
            Team::Blue => &self.blue_spawns,
            Team::Red => &self.red_spawns,
        }
    }

    /// Center of a team's first spawn area.
    pub fn spawn_center(&self, team: Team) -> Vec2 {
        self.spawns(team)
            .first()
            .map(|r| r.center)
            .unwrap_or(self.field.center)
    }

    /// Low barriers followed by high barriers, in a fixed order.
    pub fn barriers(&self) -> impl Iterator<Item = &Rect> {
        self.low_barriers.iter().chain(self.high_barriers.iter())
    }
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self::standard()
    }
}
