//! Towers: archetype table, upgrade math and the support aura

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell_center;

/// Upgrade multipliers
pub const DAMAGE_PER_LEVEL: f32 = 1.25;
pub const RANGE_PER_LEVEL: f32 = 1.1;
pub const INTERVAL_PER_LEVEL: f32 = 0.9;
/// Fire interval only shrinks while above this many ticks
pub const MIN_FIRE_INTERVAL: f32 = 5.0;
/// Buffed towers fire this much faster
pub const BUFF_FACTOR: f32 = 0.8;
/// Extra reach of the support aura beyond its range
pub const AURA_MARGIN: f32 = 20.0;
/// A freshly built beam tower starts uncharged
pub const BEAM_INITIAL: f32 = 0.0;
/// Charge a beam falls back to after losing its target
pub const BEAM_BASELINE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(pub u32);

/// Tower archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    Blaster,
    Sniper,
    Tesla,
    Missile,
    Pulse,
    Prism,
    Buffer,
    Railgun,
    Orbital,
    Singularity,
}

/// How an archetype behaves each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackClass {
    /// Fires a projectile on cooldown
    Projectile(super::projectile::ProjectileKind),
    /// Damages the locked target every few ticks and freezes it
    Chain,
    /// Damage ramps the longer it stays locked
    Beam,
    /// Infinite-line shot through every enemy near the ray
    Pierce,
    /// Hits everything in range and knocks it back
    Pulse,
    /// Orbs that damage on contact, no targeting
    Orbit,
    /// Buffs neighbours, never attacks
    Support,
}

/// Static numbers for one archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerStats {
    pub name: &'static str,
    pub range: f32,
    pub damage: f32,
    /// Ticks between shots (0 = every tick)
    pub fire_interval: f32,
    pub cost: u32,
    pub color: u32,
    /// Progression tier required to build
    pub unlock_tier: u8,
}

impl TowerKind {
    pub const ALL: [TowerKind; 10] = [
        TowerKind::Blaster,
        TowerKind::Sniper,
        TowerKind::Tesla,
        TowerKind::Missile,
        TowerKind::Pulse,
        TowerKind::Prism,
        TowerKind::Buffer,
        TowerKind::Railgun,
        TowerKind::Orbital,
        TowerKind::Singularity,
    ];

    pub fn stats(self) -> TowerStats {
        let (name, range, damage, fire_interval, cost, color, unlock_tier) = match self {
            TowerKind::Blaster => ("Blaster", 120.0, 15.0, 20.0, 50, 0x00f3ff, 0),
            TowerKind::Sniper => ("Sniper", 300.0, 80.0, 90.0, 120, 0xffcc00, 0),
            TowerKind::Tesla => ("Tesla", 100.0, 2.0, 0.0, 200, 0xff0055, 0),
            TowerKind::Missile => ("Missile", 180.0, 50.0, 120.0, 350, 0xbd00ff, 1),
            TowerKind::Pulse => ("Pulse", 100.0, 5.0, 60.0, 150, 0xffffff, 1),
            TowerKind::Prism => ("Prism", 140.0, 0.5, 0.0, 450, 0x00ffff, 2),
            TowerKind::Buffer => ("Buffer", 80.0, 0.0, 0.0, 400, 0xff6600, 2),
            TowerKind::Railgun => ("Railgun", 999.0, 200.0, 180.0, 800, 0x00ffaa, 3),
            TowerKind::Orbital => ("Orbital", 100.0, 30.0, 0.0, 550, 0xff00cc, 3),
            TowerKind::Singularity => ("Singularity", 160.0, 0.5, 0.0, 1000, 0x330066, 3),
        };
        TowerStats {
            name,
            range,
            damage,
            fire_interval,
            cost,
            color,
            unlock_tier,
        }
    }

    pub fn attack_class(self) -> AttackClass {
        use super::projectile::ProjectileKind;
        match self {
            TowerKind::Blaster | TowerKind::Singularity => {
                AttackClass::Projectile(ProjectileKind::Direct)
            }
            TowerKind::Sniper => AttackClass::Projectile(ProjectileKind::LongRange),
            TowerKind::Missile => AttackClass::Projectile(ProjectileKind::Area),
            TowerKind::Tesla => AttackClass::Chain,
            TowerKind::Prism => AttackClass::Beam,
            TowerKind::Railgun => AttackClass::Pierce,
            TowerKind::Pulse => AttackClass::Pulse,
            TowerKind::Orbital => AttackClass::Orbit,
            TowerKind::Buffer => AttackClass::Support,
        }
    }

    #[inline]
    pub fn is_support(self) -> bool {
        self.attack_class() == AttackClass::Support
    }
}

/// A placed tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,
    pub kind: TowerKind,
    pub col: i32,
    pub row: i32,
    pub pos: Vec2,
    pub level: u32,
    pub damage: f32,
    pub range: f32,
    pub fire_interval: f32,
    /// Ticks until the next shot is allowed
    pub cooldown: f32,
    /// Facing angle in radians
    pub angle: f32,
    pub beam_charge: f32,
    pub orbit_angle: f32,
    pub buffed: bool,
    pub sell_value: u32,
    /// Enemy currently locked on (beam rendering)
    pub target: Option<super::enemy::EnemyId>,
}

impl Tower {
    pub fn new(id: TowerId, kind: TowerKind, col: i32, row: i32) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            col,
            row,
            pos: cell_center(col, row),
            level: 1,
            damage: stats.damage,
            range: stats.range,
            fire_interval: stats.fire_interval,
            cooldown: 0.0,
            angle: 0.0,
            beam_charge: BEAM_INITIAL,
            orbit_angle: 0.0,
            buffed: false,
            sell_value: stats.cost / 2,
            target: None,
        }
    }

    /// Base cost of this archetype
    #[inline]
    pub fn cost(&self) -> u32 {
        self.kind.stats().cost
    }

    /// `floor(cost * 0.7 * level)`
    pub fn upgrade_cost(&self) -> u32 {
        (self.cost() as f64 * 0.7 * self.level as f64).floor() as u32
    }

    /// Fire interval after the support buff
    pub fn effective_fire_interval(&self) -> f32 {
        if self.buffed {
            self.fire_interval * BUFF_FACTOR
        } else {
            self.fire_interval
        }
    }

    /// Raise the level and scale stats. Payment is the caller's job.
    pub fn apply_upgrade(&mut self, paid: u32) {
        self.level += 1;
        self.damage *= DAMAGE_PER_LEVEL;
        self.range *= RANGE_PER_LEVEL;
        if self.fire_interval > MIN_FIRE_INTERVAL && !self.kind.is_support() {
            self.fire_interval *= INTERVAL_PER_LEVEL;
        }
        self.sell_value += paid / 2;
    }

    /// Whether this support tower's aura reaches `pos`
    pub fn aura_reaches(&self, pos: Vec2) -> bool {
        self.kind.is_support() && self.pos.distance(pos) <= self.range + AURA_MARGIN
    }
}

/// One-shot aura scan: mark every non-support tower in reach of `support` as buffed.
///
/// Returns the number of towers newly buffed.
pub fn apply_aura(support: &Tower, towers: &mut [Tower]) -> usize {
    if !support.kind.is_support() {
        return 0;
    }
    let mut count = 0;
    for tower in towers.iter_mut() {
        if tower.id == support.id || tower.kind.is_support() {
            continue;
        }
        if support.aura_reaches(tower.pos) && !tower.buffed {
            tower.buffed = true;
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tower_from_table() {
        let t = Tower::new(TowerId(1), TowerKind::Sniper, 2, 3);
        assert_eq!(t.pos, Vec2::new(100.0, 140.0));
        assert_eq!(t.level, 1);
        assert_eq!(t.range, 300.0);
        assert_eq!(t.sell_value, 60);
        assert_eq!(t.beam_charge, BEAM_INITIAL);
    }

    #[test]
    fn test_upgrade_scaling() {
        let mut t = Tower::new(TowerId(1), TowerKind::Blaster, 0, 0);
        let cost = t.upgrade_cost();
        assert_eq!(cost, 35);
        t.apply_upgrade(cost);
        assert_eq!(t.level, 2);
        assert!((t.damage - 18.75).abs() < 1e-4);
        assert!((t.range - 132.0).abs() < 1e-3);
        assert!((t.fire_interval - 18.0).abs() < 1e-4);
        assert_eq!(t.sell_value, 25 + 17);
        assert_eq!(t.upgrade_cost(), 70);
    }

    #[test]
    fn test_fire_interval_floor() {
        let mut t = Tower::new(TowerId(1), TowerKind::Blaster, 0, 0);
        t.fire_interval = 5.0;
        t.apply_upgrade(0);
        assert_eq!(t.fire_interval, 5.0);

        // Continuous towers stay at zero
        let mut tesla = Tower::new(TowerId(2), TowerKind::Tesla, 0, 0);
        tesla.apply_upgrade(0);
        assert_eq!(tesla.fire_interval, 0.0);
    }

    #[test]
    fn test_buffed_interval() {
        let mut t = Tower::new(TowerId(1), TowerKind::Missile, 0, 0);
        assert_eq!(t.effective_fire_interval(), 120.0);
        t.buffed = true;
        assert!((t.effective_fire_interval() - 96.0).abs() < 1e-4);
    }

    #[test]
    fn test_aura_scan_marks_neighbours_only() {
        let support = Tower::new(TowerId(1), TowerKind::Buffer, 5, 5);
        let mut towers = vec![
            support.clone(),
            Tower::new(TowerId(2), TowerKind::Blaster, 6, 5), // 40px away
            Tower::new(TowerId(3), TowerKind::Blaster, 8, 5), // 120px away, > 100
            Tower::new(TowerId(4), TowerKind::Buffer, 5, 6),  // support, never buffed
        ];
        assert_eq!(apply_aura(&support, &mut towers), 1);
        assert!(towers[1].buffed);
        assert!(!towers[2].buffed);
        assert!(!towers[3].buffed);
        assert!(!towers[0].buffed);
    }

    #[test]
    fn test_attack_classes_cover_all_kinds() {
        let supports = TowerKind::ALL.iter().filter(|k| k.is_support()).count();
        assert_eq!(supports, 1);
    }
}
