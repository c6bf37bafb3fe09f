//! Projectiles in flight and short-lived visual effects

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyId};
use super::events::Outbox;
use super::geom::{Step, step_toward};

/// Missile splash radius
pub const AREA_RADIUS: f32 = 60.0;
pub const SHOCKWAVE_LIFE: u32 = 20;
pub const RAIL_LIFE: u32 = 10;
/// Shockwave radius eases toward its max by this fraction per tick
const SHOCKWAVE_EASE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Single-target bolt
    Direct,
    /// Fast single-target round
    LongRange,
    /// Slow rocket with splash
    Area,
}

impl ProjectileKind {
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::Direct => 12.0,
            ProjectileKind::LongRange => 25.0,
            ProjectileKind::Area => 6.0,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            ProjectileKind::Direct => 0x00f3ff,
            ProjectileKind::LongRange => 0xffcc00,
            ProjectileKind::Area => 0xbd00ff,
        }
    }

    pub fn area_radius(self) -> f32 {
        match self {
            ProjectileKind::Area => AREA_RADIUS,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub target: EnemyId,
    /// Where the target was last seen alive
    pub target_pos: Vec2,
    pub damage: f32,
    pub area_radius: f32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(id: u32, kind: ProjectileKind, from: Vec2, target: &Enemy, damage: f32) -> Self {
        Self {
            id,
            kind,
            pos: from,
            target: target.id,
            target_pos: target.pos,
            damage,
            area_radius: kind.area_radius(),
            alive: true,
        }
    }

    /// Fly one tick; impact on arrival.
    ///
    /// Homes on the target while it lives. Once it is gone the projectile keeps
    /// flying to the last known position and never picks a new target.
    pub fn update(&mut self, enemies: &mut [Enemy], out: &mut Outbox) {
        if !self.alive {
            return;
        }

        let target = enemies.iter().position(|e| e.id == self.target && e.alive);
        if let Some(i) = target {
            self.target_pos = enemies[i].pos;
        }

        match step_toward(self.pos, self.target_pos, self.kind.speed()) {
            Step::Moving(p) => self.pos = p,
            Step::Arrived(p) => {
                self.pos = p;
                self.alive = false;
                self.impact(enemies, target, out);
            }
        }
    }

    fn impact(&self, enemies: &mut [Enemy], target: Option<usize>, out: &mut Outbox) {
        if self.area_radius > 0.0 {
            out.explosion(self.pos, self.kind.color(), 15);
            for enemy in enemies.iter_mut() {
                if enemy.alive && enemy.pos.distance(self.pos) <= self.area_radius {
                    enemy.take_damage(self.damage, out);
                }
            }
        } else if let Some(i) = target {
            enemies[i].take_damage(self.damage, out);
        }
    }
}

/// Transient visual markers. They only count down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// Expanding ring left by a pulse
    Shockwave {
        center: Vec2,
        radius: f32,
        max_radius: f32,
        life: u32,
    },
    /// Railgun trace
    Rail { from: Vec2, to: Vec2, life: u32 },
}

impl Effect {
    pub fn shockwave(center: Vec2, max_radius: f32) -> Self {
        Effect::Shockwave {
            center,
            radius: 1.0,
            max_radius,
            life: SHOCKWAVE_LIFE,
        }
    }

    pub fn rail(from: Vec2, to: Vec2) -> Self {
        Effect::Rail {
            from,
            to,
            life: RAIL_LIFE,
        }
    }

    pub fn update(&mut self) {
        match self {
            Effect::Shockwave {
                radius,
                max_radius,
                life,
                ..
            } => {
                *radius += (*max_radius - *radius) * SHOCKWAVE_EASE;
                *life = life.saturating_sub(1);
            }
            Effect::Rail { life, .. } => *life = life.saturating_sub(1),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self {
            Effect::Shockwave { life, .. } | Effect::Rail { life, .. } => *life == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    fn enemy(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(EnemyId(id), kind, 1, pos, 0)
    }

    #[test]
    fn test_direct_hit_on_arrival() {
        let mut enemies = vec![enemy(1, EnemyKind::Tank, Vec2::new(20.0, 0.0))];
        let mut p = Projectile::new(1, ProjectileKind::Direct, Vec2::ZERO, &enemies[0], 15.0);
        let mut out = Outbox::default();

        p.update(&mut enemies, &mut out);
        assert!(p.alive);
        assert_eq!(p.pos, Vec2::new(12.0, 0.0));

        p.update(&mut enemies, &mut out);
        assert!(!p.alive);
        assert_eq!(enemies[0].health, enemies[0].max_health - 15.0);
    }

    #[test]
    fn test_dead_target_keeps_last_position_and_fizzles() {
        let mut enemies = vec![
            enemy(1, EnemyKind::Fast, Vec2::new(30.0, 0.0)),
            enemy(2, EnemyKind::Fast, Vec2::new(30.0, 0.0)),
        ];
        let mut p = Projectile::new(1, ProjectileKind::Direct, Vec2::ZERO, &enemies[0], 5.0);
        let mut out = Outbox::default();
        p.update(&mut enemies, &mut out);

        enemies[0].alive = false;
        enemies[0].pos = Vec2::new(500.0, 500.0);
        p.update(&mut enemies, &mut out);
        p.update(&mut enemies, &mut out);

        assert!(!p.alive);
        assert_eq!(p.pos, Vec2::new(30.0, 0.0));
        // The other enemy standing on the spot is untouched
        assert_eq!(enemies[1].health, enemies[1].max_health);
    }

    #[test]
    fn test_area_impact_hits_everything_in_radius() {
        let mut enemies = vec![
            enemy(1, EnemyKind::Tank, Vec2::new(5.0, 0.0)),
            enemy(2, EnemyKind::Tank, Vec2::new(5.0, 50.0)),
            enemy(3, EnemyKind::Tank, Vec2::new(5.0, 100.0)),
        ];
        let mut p = Projectile::new(1, ProjectileKind::Area, Vec2::ZERO, &enemies[0], 50.0);
        let mut out = Outbox::default();
        p.update(&mut enemies, &mut out);

        assert!(!p.alive);
        assert!(enemies[0].health < enemies[0].max_health);
        assert!(enemies[1].health < enemies[1].max_health);
        assert_eq!(enemies[2].health, enemies[2].max_health);
    }

    #[test]
    fn test_effects_expire() {
        let mut fx = Effect::shockwave(Vec2::ZERO, 100.0);
        for _ in 0..SHOCKWAVE_LIFE - 1 {
            fx.update();
        }
        assert!(!fx.is_expired());
        fx.update();
        assert!(fx.is_expired());

        if let Effect::Shockwave { radius, .. } = fx {
            assert!(radius > 90.0 && radius <= 100.0);
        }
    }
}
