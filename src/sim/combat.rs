//! Per-tower attack resolution
//!
//! Each tower acts once per tick against the shared enemy list. Damage is
//! applied immediately; everything else (projectiles, effects, cues) is pushed
//! into the collections borrowed through [`Battlefield`].

use std::f32::consts::TAU;

use glam::Vec2;

use super::enemy::Enemy;
use super::events::{GameEvent, Outbox};
use super::geom::{direction, distance_to_line, facing, orbit_point};
use super::projectile::{Effect, Projectile, ProjectileKind};
use super::targeting::{TargetPolicy, select_target};
use super::tower::{AttackClass, BEAM_BASELINE, Tower, TowerKind};
use crate::audio::SoundEffect;

/// Chain towers zap on ticks divisible by this
pub const CHAIN_PERIOD: u64 = 5;
pub const CHAIN_FREEZE: u32 = 10;
pub const BEAM_CHARGE_STEP: f32 = 0.1;
pub const BEAM_CHARGE_MAX: f32 = 3.0;
/// Length of the railgun line
pub const PIERCE_LENGTH: f32 = 1000.0;
/// Added to the enemy radius for the pierce hit test
pub const PIERCE_MARGIN: f32 = 10.0;
pub const PIERCE_SHAKE: f32 = 5.0;
pub const PULSE_PUSHBACK: f32 = 10.0;
pub const ORBIT_BASE_SPEED: f32 = 0.05;
pub const ORBIT_SPEED_PER_LEVEL: f32 = 0.01;
pub const ORBIT_DISTANCE: f32 = 40.0;
pub const ORBIT_CONTACT_MARGIN: f32 = 10.0;
/// Support towers sparkle every N ticks
pub const AURA_PULSE_PERIOD: u64 = 20;

// Cue throttles for continuous attacks
const CHAIN_SOUND_PERIOD: u64 = 15;
const BEAM_SOUND_PERIOD: u64 = 4;
const ORBIT_SOUND_PERIOD: u64 = 10;

const WHITE: u32 = 0xffffff;

/// Mutable view of the world a tower can act on
pub struct Battlefield<'a> {
    pub enemies: &'a mut [Enemy],
    pub projectiles: &'a mut Vec<Projectile>,
    pub effects: &'a mut Vec<Effect>,
    pub next_id: &'a mut u32,
    pub tick: u64,
    pub out: &'a mut Outbox,
}

impl Battlefield<'_> {
    fn alloc_id(&mut self) -> u32 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }
}

/// Advance one tower by one tick
pub fn update_tower(tower: &mut Tower, field: &mut Battlefield<'_>) {
    match tower.kind.attack_class() {
        AttackClass::Support => {
            if field.tick % AURA_PULSE_PERIOD == 0 {
                field.out.emit(GameEvent::AuraPulse {
                    tower: tower.id,
                    pos: tower.pos,
                });
            }
            return;
        }
        AttackClass::Orbit => {
            orbit(tower, field);
            return;
        }
        _ => {}
    }

    if tower.cooldown > 0.0 {
        tower.cooldown -= 1.0;
    }

    let policy = TargetPolicy::for_kind(tower.kind);
    match select_target(tower.pos, tower.range, field.enemies, policy) {
        Some(i) => {
            tower.angle = facing(tower.pos, field.enemies[i].pos);
            tower.target = Some(field.enemies[i].id);
            attack(tower, i, field);
        }
        None => {
            tower.target = None;
            tower.beam_charge = BEAM_BASELINE;
        }
    }
}

fn attack(tower: &mut Tower, target: usize, field: &mut Battlefield<'_>) {
    let damage = tower.damage;

    match tower.kind.attack_class() {
        AttackClass::Chain => {
            if field.tick % CHAIN_PERIOD == 0 {
                let enemy = &mut field.enemies[target];
                enemy.take_damage(damage, field.out);
                enemy.frozen = CHAIN_FREEZE;
                if field.tick % CHAIN_SOUND_PERIOD == 0 {
                    field.out.sound(SoundEffect::Tesla);
                }
            }
        }
        AttackClass::Beam => {
            tower.beam_charge = (tower.beam_charge + BEAM_CHARGE_STEP).min(BEAM_CHARGE_MAX);
            field.enemies[target].take_damage(damage * tower.beam_charge, field.out);
            if field.tick % BEAM_SOUND_PERIOD == 0 {
                field.out.sound(SoundEffect::Prism);
            }
        }
        AttackClass::Pierce => {
            if tower.cooldown <= 0.0 {
                pierce(tower, field);
                tower.cooldown = tower.effective_fire_interval();
            }
        }
        AttackClass::Pulse => {
            if tower.cooldown <= 0.0 {
                pulse(tower, field);
                tower.cooldown = tower.effective_fire_interval();
            }
        }
        AttackClass::Projectile(kind) => {
            if tower.cooldown <= 0.0 {
                fire_projectile(tower, kind, target, field);
                tower.cooldown = tower.effective_fire_interval();
            }
        }
        AttackClass::Orbit | AttackClass::Support => {}
    }
}

fn pierce(tower: &Tower, field: &mut Battlefield<'_>) {
    field.out.sound(SoundEffect::Railgun);
    field.out.explosion(tower.pos, tower.kind.stats().color, 15);
    field.out.shake(PIERCE_SHAKE);

    let end = tower.pos + Vec2::new(tower.angle.cos(), tower.angle.sin()) * PIERCE_LENGTH;
    for enemy in field.enemies.iter_mut() {
        if enemy.alive && distance_to_line(tower.pos, end, enemy.pos) < enemy.radius + PIERCE_MARGIN
        {
            enemy.take_damage(tower.damage, field.out);
            field.out.explosion(enemy.pos, WHITE, 5);
        }
    }
    field.effects.push(Effect::rail(tower.pos, end));
}

fn pulse(tower: &Tower, field: &mut Battlefield<'_>) {
    field.out.sound(SoundEffect::Pulse);
    field.effects.push(Effect::shockwave(tower.pos, tower.range));
    for enemy in field.enemies.iter_mut() {
        if enemy.alive && tower.pos.distance(enemy.pos) <= tower.range {
            enemy.take_damage(tower.damage, field.out);
            enemy.pushback = direction(tower.pos, enemy.pos) * PULSE_PUSHBACK;
        }
    }
}

fn fire_projectile(
    tower: &Tower,
    kind: ProjectileKind,
    target: usize,
    field: &mut Battlefield<'_>,
) {
    match tower.kind {
        TowerKind::Blaster => field.out.sound(SoundEffect::Shoot),
        TowerKind::Sniper => field.out.sound(SoundEffect::Sniper),
        TowerKind::Missile => field.out.sound(SoundEffect::Missile),
        _ => {}
    }
    let id = field.alloc_id();
    let projectile = Projectile::new(id, kind, tower.pos, &field.enemies[target], tower.damage);
    field.projectiles.push(projectile);
}

/// Orbs circle the tower and hit anything they touch, every tick
fn orbit(tower: &mut Tower, field: &mut Battlefield<'_>) {
    tower.orbit_angle += ORBIT_BASE_SPEED + ORBIT_SPEED_PER_LEVEL * tower.level as f32;
    let orbs = orb_count(tower.level);
    let color = tower.kind.stats().color;

    for i in 0..orbs {
        let angle = tower.orbit_angle + i as f32 * (TAU / orbs as f32);
        let orb = orbit_point(tower.pos, angle, ORBIT_DISTANCE);
        for enemy in field.enemies.iter_mut() {
            if enemy.alive && orb.distance(enemy.pos) < enemy.radius + ORBIT_CONTACT_MARGIN {
                enemy.take_damage(tower.damage, field.out);
                field.out.explosion(orb, color, 3);
                if field.tick % ORBIT_SOUND_PERIOD == 0 {
                    field.out.sound(SoundEffect::Orbital);
                }
            }
        }
    }
}

/// `1 + level / 2`
#[inline]
pub fn orb_count(level: u32) -> u32 {
    1 + level / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{EnemyId, EnemyKind};
    use crate::sim::tower::TowerId;

    struct Fixture {
        enemies: Vec<Enemy>,
        projectiles: Vec<Projectile>,
        effects: Vec<Effect>,
        next_id: u32,
        out: Outbox,
    }

    impl Fixture {
        fn new(enemies: Vec<Enemy>) -> Self {
            Self {
                enemies,
                projectiles: Vec::new(),
                effects: Vec::new(),
                next_id: 100,
                out: Outbox::default(),
            }
        }

        fn run(&mut self, tower: &mut Tower, tick: u64) {
            let mut field = Battlefield {
                enemies: &mut self.enemies,
                projectiles: &mut self.projectiles,
                effects: &mut self.effects,
                next_id: &mut self.next_id,
                tick,
                out: &mut self.out,
            };
            update_tower(tower, &mut field);
        }
    }

    fn enemy_at(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(EnemyId(id), kind, 1, pos, 0)
    }

    #[test]
    fn test_blaster_fires_and_resets_cooldown() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Blaster, 5, 5);
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Tank, tower.pos + Vec2::new(60.0, 0.0))]);

        fx.run(&mut tower, 1);
        assert_eq!(fx.projectiles.len(), 1);
        assert_eq!(fx.projectiles[0].id, 100);
        assert_eq!(tower.cooldown, 20.0);
        assert_eq!(tower.target, Some(EnemyId(1)));

        fx.run(&mut tower, 2);
        assert_eq!(fx.projectiles.len(), 1);
        assert_eq!(tower.cooldown, 19.0);
    }

    #[test]
    fn test_no_target_resets_beam() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Prism, 5, 5);
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Titan, tower.pos + Vec2::new(50.0, 0.0))]);
        fx.run(&mut tower, 1);
        assert!((tower.beam_charge - BEAM_CHARGE_STEP).abs() < 1e-6);
        for t in 2..=40 {
            fx.run(&mut tower, t);
        }
        assert_eq!(tower.beam_charge, BEAM_CHARGE_MAX);

        fx.enemies[0].pos = Vec2::new(-1000.0, -1000.0);
        fx.run(&mut tower, 41);
        assert_eq!(tower.beam_charge, BEAM_BASELINE);
        assert_eq!(tower.target, None);
    }

    #[test]
    fn test_chain_zaps_on_period_and_freezes() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Tesla, 5, 5);
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Tank, tower.pos + Vec2::new(30.0, 0.0))]);
        let full = fx.enemies[0].health;

        fx.run(&mut tower, 4);
        assert_eq!(fx.enemies[0].health, full);
        fx.run(&mut tower, 5);
        assert_eq!(fx.enemies[0].health, full - 2.0);
        assert_eq!(fx.enemies[0].frozen, CHAIN_FREEZE);
    }

    #[test]
    fn test_pierce_hits_everything_on_the_line() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Railgun, 2, 5);
        let p = tower.pos;
        let mut fx = Fixture::new(vec![
            enemy_at(1, EnemyKind::Tank, p + Vec2::new(100.0, 5.0)),
            enemy_at(2, EnemyKind::Tank, p + Vec2::new(200.0, 0.0)),
            enemy_at(3, EnemyKind::Tank, p + Vec2::new(300.0, 50.0)),
        ]);
        fx.run(&mut tower, 1);

        assert!(!fx.enemies[0].alive);
        assert!(!fx.enemies[1].alive);
        assert!(fx.enemies[2].alive);
        assert!(matches!(fx.effects[0], Effect::Rail { .. }));
        assert_eq!(fx.out.shake, Some(PIERCE_SHAKE));
    }

    #[test]
    fn test_pulse_pushes_away_from_tower() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Pulse, 5, 5);
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Tank, tower.pos + Vec2::new(0.0, 50.0))]);
        fx.run(&mut tower, 1);

        let e = &fx.enemies[0];
        assert!((e.pushback - Vec2::new(0.0, PULSE_PUSHBACK)).length() < 1e-5);
        assert_eq!(e.health, e.max_health - 5.0);
        assert!(matches!(fx.effects[0], Effect::Shockwave { .. }));
        assert_eq!(tower.cooldown, 60.0);
    }

    #[test]
    fn test_orbit_ignores_targeting() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Orbital, 5, 5);
        // One orb at level 1, starting at angle 0.06 after the first step
        let orb = orbit_point(tower.pos, 0.06, ORBIT_DISTANCE);
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Titan, orb)]);
        fx.run(&mut tower, 1);

        assert_eq!(fx.enemies[0].health, fx.enemies[0].max_health - 30.0);
        assert_eq!(tower.target, None);
        assert_eq!(orb_count(1), 1);
        assert_eq!(orb_count(4), 3);
    }

    #[test]
    fn test_support_only_sparkles() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Buffer, 5, 5);
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Fast, tower.pos)]);
        fx.run(&mut tower, 19);
        assert!(fx.out.events.is_empty());
        fx.run(&mut tower, 20);
        assert!(matches!(fx.out.events[0], GameEvent::AuraPulse { .. }));
        assert_eq!(fx.enemies[0].health, fx.enemies[0].max_health);
    }

    #[test]
    fn test_buffed_tower_resets_to_shorter_interval() {
        let mut tower = Tower::new(TowerId(1), TowerKind::Sniper, 5, 5);
        tower.buffed = true;
        let mut fx = Fixture::new(vec![enemy_at(1, EnemyKind::Tank, tower.pos + Vec2::new(100.0, 0.0))]);
        fx.run(&mut tower, 1);
        assert!((tower.cooldown - 72.0).abs() < 1e-4);
    }
}
