//! Enemies: stat table, movement along the path, damage intake

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, HealRequest, Kill, Outbox, SplitRequest};
use super::geom::{Step, step_toward};
use super::levels::Path;
use crate::audio::SoundEffect;

/// Freeze halves movement speed
pub const FREEZE_SLOW: f32 = 0.5;
/// Pushback below this magnitude is ignored
pub const PUSHBACK_EPSILON: f32 = 0.1;
/// Pushback decays geometrically each tick
pub const PUSHBACK_DECAY: f32 = 0.8;
/// Healers pulse every N ticks
pub const HEAL_INTERVAL: u64 = 60;
pub const HEAL_RADIUS: f32 = 100.0;
pub const HEAL_AMOUNT: f32 = 10.0;
/// Chance per tick (when idle) that a glitch phase-shifts
pub const GLITCH_CHANCE: f64 = 0.02;
pub const GLITCH_DURATION: i32 = 30;
/// Max jitter per axis while phase-shifted
pub const GLITCH_JITTER: f32 = 5.0;
/// Nominal hits above this are shown as critical
pub const CRITICAL_THRESHOLD: f32 = 40.0;
/// Armored enemies take 40% damage
pub const ARMOR_FACTOR: f32 = 0.4;
pub const BOSS_DEATH_SHAKE: f32 = 10.0;
pub const LEAK_SHAKE: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Fast,
    Tank,
    Boss,
    Titan,
    Healer,
    Armored,
    Splitter,
    Glitch,
    Reaper,
    Colossus,
}

/// Base numbers for one enemy type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f32,
    pub health: f32,
    pub reward: u32,
    pub radius: f32,
    pub color: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 10] = [
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Boss,
        EnemyKind::Titan,
        EnemyKind::Healer,
        EnemyKind::Armored,
        EnemyKind::Splitter,
        EnemyKind::Glitch,
        EnemyKind::Reaper,
        EnemyKind::Colossus,
    ];

    pub fn stats(self) -> EnemyStats {
        let (speed, health, reward, radius, color) = match self {
            EnemyKind::Fast => (3.0, 20.0, 8, 10.0, 0xff0055),
            EnemyKind::Tank => (1.2, 80.0, 20, 14.0, 0xff9900),
            EnemyKind::Boss => (0.8, 400.0, 100, 20.0, 0xbd00ff),
            EnemyKind::Titan => (0.5, 1200.0, 300, 26.0, 0xffffff),
            EnemyKind::Healer => (2.2, 40.0, 15, 10.0, 0x00ff66),
            EnemyKind::Armored => (1.5, 60.0, 25, 12.0, 0xffff00),
            EnemyKind::Splitter => (2.0, 50.0, 20, 13.0, 0x00ffff),
            EnemyKind::Glitch => (3.5, 40.0, 30, 11.0, 0xaaaaaa),
            EnemyKind::Reaper => (4.5, 30.0, 20, 9.0, 0x330000),
            EnemyKind::Colossus => (0.4, 3000.0, 400, 30.0, 0x555555),
        };
        EnemyStats { speed, health, reward, radius, color }
    }

    /// Boss-tier enemies drive the boss bar and boss music
    pub fn is_boss_tier(self) -> bool {
        matches!(self, EnemyKind::Boss | EnemyKind::Titan | EnemyKind::Colossus)
    }

    /// Heavy enemies ignore pushback displacement
    pub fn resists_pushback(self) -> bool {
        self.is_boss_tier()
    }

    /// Fraction of incoming damage that lands
    pub fn damage_factor(self) -> f32 {
        match self {
            EnemyKind::Armored => ARMOR_FACTOR,
            _ => 1.0,
        }
    }

    /// Lives lost when this enemy reaches the exit
    pub fn leak_penalty(self) -> i32 {
        match self {
            EnemyKind::Reaper => 5,
            _ => 1,
        }
    }

    /// Number of fast children spawned on death
    pub fn split_count(self) -> u32 {
        match self {
            EnemyKind::Splitter => 2,
            EnemyKind::Colossus => 5,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Boss => "boss",
            EnemyKind::Titan => "titan",
            EnemyKind::Healer => "healer",
            EnemyKind::Armored => "armored",
            EnemyKind::Splitter => "splitter",
            EnemyKind::Glitch => "glitch",
            EnemyKind::Reaper => "reaper",
            EnemyKind::Colossus => "colossus",
        }
    }
}

/// Health at a given wave: `floor(base * (1 + 0.15 * wave^1.5))`
pub fn scaled_health(base: f32, wave: u32) -> f32 {
    let scale = 1.0 + 0.15 * (wave as f64).powf(1.5);
    (base as f64 * scale).floor() as f32
}

/// An enemy walking the path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Index of the waypoint most recently reached
    pub path_index: usize,
    pub max_health: f32,
    pub health: f32,
    pub speed: f32,
    pub radius: f32,
    pub reward: u32,
    /// Ticks of slow remaining
    pub frozen: u32,
    pub pushback: Vec2,
    /// Glitch phase-shift ticks remaining (<= 0 means solid)
    pub phase_timer: i32,
    pub alive: bool,
}

impl Enemy {
    /// New enemy at `pos`/`path_index` with stats scaled for `wave`
    pub fn new(id: EnemyId, kind: EnemyKind, wave: u32, pos: Vec2, path_index: usize) -> Self {
        let stats = kind.stats();
        let max_health = scaled_health(stats.health, wave);
        Self {
            id,
            kind,
            pos,
            path_index,
            max_health,
            health: max_health,
            speed: stats.speed,
            radius: stats.radius,
            reward: stats.reward,
            frozen: 0,
            pushback: Vec2::ZERO,
            phase_timer: 0,
            alive: true,
        }
    }

    /// Glitches are untouchable while phase-shifted
    #[inline]
    pub fn is_phased(&self) -> bool {
        self.kind == EnemyKind::Glitch && self.phase_timer > 0
    }

    /// Advance one tick along the path
    pub fn update(&mut self, path: &Path, tick: u64, rng: &mut Pcg32, out: &mut Outbox) {
        if !self.alive {
            return;
        }

        let mut speed = self.speed;
        if self.frozen > 0 {
            speed *= FREEZE_SLOW;
            self.frozen -= 1;
        }

        match self.kind {
            EnemyKind::Glitch => {
                self.phase_timer -= 1;
                if self.phase_timer <= 0 && rng.random_bool(GLITCH_CHANCE) {
                    self.phase_timer = GLITCH_DURATION;
                }
            }
            EnemyKind::Healer if tick % HEAL_INTERVAL == 0 => {
                out.heals.push(HealRequest {
                    source: self.id,
                    origin: self.pos,
                });
            }
            _ => {}
        }

        let Some(target) = path.get(self.path_index + 1) else {
            self.alive = false;
            let lives_lost = self.kind.leak_penalty();
            out.lives_lost += lives_lost;
            out.emit(GameEvent::Leaked {
                id: self.id,
                kind: self.kind,
                lives_lost,
            });
            out.sound(SoundEffect::Explosion);
            out.shake(LEAK_SHAKE);
            return;
        };

        if self.pushback.length() > PUSHBACK_EPSILON {
            if !self.kind.resists_pushback() {
                self.pos += self.pushback;
            }
            self.pushback *= PUSHBACK_DECAY;
            return;
        }

        if self.is_phased() && rng.random::<f32>() > 0.5 {
            let jitter = Vec2::new(
                rng.random_range(-GLITCH_JITTER..GLITCH_JITTER),
                rng.random_range(-GLITCH_JITTER..GLITCH_JITTER),
            );
            self.pos += jitter;
            return;
        }

        match step_toward(self.pos, target, speed) {
            Step::Arrived(p) => {
                self.pos = p;
                self.path_index += 1;
            }
            Step::Moving(p) => self.pos = p,
        }
    }

    /// Apply a hit. Returns the effective damage dealt.
    pub fn take_damage(&mut self, amount: f32, out: &mut Outbox) -> f32 {
        if !self.alive || self.is_phased() {
            return 0.0;
        }

        let dealt = amount * self.kind.damage_factor();
        self.health = (self.health - dealt).max(0.0);
        out.damage_dealt += dealt;
        out.emit(GameEvent::Damaged {
            id: self.id,
            pos: self.pos,
            amount: dealt,
            critical: amount > CRITICAL_THRESHOLD,
        });

        if self.health <= 0.0 {
            self.die(out);
        }
        dealt
    }

    /// Restore health, capped at max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    fn die(&mut self, out: &mut Outbox) {
        self.alive = false;
        out.kills.push(Kill {
            reward: self.reward,
        });
        out.emit(GameEvent::Killed {
            id: self.id,
            kind: self.kind,
            pos: self.pos,
            reward: self.reward,
        });
        out.sound(SoundEffect::Explosion);
        out.explosion(self.pos, self.kind.stats().color, 8);

        if self.kind.is_boss_tier() {
            out.shake(BOSS_DEATH_SHAKE);
        }

        let count = self.kind.split_count();
        if count > 0 {
            out.splits.push(SplitRequest {
                count,
                pos: self.pos,
                path_index: self.path_index,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn straight_path() -> Path {
        Path::new(vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)])
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_scaled_health() {
        assert_eq!(scaled_health(20.0, 1), 23.0);
        // 1 + 0.15 * 4^1.5 = 2.2
        assert_eq!(scaled_health(80.0, 4), 176.0);
        assert_eq!(scaled_health(20.0, 0), 20.0);
    }

    #[test]
    fn test_moves_toward_waypoint() {
        let path = straight_path();
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Fast, 1, path.start(), 0);
        let mut out = Outbox::default();
        e.update(&path, 1, &mut rng(), &mut out);
        assert_eq!(e.pos, Vec2::new(3.0, 0.0));
        assert_eq!(e.path_index, 0);
    }

    #[test]
    fn test_freeze_halves_speed() {
        let path = straight_path();
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Fast, 1, path.start(), 0);
        e.frozen = 2;
        let mut out = Outbox::default();
        e.update(&path, 1, &mut rng(), &mut out);
        assert_eq!(e.pos, Vec2::new(1.5, 0.0));
        assert_eq!(e.frozen, 1);
    }

    #[test]
    fn test_leak_at_path_end() {
        let path = straight_path();
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Reaper, 1, Vec2::new(100.0, 0.0), 1);
        let mut out = Outbox::default();
        e.update(&path, 1, &mut rng(), &mut out);
        assert!(!e.alive);
        assert_eq!(out.lives_lost, 5);
        assert_eq!(out.shake, Some(LEAK_SHAKE));
    }

    #[test]
    fn test_pushback_replaces_movement() {
        let path = straight_path();
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Fast, 1, Vec2::new(50.0, 0.0), 0);
        e.pushback = Vec2::new(-10.0, 0.0);
        let mut out = Outbox::default();
        e.update(&path, 1, &mut rng(), &mut out);
        assert_eq!(e.pos, Vec2::new(40.0, 0.0));
        assert!((e.pushback.x + 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_boss_tier_ignores_pushback_but_decays() {
        let path = straight_path();
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Titan, 1, Vec2::new(50.0, 0.0), 0);
        e.pushback = Vec2::new(-10.0, 0.0);
        let mut out = Outbox::default();
        e.update(&path, 1, &mut rng(), &mut out);
        assert_eq!(e.pos, Vec2::new(50.0, 0.0));
        assert!((e.pushback.x + 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_armored_mitigation() {
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Armored, 1, Vec2::ZERO, 0);
        let before = e.health;
        let mut out = Outbox::default();
        let dealt = e.take_damage(50.0, &mut out);
        assert!((dealt - 20.0).abs() < 1e-5);
        assert!((before - e.health - 20.0).abs() < 1e-5);
        assert!(matches!(
            out.events[0],
            GameEvent::Damaged { critical: true, .. }
        ));
    }

    #[test]
    fn test_phased_glitch_is_immune() {
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Glitch, 1, Vec2::ZERO, 0);
        e.phase_timer = 10;
        let mut out = Outbox::default();
        assert_eq!(e.take_damage(1000.0, &mut out), 0.0);
        assert_eq!(e.health, e.max_health);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_glitch_phases_in_and_jitters_off_path() {
        let path = Path::new(vec![Vec2::ZERO, Vec2::new(100_000.0, 0.0)]);
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Glitch, 1, Vec2::ZERO, 0);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut out = Outbox::default();

        let mut entries = 0;
        let mut left_path = false;
        for tick in 1..=5000 {
            let was_phased = e.is_phased();
            e.update(&path, tick, &mut rng, &mut out);
            if !was_phased && e.is_phased() {
                assert_eq!(e.phase_timer, GLITCH_DURATION);
                entries += 1;
            }
            // Only the jitter branch can move it off the straight line
            if e.pos.y != 0.0 {
                assert!(e.is_phased() || left_path);
                left_path = true;
            }
        }
        assert!(entries > 0);
        assert!(left_path);
        assert!(e.alive);
    }

    #[test]
    fn test_death_clamps_health_and_splits() {
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Splitter, 1, Vec2::new(5.0, 5.0), 2);
        let mut out = Outbox::default();
        e.take_damage(10_000.0, &mut out);
        assert!(!e.alive);
        assert_eq!(e.health, 0.0);
        assert_eq!(out.kills, vec![Kill { reward: 20 }]);
        assert_eq!(
            out.splits,
            vec![SplitRequest { count: 2, pos: Vec2::new(5.0, 5.0), path_index: 2 }]
        );
    }

    #[test]
    fn test_dead_enemy_takes_no_damage() {
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Fast, 1, Vec2::ZERO, 0);
        let mut out = Outbox::default();
        e.take_damage(100.0, &mut out);
        e.take_damage(100.0, &mut out);
        assert_eq!(out.kills.len(), 1);
    }

    #[test]
    fn test_healer_requests_pulse_on_interval() {
        let path = straight_path();
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Healer, 1, path.start(), 0);
        let mut out = Outbox::default();
        e.update(&path, HEAL_INTERVAL - 1, &mut rng(), &mut out);
        assert!(out.heals.is_empty());
        e.update(&path, HEAL_INTERVAL, &mut rng(), &mut out);
        assert_eq!(out.heals.len(), 1);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Tank, 1, Vec2::ZERO, 0);
        e.health = e.max_health - 3.0;
        e.heal(HEAL_AMOUNT);
        assert_eq!(e.health, e.max_health);
    }
}
