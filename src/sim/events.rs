//! Events emitted by the simulation, and the per-tick outbox entities write to
//!
//! Entity updates never reach back into the game state. Anything that has to
//! touch another collection (money, new enemies, heals) is recorded here and
//! applied by the tick loop once iteration is finished.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::economy::SessionResult;
use super::enemy::{EnemyId, EnemyKind};
use super::tower::{TowerId, TowerKind};
use crate::audio::{MusicMode, SoundEffect};

/// Notifications for render/audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted { wave: u32, roster: usize },
    WaveCleared { wave: u32, bonus: u32 },
    EnemySpawned { id: EnemyId, kind: EnemyKind },
    /// Damage number for the renderer
    Damaged { id: EnemyId, pos: Vec2, amount: f32, critical: bool },
    Killed { id: EnemyId, kind: EnemyKind, pos: Vec2, reward: u32 },
    Leaked { id: EnemyId, kind: EnemyKind, lives_lost: i32 },
    Healed { id: EnemyId, pos: Vec2 },
    /// Particle burst (color is 0xRRGGBB)
    Explosion { pos: Vec2, color: u32, count: u32 },
    /// Passive sparkle from a support tower
    AuraPulse { tower: TowerId, pos: Vec2 },
    TowerBuilt { id: TowerId, kind: TowerKind, col: i32, row: i32 },
    TowerUpgraded { id: TowerId, level: u32 },
    TowerSold { id: TowerId, refund: u32 },
    Sound { effect: SoundEffect },
    Music { mode: MusicMode },
    BossEngaged { kind: EnemyKind, health: f32, max_health: f32 },
    BossDefeated,
    PauseChanged { paused: bool },
    SessionEnded { result: SessionResult },
}

/// Reward owed for a kill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub reward: u32,
}

/// Children to spawn where a splitting enemy died
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRequest {
    pub count: u32,
    pub pos: Vec2,
    pub path_index: usize,
}

/// Area heal centred on a healer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealRequest {
    pub source: EnemyId,
    pub origin: Vec2,
}

/// Side effects collected during one tick
#[derive(Debug, Default)]
pub struct Outbox {
    pub events: Vec<GameEvent>,
    pub kills: Vec<Kill>,
    pub splits: Vec<SplitRequest>,
    pub heals: Vec<HealRequest>,
    pub lives_lost: i32,
    /// Effective damage dealt (after mitigation)
    pub damage_dealt: f32,
    /// Strongest screen shake requested this tick
    pub shake: Option<f32>,
}

impl Outbox {
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound { effect });
    }

    pub fn explosion(&mut self, pos: Vec2, color: u32, count: u32) {
        self.events.push(GameEvent::Explosion { pos, color, count });
    }

    pub fn shake(&mut self, amount: f32) {
        self.shake = Some(self.shake.map_or(amount, |s| s.max(amount)));
    }
}
