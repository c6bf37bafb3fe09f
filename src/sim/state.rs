//! Game state and session lifecycle
//!
//! `GameState` is the single owner of everything a session mutates. There are
//! no globals: commands, queries and the tick loop all take it explicitly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::economy::Economy;
use super::enemy::{Enemy, EnemyId, EnemyKind};
use super::events::GameEvent;
use super::levels::Path;
use super::projectile::{Effect, Projectile};
use super::tower::{Tower, TowerId, TowerKind};
use super::waves::WaveScheduler;
use crate::audio::MusicMode;
use crate::settings::{ConfigError, LevelSetup, SessionConfig};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Ticks are frozen
    Paused,
    /// Final wave cleared
    Victory,
    /// Out of lives
    Defeat,
}

impl GamePhase {
    #[inline]
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub config: SessionConfig,
    pub setup: LevelSetup,
    pub path: Path,

    pub towers: Vec<Tower>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,

    pub economy: Economy,
    pub scheduler: WaveScheduler,
    pub phase: GamePhase,

    /// Logical ticks since session start
    pub tick: u64,
    /// Ticks per frame (1 or 2)
    pub speed: u32,
    /// Screen shake magnitude (decays)
    pub shake: f32,
    /// A boss-tier enemy was on the field after the last tick
    pub boss_active: bool,

    pub selected_build: Option<TowerKind>,
    pub selected_tower: Option<TowerId>,

    /// Next entity id (shared by towers, enemies, projectiles)
    pub next_id: u32,

    #[serde(skip)]
    pub(crate) rng: Pcg32,
    /// Events waiting for the next drain
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Start a session; fails if the config names an unknown level
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let setup = config.resolve()?;
        Ok(Self::with_setup(config, setup))
    }

    fn with_setup(config: SessionConfig, setup: LevelSetup) -> Self {
        log::info!(
            "Session start: {} (level {}) seed {} ({} money, {} lives)",
            setup.name,
            config.level_id,
            config.seed,
            setup.starting_money,
            setup.starting_lives
        );
        log::debug!("Briefing: {}", setup.briefing);
        let mut state = Self {
            rng: Pcg32::seed_from_u64(config.seed),
            path: Path::for_map(setup.map),
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            economy: Economy::new(setup.starting_money, setup.starting_lives),
            scheduler: WaveScheduler::new(setup.max_wave),
            phase: GamePhase::Playing,
            tick: 0,
            speed: 1,
            shake: 0.0,
            boss_active: false,
            selected_build: None,
            selected_tower: None,
            next_id: 1,
            events: Vec::new(),
            config,
            setup,
        };
        let mode = state.level_music();
        state.emit(GameEvent::Music { mode });
        state
    }

    /// Rebuild the session from its config. Pending events are kept.
    pub(crate) fn reset(&mut self) {
        let events = std::mem::take(&mut self.events);
        *self = Self::with_setup(self.config.clone(), self.setup);
        self.events.splice(0..0, events);
    }

    pub fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn wave(&self) -> u32 {
        self.scheduler.wave
    }

    pub fn level_music(&self) -> MusicMode {
        MusicMode::Level(self.setup.music_level)
    }

    /// Put a new enemy on the field
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2, path_index: usize) -> EnemyId {
        let id = EnemyId(self.alloc_id());
        let enemy = Enemy::new(id, kind, self.scheduler.wave, pos, path_index);
        self.enemies.push(enemy);
        self.emit(GameEvent::EnemySpawned { id, kind });
        id
    }

    /// First living boss-tier enemy in field order
    pub fn current_boss(&self) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| e.alive && e.kind.is_boss_tier())
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn tower_at(&self, col: i32, row: i32) -> Option<&Tower> {
        self.towers.iter().find(|t| t.col == col && t.row == row)
    }
}
