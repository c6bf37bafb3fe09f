//! Render snapshot: everything a renderer needs for one frame
//!
//! Plain data only, built after the frame's ticks have run.

use glam::Vec2;
use serde::Serialize;

use super::combat::{ORBIT_DISTANCE, orb_count};
use super::enemy::{EnemyId, EnemyKind};
use super::geom::orbit_point;
use super::projectile::{Effect, ProjectileKind};
use super::query::Hud;
use super::state::GameState;
use super::tower::{TowerId, TowerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Health fraction in [0, 1]
    pub health: f32,
    pub frozen: bool,
    pub phased: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerView {
    pub id: TowerId,
    pub kind: TowerKind,
    pub pos: Vec2,
    pub angle: f32,
    pub level: u32,
    pub buffed: bool,
    /// Beam endpoint while a beam tower is locked on
    pub beam_to: Option<Vec2>,
    pub beam_charge: f32,
    /// Orb positions for orbiting towers
    pub orbs: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossBar {
    pub kind: EnemyKind,
    /// Health fraction in [0, 1]
    pub fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub path: Vec<Vec2>,
    pub enemies: Vec<EnemyView>,
    pub towers: Vec<TowerView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<Effect>,
    /// Raw shake magnitude; the host applies display preferences
    pub shake: f32,
    pub boss: Option<BossBar>,
    pub hud: Hud,
    pub selected_tower: Option<TowerId>,
    pub selected_build: Option<TowerKind>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let enemies = self
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| EnemyView {
                id: e.id,
                kind: e.kind,
                pos: e.pos,
                radius: e.radius,
                health: health_fraction(e.health, e.max_health),
                frozen: e.frozen > 0,
                phased: e.is_phased(),
            })
            .collect();

        let towers = self
            .towers
            .iter()
            .map(|t| {
                let beam_to = match t.kind {
                    TowerKind::Tesla | TowerKind::Prism => t
                        .target
                        .and_then(|id| self.enemies.iter().find(|e| e.id == id && e.alive))
                        .map(|e| e.pos),
                    _ => None,
                };
                let orbs = if t.kind == TowerKind::Orbital {
                    let n = orb_count(t.level);
                    (0..n)
                        .map(|i| {
                            let a = t.orbit_angle + i as f32 * std::f32::consts::TAU / n as f32;
                            orbit_point(t.pos, a, ORBIT_DISTANCE)
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                TowerView {
                    id: t.id,
                    kind: t.kind,
                    pos: t.pos,
                    angle: t.angle,
                    level: t.level,
                    buffed: t.buffed,
                    beam_to,
                    beam_charge: t.beam_charge,
                    orbs,
                }
            })
            .collect();

        let projectiles = self
            .projectiles
            .iter()
            .map(|p| ProjectileView {
                kind: p.kind,
                pos: p.pos,
            })
            .collect();

        let boss = self.current_boss().map(|b| BossBar {
            kind: b.kind,
            fraction: health_fraction(b.health, b.max_health),
        });

        Snapshot {
            tick: self.tick,
            path: self.path.waypoints().to_vec(),
            enemies,
            towers,
            projectiles,
            effects: self.effects.clone(),
            shake: self.shake,
            boss,
            hud: self.hud(),
            selected_tower: self.selected_tower,
            selected_build: self.selected_build,
        }
    }
}

fn health_fraction(health: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (health / max).clamp(0.0, 1.0)
    }
}
