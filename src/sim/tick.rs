//! Fixed timestep simulation tick
//!
//! Order within a tick is fixed: counters and decays, wave scheduler, towers,
//! enemies, projectiles, effects, deferred heals and splits, pruning, economy,
//! defeat check, boss edge detection.

use super::combat::{Battlefield, update_tower};
use super::enemy::{EnemyKind, HEAL_AMOUNT, HEAL_RADIUS};
use super::events::{GameEvent, HealRequest, Outbox, SplitRequest};
use super::state::{GamePhase, GameState};
use super::waves::WaveStep;
use crate::audio::MusicMode;

/// Screen shake multiplier per tick
pub const SHAKE_DECAY: f32 = 0.9;
/// Shake below this snaps to zero
const SHAKE_EPSILON: f32 = 0.01;

/// Advance the game state by one logical tick. No-op unless playing.
pub fn tick(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.tick += 1;
    state.economy.decay_combo();
    state.shake *= SHAKE_DECAY;
    if state.shake < SHAKE_EPSILON {
        state.shake = 0.0;
    }

    if step_waves(state) {
        return;
    }

    let mut out = Outbox::default();
    update_entities(state, &mut out);

    apply_heals(state, &out.heals, &mut out.events);
    apply_splits(state, &out.splits);

    // Stable filters keep spawn order, which targeting ties depend on
    state.enemies.retain(|e| e.alive);
    state.projectiles.retain(|p| p.alive);
    state.effects.retain(|e| !e.is_expired());

    for kill in &out.kills {
        state.economy.register_kill(kill.reward);
    }
    state.economy.record_damage(out.damage_dealt);
    if out.lives_lost > 0 {
        state.economy.lose_lives(out.lives_lost);
    }
    if let Some(shake) = out.shake {
        state.shake = shake;
    }
    state.events.append(&mut out.events);

    if state.economy.is_defeated() {
        end_session(state, false);
        return;
    }

    detect_boss_edge(state);
}

/// Run one host frame: `speed` ticks, then hand back the events produced
pub fn frame(state: &mut GameState) -> Vec<GameEvent> {
    for _ in 0..state.speed {
        tick(state);
        if state.phase != GamePhase::Playing {
            break;
        }
    }
    state.drain_events()
}

impl GameState {
    /// See [`tick`]
    pub fn tick(&mut self) {
        tick(self);
    }

    /// See [`frame`]
    pub fn frame(&mut self) -> Vec<GameEvent> {
        frame(self)
    }
}

/// Returns true when the session ended this tick
fn step_waves(state: &mut GameState) -> bool {
    let field_clear = state.enemies.is_empty();
    match state.scheduler.step(field_clear, &mut state.rng) {
        Some(WaveStep::Started { wave, roster }) => {
            state.emit(GameEvent::WaveStarted { wave, roster });
        }
        Some(WaveStep::Release(kind)) => {
            let start = state.path.start();
            state.spawn_enemy(kind, start, 0);
        }
        Some(WaveStep::Cleared {
            wave,
            bonus,
            victory,
        }) => {
            state.economy.earn(bonus);
            state.emit(GameEvent::WaveCleared { wave, bonus });
            if victory {
                end_session(state, true);
                return true;
            }
        }
        None => {}
    }
    false
}

fn update_entities(state: &mut GameState, out: &mut Outbox) {
    {
        let mut field = Battlefield {
            enemies: &mut state.enemies,
            projectiles: &mut state.projectiles,
            effects: &mut state.effects,
            next_id: &mut state.next_id,
            tick: state.tick,
            out: &mut *out,
        };
        for tower in state.towers.iter_mut() {
            update_tower(tower, &mut field);
        }
    }

    for enemy in state.enemies.iter_mut() {
        enemy.update(&state.path, state.tick, &mut state.rng, out);
    }

    for projectile in state.projectiles.iter_mut() {
        projectile.update(&mut state.enemies, out);
    }

    for effect in state.effects.iter_mut() {
        effect.update();
    }
}

fn apply_heals(state: &mut GameState, heals: &[HealRequest], events: &mut Vec<GameEvent>) {
    for heal in heals {
        for enemy in state.enemies.iter_mut() {
            if enemy.id != heal.source && enemy.alive && enemy.pos.distance(heal.origin) < HEAL_RADIUS
            {
                enemy.heal(HEAL_AMOUNT);
                events.push(GameEvent::Healed {
                    id: enemy.id,
                    pos: enemy.pos,
                });
            }
        }
    }
}

fn apply_splits(state: &mut GameState, splits: &[SplitRequest]) {
    for split in splits {
        for _ in 0..split.count {
            state.spawn_enemy(EnemyKind::Fast, split.pos, split.path_index);
        }
    }
}

fn end_session(state: &mut GameState, victory: bool) {
    state.phase = if victory {
        GamePhase::Victory
    } else {
        GamePhase::Defeat
    };
    let result = state
        .economy
        .result(state.config.level_id, state.scheduler.wave, victory);
    log::info!(
        "Session over ({}): wave {}, {} kills, {} coins",
        if victory { "victory" } else { "defeat" },
        result.waves_survived,
        result.kills,
        result.coins_earned
    );
    state.emit(GameEvent::Music {
        mode: MusicMode::Off,
    });
    state.emit(GameEvent::SessionEnded { result });
}

/// Emit exactly one event per boss presence transition
fn detect_boss_edge(state: &mut GameState) {
    let boss = state
        .current_boss()
        .map(|b| (b.kind, b.health, b.max_health));
    match (boss, state.boss_active) {
        (Some((kind, health, max_health)), false) => {
            state.boss_active = true;
            log::info!("Boss engaged: {}", kind.name());
            state.emit(GameEvent::BossEngaged {
                kind,
                health,
                max_health,
            });
            state.emit(GameEvent::Music {
                mode: MusicMode::Boss,
            });
        }
        (None, true) => {
            state.boss_active = false;
            state.emit(GameEvent::BossDefeated);
            let mode = state.level_music();
            state.emit(GameEvent::Music { mode });
        }
        _ => {}
    }
}
