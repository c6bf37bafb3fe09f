//! Wave scheduler: roster composition and spawn cadence
//!
//! Lifecycle: `Idle { countdown } -> Spawning -> Draining -> Idle`, or
//! `Victory` once the last campaign wave is cleared.

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;

/// Delay before the first wave of a session
pub const FIRST_WAVE_DELAY: u32 = 60;
/// Rest between waves
pub const WAVE_DELAY: u32 = 120;
/// Ticks between releases
pub const SPAWN_INTERVAL: u32 = 40;
/// Longer gap after a boss-tier release
pub const BOSS_SPAWN_INTERVAL: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting to start the current wave
    Idle { countdown: u32 },
    /// Releasing the roster
    Spawning,
    /// Roster exhausted, waiting for the field to clear
    Draining,
    /// Final wave cleared
    Victory,
}

/// What the scheduler did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveStep {
    Started { wave: u32, roster: usize },
    Release(EnemyKind),
    Cleared { wave: u32, bonus: u32, victory: bool },
}

/// `5 + floor(wave * 1.5)`, or `* 2.0` in endless mode
pub fn roster_size(wave: u32, endless: bool) -> usize {
    let per_wave = if endless { 2.0 } else { 1.5 };
    5 + (wave as f64 * per_wave).floor() as usize
}

/// Money paid when `new_wave` is reached
#[inline]
pub fn wave_bonus(new_wave: u32) -> u32 {
    15 + 2 * new_wave
}

/// Pick the kind for one roster slot. The first matching rule wins.
pub fn roll_kind(wave: u32, last: bool, endless: bool, r: f64) -> EnemyKind {
    if last && wave % 10 == 0 {
        EnemyKind::Titan
    } else if last && wave % 5 == 0 {
        EnemyKind::Boss
    } else if endless && wave > 15 && last && wave % 7 == 0 {
        EnemyKind::Colossus
    } else if wave > 10 && r > 0.9 {
        EnemyKind::Reaper
    } else if wave > 6 && r > 0.8 {
        EnemyKind::Splitter
    } else if wave > 8 && r > 0.9 {
        EnemyKind::Glitch
    } else if wave > 4 && r > 0.75 {
        EnemyKind::Armored
    } else if wave > 2 && r > 0.6 {
        EnemyKind::Healer
    } else if wave > 3 && r > 0.4 {
        EnemyKind::Tank
    } else {
        EnemyKind::Fast
    }
}

/// Build the full roster for `wave`. One roll is drawn per slot.
pub fn compose_roster(wave: u32, endless: bool, rng: &mut Pcg32) -> VecDeque<EnemyKind> {
    let count = roster_size(wave, endless);
    (0..count)
        .map(|i| {
            let r: f64 = rng.random();
            roll_kind(wave, i + 1 == count, endless, r)
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveScheduler {
    /// Current wave number (1-based)
    pub wave: u32,
    /// Last campaign wave; `None` in endless mode
    pub max_wave: Option<u32>,
    pub phase: WavePhase,
    queue: VecDeque<EnemyKind>,
    spawn_timer: u32,
}

impl WaveScheduler {
    pub fn new(max_wave: Option<u32>) -> Self {
        Self {
            wave: 1,
            max_wave,
            phase: WavePhase::Idle {
                countdown: FIRST_WAVE_DELAY,
            },
            queue: VecDeque::new(),
            spawn_timer: 0,
        }
    }

    #[inline]
    pub fn is_endless(&self) -> bool {
        self.max_wave.is_none()
    }

    /// Enemies still waiting to be released
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Advance one tick. `field_clear` is true when no enemy is alive.
    pub fn step(&mut self, field_clear: bool, rng: &mut Pcg32) -> Option<WaveStep> {
        match self.phase {
            WavePhase::Idle { countdown } => {
                if countdown > 1 {
                    self.phase = WavePhase::Idle {
                        countdown: countdown - 1,
                    };
                    return None;
                }
                self.queue = compose_roster(self.wave, self.is_endless(), rng);
                self.spawn_timer = 0;
                self.phase = WavePhase::Spawning;
                let roster = self.queue.len();
                log::info!("Wave {} started ({} enemies)", self.wave, roster);
                Some(WaveStep::Started {
                    wave: self.wave,
                    roster,
                })
            }
            WavePhase::Spawning => {
                self.spawn_timer = self.spawn_timer.saturating_sub(1);
                if self.spawn_timer > 0 {
                    return None;
                }
                let kind = self.queue.pop_front()?;
                self.spawn_timer = if kind.is_boss_tier() {
                    BOSS_SPAWN_INTERVAL
                } else {
                    SPAWN_INTERVAL
                };
                if self.queue.is_empty() {
                    self.phase = WavePhase::Draining;
                }
                Some(WaveStep::Release(kind))
            }
            WavePhase::Draining => {
                if !field_clear {
                    return None;
                }
                let cleared = self.wave;
                self.wave += 1;
                let bonus = wave_bonus(self.wave);
                let victory = self.max_wave.is_some_and(|max| self.wave > max);
                self.phase = if victory {
                    WavePhase::Victory
                } else {
                    WavePhase::Idle {
                        countdown: WAVE_DELAY,
                    }
                };
                log::info!("Wave {} cleared, bonus {}", cleared, bonus);
                Some(WaveStep::Cleared {
                    wave: cleared,
                    bonus,
                    victory,
                })
            }
            WavePhase::Victory => None,
        }
    }
}
