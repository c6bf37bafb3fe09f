//! Cross-session progression: coins, base upgrades and level unlocks
//!
//! Pure bookkeeping. The host decides where (and whether) a [`Progress`] is
//! stored; it serializes with serde like any other record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{ConfigError, SessionConfig};
use crate::sim::SessionResult;
use crate::sim::levels::{ENDLESS_LEVEL_ID, LEVELS, level};

/// What installing a base upgrade grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeEffect {
    /// Unlocks every archetype of this tier
    UnlockTier(u8),
    /// Extra starting lives in every session
    BonusLives(i32),
}

/// One step of the base upgrade ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseUpgrade {
    /// Base level reached once installed (1-based)
    pub id: u32,
    pub name: &'static str,
    /// Base title shown after installing
    pub title: &'static str,
    pub cost: u32,
    pub effect: UpgradeEffect,
}

pub const BASE_UPGRADES: [BaseUpgrade; 4] = [
    BaseUpgrade { id: 1, name: "Munitions Depot", title: "OUTPOST", cost: 500, effect: UpgradeEffect::UnlockTier(1) },
    BaseUpgrade { id: 2, name: "Energy Lab", title: "FORTRESS", cost: 1200, effect: UpgradeEffect::UnlockTier(2) },
    BaseUpgrade { id: 3, name: "Orbital Link", title: "CITADEL", cost: 3000, effect: UpgradeEffect::UnlockTier(3) },
    BaseUpgrade { id: 4, name: "Quantum Shield", title: "COMMAND CENTER", cost: 5000, effect: UpgradeEffect::BonusLives(20) },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("base is fully upgraded")]
    FullyUpgraded,
    #[error("{name} costs {cost} coins, have {coins}")]
    InsufficientCoins {
        name: &'static str,
        cost: u32,
        coins: u32,
    },
}

/// Player progress carried between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub coins: u32,
    /// Number of base upgrades installed
    pub base_level: u32,
    /// Highest campaign level that may be started
    pub unlocked_level: u32,
    pub unlocked_tiers: Vec<u8>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            coins: 0,
            base_level: 0,
            unlocked_level: 1,
            unlocked_tiers: vec![0],
        }
    }
}

impl Progress {
    /// The upgrade that can be bought next, if any
    pub fn next_upgrade(&self) -> Option<&'static BaseUpgrade> {
        BASE_UPGRADES.iter().find(|u| u.id == self.base_level + 1)
    }

    pub fn installed(&self) -> impl Iterator<Item = &'static BaseUpgrade> + '_ {
        BASE_UPGRADES.iter().filter(|u| u.id <= self.base_level)
    }

    /// Base title for the current level
    pub fn title(&self) -> &'static str {
        self.installed().last().map_or("RUINS", |u| u.title)
    }

    /// Buy the next upgrade in the ladder
    pub fn buy_upgrade(&mut self) -> Result<&'static BaseUpgrade, ProgressError> {
        let upgrade = self.next_upgrade().ok_or(ProgressError::FullyUpgraded)?;
        let coins = self
            .coins
            .checked_sub(upgrade.cost)
            .ok_or(ProgressError::InsufficientCoins {
                name: upgrade.name,
                cost: upgrade.cost,
                coins: self.coins,
            })?;
        self.coins = coins;
        self.base_level = upgrade.id;
        if let UpgradeEffect::UnlockTier(tier) = upgrade.effect {
            if !self.unlocked_tiers.contains(&tier) {
                self.unlocked_tiers.push(tier);
            }
        }
        log::info!("Installed {} ({} coins left)", upgrade.name, self.coins);
        Ok(upgrade)
    }

    pub fn bonus_lives(&self) -> i32 {
        self.installed()
            .map(|u| match u.effect {
                UpgradeEffect::BonusLives(n) => n,
                UpgradeEffect::UnlockTier(_) => 0,
            })
            .sum()
    }

    /// Campaign levels up to `unlocked_level` are playable; endless always is
    pub fn is_level_unlocked(&self, level_id: u32) -> bool {
        level_id == ENDLESS_LEVEL_ID || (level(level_id).is_some() && level_id <= self.unlocked_level)
    }

    /// Bank a finished session. Beating the newest unlocked level opens the next.
    pub fn apply_result(&mut self, result: &SessionResult) {
        self.coins = self.coins.saturating_add(result.coins_earned);
        let last = LEVELS.len() as u32;
        if result.victory && result.level == self.unlocked_level && self.unlocked_level < last {
            self.unlocked_level += 1;
            log::info!("Level {} unlocked", self.unlocked_level);
        }
    }

    /// Session config for `level_id` carrying this progress
    pub fn session_config(&self, level_id: u32, seed: u64) -> Result<SessionConfig, ConfigError> {
        let config = SessionConfig {
            level_id,
            seed,
            unlocked_tiers: self.unlocked_tiers.clone(),
            bonus_lives: self.bonus_lives(),
        };
        config.resolve()?;
        if !self.is_level_unlocked(level_id) {
            return Err(ConfigError::LevelLocked(level_id));
        }
        Ok(config)
    }
}
