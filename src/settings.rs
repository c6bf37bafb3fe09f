//! Session configuration and host display preferences

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::levels::{
    self, BASE_LIVES, ENDLESS_BASE_LIVES, ENDLESS_LEVEL_ID, ENDLESS_STARTING_MONEY, MapKind,
};

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown level id {0}")]
    UnknownLevel(u32),
    #[error("level {0} is still locked")]
    LevelLocked(u32),
    #[error("cannot read session config: {0}")]
    Io(#[from] std::io::Error),
}

/// Host-side preferences that affect presentation only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Screen shake on explosions/leaks
    pub screen_shake: bool,
    /// Duck music while the pause menu is open
    pub duck_on_pause: bool,
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            duck_on_pause: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Scale a raw shake magnitude by the preferences
    pub fn shake_amount(&self, raw: f32) -> f32 {
        if self.effective_screen_shake() { raw } else { 0.0 }
    }
}

/// Everything needed to start (or restart) a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Campaign level id, or 999 for endless
    pub level_id: u32,
    pub seed: u64,
    /// Unlocked archetype tiers (tier 0 is always available)
    pub unlocked_tiers: Vec<u8>,
    /// Extra lives from progression upgrades
    pub bonus_lives: i32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            level_id: 1,
            seed: 0,
            unlocked_tiers: vec![0],
            bonus_lives: 0,
        }
    }
}

/// Level parameters resolved from a config
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelSetup {
    pub name: &'static str,
    /// Mission briefing line
    pub briefing: &'static str,
    pub map: MapKind,
    pub starting_money: u32,
    pub starting_lives: i32,
    /// `None` in endless mode
    pub max_wave: Option<u32>,
    /// Music track for normal play
    pub music_level: u32,
}

impl SessionConfig {
    pub fn campaign(level_id: u32, seed: u64) -> Self {
        Self {
            level_id,
            seed,
            ..Self::default()
        }
    }

    pub fn endless(seed: u64) -> Self {
        Self::campaign(ENDLESS_LEVEL_ID, seed)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.resolve()?;
        Ok(config)
    }

    #[inline]
    pub fn is_endless(&self) -> bool {
        self.level_id == ENDLESS_LEVEL_ID
    }

    pub fn is_unlocked(&self, tier: u8) -> bool {
        tier == 0 || self.unlocked_tiers.contains(&tier)
    }

    /// Look up map, money, lives and wave count for this config
    pub fn resolve(&self) -> Result<LevelSetup, ConfigError> {
        if self.is_endless() {
            return Ok(LevelSetup {
                name: "ENDLESS",
                briefing: "Hold the loop for as long as you can.",
                map: MapKind::Loop,
                starting_money: ENDLESS_STARTING_MONEY,
                starting_lives: ENDLESS_BASE_LIVES + self.bonus_lives,
                max_wave: None,
                music_level: 1,
            });
        }
        let def = levels::level(self.level_id).ok_or(ConfigError::UnknownLevel(self.level_id))?;
        Ok(LevelSetup {
            name: def.name,
            briefing: def.desc,
            map: def.map,
            starting_money: def.starting_money,
            starting_lives: BASE_LIVES + self.bonus_lives,
            max_wave: Some(def.waves),
            music_level: def.id,
        })
    }
}
