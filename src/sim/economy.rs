//! Money, lives, combo and end-of-session accounting

use serde::{Deserialize, Serialize};

/// Ticks a combo survives without a kill
pub const COMBO_WINDOW: u32 = 120;
/// Progression coins per wave reached
pub const COINS_PER_WAVE: u32 = 100;
pub const VICTORY_COINS: u32 = 2000;

/// Running totals shown on the end screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub kills: u32,
    /// Effective damage dealt
    pub damage: f64,
    /// Money gained from kills and wave bonuses
    pub earnings: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    pub money: u32,
    pub lives: i32,
    pub stats: SessionStats,
    pub combo: u32,
    pub combo_timer: u32,
}

impl Economy {
    pub fn new(money: u32, lives: i32) -> Self {
        Self {
            money,
            lives,
            stats: SessionStats::default(),
            combo: 0,
            combo_timer: 0,
        }
    }

    #[inline]
    pub fn can_afford(&self, amount: u32) -> bool {
        self.money >= amount
    }

    /// Deduct `amount`, refusing on insufficient funds
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.money.checked_sub(amount) {
            Some(left) => {
                self.money = left;
                true
            }
            None => false,
        }
    }

    /// Income that counts toward earnings (rewards, bonuses)
    pub fn earn(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
        self.stats.earnings = self.stats.earnings.saturating_add(amount);
    }

    /// Sell refunds return money without counting as earnings
    pub fn refund(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn register_kill(&mut self, reward: u32) {
        self.stats.kills += 1;
        self.combo += 1;
        self.combo_timer = COMBO_WINDOW;
        self.earn(reward);
    }

    pub fn record_damage(&mut self, amount: f32) {
        self.stats.damage += amount as f64;
    }

    pub fn lose_lives(&mut self, amount: i32) {
        self.lives -= amount;
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.lives <= 0
    }

    /// Count down the combo window; the combo drops to zero when it runs out
    pub fn decay_combo(&mut self) {
        if self.combo == 0 {
            return;
        }
        self.combo_timer = self.combo_timer.saturating_sub(1);
        if self.combo_timer == 0 {
            self.combo = 0;
        }
    }

    pub fn result(&self, level: u32, wave: u32, victory: bool) -> SessionResult {
        SessionResult {
            level,
            victory,
            waves_survived: wave,
            coins_earned: coins_earned(wave, victory),
            kills: self.stats.kills,
            damage: self.stats.damage.floor() as u64,
            earnings: self.stats.earnings,
            lives_remaining: self.lives,
        }
    }
}

/// Progression coins: `wave * 100`, plus a flat bonus for a win
pub fn coins_earned(wave: u32, victory: bool) -> u32 {
    let base = wave * COINS_PER_WAVE;
    if victory { base + VICTORY_COINS } else { base }
}

/// Outcome of a finished session, handed to the result sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub level: u32,
    pub victory: bool,
    pub waves_survived: u32,
    pub coins_earned: u32,
    pub kills: u32,
    pub damage: u64,
    pub earnings: u32,
    pub lives_remaining: i32,
}
