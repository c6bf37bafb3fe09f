//! Player commands
//!
//! Each command either fully applies or leaves the state untouched. Refusals
//! are reported through the return value and a debug log line.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{GamePhase, GameState};
use super::tower::{Tower, TowerId, TowerKind, apply_aura};
use crate::audio::SoundEffect;
use crate::cell_center;
use crate::consts::{GRID_COLS, GRID_ROWS, HUD_BOTTOM_ROWS, HUD_TOP_ROWS, PATH_CLEARANCE};

const BUILD_FLASH: u32 = 0xffffff;

/// Commands a host can queue between frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    Build { col: i32, row: i32, kind: TowerKind },
    Upgrade { id: TowerId },
    Sell { id: TowerId },
    SelectBuildType { kind: TowerKind },
    SelectTower { id: TowerId },
    Deselect,
    SetSpeed { speed: u32 },
    TogglePause,
    Restart,
}

/// Why a build was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildRefusal {
    SessionOver,
    Paused,
    Locked,
    InsufficientFunds,
    OutOfBounds,
    HudBand,
    Occupied,
    OnPath,
}

impl GameState {
    /// Apply a queued command
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Build { col, row, kind } => self.build_tower(col, row, kind).is_some(),
            Command::Upgrade { id } => self.upgrade_tower(id),
            Command::Sell { id } => self.sell_tower(id),
            Command::SelectBuildType { kind } => self.select_build_type(kind),
            Command::SelectTower { id } => self.select_tower(id),
            Command::Deselect => self.deselect(),
            Command::SetSpeed { speed } => self.set_speed(speed),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
        }
    }

    /// Whether `kind` can be placed at (`col`, `row`) right now
    pub fn check_build(&self, col: i32, row: i32, kind: TowerKind) -> Result<(), BuildRefusal> {
        match self.phase {
            GamePhase::Victory | GamePhase::Defeat => return Err(BuildRefusal::SessionOver),
            GamePhase::Paused => return Err(BuildRefusal::Paused),
            GamePhase::Playing => {}
        }
        let stats = kind.stats();
        if !self.config.is_unlocked(stats.unlock_tier) {
            return Err(BuildRefusal::Locked);
        }
        if !self.economy.can_afford(stats.cost) {
            return Err(BuildRefusal::InsufficientFunds);
        }
        self.check_placement(col, row)
    }

    /// Grid legality only: bounds, HUD bands, occupancy, path clearance
    pub fn check_placement(&self, col: i32, row: i32) -> Result<(), BuildRefusal> {
        if !(0..GRID_COLS).contains(&col) || !(0..GRID_ROWS).contains(&row) {
            return Err(BuildRefusal::OutOfBounds);
        }
        if row < HUD_TOP_ROWS || row >= GRID_ROWS - HUD_BOTTOM_ROWS {
            return Err(BuildRefusal::HudBand);
        }
        if self.tower_at(col, row).is_some() {
            return Err(BuildRefusal::Occupied);
        }
        let p = cell_center(col, row);
        for (a, b) in self.path.segments() {
            let min = a.min(b) - PATH_CLEARANCE;
            let max = a.max(b) + PATH_CLEARANCE;
            if p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y {
                return Err(BuildRefusal::OnPath);
            }
        }
        Ok(())
    }

    pub fn build_tower(&mut self, col: i32, row: i32, kind: TowerKind) -> Option<TowerId> {
        if let Err(reason) = self.check_build(col, row, kind) {
            log::debug!("build {:?} at ({}, {}) refused: {:?}", kind, col, row, reason);
            return None;
        }
        if !self.economy.spend(kind.stats().cost) {
            return None;
        }

        let id = TowerId(self.alloc_id());
        let mut tower = Tower::new(id, kind, col, row);
        if kind.is_support() {
            let buffed = apply_aura(&tower, &mut self.towers);
            log::debug!("support tower {:?} buffed {} neighbours", id, buffed);
        } else {
            tower.buffed = self.towers.iter().any(|s| s.aura_reaches(tower.pos));
        }
        let pos = tower.pos;
        self.towers.push(tower);

        self.emit(GameEvent::TowerBuilt { id, kind, col, row });
        self.emit(GameEvent::Sound {
            effect: SoundEffect::Build,
        });
        self.emit(GameEvent::Explosion {
            pos,
            color: BUILD_FLASH,
            count: 10,
        });

        if self.selected_build == Some(kind) && !self.economy.can_afford(kind.stats().cost) {
            self.selected_build = None;
        }
        Some(id)
    }

    pub fn upgrade_tower(&mut self, id: TowerId) -> bool {
        if self.phase.is_over() {
            return false;
        }
        let Some(idx) = self.towers.iter().position(|t| t.id == id) else {
            log::debug!("upgrade refused: no tower {:?}", id);
            return false;
        };
        let cost = self.towers[idx].upgrade_cost();
        if !self.economy.spend(cost) {
            log::debug!("upgrade of {:?} refused: need {}", id, cost);
            return false;
        }

        let tower = &mut self.towers[idx];
        tower.apply_upgrade(cost);
        let (level, pos, color) = (tower.level, tower.pos, tower.kind.stats().color);
        if tower.kind.is_support() {
            let support = tower.clone();
            apply_aura(&support, &mut self.towers);
        }

        self.emit(GameEvent::TowerUpgraded { id, level });
        self.emit(GameEvent::Sound {
            effect: SoundEffect::Build,
        });
        self.emit(GameEvent::Explosion {
            pos,
            color,
            count: 10,
        });
        true
    }

    /// Remove a tower and refund its sell value. Buffs it granted persist.
    pub fn sell_tower(&mut self, id: TowerId) -> bool {
        if self.phase.is_over() {
            return false;
        }
        let Some(idx) = self.towers.iter().position(|t| t.id == id) else {
            log::debug!("sell refused: no tower {:?}", id);
            return false;
        };
        let tower = self.towers.remove(idx);
        self.economy.refund(tower.sell_value);
        if self.selected_tower == Some(id) {
            self.selected_tower = None;
        }
        self.emit(GameEvent::TowerSold {
            id,
            refund: tower.sell_value,
        });
        self.emit(GameEvent::Sound {
            effect: SoundEffect::Build,
        });
        true
    }

    /// Arm the build cursor; needs the archetype unlocked and affordable
    pub fn select_build_type(&mut self, kind: TowerKind) -> bool {
        let stats = kind.stats();
        if !self.config.is_unlocked(stats.unlock_tier) {
            log::debug!("{} is locked", stats.name);
            return false;
        }
        if !self.economy.can_afford(stats.cost) {
            log::debug!("{} is unaffordable", stats.name);
            return false;
        }
        self.selected_build = Some(kind);
        self.selected_tower = None;
        true
    }

    pub fn select_tower(&mut self, id: TowerId) -> bool {
        if self.tower(id).is_none() {
            return false;
        }
        self.selected_tower = Some(id);
        self.selected_build = None;
        true
    }

    /// Clear both selections; false if nothing was selected
    pub fn deselect(&mut self) -> bool {
        let had = self.selected_build.is_some() || self.selected_tower.is_some();
        self.selected_build = None;
        self.selected_tower = None;
        had
    }

    pub fn set_speed(&mut self, speed: u32) -> bool {
        if !matches!(speed, 1 | 2) {
            log::debug!("speed {} refused", speed);
            return false;
        }
        self.speed = speed;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = match self.phase {
            GamePhase::Playing => true,
            GamePhase::Paused => false,
            GamePhase::Victory | GamePhase::Defeat => return false,
        };
        self.phase = if paused {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        };
        self.emit(GameEvent::PauseChanged { paused });
        true
    }

    /// Start the same level over with the same seed
    pub fn restart(&mut self) -> bool {
        self.reset();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SessionConfig;

    fn state() -> GameState {
        let mut state = GameState::new(SessionConfig::campaign(1, 3)).unwrap();
        state.drain_events();
        state
    }

    #[test]
    fn test_build_spends_and_places() {
        let mut state = state();
        let id = state.build_tower(10, 8, TowerKind::Blaster).unwrap();
        assert_eq!(state.economy.money, 200);
        assert_eq!(state.tower(id).map(|t| (t.col, t.row)), Some((10, 8)));
        assert!(state
            .drain_events()
            .contains(&GameEvent::TowerBuilt { id, kind: TowerKind::Blaster, col: 10, row: 8 }));
    }

    #[test]
    fn test_placement_rules() {
        let state = state();
        assert_eq!(state.check_placement(-1, 5), Err(BuildRefusal::OutOfBounds));
        assert_eq!(state.check_placement(32, 5), Err(BuildRefusal::OutOfBounds));
        assert_eq!(state.check_placement(10, 1), Err(BuildRefusal::HudBand));
        assert_eq!(state.check_placement(10, 15), Err(BuildRefusal::HudBand));
        // Row 4 center y=180 sits inside the y=200 corridor
        assert_eq!(state.check_placement(3, 4), Err(BuildRefusal::OnPath));
        assert_eq!(state.check_placement(3, 8), Ok(()));
    }

    #[test]
    fn test_clearance_box_corners() {
        // Simple map: the corner at (300, 200) expands to x < 330, y > 170
        let state = state();
        assert_eq!(state.check_placement(8, 4), Ok(()));
        assert_eq!(state.check_placement(7, 5), Err(BuildRefusal::OnPath));
        assert_eq!(state.check_placement(7, 3), Ok(()));
    }

    #[test]
    fn test_locked_and_unaffordable_refused() {
        let mut state = state();
        assert_eq!(state.check_build(10, 8, TowerKind::Missile), Err(BuildRefusal::Locked));
        assert!(!state.select_build_type(TowerKind::Missile));
        state.economy.money = 10;
        assert!(state.build_tower(10, 8, TowerKind::Blaster).is_none());
        assert!(!state.select_build_type(TowerKind::Blaster));
        assert!(state.towers.is_empty());
    }

    #[test]
    fn test_selection_clears_when_next_unaffordable() {
        let mut state = state();
        state.economy.money = 120;
        assert!(state.select_build_type(TowerKind::Blaster));
        state.build_tower(10, 8, TowerKind::Blaster);
        assert_eq!(state.selected_build, Some(TowerKind::Blaster));
        state.build_tower(11, 8, TowerKind::Blaster);
        assert_eq!(state.selected_build, None);
    }

    #[test]
    fn test_upgrade_and_sell() {
        let mut state = state();
        let id = state.build_tower(10, 8, TowerKind::Blaster).unwrap();
        assert!(state.upgrade_tower(id));
        assert_eq!(state.economy.money, 165);
        assert_eq!(state.tower(id).map(|t| t.level), Some(2));

        assert!(state.select_tower(id));
        assert!(state.sell_tower(id));
        assert_eq!(state.economy.money, 165 + 42);
        assert_eq!(state.selected_tower, None);
        assert!(!state.sell_tower(id));
    }

    #[test]
    fn test_support_buffs_both_ways() {
        let mut state = state();
        state.config.unlocked_tiers = vec![0, 2];
        state.economy.money = 10_000;
        let early = state.build_tower(10, 8, TowerKind::Blaster).unwrap();
        state.build_tower(11, 8, TowerKind::Buffer).unwrap();
        let late = state.build_tower(12, 8, TowerKind::Sniper).unwrap();
        let far = state.build_tower(25, 8, TowerKind::Blaster).unwrap();

        assert_eq!(state.tower(early).map(|t| t.buffed), Some(true));
        assert_eq!(state.tower(late).map(|t| t.buffed), Some(true));
        assert_eq!(state.tower(far).map(|t| t.buffed), Some(false));
    }

    #[test]
    fn test_pause_speed_and_selection() {
        let mut state = state();
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.check_build(10, 8, TowerKind::Blaster), Err(BuildRefusal::Paused));
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Playing);

        assert!(state.set_speed(2));
        assert!(!state.set_speed(3));
        assert_eq!(state.speed, 2);

        assert!(!state.deselect());
        assert!(state.select_build_type(TowerKind::Blaster));
        assert!(state.deselect());
        assert!(!state.select_tower(TowerId(999)));
    }

    #[test]
    fn test_command_dispatch_and_restart() {
        let mut state = state();
        assert!(state.apply(Command::Build { col: 10, row: 8, kind: TowerKind::Blaster }));
        assert!(state.apply(Command::SetSpeed { speed: 2 }));
        assert!(state.apply(Command::Restart));
        assert!(state.towers.is_empty());
        assert_eq!(state.economy.money, 250);
        assert_eq!(state.speed, 1);
    }
}
