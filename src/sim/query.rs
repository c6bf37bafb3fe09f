//! Read-only views for HUD and UI collaborators

use serde::Serialize;

use super::state::{GamePhase, GameState};
use super::tower::{TowerId, TowerKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub money: u32,
    pub lives: i32,
    pub wave: u32,
    /// `None` in endless mode
    pub max_wave: Option<u32>,
    pub combo: u32,
    pub speed: u32,
    pub paused: bool,
    pub phase: GamePhase,
}

/// Live stats of the selected tower
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerInfo {
    pub id: TowerId,
    pub kind: TowerKind,
    pub name: &'static str,
    pub level: u32,
    pub damage: f32,
    pub range: f32,
    /// Shots per second (`None` for continuous attacks)
    pub fire_rate: Option<f32>,
    pub buffed: bool,
    pub upgrade_cost: u32,
    pub sell_value: u32,
    pub can_afford_upgrade: bool,
}

/// Hotbar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchetypeStatus {
    pub kind: TowerKind,
    pub cost: u32,
    pub locked: bool,
    pub affordable: bool,
    pub selected: bool,
}

impl GameState {
    pub fn hud(&self) -> Hud {
        Hud {
            money: self.economy.money,
            lives: self.economy.lives,
            wave: self.scheduler.wave,
            max_wave: self.scheduler.max_wave,
            combo: self.economy.combo,
            speed: self.speed,
            paused: self.phase == GamePhase::Paused,
            phase: self.phase,
        }
    }

    pub fn selected_tower_info(&self) -> Option<TowerInfo> {
        let tower = self.tower(self.selected_tower?)?;
        let upgrade_cost = tower.upgrade_cost();
        let interval = tower.effective_fire_interval();
        Some(TowerInfo {
            id: tower.id,
            kind: tower.kind,
            name: tower.kind.stats().name,
            level: tower.level,
            damage: tower.damage,
            range: tower.range,
            fire_rate: (interval > 0.0).then(|| crate::consts::TICK_RATE / interval),
            buffed: tower.buffed,
            upgrade_cost,
            sell_value: tower.sell_value,
            can_afford_upgrade: self.economy.can_afford(upgrade_cost),
        })
    }

    pub fn archetype_status(&self) -> Vec<ArchetypeStatus> {
        TowerKind::ALL
            .iter()
            .map(|&kind| {
                let stats = kind.stats();
                ArchetypeStatus {
                    kind,
                    cost: stats.cost,
                    locked: !self.config.is_unlocked(stats.unlock_tier),
                    affordable: self.economy.can_afford(stats.cost),
                    selected: self.selected_build == Some(kind),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::SessionConfig;
    use crate::sim::state::GameState;
    use crate::sim::tower::TowerKind;

    #[test]
    fn test_hud_reflects_state() {
        let mut state = GameState::new(SessionConfig::endless(1)).unwrap();
        state.toggle_pause();
        let hud = state.hud();
        assert_eq!(hud.money, 600);
        assert_eq!(hud.lives, 50);
        assert_eq!(hud.max_wave, None);
        assert!(hud.paused);
    }

    #[test]
    fn test_selected_tower_info() {
        let mut state = GameState::new(SessionConfig::default()).unwrap();
        assert!(state.selected_tower_info().is_none());
        let id = state.build_tower(10, 8, TowerKind::Blaster).unwrap();
        state.select_tower(id);

        let info = state.selected_tower_info().unwrap();
        assert_eq!(info.upgrade_cost, 35);
        assert_eq!(info.sell_value, 25);
        assert!(info.can_afford_upgrade);
        assert_eq!(info.fire_rate, Some(3.0));
    }

    #[test]
    fn test_archetype_status() {
        let mut state = GameState::new(SessionConfig::default()).unwrap();
        state.select_build_type(TowerKind::Sniper);
        let status = state.archetype_status();
        assert_eq!(status.len(), 10);
        assert!(status[1].selected);
        assert!(status[2].affordable && !status[2].locked);
        assert!(status[3].locked);
        assert!(status[7].locked && !status[7].affordable);
    }
}
