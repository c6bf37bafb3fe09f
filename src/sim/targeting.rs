//! Target acquisition

use glam::Vec2;

use super::enemy::Enemy;
use super::tower::TowerKind;

/// Which in-range enemy a tower locks onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPolicy {
    /// Most current health (long-range archetypes)
    HighestHealth,
    Nearest,
}

impl TargetPolicy {
    pub fn for_kind(kind: TowerKind) -> Self {
        match kind {
            TowerKind::Sniper | TowerKind::Railgun => TargetPolicy::HighestHealth,
            _ => TargetPolicy::Nearest,
        }
    }
}

/// Index of the chosen enemy, scanning in collection order.
///
/// Only strictly better candidates replace the current pick, so ties resolve
/// to whichever enemy comes first.
pub fn select_target(
    origin: Vec2,
    range: f32,
    enemies: &[Enemy],
    policy: TargetPolicy,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, enemy) in enemies.iter().enumerate() {
        if !enemy.alive {
            continue;
        }
        let dist = origin.distance(enemy.pos);
        if dist > range {
            continue;
        }
        let score = match policy {
            TargetPolicy::HighestHealth => enemy.health,
            TargetPolicy::Nearest => -dist,
        };
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
