//! Level definitions and enemy paths

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::FIELD_WIDTH;

/// Level id that selects endless mode
pub const ENDLESS_LEVEL_ID: u32 = 999;

/// Map layouts (each yields a fixed waypoint path)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapKind {
    Simple,
    Loop,
    Zig,
    Skyline,
    Void,
}

impl MapKind {
    /// Waypoints from the spawn edge to the exit edge
    pub fn waypoints(self) -> Vec<Vec2> {
        let w = FIELD_WIDTH;
        let pts: &[(f32, f32)] = match self {
            MapKind::Simple => &[
                (0.0, 200.0),
                (300.0, 200.0),
                (300.0, 600.0),
                (900.0, 600.0),
                (900.0, 200.0),
                (w, 200.0),
            ],
            MapKind::Loop => &[
                (0.0, 360.0),
                (300.0, 360.0),
                (300.0, 100.0),
                (900.0, 100.0),
                (900.0, 600.0),
                (300.0, 600.0),
                (300.0, 360.0),
                (w, 360.0),
            ],
            MapKind::Zig => &[
                (0.0, 100.0),
                (200.0, 100.0),
                (200.0, 600.0),
                (400.0, 600.0),
                (400.0, 100.0),
                (600.0, 100.0),
                (600.0, 600.0),
                (800.0, 600.0),
                (800.0, 100.0),
                (1000.0, 100.0),
                (1000.0, 360.0),
                (w, 360.0),
            ],
            MapKind::Skyline => &[
                (0.0, 600.0),
                (200.0, 600.0),
                (200.0, 200.0),
                (500.0, 200.0),
                (500.0, 500.0),
                (800.0, 500.0),
                (800.0, 100.0),
                (w, 100.0),
            ],
            MapKind::Void => &[
                (0.0, 360.0),
                (200.0, 360.0),
                (200.0, 100.0),
                (1080.0, 100.0),
                (1080.0, 620.0),
                (200.0, 620.0),
                (200.0, 360.0),
                (w, 360.0),
            ],
        };
        pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect()
    }
}

/// An enemy route: immutable once a session starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    waypoints: Vec<Vec2>,
}

impl Path {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints }
    }

    pub fn for_map(map: MapKind) -> Self {
        Self::new(map.waypoints())
    }

    /// Spawn point (first waypoint)
    pub fn start(&self) -> Vec2 {
        self.waypoints.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// Waypoint at `index`, if any
    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Consecutive waypoint pairs
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.waypoints.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Static description of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelDef {
    pub id: u32,
    pub name: &'static str,
    pub starting_money: u32,
    pub waves: u32,
    pub map: MapKind,
    pub desc: &'static str,
}

pub const LEVELS: [LevelDef; 5] = [
    LevelDef { id: 1, name: "INITIATION", starting_money: 250, waves: 10, map: MapKind::Simple, desc: "Basic training." },
    LevelDef { id: 2, name: "THE LOOP", starting_money: 350, waves: 15, map: MapKind::Loop, desc: "Healers detected." },
    LevelDef { id: 3, name: "CORE SECTOR", starting_money: 500, waves: 20, map: MapKind::Zig, desc: "Armored units inbound." },
    LevelDef { id: 4, name: "NEON SKYLINE", starting_money: 600, waves: 25, map: MapKind::Skyline, desc: "Fast enemies. High altitude." },
    LevelDef { id: 5, name: "THE VOID", starting_money: 800, waves: 30, map: MapKind::Void, desc: "Extreme danger. Anomalies detected." },
];

/// Endless mode runs on the loop map with its own economy
pub const ENDLESS_STARTING_MONEY: u32 = 600;
pub const ENDLESS_BASE_LIVES: i32 = 50;
/// Base lives for campaign levels
pub const BASE_LIVES: i32 = 20;

/// Look up a campaign level by id
pub fn level(id: u32) -> Option<&'static LevelDef> {
    LEVELS.iter().find(|l| l.id == id)
}
