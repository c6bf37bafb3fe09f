//! Neon Defense - a deterministic tower-defense combat simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, waves, economy)
//! - `audio`: Sound cue vocabulary and the audio collaborator interface
//! - `driver`: Fixed-timestep host loop that feeds collaborators
//! - `settings`: Session and display configuration
//! - `progression`: Coins, base upgrades and level unlocks between sessions

pub mod audio;
pub mod driver;
pub mod progression;
pub mod settings;
pub mod sim;

pub use driver::{Driver, HookError, Renderer, ResultSink};
pub use progression::{Progress, ProgressError};
pub use settings::{ConfigError, SessionConfig, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz logical ticks)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    pub const TICK_RATE: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield width in pixels; paths run edge to edge
    pub const FIELD_WIDTH: f32 = 1280.0;

    /// Build grid
    pub const GRID_SIZE: f32 = 40.0;
    pub const GRID_COLS: i32 = 32;
    pub const GRID_ROWS: i32 = 18;
    /// Rows covered by the top HUD strip (not buildable)
    pub const HUD_TOP_ROWS: i32 = 2;
    /// Rows covered by the bottom tower bar (not buildable)
    pub const HUD_BOTTOM_ROWS: i32 = 3;
    /// Clearance kept between towers and path segments
    pub const PATH_CLEARANCE: f32 = 30.0;
}

/// World-space center of a grid cell
#[inline]
pub fn cell_center(col: i32, row: i32) -> Vec2 {
    use consts::GRID_SIZE;
    Vec2::new(
        col as f32 * GRID_SIZE + GRID_SIZE / 2.0,
        row as f32 * GRID_SIZE + GRID_SIZE / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center() {
        assert_eq!(cell_center(3, 7), Vec2::new(140.0, 300.0));
        assert_eq!(cell_center(0, 0), Vec2::new(20.0, 20.0));
    }
}
