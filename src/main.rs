//! Neon Defense headless runner
//!
//! Plays one session with a simple scripted builder, prints the session
//! result as JSON and banks it into a fresh progress record.
//! Usage: `neon-defense [session.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::io::Write;

    use glam::Vec2;
    use neon_defense::audio::LogAudio;
    use neon_defense::consts::{GRID_COLS, GRID_ROWS, SIM_DT};
    use neon_defense::sim::{Command, GameEvent, GameState, SessionResult, Snapshot, TowerKind};
    use neon_defense::{
        ConfigError, Driver, HookError, Progress, Renderer, ResultSink, SessionConfig, Settings,
        cell_center,
    };

    /// Level and seed used when no session file is given
    const DEFAULT_LEVEL: u32 = 1;
    const DEFAULT_SEED: u64 = 0x5eed;

    /// Give up after this many frames (about 2 hours of game time)
    const MAX_FRAMES: u32 = 60 * 60 * 120;
    /// Build order the script cycles through
    const BUILD_PLAN: [TowerKind; 4] = [
        TowerKind::Blaster,
        TowerKind::Blaster,
        TowerKind::Sniper,
        TowerKind::Tesla,
    ];

    /// Tracks a few numbers instead of drawing
    #[derive(Default)]
    struct StatsRenderer {
        frames: u64,
        peak_enemies: usize,
    }

    impl Renderer for StatsRenderer {
        fn render(&mut self, snapshot: &Snapshot) -> Result<(), HookError> {
            self.frames += 1;
            self.peak_enemies = self.peak_enemies.max(snapshot.enemies.len());
            if let Some(boss) = &snapshot.boss {
                if snapshot.tick % 300 == 0 {
                    log::debug!("{:?} at {:.0}%", boss.kind, boss.fraction * 100.0);
                }
            }
            Ok(())
        }
    }

    /// Writes the result to stdout as pretty JSON and keeps it
    #[derive(Default)]
    struct StdoutSink {
        last: Option<SessionResult>,
    }

    impl ResultSink for StdoutSink {
        fn record(&mut self, result: &SessionResult) -> Result<(), HookError> {
            self.last = Some(result.clone());
            let mut out = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, result)?;
            writeln!(out)?;
            Ok(())
        }
    }

    /// Legal cells ordered by how close they sit to the path
    fn candidate_cells(state: &GameState) -> Vec<(i32, i32)> {
        let mut cells: Vec<((i32, i32), f32)> = (0..GRID_COLS)
            .flat_map(|c| (0..GRID_ROWS).map(move |r| (c, r)))
            .filter(|&(c, r)| state.check_placement(c, r).is_ok())
            .map(|(c, r)| ((c, r), path_distance(state, cell_center(c, r))))
            .collect();
        cells.sort_by(|a, b| a.1.total_cmp(&b.1));
        cells.into_iter().map(|(cell, _)| cell).collect()
    }

    fn path_distance(state: &GameState, p: Vec2) -> f32 {
        state
            .path
            .segments()
            .map(|(a, b)| {
                let t = ((p - a).dot(b - a) / (b - a).length_squared().max(1.0)).clamp(0.0, 1.0);
                p.distance(a + (b - a) * t)
            })
            .fold(f32::INFINITY, f32::min)
    }

    /// Decide what to queue this frame
    fn plan(state: &GameState, builds: usize, cells: &[(i32, i32)]) -> Option<Command> {
        let kind = BUILD_PLAN[builds % BUILD_PLAN.len()];
        if state.economy.can_afford(kind.stats().cost) {
            let &(col, row) = cells.iter().find(|&&(c, r)| state.tower_at(c, r).is_none())?;
            return Some(Command::Build { col, row, kind });
        }
        // Spare cash goes into the cheapest upgrade once the grid fills up
        if builds >= cells.len().min(12) {
            let tower = state.towers.iter().min_by_key(|t| t.upgrade_cost())?;
            if state.economy.can_afford(tower.upgrade_cost()) {
                return Some(Command::Upgrade { id: tower.id });
            }
        }
        None
    }

    fn load_config(progress: &Progress) -> Result<SessionConfig, ConfigError> {
        match std::env::args().nth(1) {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                SessionConfig::from_json(&json)
            }
            None => progress.session_config(DEFAULT_LEVEL, DEFAULT_SEED),
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let mut progress = Progress::default();
        let config = load_config(&progress)?;
        let state = GameState::new(config)?;
        let cells = candidate_cells(&state);
        let mut driver = Driver::new(
            state,
            Settings::default(),
            StatsRenderer::default(),
            LogAudio::default(),
            StdoutSink::default(),
        );
        driver.queue(Command::SetSpeed { speed: 2 });

        let mut builds = 0;
        for _ in 0..MAX_FRAMES {
            if driver.is_over() {
                break;
            }
            if driver.pending() == 0 {
                if let Some(command) = plan(driver.state(), builds, &cells) {
                    driver.queue(command);
                }
            }
            // Only builds the simulation accepted advance the plan
            builds += driver
                .update(SIM_DT)
                .iter()
                .filter(|e| matches!(e, GameEvent::TowerBuilt { .. }))
                .count();
        }

        log::info!(
            "Rendered {} frames, peak {} enemies on field",
            driver.renderer().frames,
            driver.renderer().peak_enemies
        );
        if let Some(result) = &driver.results().last {
            progress.apply_result(result);
            log::info!(
                "Base {}: {} coins, levels unlocked up to {}",
                progress.title(),
                progress.coins,
                progress.unlocked_level
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Defense (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by a web host; nothing to run here
}
