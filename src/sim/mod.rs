//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, pruned with stable filters)
//! - No rendering, audio or platform dependencies

pub mod combat;
pub mod commands;
pub mod economy;
pub mod enemy;
pub mod events;
pub mod geom;
pub mod levels;
pub mod projectile;
pub mod query;
pub mod snapshot;
pub mod state;
pub mod targeting;
pub mod tick;
pub mod tower;
pub mod waves;

pub use commands::{BuildRefusal, Command};
pub use economy::{Economy, SessionResult, SessionStats};
pub use enemy::{Enemy, EnemyId, EnemyKind};
pub use events::GameEvent;
pub use levels::{LEVELS, LevelDef, MapKind, Path};
pub use projectile::{Effect, Projectile, ProjectileKind};
pub use query::{ArchetypeStatus, Hud, TowerInfo};
pub use snapshot::Snapshot;
pub use state::{GamePhase, GameState};
pub use tick::{frame, tick};
pub use tower::{Tower, TowerId, TowerKind};
pub use waves::{WavePhase, WaveScheduler};
