//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod road;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, collides};
pub use difficulty::Difficulty;
pub use road::RoadLayout;
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleView, PlayerCar, ProgressStats, Snapshot,
};
pub use tick::{TickInput, tick};
