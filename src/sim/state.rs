//! Game state and core simulation types
//!
//! `GameState` exclusively owns every mutable piece of a session: the
//! player car, the obstacle set, the counters, and the RNG. Everything is
//! mutated only inside `tick` or a command method, which is the whole
//! correctness argument for the absence of synchronization.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::Difficulty;
use super::road::RoadLayout;
use crate::tuning::{Tuning, TuningError};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation frozen, waiting for a start command
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation suspended; resumes exactly where it left off
    Paused,
    /// Run ended on collision; state frozen for inspection
    GameOver,
}

/// The player's car. Moves laterally; y never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCar {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Lateral speed in pixels per tick at full steer
    pub lateral_speed: f32,
}

impl PlayerCar {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// An oncoming vehicle descending the road. x is fixed after spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Descent speed in pixels per tick, before the difficulty multiplier
    pub descent_speed: f32,
    /// Index into the theme's obstacle color table
    pub cosmetic: usize,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Monotonic session counters. Reset to zero on session reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub score: u64,
    pub currency: u64,
    pub obstacles_avoided: u32,
}

/// One-way notifications for presentation layers (HUD, audio).
///
/// Refilled on every tick and on commands; no simulation rule reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Spawned { id: u32 },
    Avoided { id: u32 },
    Collision { id: u32 },
    LevelUp { level: u32 },
    Reset,
}

/// Read-only obstacle view for the render layer
#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub rect: Rect,
    pub cosmetic: usize,
}

/// Read-only per-tick view of everything a presentation layer may draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: Rect,
    pub obstacles: Vec<ObstacleView>,
    pub stats: ProgressStats,
    pub difficulty: Difficulty,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub road: RoadLayout,
    pub player: PlayerCar,
    /// Obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub stats: ProgressStats,
    pub difficulty: Difficulty,
    /// Play-time in seconds. Does not advance while paused or in a menu,
    /// which keeps spawn-interval math honest across pauses.
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced by the latest tick or command
    pub events: Vec<GameEvent>,
    pub(crate) tuning: Tuning,
    pub(crate) rng: Pcg32,
    /// Play-time of the last successful spawn
    pub(crate) last_spawn_at: Option<f32>,
    next_id: u32,
}

impl GameState {
    /// Create a new session in the Menu phase.
    ///
    /// The tuning table is validated here; an invalid table is a
    /// construction error, never a per-tick concern.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;

        let road = RoadLayout::centered(tuning.canvas_width, tuning.road_width, tuning.lane_count);
        let player = PlayerCar {
            pos: Vec2::new(
                tuning.canvas_width / 2.0 - tuning.player_width / 2.0,
                tuning.canvas_height - tuning.player_bottom_offset,
            ),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            lateral_speed: tuning.player_speed,
        };
        let difficulty = Difficulty::for_score(0, &tuning);

        log::info!("New session, seed {seed}");

        Ok(Self {
            seed,
            phase: GamePhase::Menu,
            road,
            player,
            obstacles: Vec::new(),
            stats: ProgressStats::default(),
            difficulty,
            elapsed: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_at: None,
            next_id: 1,
        })
    }

    /// Balance table this session was built with
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Allocate a new obstacle ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin play. No-op outside the Menu phase.
    pub fn start(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = GamePhase::Playing;
            self.events.push(GameEvent::Started);
            log::info!("Session started");
        }
    }

    /// Suspend the simulation. No-op outside Playing, so calling it twice
    /// has the same effect as calling it once.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::debug!("Paused at tick {}", self.time_ticks);
        }
    }

    /// Resume from a pause. No-op outside Paused.
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::debug!("Resumed at tick {}", self.time_ticks);
        }
    }

    /// Return to the Menu phase with a fresh session: counters zeroed,
    /// obstacles gone, player at the start position, RNG stream restored to
    /// the seed so a replayed session reproduces exactly.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Menu;
        self.stats = ProgressStats::default();
        self.obstacles.clear();
        self.player.pos.x = self.tuning.canvas_width / 2.0 - self.tuning.player_width / 2.0;
        self.difficulty = Difficulty::for_score(0, &self.tuning);
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.last_spawn_at = None;
        self.next_id = 1;
        self.events.push(GameEvent::Reset);
        log::info!("Session reset");
    }

    /// Reset and immediately begin play
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Read-only snapshot for the render layer, taken after a tick
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: self.player.rect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    rect: o.rect(),
                    cosmetic: o.cosmetic,
                })
                .collect(),
            stats: self.stats,
            difficulty: self.difficulty,
        }
    }
}
