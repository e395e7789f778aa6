//! Data-driven game balance
//!
//! Every gameplay constant lives here so balance changes are a JSON edit,
//! not a code change. A `Tuning` is validated once at session construction;
//! the simulation never re-checks ranges per tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration. Raised at construction time only.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("lane_count must be at least 1")]
    NoLanes,
    #[error("road_width must not exceed canvas_width")]
    RoadExceedsCanvas,
    #[error("{0} must fit within a single lane")]
    VehicleWiderThanLane(&'static str),
    #[error("{0} exceeds its configured maximum")]
    BaseAboveMax(&'static str),
    #[error("spawn probabilities must lie in [0, 1]")]
    ProbabilityOutOfRange,
    #[error("currency_min must not exceed currency_max")]
    CurrencyRange,
    #[error("theme must provide at least one obstacle color")]
    EmptyTheme,
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cosmetic palette. The simulation only hands out indices into
/// `obstacle_colors`; what an index looks like is the render layer's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub player_color: String,
    pub obstacle_colors: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            player_color: "#3498db".into(),
            obstacle_colors: vec![
                "#e74c3c".into(),
                "#f39c12".into(),
                "#2ecc71".into(),
                "#9b59b6".into(),
                "#34495e".into(),
                "#e67e22".into(),
            ],
        }
    }
}

/// Full balance table. Defaults reproduce the classic 400x600 session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Canvas
    pub canvas_width: f32,
    pub canvas_height: f32,

    // Road
    pub road_width: f32,
    pub lane_count: u32,

    // Player vehicle
    pub player_width: f32,
    pub player_height: f32,
    /// Lateral speed in pixels per tick at full steer
    pub player_speed: f32,
    /// Distance from the canvas bottom to the top of the player car
    pub player_bottom_offset: f32,

    // Obstacle vehicles
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub obstacle_base_speed: f32,
    /// Per-spawn uniform addition in [0, jitter) on top of the base speed
    pub obstacle_speed_jitter: f32,
    /// Minimum play-time between successful spawns, in seconds.
    /// Zero degenerates to a probability-only gate.
    pub min_spawn_interval: f32,

    // Spawn probability curve: min(max, base + score / divisor)
    pub base_spawn_probability: f32,
    pub max_spawn_probability: f32,
    pub spawn_probability_divisor: f32,

    // Speed multiplier curve: min(max, base + score / divisor)
    pub base_speed_multiplier: f32,
    pub max_speed_multiplier: f32,
    pub speed_multiplier_divisor: f32,

    // Difficulty level: min(max_level, score / level_step + 1)
    pub level_step: u64,
    pub max_level: u32,

    // Scoring
    /// Per-tick survival reward scale: score += floor(speed_multiplier * rate)
    pub survival_rate: f32,
    pub avoidance_bonus: u64,
    pub currency_min: u64,
    pub currency_max: u64,

    pub theme: Theme,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 400.0,
            canvas_height: 600.0,

            road_width: 300.0,
            lane_count: 3,

            player_width: 50.0,
            player_height: 80.0,
            player_speed: 5.0,
            player_bottom_offset: 100.0,

            obstacle_width: 40.0,
            obstacle_height: 80.0,
            obstacle_base_speed: 2.0,
            obstacle_speed_jitter: 2.0,
            min_spawn_interval: 0.45,

            base_spawn_probability: 0.02,
            max_spawn_probability: 0.05,
            spawn_probability_divisor: 10_000.0,

            base_speed_multiplier: 2.0,
            max_speed_multiplier: 5.0,
            speed_multiplier_divisor: 2_000.0,

            level_step: 1_000,
            max_level: 10,

            survival_rate: 1.0,
            avoidance_bonus: 10,
            currency_min: 1,
            currency_max: 5,

            theme: Theme::default(),
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON. Missing fields fall back to defaults.
    /// The result is validated before being returned.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Width of a single lane
    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lane_count as f32
    }

    /// Reject out-of-range configuration
    pub fn validate(&self) -> Result<(), TuningError> {
        use TuningError::*;

        let positive: [(&'static str, f32); 9] = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("road_width", self.road_width),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
            ("obstacle_base_speed", self.obstacle_base_speed),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(NonPositive(name));
            }
        }
        if self.spawn_probability_divisor <= 0.0 {
            return Err(NonPositive("spawn_probability_divisor"));
        }
        if self.speed_multiplier_divisor <= 0.0 {
            return Err(NonPositive("speed_multiplier_divisor"));
        }
        if self.base_speed_multiplier <= 0.0 {
            return Err(NonPositive("base_speed_multiplier"));
        }
        if self.level_step == 0 {
            return Err(NonPositive("level_step"));
        }
        if self.max_level == 0 {
            return Err(NonPositive("max_level"));
        }

        if self.obstacle_speed_jitter < 0.0 {
            return Err(Negative("obstacle_speed_jitter"));
        }
        if self.min_spawn_interval < 0.0 {
            return Err(Negative("min_spawn_interval"));
        }
        if self.player_bottom_offset < 0.0 {
            return Err(Negative("player_bottom_offset"));
        }
        if self.survival_rate < 0.0 {
            return Err(Negative("survival_rate"));
        }

        if self.lane_count == 0 {
            return Err(NoLanes);
        }
        if self.road_width > self.canvas_width {
            return Err(RoadExceedsCanvas);
        }
        if self.player_width > self.lane_width() {
            return Err(VehicleWiderThanLane("player_width"));
        }
        if self.obstacle_width > self.lane_width() {
            return Err(VehicleWiderThanLane("obstacle_width"));
        }

        if !(0.0..=1.0).contains(&self.base_spawn_probability)
            || !(0.0..=1.0).contains(&self.max_spawn_probability)
        {
            return Err(ProbabilityOutOfRange);
        }
        if self.base_spawn_probability > self.max_spawn_probability {
            return Err(BaseAboveMax("base_spawn_probability"));
        }
        if self.base_speed_multiplier > self.max_speed_multiplier {
            return Err(BaseAboveMax("base_speed_multiplier"));
        }

        if self.currency_min > self.currency_max {
            return Err(CurrencyRange);
        }
        if self.theme.obstacle_colors.is_empty() {
            return Err(EmptyTheme);
        }

        Ok(())
    }
}
