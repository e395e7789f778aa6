//! Obstacle spawning
//!
//! One spawn attempt per tick. The probability draw throttles average
//! density; the minimum interval since the last successful spawn prevents
//! clumps that would make the road unpassable.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Obstacle};

/// Attempt at most one spawn for the current tick.
///
/// Succeeds only if a uniform draw in [0, 1) lands below the current spawn
/// probability AND at least `min_spawn_interval` seconds of play-time have
/// passed since the last successful spawn. An interval of zero degenerates
/// to the probability-only gate.
pub(crate) fn try_spawn(state: &mut GameState) {
    let draw: f32 = state.rng.random();
    if draw >= state.difficulty.spawn_probability {
        return;
    }
    if let Some(last) = state.last_spawn_at {
        if state.elapsed - last < state.tuning.min_spawn_interval {
            return;
        }
    }

    let lane_count = state.road.lane_count;
    let width = state.tuning.obstacle_width;
    let height = state.tuning.obstacle_height;
    let base_speed = state.tuning.obstacle_base_speed;
    let jitter = state.tuning.obstacle_speed_jitter;
    let palette_len = state.tuning.theme.obstacle_colors.len();

    let lane = state.rng.random_range(0..lane_count);
    let descent_speed = base_speed + state.rng.random::<f32>() * jitter;
    let cosmetic = state.rng.random_range(0..palette_len);

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        // Horizontally centered in the lane, fully above the canvas
        pos: Vec2::new(state.road.lane_centered_x(lane, width), -height),
        size: Vec2::new(width, height),
        descent_speed,
        cosmetic,
    });
    state.last_spawn_at = Some(state.elapsed);
    state.events.push(GameEvent::Spawned { id });
    log::debug!("Spawned obstacle {id} in lane {lane}, speed {descent_speed:.2}");
}
