//! Road geometry for lane placement and player clamping
//!
//! The road is a vertical band of equal-width lanes:
//! - x: left edge in canvas coordinates
//! - width: total road width
//! - lane_count: number of lanes; lane width is derived as width / lane_count

use serde::{Deserialize, Serialize};

/// Immutable lane geometry for one session
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoadLayout {
    /// Left edge of the road (canvas x)
    pub x: f32,
    /// Total road width
    pub width: f32,
    /// Number of lanes
    pub lane_count: u32,
}

impl RoadLayout {
    /// Center the road horizontally on a canvas of the given width
    pub fn centered(canvas_width: f32, road_width: f32, lane_count: u32) -> Self {
        Self {
            x: (canvas_width - road_width) / 2.0,
            width: road_width,
            lane_count,
        }
    }

    /// Width of a single lane
    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count as f32
    }

    /// Left edge of a lane
    #[inline]
    pub fn lane_origin_x(&self, lane: u32) -> f32 {
        self.x + lane as f32 * self.lane_width()
    }

    /// Center x of a lane
    pub fn lane_center_x(&self, lane: u32) -> f32 {
        self.lane_origin_x(lane) + self.lane_width() / 2.0
    }

    /// X placing a vehicle of the given width centered in a lane
    pub fn lane_centered_x(&self, lane: u32, vehicle_width: f32) -> f32 {
        self.lane_origin_x(lane) + (self.lane_width() - vehicle_width) / 2.0
    }

    /// Clamp a vehicle x so the vehicle stays fully on the road
    pub fn clamp_x(&self, x: f32, vehicle_width: f32) -> f32 {
        x.clamp(self.x, self.x + self.width - vehicle_width)
    }

    /// Lane index containing an x coordinate, clamped to valid lanes
    pub fn lane_at(&self, x: f32) -> u32 {
        let lane = ((x - self.x) / self.lane_width()).floor() as i64;
        lane.clamp(0, self.lane_count as i64 - 1) as u32
    }

    /// Check if an x range lies fully on the road
    pub fn contains(&self, x: f32, vehicle_width: f32) -> bool {
        x >= self.x && x + vehicle_width <= self.x + self.width
    }
}
