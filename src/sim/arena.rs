//! Arena geometry
//!
//! Single canonical space for every bounds check and every draw call:
//! origin top-left, y grows downward, ground line at `height - ground_margin`.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::FALLBACK_ARENA_HEIGHT;
use crate::tuning::ArenaTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    height: Option<f32>,
    pub ground_margin: f32,
    pub offscreen_margin: f32,
}

impl Arena {
    pub fn new(tuning: &ArenaTuning) -> Self {
        Self {
            width: tuning.width,
            height: tuning.height,
            ground_margin: tuning.ground_margin,
            offscreen_margin: tuning.offscreen_margin,
        }
    }

    /// Viewport height, or a fixed fallback until the host reports one
    pub fn height(&self) -> f32 {
        self.height.unwrap_or(FALLBACK_ARENA_HEIGHT)
    }

    pub fn has_height(&self) -> bool {
        self.height.is_some()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 {
            self.width = width;
        }
        if height > self.ground_margin {
            self.height = Some(height);
        }
    }

    /// y coordinate of the ground line
    pub fn ground_y(&self) -> f32 {
        self.height() - self.ground_margin
    }

    /// True once a box has travelled past the off-screen margin on either side
    pub fn outside_horizontal(&self, bounds: &Aabb) -> bool {
        bounds.left() < -self.offscreen_margin || bounds.left() > self.width + self.offscreen_margin
    }

    /// True once the box's top edge is below the floor
    pub fn below_floor(&self, bounds: &Aabb) -> bool {
        bounds.top() > self.height()
    }

    /// Box wholly past the left edge (adversaries escaping)
    pub fn past_left_edge(&self, bounds: &Aabb) -> bool {
        bounds.right() < 0.0
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(&ArenaTuning::default())
    }
}
