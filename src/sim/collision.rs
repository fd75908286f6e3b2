//! Axis-aligned collision boxes
//!
//! All boxes live in arena space: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::platform::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Box of the given size whose top-left corner is `pos`
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict overlap test; touching edges do not count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Distance from `point` to the nearest point of the box (0 inside)
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let closest = Vec2::new(
            point.x.clamp(self.left(), self.right()),
            point.y.clamp(self.top(), self.bottom()),
        );
        closest.distance(point)
    }

    /// Horizontal gap between two boxes (0 when they overlap horizontally)
    pub fn horizontal_gap(&self, other: &Aabb) -> f32 {
        if self.right() < other.left() {
            other.left() - self.right()
        } else if other.right() < self.left() {
            self.left() - other.right()
        } else {
            0.0
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}
