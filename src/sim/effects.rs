//! Short-lived visual effects

use glam::Vec2;

use super::sprite::AnimatedSprite;
use crate::platform::{Canvas, ImageHandle, Rect};
use crate::tuning::EffectsTuning;

const EXPLOSION_FRAMES: u32 = 5;

#[derive(Debug, Clone)]
pub struct Explosion {
    pub rect: Rect,
    pub remaining: f32,
    sprite: AnimatedSprite,
}

impl Explosion {
    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Explosions centered on defeated adversaries
#[derive(Debug, Clone)]
pub struct Explosions {
    pub items: Vec<Explosion>,
    image: ImageHandle,
    size: f32,
    duration: f32,
    frame_rate: f32,
}

impl Explosions {
    pub fn new(tuning: &EffectsTuning, image: ImageHandle) -> Self {
        Self {
            items: Vec::new(),
            image,
            size: tuning.explosion_size,
            duration: tuning.explosion_duration,
            frame_rate: tuning.explosion_frame_rate,
        }
    }

    pub fn spawn(&mut self, center: Vec2) {
        let half = self.size * 0.5;
        self.items.push(Explosion {
            rect: Rect::new(center.x - half, center.y - half, self.size, self.size),
            remaining: self.duration,
            sprite: AnimatedSprite::new(self.image.clone(), EXPLOSION_FRAMES, 1, self.frame_rate),
        });
    }

    pub fn update(&mut self, dt: f32) {
        for explosion in &mut self.items {
            explosion.remaining -= dt;
            // Hold the last frame instead of looping
            if explosion.sprite.frame() + 1 < EXPLOSION_FRAMES {
                explosion.sprite.step(dt);
            }
        }
    }

    pub fn sweep(&mut self) {
        self.items.retain(|e| !e.is_done());
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        for explosion in &self.items {
            explosion.sprite.draw(canvas, explosion.rect, false);
        }
    }
}
