//! Floating extra-life pickups

use glam::Vec2;

use super::{SimRng, roll_chance};
use super::actor::Transform2D;
use super::arena::Arena;
use super::collision::Aabb;
use super::sprite::AnimatedSprite;
use crate::per_second;
use crate::platform::{Canvas, ImageHandle};
use crate::tuning::PickupTuning;

/// Drifts in from the right edge, bobbing gently
#[derive(Debug, Clone)]
pub struct LifePickup {
    pub transform: Transform2D,
    pub active: bool,
    base_y: f32,
    age: f32,
    amplitude: f32,
    period: f32,
    speed: f32,
    sprite: AnimatedSprite,
}

impl LifePickup {
    pub fn new(arena: &Arena, tuning: &PickupTuning, image: ImageHandle) -> Self {
        let size = Vec2::splat(tuning.size);
        let base_y = arena.ground_y() - size.y - tuning.float_amplitude * 2.0;
        Self {
            transform: Transform2D::new(Vec2::new(arena.width, base_y), size),
            active: true,
            base_y,
            age: 0.0,
            amplitude: tuning.float_amplitude,
            period: tuning.float_period.max(1.0),
            speed: tuning.speed,
            sprite: AnimatedSprite::new(image, 1, 1, 1.0),
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.age += dt;
        self.transform.pos.x -= per_second(self.speed, dt);
        let phase = self.age / self.period * std::f32::consts::TAU;
        self.transform.pos.y = self.base_y + phase.sin() * self.amplitude;
        if self.transform.bounds().right() < 0.0 {
            self.active = false;
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.transform.bounds()
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        if self.active {
            self.sprite.draw(canvas, self.bounds().to_rect(), false);
        }
    }
}

/// Periodic roll that may put a life pickup on the field
#[derive(Debug, Clone)]
pub struct LifePickupSpawner {
    timer: f32,
    tuning: PickupTuning,
    image: ImageHandle,
}

impl LifePickupSpawner {
    pub fn new(tuning: &PickupTuning, image: ImageHandle) -> Self {
        Self {
            timer: 0.0,
            tuning: tuning.clone(),
            image,
        }
    }

    /// Advance the check timer; `active` is the number of pickups in play
    pub fn update(
        &mut self,
        dt: f32,
        arena: &Arena,
        active: usize,
        rng: &mut SimRng,
    ) -> Option<LifePickup> {
        self.timer += dt;
        if self.timer < self.tuning.check_interval {
            return None;
        }
        self.timer -= self.tuning.check_interval;
        if active >= self.tuning.max_active || !roll_chance(rng, self.tuning.chance) {
            return None;
        }
        Some(LifePickup::new(arena, &self.tuning, self.image.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;

    #[test]
    fn test_pickup_drifts_left_and_bobs() {
        let arena = Arena::default();
        let tuning = PickupTuning::default();
        let mut pickup = LifePickup::new(&arena, &tuning, ImageHandle::pending("life"));
        let start = pickup.transform.pos;
        let mut lowest = f32::MAX;
        let mut highest = f32::MIN;
        for _ in 0..240 {
            pickup.update(SIM_DT);
            lowest = lowest.min(pickup.transform.pos.y);
            highest = highest.max(pickup.transform.pos.y);
        }
        assert!((start.x - pickup.transform.pos.x - 240.0).abs() < 0.5);
        assert!(highest - lowest <= tuning.float_amplitude * 2.0 + 1e-3);
        assert!(highest - lowest > tuning.float_amplitude);
        assert!(pickup.bounds().bottom() <= arena.ground_y() + 1e-3);
    }

    #[test]
    fn test_pickup_leaves_arena() {
        let arena = Arena::default();
        let mut pickup =
            LifePickup::new(&arena, &PickupTuning::default(), ImageHandle::pending("life"));
        for _ in 0..(120 * 11) {
            pickup.update(SIM_DT);
        }
        assert!(!pickup.active);
    }

    #[test]
    fn test_spawner_rolls_on_interval() {
        let tuning = PickupTuning {
            chance: 1.0,
            ..PickupTuning::default()
        };
        let mut spawner = LifePickupSpawner::new(&tuning, ImageHandle::pending("life"));
        let mut rng = SimRng::seed_from_u64(1);
        let arena = Arena::default();
        assert!(spawner.update(7999.0, &arena, 0, &mut rng).is_none());
        assert!(spawner.update(1.0, &arena, 0, &mut rng).is_some());
        assert!(spawner.update(8000.0, &arena, 1, &mut rng).is_none());
    }

    #[test]
    fn test_spawner_never_fires_at_zero_chance() {
        let tuning = PickupTuning {
            chance: 0.0,
            ..PickupTuning::default()
        };
        let mut spawner = LifePickupSpawner::new(&tuning, ImageHandle::pending("life"));
        let mut rng = SimRng::seed_from_u64(2);
        let arena = Arena::default();
        for _ in 0..20 {
            assert!(spawner.update(8000.0, &arena, 0, &mut rng).is_none());
        }
    }
}
