//! Shared actor model: transform, health and facing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::sprite::AnimatedSprite;

/// Position (top-left), velocity in units per second, and size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform2D {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Transform2D {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    /// Advance position by velocity over `dt` milliseconds
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * (dt / 1000.0);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Closed set of things that can be an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Adversary(super::adversary::AdversaryKind),
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub transform: Transform2D,
    pub health: u32,
    pub max_health: u32,
    /// Health above zero
    pub alive: bool,
    /// Still taking part in play; a live actor that left the arena is inactive
    pub active: bool,
    pub facing: Facing,
    pub sprite: AnimatedSprite,
    pub kind: ActorKind,
}

impl Actor {
    pub fn new(
        kind: ActorKind,
        transform: Transform2D,
        max_health: u32,
        facing: Facing,
        sprite: AnimatedSprite,
    ) -> Self {
        let max_health = max_health.max(1);
        Self {
            transform,
            health: max_health,
            max_health,
            alive: true,
            active: true,
            facing,
            sprite,
            kind,
        }
    }

    /// Subtract health, clamped at zero. Returns true only on the call that kills.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Back to full health (respawn)
    pub fn restore(&mut self) {
        self.health = self.max_health;
        self.alive = true;
        self.active = true;
    }

    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    pub fn bounds(&self) -> Aabb {
        self.transform.bounds()
    }

    /// Alive and still participating
    pub fn is_targetable(&self) -> bool {
        self.alive && self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ImageHandle;
    use proptest::prelude::*;

    fn actor(health: u32) -> Actor {
        Actor::new(
            ActorKind::Player,
            Transform2D::new(Vec2::ZERO, Vec2::new(10.0, 10.0)),
            health,
            Facing::Right,
            AnimatedSprite::new(ImageHandle::pending("x"), 1, 1, 1.0),
        )
    }

    #[test]
    fn test_integrate_uses_per_second_velocity() {
        let mut t = Transform2D::new(Vec2::ZERO, Vec2::ONE);
        t.vel = Vec2::new(500.0, -100.0);
        t.integrate(2000.0);
        assert_eq!(t.pos, Vec2::new(1000.0, -200.0));
    }

    #[test]
    fn test_sixty_health_three_hits() {
        let mut a = actor(60);
        assert!(!a.take_damage(50));
        assert_eq!(a.health, 10);
        assert!(a.alive);
        assert!(a.take_damage(50));
        assert_eq!(a.health, 0);
        assert!(!a.alive);
        assert!(!a.take_damage(50));
        assert_eq!(a.health, 0);
    }

    #[test]
    fn test_restore_revives() {
        let mut a = actor(20);
        a.take_damage(25);
        a.restore();
        assert!(a.alive);
        assert_eq!(a.health, 20);
    }

    proptest! {
        #[test]
        fn prop_health_monotonic_and_single_death(
            max in 1u32..500,
            hits in prop::collection::vec(0u32..200, 0..30),
        ) {
            let mut a = actor(max);
            let mut deaths = 0;
            let mut last = a.health;
            for hit in hits {
                if a.take_damage(hit) {
                    deaths += 1;
                }
                prop_assert!(a.health <= last);
                prop_assert_eq!(a.alive, a.health > 0);
                last = a.health;
            }
            prop_assert!(deaths <= 1);
            prop_assert_eq!(deaths == 1, !a.alive);
        }
    }
}
