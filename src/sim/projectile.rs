//! Projectile lifecycle
//!
//! A projectile flies in a straight line until its lifetime runs out, it
//! leaves the arena, or it hits something. It deals damage at most once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Transform2D;
use super::arena::Arena;
use super::collision::Aabb;
use super::sprite::AnimatedSprite;
use crate::platform::{Canvas, ImageHandle};
use crate::tuning::ProjectileSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Player's currency throw, horizontal
    PlayerPower,
    /// Boss shot, horizontal and leftward
    BossShot,
    /// Boss bomb falling from above the arena
    AerialBomb,
}

/// Why a projectile stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    Lifetime,
    OutOfBounds,
    Hit,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub transform: Transform2D,
    /// Unit direction of travel
    pub direction: Vec2,
    /// Units per second
    pub speed: f32,
    pub damage: u32,
    /// Milliseconds left before the projectile fizzles
    pub remaining_lifetime: f32,
    pub active: bool,
    pub expiry: Option<Expiry>,
    pub sprite: AnimatedSprite,
}

impl Projectile {
    pub fn new(
        kind: ProjectileKind,
        spec: &ProjectileSpec,
        pos: Vec2,
        direction: Vec2,
        image: ImageHandle,
    ) -> Self {
        let direction = direction.normalize_or(Vec2::X);
        let mut transform = Transform2D::new(pos, Vec2::new(spec.width, spec.height));
        transform.vel = direction * spec.speed;
        Self {
            kind,
            transform,
            direction,
            speed: spec.speed,
            damage: spec.damage,
            remaining_lifetime: spec.lifetime,
            active: true,
            expiry: None,
            sprite: AnimatedSprite::new(image, 1, 1, 1.0),
        }
    }

    pub fn update(&mut self, dt: f32, arena: &Arena) {
        if !self.active {
            return;
        }
        self.transform.integrate(dt);
        self.remaining_lifetime -= dt;
        self.sprite.step(dt);

        let bounds = self.bounds();
        let left_arena = match self.kind {
            ProjectileKind::PlayerPower | ProjectileKind::BossShot => {
                arena.outside_horizontal(&bounds)
            }
            ProjectileKind::AerialBomb => arena.below_floor(&bounds),
        };
        if left_arena {
            self.expire(Expiry::OutOfBounds);
        } else if self.remaining_lifetime <= 0.0 {
            self.expire(Expiry::Lifetime);
        }
    }

    /// Deactivate; the first reason given sticks
    pub fn expire(&mut self, reason: Expiry) {
        if self.active {
            self.active = false;
            self.expiry = Some(reason);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Collision box; identical to the rect `render` draws into
    pub fn bounds(&self) -> Aabb {
        self.transform.bounds()
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        if !self.active {
            return;
        }
        self.sprite
            .draw(canvas, self.bounds().to_rect(), self.direction.x < 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::{DrawCommand, RecordingCanvas};
    use crate::tuning::Tuning;

    fn power_spec() -> ProjectileSpec {
        ProjectileSpec {
            speed: 500.0,
            lifetime: 3500.0,
            damage: 25,
            width: 35.0,
            height: 35.0,
        }
    }

    fn run(p: &mut Projectile, arena: &Arena, ms: f32) {
        let steps = (ms / SIM_DT).round() as u32;
        for _ in 0..steps {
            p.update(SIM_DT, arena);
        }
    }

    #[test]
    fn test_leaves_bounds_before_lifetime() {
        let arena = Arena::default();
        assert_eq!(arena.width, 1200.0);
        let mut p = Projectile::new(
            ProjectileKind::PlayerPower,
            &power_spec(),
            Vec2::new(-40.0, 300.0),
            Vec2::X,
            ImageHandle::pending("power_usd"),
        );
        run(&mut p, &arena, 2400.0);
        assert!((p.transform.pos.x - (-40.0 + 1200.0)).abs() < 0.5);
        assert!(p.is_active());
        assert!(p.remaining_lifetime > 0.0);

        run(&mut p, &arena, 600.0);
        assert!(!p.is_active());
        assert_eq!(p.expiry, Some(Expiry::OutOfBounds));
        assert!(p.remaining_lifetime > 0.0);
    }

    #[test]
    fn test_lifetime_expiry() {
        let arena = Arena::default();
        let spec = ProjectileSpec {
            speed: 10.0,
            lifetime: 100.0,
            ..power_spec()
        };
        let mut p = Projectile::new(
            ProjectileKind::BossShot,
            &spec,
            Vec2::new(600.0, 300.0),
            Vec2::NEG_X,
            ImageHandle::pending("power_enemy"),
        );
        run(&mut p, &arena, 200.0);
        assert_eq!(p.expiry, Some(Expiry::Lifetime));
    }

    #[test]
    fn test_bomb_expires_below_floor() {
        let arena = Arena::default();
        let mut p = Projectile::new(
            ProjectileKind::AerialBomb,
            &Tuning::default().boss.bomb,
            Vec2::new(300.0, -40.0),
            Vec2::Y,
            ImageHandle::pending("power_enemy"),
        );
        run(&mut p, &arena, 1000.0);
        assert!(p.is_active());
        run(&mut p, &arena, 1500.0);
        assert_eq!(p.expiry, Some(Expiry::OutOfBounds));
        assert!(p.bounds().top() > arena.height());
    }

    #[test]
    fn test_expire_reason_sticks() {
        let mut p = Projectile::new(
            ProjectileKind::PlayerPower,
            &power_spec(),
            Vec2::ZERO,
            Vec2::X,
            ImageHandle::pending("power_usd"),
        );
        p.expire(Expiry::Hit);
        p.expire(Expiry::Lifetime);
        assert_eq!(p.expiry, Some(Expiry::Hit));
    }

    #[test]
    fn test_render_rect_matches_bounds() {
        let p = Projectile::new(
            ProjectileKind::PlayerPower,
            &power_spec(),
            Vec2::new(100.0, 200.0),
            Vec2::X,
            ImageHandle::new("power_usd", 64.0, 64.0),
        );
        let mut canvas = RecordingCanvas::new();
        p.render(&mut canvas);
        match &canvas.commands[0] {
            DrawCommand::Image { dest, .. } => assert_eq!(*dest, p.bounds().to_rect()),
            other => panic!("unexpected draw {:?}", other),
        }
    }

    #[test]
    fn test_step_travel_is_small_against_hit_boxes() {
        let tuning = Tuning::default();
        for spec in [tuning.player.power, tuning.boss.shot, tuning.boss.bomb] {
            let per_step = spec.speed * SIM_DT / 1000.0;
            assert!(per_step < spec.width.min(spec.height) / 4.0);
        }
    }
}
