//! Player actor: movement, power shots and the special burst

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::actor::{Actor, ActorKind, Facing, Transform2D};
use super::arena::Arena;
use super::collision::Aabb;
use super::events::{EventSink, GameEvent};
use super::projectile::{Projectile, ProjectileKind};
use super::schedule::Countdown;
use super::sprite::{AnimatedSprite, SpriteBook};
use super::tick::TickInput;
use crate::per_second;
use crate::platform::{Canvas, ImageHandle};
use crate::tuning::PlayerTuning;

/// Currency skins for the player's power shot
pub const POWER_SKINS: [&str; 3] = ["power_brl", "power_eur", "power_usd"];

/// Playable characters; only the sprite sheet differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Hero {
    #[default]
    Btc,
    Eth,
    Solana,
    Real,
    Dollar,
}

impl Hero {
    pub const ALL: [Hero; 5] = [Hero::Btc, Hero::Eth, Hero::Solana, Hero::Real, Hero::Dollar];

    pub fn sprite_key(self) -> &'static str {
        match self {
            Hero::Btc => "btc_idle",
            Hero::Eth => "eth_idle",
            Hero::Solana => "solana_idle",
            Hero::Real => "real_idle",
            Hero::Dollar => "dollar_idle",
        }
    }
}

/// Kills counted toward the special power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateCharge {
    pub kills: u32,
    pub needed: u32,
    /// Milliseconds before the special can be used again
    pub cooldown: f32,
}

impl UltimateCharge {
    pub fn new(needed: u32) -> Self {
        Self {
            kills: 0,
            needed: needed.max(1),
            cooldown: 0.0,
        }
    }

    /// Count a kill; true when this kill completes the charge
    pub fn add_kill(&mut self) -> bool {
        if self.kills >= self.needed {
            return false;
        }
        self.kills += 1;
        self.kills == self.needed
    }

    pub fn is_ready(&self) -> bool {
        self.kills >= self.needed && self.cooldown <= 0.0
    }

    pub fn progress(&self) -> f32 {
        self.kills as f32 / self.needed as f32
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub actor: Actor,
    pub projectiles: Vec<Projectile>,
    pub attack_cooldown: f32,
    pub crouching: bool,
    pub fast_falling: bool,
    pub on_ground: bool,
    /// Remaining grace after a respawn, milliseconds
    pub invulnerable: f32,
    pub ultimate: UltimateCharge,
    burst: Countdown<()>,
    tuning: PlayerTuning,
    skins: Vec<ImageHandle>,
    all_frames: Vec<u32>,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, hero: Hero, arena: &Arena, book: &SpriteBook) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        let pos = Vec2::new(tuning.start_x, arena.ground_y() - size.y);
        let sprite = AnimatedSprite::new(
            book.image(hero.sprite_key()),
            tuning.columns,
            tuning.rows,
            tuning.frame_rate,
        );
        let all_frames = sprite.frame_range().to_vec();
        Self {
            actor: Actor::new(
                ActorKind::Player,
                Transform2D::new(pos, size),
                tuning.max_health,
                Facing::Right,
                sprite,
            ),
            projectiles: Vec::new(),
            attack_cooldown: 0.0,
            crouching: false,
            fast_falling: false,
            on_ground: true,
            invulnerable: 0.0,
            ultimate: UltimateCharge::new(tuning.special_kills),
            burst: Countdown::new(),
            tuning: tuning.clone(),
            skins: POWER_SKINS.iter().map(|key| book.image(key)).collect(),
            all_frames,
        }
    }

    pub fn update(
        &mut self,
        input: &TickInput,
        dt: f32,
        arena: &Arena,
        rng: &mut SimRng,
        events: &mut dyn EventSink,
    ) {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.ultimate.cooldown = (self.ultimate.cooldown - dt).max(0.0);

        for projectile in &mut self.projectiles {
            projectile.update(dt, arena);
        }
        if !self.actor.alive {
            return;
        }

        self.move_body(input, dt, arena);

        if input.fire {
            self.fire(rng, events);
        }
        if input.special {
            self.unleash_special(events);
        }
        for _ in self.burst.tick(dt) {
            self.spawn_power(rng);
        }

        if self.crouching {
            self.actor.sprite.play(&[0]);
        } else {
            self.actor.sprite.play(&self.all_frames);
        }
        self.actor.sprite.step(dt);
    }

    fn move_body(&mut self, input: &TickInput, dt: f32, arena: &Arena) {
        let t = &mut self.actor.transform;
        let dir = input.right as i32 - input.left as i32;
        t.vel.x = dir as f32 * self.tuning.move_speed;
        match dir {
            d if d < 0 => self.actor.facing = Facing::Left,
            d if d > 0 => self.actor.facing = Facing::Right,
            _ => {}
        }

        if input.jump && self.on_ground {
            t.vel.y = -self.tuning.jump_speed;
            self.on_ground = false;
        }
        self.crouching = input.down && self.on_ground;
        self.fast_falling = input.down && !self.on_ground;

        if !self.on_ground {
            let multiplier = if self.fast_falling {
                self.tuning.fast_fall_multiplier
            } else {
                1.0
            };
            t.vel.y += per_second(self.tuning.gravity * multiplier, dt);
        }
        t.integrate(dt);

        t.pos.x = t.pos.x.min(arena.width - t.size.x).max(0.0);
        let floor = arena.ground_y() - t.size.y;
        if t.pos.y >= floor {
            t.pos.y = floor;
            t.vel.y = 0.0;
            self.on_ground = true;
            self.fast_falling = false;
        }
    }

    /// Throw one power object if off cooldown
    pub fn fire(&mut self, rng: &mut SimRng, events: &mut dyn EventSink) -> bool {
        if !self.actor.alive || self.attack_cooldown > 0.0 {
            return false;
        }
        self.spawn_power(rng);
        self.attack_cooldown = self.tuning.attack_cooldown;
        events.emit(GameEvent::PowerFired);
        true
    }

    /// Queue the special burst if charged
    pub fn unleash_special(&mut self, events: &mut dyn EventSink) -> bool {
        if !self.actor.alive || !self.ultimate.is_ready() {
            return false;
        }
        for i in 0..self.tuning.special_shots {
            self.burst.push(i as f32 * self.tuning.special_spacing, ());
        }
        self.ultimate.kills = 0;
        self.ultimate.cooldown = self.tuning.special_cooldown;
        events.emit(GameEvent::SpecialUnleashed {
            shots: self.tuning.special_shots,
        });
        true
    }

    fn spawn_power(&mut self, rng: &mut SimRng) {
        let spec = self.tuning.power;
        let body = self.bounds();
        let x = match self.actor.facing {
            Facing::Right => body.right(),
            Facing::Left => body.left() - spec.width,
        };
        let pos = Vec2::new(x, body.center().y - spec.height * 0.5);
        let image = if self.skins.is_empty() {
            ImageHandle::pending(POWER_SKINS[0])
        } else {
            self.skins[rng.random_range(0..self.skins.len())].clone()
        };
        self.projectiles.push(Projectile::new(
            ProjectileKind::PlayerPower,
            &spec,
            pos,
            Vec2::new(self.actor.facing.sign(), 0.0),
            image,
        ));
    }

    /// Count a defeated adversary toward the special
    pub fn record_kill(&mut self, events: &mut dyn EventSink) {
        if self.ultimate.add_kill() {
            events.emit(GameEvent::SpecialReady);
        }
    }

    pub fn can_be_hit(&self) -> bool {
        self.actor.alive && self.invulnerable <= 0.0
    }

    /// Returns true only on the hit that kills; ignored during the grace period
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.can_be_hit() {
            return false;
        }
        self.actor.take_damage(amount)
    }

    /// Full health back at the start position, briefly invulnerable
    pub fn respawn(&mut self, arena: &Arena) {
        self.actor.restore();
        let t = &mut self.actor.transform;
        t.pos = Vec2::new(self.tuning.start_x, arena.ground_y() - t.size.y);
        t.vel = Vec2::ZERO;
        self.on_ground = true;
        self.crouching = false;
        self.fast_falling = false;
        self.invulnerable = self.tuning.respawn_grace;
        self.burst.clear();
    }

    /// Body box; a crouch keeps the feet planted and lowers the head
    pub fn bounds(&self) -> Aabb {
        let body = self.actor.bounds();
        if self.crouching {
            let h = body.h * self.tuning.crouch_ratio;
            Aabb::new(body.x, body.bottom() - h, body.w, h)
        } else {
            body
        }
    }

    pub fn sweep(&mut self) {
        self.projectiles.retain(|p| p.is_active());
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        for projectile in &self.projectiles {
            projectile.render(canvas);
        }
        if !self.actor.alive {
            return;
        }
        // Blink while invulnerable
        if self.invulnerable > 0.0 && (self.invulnerable / 100.0) as u32 % 2 == 1 {
            return;
        }
        self.actor.sprite.draw(
            canvas,
            self.bounds().to_rect(),
            self.actor.facing == Facing::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::AssetTable;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    struct Rig {
        player: Player,
        arena: Arena,
        rng: SimRng,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = Tuning::default();
            let arena = Arena::default();
            let mut keys = vec!["btc_idle"];
            keys.extend(POWER_SKINS);
            let book = SpriteBook::load(&AssetTable::standard(), &keys);
            Self {
                player: Player::new(&tuning.player, Hero::Btc, &arena, &book),
                arena,
                rng: SimRng::seed_from_u64(11),
                events: Vec::new(),
            }
        }

        fn step(&mut self, input: &TickInput) {
            self.player
                .update(input, SIM_DT, &self.arena, &mut self.rng, &mut self.events);
        }
    }

    #[test]
    fn test_starts_on_ground() {
        let rig = Rig::new();
        assert!(rig.player.on_ground);
        assert_eq!(rig.player.bounds().bottom(), rig.arena.ground_y());
    }

    #[test]
    fn test_jump_returns_to_ground() {
        let mut rig = Rig::new();
        rig.step(&TickInput {
            jump: true,
            ..TickInput::default()
        });
        assert!(!rig.player.on_ground);
        let mut peak = rig.player.actor.transform.pos.y;
        for _ in 0..240 {
            rig.step(&TickInput::default());
            peak = peak.min(rig.player.actor.transform.pos.y);
        }
        assert!(rig.player.on_ground);
        assert!(peak < rig.arena.ground_y() - rig.player.actor.transform.size.y - 50.0);
        assert_eq!(rig.player.bounds().bottom(), rig.arena.ground_y());
    }

    #[test]
    fn test_fast_fall_lands_sooner() {
        let airtime = |down: bool| {
            let mut rig = Rig::new();
            rig.step(&TickInput {
                jump: true,
                ..TickInput::default()
            });
            let mut ticks = 0;
            while !rig.player.on_ground && ticks < 1000 {
                rig.step(&TickInput {
                    down,
                    ..TickInput::default()
                });
                ticks += 1;
            }
            ticks
        };
        assert!(airtime(true) < airtime(false));
    }

    #[test]
    fn test_crouch_lowers_head_only() {
        let mut rig = Rig::new();
        let standing = rig.player.bounds();
        rig.step(&TickInput {
            down: true,
            ..TickInput::default()
        });
        assert!(rig.player.crouching);
        let crouched = rig.player.bounds();
        assert_eq!(crouched.bottom(), standing.bottom());
        assert!(crouched.top() > standing.top());
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut rig = Rig::new();
        let fire = TickInput {
            fire: true,
            ..TickInput::default()
        };
        rig.step(&fire);
        rig.step(&fire);
        assert_eq!(rig.player.projectiles.len(), 1);
        for _ in 0..60 {
            rig.step(&TickInput::default());
        }
        rig.step(&fire);
        assert_eq!(rig.player.projectiles.len(), 2);
        let shot = &rig.player.projectiles[0];
        assert_eq!(shot.direction, Vec2::X);
        assert!(POWER_SKINS.contains(&shot.sprite.image().key()));
    }

    #[test]
    fn test_facing_left_fires_left() {
        let mut rig = Rig::new();
        rig.player.actor.transform.pos.x = 600.0;
        rig.step(&TickInput {
            left: true,
            fire: true,
            ..TickInput::default()
        });
        assert_eq!(rig.player.actor.facing, Facing::Left);
        let shot = &rig.player.projectiles[0];
        assert_eq!(shot.direction, Vec2::NEG_X);
        assert!(shot.bounds().right() <= rig.player.bounds().left());
    }

    #[test]
    fn test_special_needs_charge_and_staggers_burst() {
        let mut rig = Rig::new();
        assert!(!rig.player.unleash_special(&mut rig.events));
        for _ in 0..5 {
            rig.player.record_kill(&mut rig.events);
        }
        assert!(rig.events.contains(&GameEvent::SpecialReady));
        assert!(rig.player.unleash_special(&mut rig.events));
        assert!(!rig.player.unleash_special(&mut rig.events));
        assert_eq!(rig.player.ultimate.kills, 0);

        rig.step(&TickInput::default());
        assert_eq!(rig.player.projectiles.len(), 1);
        // 8 shots 150ms apart: the last leaves at 1050ms
        for _ in 0..((1050.0 / SIM_DT) as u32 + 1) {
            rig.step(&TickInput::default());
        }
        assert_eq!(rig.player.projectiles.len(), 8);
    }

    #[test]
    fn test_grace_period_blocks_damage() {
        let mut rig = Rig::new();
        assert!(rig.player.take_damage(500));
        rig.player.respawn(&rig.arena);
        assert!(rig.player.actor.alive);
        assert!(!rig.player.take_damage(500));
        assert_eq!(rig.player.actor.health, rig.player.actor.max_health);
        for _ in 0..200 {
            rig.step(&TickInput::default());
        }
        assert!(rig.player.can_be_hit());
    }

    #[test]
    fn test_position_clamped_to_arena() {
        let mut rig = Rig::new();
        for _ in 0..200 {
            rig.step(&TickInput {
                left: true,
                ..TickInput::default()
            });
        }
        assert_eq!(rig.player.actor.transform.pos.x, 0.0);
    }
}
