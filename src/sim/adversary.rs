//! Adversaries: one actor type, parameterized per kind
//!
//! Each [`AdversaryKind`] maps to a static [`KindProfile`] (movement, attack
//! table, hit box). Ground types share the melee state machine; the boss
//! carries its own brain.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{SimRng, roll_chance};
use super::actor::{Actor, ActorKind, Facing, Transform2D};
use super::arena::Arena;
use super::boss::BossBrain;
use super::collision::Aabb;
use super::events::EventSink;
use super::sprite::{AnimatedSprite, SpriteBook};
use crate::platform::{Canvas, Color, Rect};
use crate::tuning::BossTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdversaryKind {
    GasGoblin,
    RugReaper,
    Tucano,
    SquidGame,
}

/// Optional second attack, rolled on every strike
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Secondary {
    None,
    GasCloud {
        chance: f64,
        /// Multiplier on the initial hit
        damage_scale: f32,
        /// Milliseconds the cloud lingers after a strike
        duration: f32,
        /// Milliseconds the cloud lingers after death
        death_linger: f32,
        radius: f32,
        tick_interval: f32,
        tick_damage: u32,
    },
    Dash {
        chance: f64,
        duration: f32,
        /// Units per second
        speed: f32,
        damage_scale: f32,
    },
}

/// Trim applied to the sprite rect to get the collision box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    /// Fraction of the width removed from each side
    pub inset_x: f32,
    /// Fraction of the height removed from the top
    pub top_fraction: f32,
}

impl HitBox {
    pub const FULL: HitBox = HitBox {
        inset_x: 0.0,
        top_fraction: 0.0,
    };

    pub fn apply(&self, rect: Aabb) -> Aabb {
        let inset = rect.w * self.inset_x;
        let top = rect.h * self.top_fraction;
        Aabb::new(rect.x + inset, rect.y + top, rect.w - inset * 2.0, rect.h - top)
    }
}

/// Per-kind policy record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindProfile {
    pub sprite_key: &'static str,
    pub columns: u32,
    pub rows: u32,
    pub frame_rate: f32,
    pub walk_frames: &'static [u32],
    pub width: f32,
    pub height: f32,
    /// Walking speed, units per second
    pub speed: f32,
    pub health: u32,
    pub damage: u32,
    pub attack_range: f32,
    /// Milliseconds between strikes
    pub attack_cooldown: f32,
    pub secondary: Secondary,
    pub hit_box: HitBox,
}

const THREE_FRAMES: &[u32] = &[0, 1, 2];
const FOUR_FRAMES: &[u32] = &[0, 1, 2, 3];

impl AdversaryKind {
    /// Kinds the director spawns on its timer
    pub const REGULAR: [AdversaryKind; 3] = [
        AdversaryKind::GasGoblin,
        AdversaryKind::RugReaper,
        AdversaryKind::Tucano,
    ];

    pub fn is_boss(self) -> bool {
        matches!(self, AdversaryKind::SquidGame)
    }

    pub fn profile(self) -> KindProfile {
        match self {
            AdversaryKind::GasGoblin => KindProfile {
                sprite_key: "enemy_goblin",
                columns: 3,
                rows: 1,
                frame_rate: 6.0,
                walk_frames: THREE_FRAMES,
                width: 120.0,
                height: 300.0,
                speed: 93.75,
                health: 60,
                damage: 15,
                attack_range: 40.0,
                attack_cooldown: 1200.0,
                secondary: Secondary::GasCloud {
                    chance: 0.3,
                    damage_scale: 0.7,
                    duration: 2000.0,
                    death_linger: 1000.0,
                    radius: 100.0,
                    tick_interval: 500.0,
                    tick_damage: 5,
                },
                hit_box: HitBox::FULL,
            },
            AdversaryKind::RugReaper => KindProfile {
                sprite_key: "enemy_reaper",
                columns: 3,
                rows: 1,
                frame_rate: 6.0,
                walk_frames: THREE_FRAMES,
                width: 120.0,
                height: 300.0,
                speed: 137.5,
                health: 80,
                damage: 20,
                attack_range: 60.0,
                attack_cooldown: 800.0,
                secondary: Secondary::Dash {
                    chance: 0.4,
                    duration: 500.0,
                    speed: 375.0,
                    damage_scale: 1.5,
                },
                hit_box: HitBox::FULL,
            },
            AdversaryKind::Tucano => KindProfile {
                sprite_key: "tucano",
                columns: 4,
                rows: 1,
                frame_rate: 12.0,
                walk_frames: FOUR_FRAMES,
                width: 120.0,
                height: 340.0,
                speed: 187.5,
                health: 40,
                damage: 12,
                attack_range: 80.0,
                attack_cooldown: 600.0,
                secondary: Secondary::None,
                hit_box: HitBox {
                    inset_x: 0.2,
                    top_fraction: 0.35,
                },
            },
            AdversaryKind::SquidGame => KindProfile {
                sprite_key: "squid_game",
                columns: 3,
                rows: 1,
                frame_rate: 6.0,
                walk_frames: THREE_FRAMES,
                width: 230.0,
                height: 150.0,
                speed: 0.0,
                health: 600,
                damage: 0,
                attack_range: 0.0,
                attack_cooldown: 0.0,
                secondary: Secondary::None,
                hit_box: HitBox::FULL,
            },
        }
    }
}

/// Lingering poison area left by a gas goblin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCloud {
    pub center: Vec2,
    pub radius: f32,
    pub remaining: f32,
    tick_interval: f32,
    tick_damage: u32,
    /// Time until the next damage tick is allowed
    tick_timer: f32,
}

impl GasCloud {
    pub fn contains(&self, target: &Aabb) -> bool {
        target.distance_to(self.center) <= self.radius
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeleeState {
    pub cooldown: f32,
    pub dash_remaining: f32,
    pub gas: Option<GasCloud>,
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Melee(MeleeState),
    Boss(Box<BossBrain>),
}

/// How a strike was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeEffect {
    Direct,
    GasCloud,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub damage: u32,
    pub effect: StrikeEffect,
}

#[derive(Debug, Clone)]
pub struct Adversary {
    pub id: u32,
    pub kind: AdversaryKind,
    pub actor: Actor,
    pub profile: KindProfile,
    pub behavior: Behavior,
    /// Walking speed after the difficulty multiplier
    speed: f32,
}

fn scaled(value: u32, scale: f32) -> u32 {
    (value as f32 * scale).round() as u32
}

impl Adversary {
    /// Ground adversary whose top-left corner is `pos`, walking left
    pub fn spawn(
        id: u32,
        kind: AdversaryKind,
        pos: Vec2,
        multiplier: f32,
        book: &SpriteBook,
    ) -> Self {
        let profile = kind.profile();
        let multiplier = multiplier.max(1.0);
        let sprite = AnimatedSprite::new(
            book.image(profile.sprite_key),
            profile.columns,
            profile.rows,
            profile.frame_rate,
        )
        .with_frames(profile.walk_frames);
        let speed = profile.speed * multiplier;
        let mut transform = Transform2D::new(pos, Vec2::new(profile.width, profile.height));
        transform.vel = Vec2::new(-speed, 0.0);
        let actor = Actor::new(
            ActorKind::Adversary(kind),
            transform,
            scaled(profile.health, multiplier),
            Facing::Left,
            sprite,
        );
        Self {
            id,
            kind,
            actor,
            profile,
            behavior: Behavior::Melee(MeleeState::default()),
            speed,
        }
    }

    /// The boss, parked at the right side of the arena on its glide line
    pub fn spawn_boss(
        id: u32,
        arena: &Arena,
        tuning: &BossTuning,
        book: &SpriteBook,
        rng: &mut SimRng,
    ) -> Self {
        let profile = AdversaryKind::SquidGame.profile();
        let sprite = AnimatedSprite::new(
            book.image(profile.sprite_key),
            profile.columns,
            profile.rows,
            profile.frame_rate,
        )
        .with_frames(profile.walk_frames);
        let base_y = (arena.ground_y() - profile.height - tuning.base_height).max(0.0);
        let x = arena.width - profile.width - tuning.right_inset;
        let transform = Transform2D::new(
            Vec2::new(x, base_y),
            Vec2::new(profile.width, profile.height),
        );
        let actor = Actor::new(
            ActorKind::Adversary(AdversaryKind::SquidGame),
            transform,
            tuning.health,
            Facing::Left,
            sprite,
        );
        let brain = BossBrain::new(
            tuning,
            base_y,
            book.image("power_enemy"),
            book.image("power_enemy"),
            rng,
        );
        Self {
            id,
            kind: AdversaryKind::SquidGame,
            actor,
            profile,
            behavior: Behavior::Boss(Box::new(brain)),
            speed: 0.0,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.behavior, Behavior::Boss(_))
    }

    pub fn boss_brain(&self) -> Option<&BossBrain> {
        match &self.behavior {
            Behavior::Boss(brain) => Some(brain),
            Behavior::Melee(_) => None,
        }
    }

    pub fn boss_brain_mut(&mut self) -> Option<&mut BossBrain> {
        match &mut self.behavior {
            Behavior::Boss(brain) => Some(brain),
            Behavior::Melee(_) => None,
        }
    }

    /// Re-check the boss phase threshold against current health
    pub fn latch_phase(&mut self, events: &mut dyn EventSink) -> bool {
        match &mut self.behavior {
            Behavior::Boss(brain) => brain.latch_phase(&self.actor, events),
            Behavior::Melee(_) => false,
        }
    }

    pub fn gas_cloud(&self) -> Option<&GasCloud> {
        match &self.behavior {
            Behavior::Melee(state) => state.gas.as_ref(),
            Behavior::Boss(_) => None,
        }
    }

    pub fn is_dashing(&self) -> bool {
        matches!(&self.behavior, Behavior::Melee(state) if state.dash_remaining > 0.0)
    }

    /// Collision box after the per-kind trim
    pub fn bounds(&self) -> Aabb {
        self.profile.hit_box.apply(self.actor.bounds())
    }

    /// Returns true only on the hit that kills
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let died = self.actor.take_damage(amount);
        if died {
            self.on_death();
        }
        died
    }

    fn on_death(&mut self) {
        self.actor.transform.vel = Vec2::ZERO;
        let center = self.actor.bounds().center();
        let secondary = self.profile.secondary;
        match &mut self.behavior {
            Behavior::Melee(state) => {
                state.dash_remaining = 0.0;
                if let Secondary::GasCloud {
                    death_linger,
                    radius,
                    tick_interval,
                    tick_damage,
                    ..
                } = secondary
                {
                    state.gas = Some(GasCloud {
                        center,
                        radius,
                        remaining: death_linger,
                        tick_interval,
                        tick_damage,
                        tick_timer: 0.0,
                    });
                }
            }
            Behavior::Boss(brain) => brain.on_death(),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        arena: &Arena,
        target: &Aabb,
        rng: &mut SimRng,
        events: &mut dyn EventSink,
    ) {
        match &mut self.behavior {
            Behavior::Boss(brain) => brain.update(&mut self.actor, dt, arena, target, rng, events),
            Behavior::Melee(state) => {
                if let Some(cloud) = &mut state.gas {
                    cloud.remaining -= dt;
                    cloud.tick_timer -= dt;
                    if cloud.remaining <= 0.0 {
                        state.gas = None;
                    }
                }
                if !self.actor.alive {
                    return;
                }
                state.cooldown = (state.cooldown - dt).max(0.0);

                let mut speed = self.speed;
                if state.dash_remaining > 0.0 {
                    state.dash_remaining -= dt;
                    if let Secondary::Dash { speed: dash, .. } = self.profile.secondary {
                        speed = dash;
                    }
                }
                self.actor.transform.vel.x = -speed;
                self.actor.transform.integrate(dt);
                self.actor.sprite.play(self.profile.walk_frames);
                self.actor.sprite.step(dt);

                if self.actor.active && arena.past_left_edge(&self.actor.bounds()) {
                    self.actor.active = false;
                }
            }
        }
    }

    pub fn can_attack(&self) -> bool {
        match &self.behavior {
            Behavior::Melee(state) => self.actor.is_targetable() && state.cooldown <= 0.0,
            Behavior::Boss(_) => false,
        }
    }

    /// Strike `target` if off cooldown and in range; rolls the secondary attack
    pub fn attack(&mut self, target: &Aabb, rng: &mut SimRng) -> Option<Strike> {
        if !self.can_attack() || self.bounds().horizontal_gap(target) > self.profile.attack_range {
            return None;
        }
        let center = self.actor.bounds().center();
        let Behavior::Melee(state) = &mut self.behavior else {
            return None;
        };
        state.cooldown = self.profile.attack_cooldown;
        let base = self.profile.damage;

        let dash_scale = match self.profile.secondary {
            Secondary::Dash { damage_scale, .. } if state.dash_remaining > 0.0 => damage_scale,
            _ => 1.0,
        };

        let strike = match self.profile.secondary {
            Secondary::GasCloud {
                chance,
                damage_scale,
                duration,
                radius,
                tick_interval,
                tick_damage,
                ..
            } if roll_chance(rng, chance) => {
                state.gas = Some(GasCloud {
                    center,
                    radius,
                    remaining: duration,
                    tick_interval,
                    tick_damage,
                    tick_timer: tick_interval,
                });
                Strike {
                    damage: scaled(base, damage_scale * dash_scale),
                    effect: StrikeEffect::GasCloud,
                }
            }
            Secondary::Dash {
                chance,
                duration,
                damage_scale,
                ..
            } if roll_chance(rng, chance) => {
                state.dash_remaining = duration;
                Strike {
                    damage: scaled(base, damage_scale),
                    effect: StrikeEffect::Dash,
                }
            }
            _ => Strike {
                damage: scaled(base, dash_scale),
                effect: StrikeEffect::Direct,
            },
        };
        Some(strike)
    }

    /// Damage owed by this adversary's gas cloud, if `target` is inside and a
    /// tick is due
    pub fn gas_cloud_tick(&mut self, target: &Aabb) -> Option<u32> {
        let Behavior::Melee(state) = &mut self.behavior else {
            return None;
        };
        let cloud = state.gas.as_mut()?;
        if cloud.tick_timer > 0.0 || !cloud.contains(target) {
            return None;
        }
        cloud.tick_timer = cloud.tick_interval;
        Some(cloud.tick_damage)
    }

    /// Alive but walked off the arena
    pub fn escaped(&self) -> bool {
        self.actor.alive && !self.actor.active
    }

    /// Ready to leave the collection
    pub fn should_remove(&self) -> bool {
        if !self.actor.active {
            return true;
        }
        !self.actor.alive && self.gas_cloud().is_none()
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        if let Some(cloud) = self.gas_cloud() {
            canvas.fill_rect(
                Rect::new(
                    cloud.center.x - cloud.radius,
                    cloud.center.y - cloud.radius,
                    cloud.radius * 2.0,
                    cloud.radius * 2.0,
                ),
                Color::GAS_CLOUD,
            );
        }
        if !self.actor.is_targetable() {
            return;
        }
        let rect = self.actor.bounds().to_rect();
        if self.is_dashing() {
            canvas.fill_rect(
                Rect::new(rect.x + rect.w, rect.y, rect.w * 0.5, rect.h),
                Color::DASH_TRAIL,
            );
        }
        self.actor.sprite.draw(canvas, rect, false);

        let bar = Rect::new(rect.x, rect.y - 10.0, rect.w, 5.0);
        canvas.fill_rect(bar, Color::HEALTH_BACK);
        canvas.fill_rect(
            Rect::new(bar.x, bar.y, bar.w * self.actor.health_ratio(), bar.h),
            Color::HEALTH_FILL,
        );

        if let Some(brain) = self.boss_brain() {
            brain.render(canvas);
        }
    }
}
