//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Drawing only through the `Canvas` trait, never during an update

pub mod actor;
pub mod adversary;
pub mod arena;
pub mod boss;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod director;
pub mod effects;
pub mod events;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod schedule;
pub mod sprite;
pub mod state;
pub mod tick;

use rand::Rng;

/// The one RNG every random decision draws from
pub type SimRng = rand_pcg::Pcg32;

/// Uniform in `[lo, hi]`; a degenerate band collapses to `lo` (or 0 if not finite)
pub(crate) fn roll_between(rng: &mut SimRng, lo: f32, hi: f32) -> f32 {
    if lo.is_finite() && hi.is_finite() && lo < hi {
        rng.random_range(lo..=hi)
    } else if lo.is_finite() {
        lo
    } else {
        0.0
    }
}

/// Bernoulli roll; probabilities outside `[0, 1]` are clamped, NaN never fires
pub(crate) fn roll_chance(rng: &mut SimRng, p: f64) -> bool {
    p > 0.0 && rng.random_bool(p.min(1.0))
}

pub use actor::{Actor, ActorKind, Facing, Transform2D};
pub use adversary::{Adversary, AdversaryKind, Behavior, KindProfile, Strike, StrikeEffect};
pub use arena::Arena;
pub use boss::{BossBrain, BossPhase};
pub use clock::FixedStep;
pub use collision::Aabb;
pub use combat::{CombatReport, Kill, resolve};
pub use director::{DifficultyTable, DirectorPhase, Outcome, SpawnDirector};
pub use effects::Explosions;
pub use events::{EventSink, GameEvent, HitSource};
pub use pickup::{LifePickup, LifePickupSpawner};
pub use player::{Hero, Player, UltimateCharge};
pub use projectile::{Expiry, Projectile, ProjectileKind};
pub use schedule::Countdown;
pub use sprite::{AnimatedSprite, SpriteBook};
pub use state::GameState;
pub use tick::{TickInput, tick};
