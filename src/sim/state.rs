//! Game state definitions
//!
//! Everything one run of the game owns, seeded from a single RNG.

use rand::SeedableRng;

use super::SimRng;
use super::arena::Arena;
use super::director::{Outcome, SpawnDirector};
use super::effects::Explosions;
use super::events::{EventSink, GameEvent};
use super::pickup::{LifePickup, LifePickupSpawner};
use super::player::{Hero, POWER_SKINS, Player};
use super::sprite::SpriteBook;
use crate::platform::{AssetProvider, Canvas};
use crate::tuning::Tuning;

/// Every image the simulation draws, besides the hero sheet
pub const SPRITE_KEYS: [&str; 10] = [
    "enemy_goblin",
    "enemy_reaper",
    "tucano",
    "squid_game",
    POWER_SKINS[0],
    POWER_SKINS[1],
    POWER_SKINS[2],
    "power_enemy",
    "explosion",
    "life",
];

#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: SimRng,
    pub arena: Arena,
    pub player: Player,
    pub director: SpawnDirector,
    pub pickups: Vec<LifePickup>,
    pub pickup_spawner: LifePickupSpawner,
    pub explosions: Explosions,
    pub lives: u32,
    pub max_lives: u32,
    /// Adversaries defeated, boss included
    pub score: u32,
    pub time_ticks: u64,
    pub paused: bool,
    pub outcome: Option<Outcome>,
    pub tuning: Tuning,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning, assets: &dyn AssetProvider) -> Self {
        if let Err(e) = tuning.validate() {
            log::warn!("{} - degenerate values fall back to safe behavior", e);
        }
        let hero: Hero = tuning.player.hero;
        let mut keys: Vec<&str> = SPRITE_KEYS.to_vec();
        keys.push(hero.sprite_key());
        let book = SpriteBook::load(assets, &keys);

        let arena = Arena::new(&tuning.arena);
        let player = Player::new(&tuning.player, hero, &arena, &book);
        let director = SpawnDirector::new(&tuning.spawn, &tuning.boss, book.clone());
        let pickup_spawner = LifePickupSpawner::new(&tuning.pickups, book.image("life"));
        let explosions = Explosions::new(&tuning.effects, book.image("explosion"));
        let lives = tuning.player.lives;

        log::info!("New game: seed {}, hero {:?}, {} lives", seed, hero, lives);

        Self {
            seed,
            rng: SimRng::seed_from_u64(seed),
            arena,
            player,
            director,
            pickups: Vec::new(),
            pickup_spawner,
            explosions,
            lives,
            max_lives: lives,
            score: 0,
            time_ticks: 0,
            paused: false,
            outcome: None,
            tuning,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Take a life; at zero the run is lost
    pub fn lose_life(&mut self, events: &mut dyn EventSink) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        log::info!("Life lost, {} remaining", self.lives);
        events.emit(GameEvent::LifeLost { lives: self.lives });
        if self.lives == 0 {
            self.director.resolve(Outcome::Defeat);
        }
    }

    /// Restore a life, or grow the pool when it is already full
    pub fn gain_life(&mut self, events: &mut dyn EventSink) {
        if self.lives >= self.max_lives {
            self.max_lives += 1;
        }
        self.lives += 1;
        events.emit(GameEvent::LifeGained {
            lives: self.lives,
            max_lives: self.max_lives,
        });
    }

    /// Draw the arena contents back to front; never mutates state
    pub fn render(&self, canvas: &mut dyn Canvas) {
        for pickup in &self.pickups {
            pickup.render(canvas);
        }
        self.director.render(canvas);
        self.player.render(canvas);
        self.explosions.render(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::AssetTable;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(42, Tuning::default(), &AssetTable::standard());
        assert_eq!(state.lives, 5);
        assert_eq!(state.max_lives, 5);
        assert_eq!(state.score, 0);
        assert!(state.director.spawning_active());
        assert!(!state.is_over());
    }

    #[test]
    fn test_gain_life_at_full_raises_max() {
        let mut state = GameState::new(1, Tuning::default(), &AssetTable::standard());
        let mut events: Vec<GameEvent> = Vec::new();
        state.gain_life(&mut events);
        assert_eq!((state.lives, state.max_lives), (6, 6));
        state.lose_life(&mut events);
        state.gain_life(&mut events);
        assert_eq!((state.lives, state.max_lives), (6, 6));
    }

    #[test]
    fn test_last_life_resolves_defeat() {
        let mut state = GameState::new(1, Tuning::default(), &AssetTable::standard());
        let mut events: Vec<GameEvent> = Vec::new();
        for _ in 0..5 {
            state.lose_life(&mut events);
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.director.outcome(), Some(Outcome::Defeat));
        state.lose_life(&mut events);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_missing_assets_still_builds() {
        let state = GameState::new(3, Tuning::default(), &AssetTable::new());
        assert!(!state.player.actor.sprite.image().is_loaded());
    }
}
