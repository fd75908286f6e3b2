//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use serde::{Deserialize, Serialize};

use super::combat;
use super::events::{EventSink, GameEvent};
use super::state::GameState;
use crate::platform::{InputSource, LogicalAction};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Crouch on the ground, fast-fall in the air
    pub down: bool,
    pub jump: bool,
    /// Throw a power object
    pub fire: bool,
    /// Unleash the special burst
    pub special: bool,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Sample the host's input once for this frame
    pub fn poll(input: &mut dyn InputSource) -> Self {
        Self {
            left: input.is_down(LogicalAction::Left),
            right: input.is_down(LogicalAction::Right),
            down: input.is_down(LogicalAction::Down),
            // Evaluate both so neither edge lingers into the next frame
            jump: input.was_pressed(LogicalAction::Jump) | input.was_pressed(LogicalAction::Up),
            fire: input.was_pressed(LogicalAction::Power),
            special: input.was_pressed(LogicalAction::SpecialPower),
            pause: input.was_pressed(LogicalAction::Escape),
        }
    }

    /// Same held state with the one-shot actions cleared
    pub fn without_edges(self) -> Self {
        Self {
            jump: false,
            fire: false,
            special: false,
            pause: false,
            ..self
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, events: &mut dyn EventSink) {
    if input.pause && !state.is_over() {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
        events.emit(GameEvent::PauseToggled {
            paused: state.paused,
        });
    }
    if state.paused || state.is_over() {
        return;
    }
    state.time_ticks += 1;
    let arena = state.arena;

    state
        .player
        .update(input, dt, &arena, &mut state.rng, events);
    let target = state.player.bounds();
    state
        .director
        .update(dt, &arena, &target, &mut state.rng, events);

    let report = combat::resolve(
        &mut state.player,
        &mut state.director.adversaries,
        &mut state.rng,
        events,
    );
    // Damage from this step counts toward the boss phase right away
    for adversary in &mut state.director.adversaries {
        adversary.latch_phase(events);
    }
    for kill in &report.kills {
        state.score += 1;
        state.explosions.spawn(kill.at);
        state.player.record_kill(events);
        state.director.record_kill(kill.kind, events);
    }
    if report.player_died {
        state.lose_life(events);
        if state.lives > 0 {
            state.player.respawn(&arena);
        }
    }

    // Life pickups
    if let Some(pickup) =
        state
            .pickup_spawner
            .update(dt, &arena, state.pickups.len(), &mut state.rng)
    {
        state.pickups.push(pickup);
        events.emit(GameEvent::LifePickupSpawned);
    }
    let mut collected = 0;
    for pickup in &mut state.pickups {
        pickup.update(dt);
        if pickup.active
            && state.player.actor.alive
            && pickup.bounds().intersects(&state.player.bounds())
        {
            pickup.active = false;
            collected += 1;
        }
    }
    for _ in 0..collected {
        state.gain_life(events);
    }

    state.explosions.update(dt);

    // Removal sweep
    let escapes = state.director.sweep(events);
    for _ in 0..escapes {
        state.lose_life(events);
    }
    state.player.sweep();
    state.pickups.retain(|p| p.active);
    state.explosions.sweep();

    if let Some(outcome) = state.director.outcome() {
        state.outcome = Some(outcome);
        log::info!(
            "Game over: {:?} with {} kills after {} ticks",
            outcome,
            state.score,
            state.time_ticks
        );
        events.emit(GameEvent::GameOver { outcome });
    }
}
