//! Structured gameplay events
//!
//! The simulation reports what happened through an [`EventSink`] instead of
//! logging or calling back into the host. Audio, HUD banners and tests all
//! consume the same stream.

use serde::{Deserialize, Serialize};

use super::adversary::AdversaryKind;
use super::boss::BossPhase;
use super::director::Outcome;

/// What damaged the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSource {
    Melee(AdversaryKind),
    GasCloud,
    BossShot,
    AerialBomb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PowerFired,
    SpecialReady,
    SpecialUnleashed { shots: u32 },
    AdversarySpawned { id: u32, kind: AdversaryKind },
    AdversaryHit { id: u32, damage: u32 },
    AdversaryDefeated { id: u32, kind: AdversaryKind },
    AdversaryEscaped { id: u32, kind: AdversaryKind },
    GasCloudReleased { id: u32 },
    DashStarted { id: u32 },
    PlayerHit { damage: u32, source: HitSource },
    PlayerDied,
    LifeLost { lives: u32 },
    LifeGained { lives: u32, max_lives: u32 },
    LifePickupSpawned,
    LevelUp { level: u32 },
    BossIncoming,
    BossSpawned,
    BossFired,
    BombsReleased { count: u32 },
    BossPhaseChanged { phase: BossPhase },
    BossDefeated,
    PauseToggled { paused: bool },
    GameOver { outcome: Outcome },
}

/// Receiver for simulation events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        log::debug!("{:?}", event);
        self.push(event);
    }
}
