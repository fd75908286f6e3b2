//! Read-only snapshots for HUD widgets
//!
//! Widgets poll a [`HudSnapshot`] each frame; the core never draws text or
//! chrome itself.

use serde::{Deserialize, Serialize};

use crate::sim::{BossPhase, DirectorPhase, GameState, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialCharge {
    pub kills: u32,
    pub needed: u32,
    pub available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossStatus {
    pub health: u32,
    pub max_health: u32,
    pub phase: BossPhase,
}

/// Banner the HUD should show, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    BossIncoming,
    Paused,
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub special: SpecialCharge,
    pub boss: Option<BossStatus>,
    pub banner: Option<Banner>,
    pub paused: bool,
    pub outcome: Option<Outcome>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let charge = state.player.ultimate;
        let boss = state.director.boss().and_then(|boss| {
            boss.boss_brain().map(|brain| BossStatus {
                health: boss.actor.health,
                max_health: boss.actor.max_health,
                phase: brain.phase(),
            })
        });
        let banner = match (state.outcome, state.paused, state.director.phase()) {
            (Some(Outcome::Victory), _, _) => Some(Banner::Victory),
            (Some(Outcome::Defeat), _, _) => Some(Banner::Defeat),
            (None, true, _) => Some(Banner::Paused),
            (None, false, DirectorPhase::BossMessage { .. }) => Some(Banner::BossIncoming),
            _ => None,
        };
        Self {
            score: state.score,
            lives: state.lives,
            max_lives: state.max_lives,
            level: state.director.level(),
            health: state.player.actor.health,
            max_health: state.player.actor.max_health,
            special: SpecialCharge {
                kills: charge.kills,
                needed: charge.needed,
                available: charge.is_ready(),
            },
            boss,
            banner,
            paused: state.paused,
            outcome: state.outcome,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
