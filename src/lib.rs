//! Crypto Heroes - a side-scrolling arena brawler
//!
//! Core modules:
//! - `sim`: Deterministic combat simulation (actors, projectiles, spawning, boss)
//! - `platform`: Host boundary contracts (input, assets, drawing)
//! - `audio`: Event-driven sound cues
//! - `hud`: Read-only snapshots polled by HUD widgets
//! - `tuning`: Data-driven game balance
//! - `game`: Scene-facing driver (fixed timestep accumulator, render pass)

pub mod audio;
pub mod game;
pub mod hud;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use hud::HudSnapshot;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (120 Hz)
    pub const SIM_DT: f32 = 1000.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 30;
    /// Longest wall-clock frame the loop will try to catch up on (ms)
    pub const MAX_FRAME_TIME: f32 = 250.0;

    /// Arena height used until the host reports a viewport
    pub const FALLBACK_ARENA_HEIGHT: f32 = 600.0;
}

/// Scale a per-second rate by a millisecond timestep
#[inline]
pub fn per_second(rate: f32, dt: f32) -> f32 {
    rate * dt / 1000.0
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_second() {
        assert!((per_second(500.0, 1000.0) - 500.0).abs() < 1e-4);
        assert!((per_second(120.0, consts::SIM_DT) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_approach_stops_at_target() {
        assert_eq!(approach(0.0, 10.0, 4.0), 4.0);
        assert_eq!(approach(8.0, 10.0, 4.0), 10.0);
        assert_eq!(approach(10.0, -10.0, 4.0), 6.0);
    }
}
