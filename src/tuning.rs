//! Data-driven game balance
//!
//! Every gameplay number that is not a per-kind adversary trait lives here.
//! Sections are `#[serde(default)]`, so a JSON document only needs to name the
//! values it overrides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::{AdversaryKind, Hero};

/// Static description of a projectile type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Units per second
    pub speed: f32,
    /// Milliseconds
    pub lifetime: f32,
    pub damage: u32,
    pub width: f32,
    pub height: f32,
}

/// Spawn cadence for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Milliseconds between spawn attempts
    pub spawn_interval: f32,
    /// Concurrent adversaries allowed on screen
    pub max_enemies: usize,
}

/// Relative spawn weight of a kind, and the first level it may appear at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub kind: AdversaryKind,
    pub weight: f32,
    pub min_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    /// Unknown until the host sizes the viewport
    pub height: Option<f32>,
    /// Distance from the bottom edge to the ground line
    pub ground_margin: f32,
    /// How far past either side edge a horizontal body may travel
    pub offscreen_margin: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: None,
            ground_margin: 80.0,
            offscreen_margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub hero: Hero,
    pub columns: u32,
    pub rows: u32,
    pub frame_rate: f32,
    pub width: f32,
    pub height: f32,
    pub start_x: f32,
    pub max_health: u32,
    pub lives: u32,
    /// Units per second
    pub move_speed: f32,
    /// Initial upward speed of a jump, units per second
    pub jump_speed: f32,
    /// Units per second squared
    pub gravity: f32,
    pub fast_fall_multiplier: f32,
    /// Fraction of the standing height kept while crouching
    pub crouch_ratio: f32,
    /// Milliseconds between power shots
    pub attack_cooldown: f32,
    pub power: ProjectileSpec,
    /// Kills needed to charge the special power
    pub special_kills: u32,
    pub special_shots: u32,
    /// Milliseconds between shots of the special burst
    pub special_spacing: f32,
    pub special_cooldown: f32,
    /// Invulnerability after losing a life, milliseconds
    pub respawn_grace: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            hero: Hero::Btc,
            columns: 6,
            rows: 1,
            frame_rate: 8.0,
            width: 100.0,
            height: 150.0,
            start_x: 100.0,
            max_health: 100,
            lives: 5,
            move_speed: 300.0,
            jump_speed: 900.0,
            gravity: 2400.0,
            fast_fall_multiplier: 2.5,
            crouch_ratio: 0.6,
            attack_cooldown: 350.0,
            power: ProjectileSpec {
                speed: 500.0,
                lifetime: 3500.0,
                damage: 25,
                width: 35.0,
                height: 35.0,
            },
            special_kills: 5,
            special_shots: 8,
            special_spacing: 150.0,
            special_cooldown: 3000.0,
            respawn_grace: 1500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub kills_per_level: u32,
    /// Indexed by level - 1; levels past the end reuse the last entry
    pub levels: Vec<LevelConfig>,
    /// Floor for the spawn interval
    pub min_spawn_interval: f32,
    /// Ceiling for concurrent adversaries
    pub max_concurrent: usize,
    /// Health and speed bonus per level past the first
    pub level_multiplier_step: f32,
    pub weights: Vec<SpawnWeight>,
    /// Kills that end regular spawning and bring on the boss
    pub boss_threshold: u32,
    /// Banner time before the boss appears, milliseconds
    pub boss_message_duration: f32,
    /// Spawn distance past the right edge
    pub spawn_offset: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            kills_per_level: 10,
            levels: vec![
                LevelConfig {
                    spawn_interval: 2000.0,
                    max_enemies: 3,
                },
                LevelConfig {
                    spawn_interval: 1800.0,
                    max_enemies: 4,
                },
                LevelConfig {
                    spawn_interval: 1500.0,
                    max_enemies: 5,
                },
                LevelConfig {
                    spawn_interval: 1200.0,
                    max_enemies: 6,
                },
                LevelConfig {
                    spawn_interval: 1000.0,
                    max_enemies: 7,
                },
            ],
            min_spawn_interval: 800.0,
            max_concurrent: 8,
            level_multiplier_step: 0.2,
            weights: vec![
                SpawnWeight {
                    kind: AdversaryKind::GasGoblin,
                    weight: 0.4,
                    min_level: 1,
                },
                SpawnWeight {
                    kind: AdversaryKind::RugReaper,
                    weight: 0.3,
                    min_level: 1,
                },
                SpawnWeight {
                    kind: AdversaryKind::Tucano,
                    weight: 0.3,
                    min_level: 2,
                },
            ],
            boss_threshold: 30,
            boss_message_duration: 3000.0,
            spawn_offset: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub health: u32,
    /// Gap between the boss's right side and the arena's right edge
    pub right_inset: f32,
    /// Height of the glide base line above the ground
    pub base_height: f32,
    /// Maximum vertical offset from the base line
    pub glide_range: f32,
    /// Units per second
    pub glide_speed: f32,
    pub hold_min: f32,
    pub hold_max: f32,
    pub fire_cooldown_min: f32,
    pub fire_cooldown_max: f32,
    pub burst_chance: f64,
    pub burst_shots: u32,
    pub burst_cooldown: f32,
    pub shot: ProjectileSpec,
    /// Shot heights above the ground line
    pub shot_bands: Vec<f32>,
    /// Health ratio at or below which Phase 2 latches
    pub phase2_ratio: f32,
    pub bomb: ProjectileSpec,
    pub bomb_cooldown: f32,
    pub bomb_count: u32,
    pub bomb_stagger: f32,
    /// Maximum horizontal offset from the player's position
    pub bomb_spread: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            health: 600,
            right_inset: 40.0,
            base_height: 120.0,
            glide_range: 100.0,
            glide_speed: 80.0,
            hold_min: 2000.0,
            hold_max: 5000.0,
            fire_cooldown_min: 1200.0,
            fire_cooldown_max: 2200.0,
            burst_chance: 0.15,
            burst_shots: 2,
            burst_cooldown: 250.0,
            shot: ProjectileSpec {
                speed: 200.0,
                lifetime: 5000.0,
                damage: 25,
                width: 50.0,
                height: 50.0,
            },
            shot_bands: vec![70.0, 150.0, 230.0],
            phase2_ratio: 0.5,
            bomb: ProjectileSpec {
                speed: 300.0,
                lifetime: 6000.0,
                damage: 30,
                width: 40.0,
                height: 40.0,
            },
            bomb_cooldown: 4000.0,
            bomb_count: 2,
            bomb_stagger: 400.0,
            bomb_spread: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    /// Milliseconds between life pickup rolls
    pub check_interval: f32,
    pub chance: f64,
    pub max_active: usize,
    /// Leftward drift, units per second
    pub speed: f32,
    pub size: f32,
    pub float_amplitude: f32,
    /// Milliseconds per bob cycle
    pub float_period: f32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            check_interval: 8000.0,
            chance: 0.15,
            max_active: 1,
            speed: 120.0,
            size: 60.0,
            float_amplitude: 8.0,
            float_period: 1500.0,
        }
    }
}

/// Explosion played where an adversary falls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsTuning {
    /// Milliseconds on screen
    pub explosion_duration: f32,
    pub explosion_size: f32,
    pub explosion_frame_rate: f32,
}

impl Default for EffectsTuning {
    fn default() -> Self {
        Self {
            explosion_duration: 500.0,
            explosion_size: 80.0,
            explosion_frame_rate: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioTuning {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioTuning {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 0.8,
            music_volume: 0.5,
            muted: false,
        }
    }
}

/// Complete balance document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub spawn: SpawnTuning,
    pub boss: BossTuning,
    pub pickups: PickupTuning,
    pub effects: EffectsTuning,
    pub audio: AudioTuning,
}

/// Failure to load or validate a tuning document
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "Failed to parse tuning document: {}", err),
            TuningError::Invalid { field, reason } => {
                write!(f, "Invalid tuning value '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {}", value)))
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {}", value)))
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {}", value)))
    }
}

fn check_projectile(prefix: &'static str, spec: &ProjectileSpec) -> Result<(), TuningError> {
    check_positive(prefix, spec.speed)?;
    check_positive(prefix, spec.lifetime)?;
    check_positive(prefix, spec.width)?;
    check_positive(prefix, spec.height)
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning document");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let arena = &self.arena;
        check_positive("arena.width", arena.width)?;
        if let Some(height) = arena.height {
            check_positive("arena.height", height)?;
            if arena.ground_margin >= height {
                return Err(invalid("arena.ground_margin", "must be below the arena height"));
            }
        }
        if !arena.ground_margin.is_finite() || arena.ground_margin < 0.0 {
            return Err(invalid("arena.ground_margin", "must not be negative"));
        }

        let player = &self.player;
        if player.max_health == 0 {
            return Err(invalid("player.max_health", "must be at least 1"));
        }
        if player.lives == 0 {
            return Err(invalid("player.lives", "must be at least 1"));
        }
        if player.columns == 0 || player.rows == 0 {
            return Err(invalid("player.columns", "sprite grid must not be empty"));
        }
        check_positive("player.frame_rate", player.frame_rate)?;
        check_positive("player.width", player.width)?;
        check_positive("player.height", player.height)?;
        check_positive("player.gravity", player.gravity)?;
        check_projectile("player.power", &player.power)?;
        if !(player.crouch_ratio > 0.0 && player.crouch_ratio <= 1.0) {
            return Err(invalid("player.crouch_ratio", "must be within (0, 1]"));
        }
        if player.special_kills == 0 {
            return Err(invalid("player.special_kills", "must be at least 1"));
        }

        let spawn = &self.spawn;
        if spawn.kills_per_level == 0 {
            return Err(invalid("spawn.kills_per_level", "must be at least 1"));
        }
        if spawn.levels.is_empty() {
            return Err(invalid("spawn.levels", "at least one level is required"));
        }
        for pair in spawn.levels.windows(2) {
            if pair[1].spawn_interval > pair[0].spawn_interval
                || pair[1].max_enemies < pair[0].max_enemies
            {
                return Err(invalid(
                    "spawn.levels",
                    "intervals must not grow and enemy caps must not shrink",
                ));
            }
        }
        check_positive("spawn.min_spawn_interval", spawn.min_spawn_interval)?;
        if spawn.max_concurrent == 0 {
            return Err(invalid("spawn.max_concurrent", "must be at least 1"));
        }
        let total: f32 = spawn.weights.iter().map(|w| w.weight.max(0.0)).sum();
        if total <= 0.0 {
            return Err(invalid("spawn.weights", "total weight must be positive"));
        }
        if spawn.weights.iter().any(|w| w.kind.is_boss()) {
            return Err(invalid("spawn.weights", "the boss cannot be a regular spawn"));
        }
        if !spawn.weights.iter().any(|w| w.min_level <= 1 && w.weight > 0.0) {
            return Err(invalid("spawn.weights", "no kind can spawn at level 1"));
        }

        let boss = &self.boss;
        if boss.health == 0 {
            return Err(invalid("boss.health", "must be at least 1"));
        }
        if boss.fire_cooldown_min > boss.fire_cooldown_max {
            return Err(invalid("boss.fire_cooldown_min", "band is inverted"));
        }
        if boss.hold_min > boss.hold_max {
            return Err(invalid("boss.hold_min", "band is inverted"));
        }
        check_positive("boss.fire_cooldown_min", boss.fire_cooldown_min)?;
        check_non_negative("boss.hold_min", boss.hold_min)?;
        check_non_negative("boss.glide_range", boss.glide_range)?;
        check_positive("boss.glide_speed", boss.glide_speed)?;
        check_positive("boss.burst_cooldown", boss.burst_cooldown)?;
        check_non_negative("boss.bomb_stagger", boss.bomb_stagger)?;
        check_non_negative("boss.bomb_spread", boss.bomb_spread)?;
        check_positive("boss.bomb_cooldown", boss.bomb_cooldown)?;
        check_unit("boss.burst_chance", boss.burst_chance)?;
        check_unit("boss.phase2_ratio", f64::from(boss.phase2_ratio))?;
        check_projectile("boss.shot", &boss.shot)?;
        check_projectile("boss.bomb", &boss.bomb)?;
        if boss.shot_bands.is_empty() {
            return Err(invalid("boss.shot_bands", "at least one band is required"));
        }
        if boss.bomb_count == 0 {
            return Err(invalid("boss.bomb_count", "must be at least 1"));
        }

        let pickups = &self.pickups;
        check_positive("pickups.check_interval", pickups.check_interval)?;
        check_unit("pickups.chance", pickups.chance)?;

        let effects = &self.effects;
        check_positive("effects.explosion_duration", effects.explosion_duration)?;
        check_positive("effects.explosion_size", effects.explosion_size)?;
        check_positive("effects.explosion_frame_rate", effects.explosion_frame_rate)?;

        let audio = &self.audio;
        check_unit("audio.master_volume", f64::from(audio.master_volume))?;
        check_unit("audio.sfx_volume", f64::from(audio.sfx_volume))?;
        check_unit("audio.music_volume", f64::from(audio.music_volume))?;
        Ok(())
    }
}
