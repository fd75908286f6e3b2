//! Adversary spawning, difficulty progression and boss gating
//!
//! The director owns the adversary collection. Its progression lives in a
//! single [`DirectorPhase`]; every boss flag is derived from it, so regular
//! spawning and the boss fight can never overlap.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::adversary::{Adversary, AdversaryKind};
use super::arena::Arena;
use super::collision::Aabb;
use super::events::{EventSink, GameEvent};
use super::sprite::SpriteBook;
use crate::platform::Canvas;
use crate::tuning::{BossTuning, LevelConfig, SpawnTuning, SpawnWeight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DirectorPhase {
    Spawning,
    AwaitingClearForBoss,
    BossMessage { remaining: f32 },
    BossActive,
    Resolved(Outcome),
}

/// Level to spawn cadence mapping, clamped by a floor and a ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyTable {
    pub kills_per_level: u32,
    pub levels: Vec<LevelConfig>,
    pub min_spawn_interval: f32,
    pub max_concurrent: usize,
    pub multiplier_step: f32,
}

impl DifficultyTable {
    pub fn from_tuning(tuning: &SpawnTuning) -> Self {
        Self {
            kills_per_level: tuning.kills_per_level.max(1),
            levels: tuning.levels.clone(),
            min_spawn_interval: tuning.min_spawn_interval,
            max_concurrent: tuning.max_concurrent,
            multiplier_step: tuning.level_multiplier_step,
        }
    }

    pub fn level_for(&self, defeated: u32) -> u32 {
        defeated / self.kills_per_level + 1
    }

    pub fn config_for(&self, level: u32) -> LevelConfig {
        let index = (level.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        let base = self.levels.get(index).copied().unwrap_or(LevelConfig {
            spawn_interval: self.min_spawn_interval,
            max_enemies: 1,
        });
        LevelConfig {
            spawn_interval: base.spawn_interval.max(self.min_spawn_interval),
            max_enemies: base.max_enemies.min(self.max_concurrent),
        }
    }

    /// Health and speed scale for adversaries spawned at `level`
    pub fn multiplier(&self, level: u32) -> f32 {
        1.0 + level.saturating_sub(1) as f32 * self.multiplier_step
    }
}

#[derive(Debug, Clone)]
pub struct SpawnDirector {
    pub adversaries: Vec<Adversary>,
    phase: DirectorPhase,
    level: u32,
    spawn_interval: f32,
    max_enemies: usize,
    spawn_timer: f32,
    defeated: u32,
    escaped: u32,
    next_id: u32,
    table: DifficultyTable,
    weights: Vec<SpawnWeight>,
    boss_threshold: u32,
    boss_message_duration: f32,
    spawn_offset: f32,
    boss_tuning: BossTuning,
    book: SpriteBook,
}

impl SpawnDirector {
    pub fn new(spawn: &SpawnTuning, boss: &BossTuning, book: SpriteBook) -> Self {
        let table = DifficultyTable::from_tuning(spawn);
        let config = table.config_for(1);
        Self {
            adversaries: Vec::new(),
            phase: DirectorPhase::Spawning,
            level: 1,
            spawn_interval: config.spawn_interval,
            max_enemies: config.max_enemies,
            spawn_timer: 0.0,
            defeated: 0,
            escaped: 0,
            next_id: 1,
            table,
            weights: spawn.weights.clone(),
            boss_threshold: spawn.boss_threshold,
            boss_message_duration: spawn.boss_message_duration,
            spawn_offset: spawn.spawn_offset,
            boss_tuning: boss.clone(),
            book,
        }
    }

    pub fn phase(&self) -> DirectorPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn max_enemies(&self) -> usize {
        self.max_enemies
    }

    pub fn defeated(&self) -> u32 {
        self.defeated
    }

    pub fn escaped(&self) -> u32 {
        self.escaped
    }

    pub fn spawning_active(&self) -> bool {
        self.phase == DirectorPhase::Spawning
    }

    /// Kill threshold reached; waiting for the field to clear or the banner
    pub fn ready_for_boss(&self) -> bool {
        matches!(
            self.phase,
            DirectorPhase::AwaitingClearForBoss | DirectorPhase::BossMessage { .. }
        )
    }

    pub fn boss_spawned(&self) -> bool {
        self.phase == DirectorPhase::BossActive || self.boss_defeated()
    }

    pub fn boss_active(&self) -> bool {
        self.phase == DirectorPhase::BossActive
    }

    pub fn boss_defeated(&self) -> bool {
        self.phase == DirectorPhase::Resolved(Outcome::Victory)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            DirectorPhase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn boss(&self) -> Option<&Adversary> {
        self.adversaries.iter().find(|a| a.is_boss())
    }

    /// Adversaries that are alive and on the field
    pub fn live_count(&self) -> usize {
        self.adversaries
            .iter()
            .filter(|a| a.actor.is_targetable())
            .count()
    }

    pub fn update(
        &mut self,
        dt: f32,
        arena: &Arena,
        target: &Aabb,
        rng: &mut SimRng,
        events: &mut dyn EventSink,
    ) {
        match self.phase {
            DirectorPhase::Spawning => {
                self.spawn_timer += dt;
                if self.spawn_timer >= self.spawn_interval {
                    self.spawn_timer -= self.spawn_interval;
                    if self.live_count() < self.max_enemies {
                        if let Some(kind) = self.pick_kind(rng) {
                            self.spawn(kind, arena, events);
                        }
                    }
                }
            }
            DirectorPhase::AwaitingClearForBoss => {
                if self.adversaries.is_empty() {
                    log::info!("Field clear - boss incoming");
                    self.phase = DirectorPhase::BossMessage {
                        remaining: self.boss_message_duration,
                    };
                    events.emit(GameEvent::BossIncoming);
                }
            }
            DirectorPhase::BossMessage { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.spawn_boss(arena, rng, events);
                } else {
                    self.phase = DirectorPhase::BossMessage { remaining };
                }
            }
            DirectorPhase::BossActive | DirectorPhase::Resolved(_) => {}
        }

        for adversary in &mut self.adversaries {
            adversary.update(dt, arena, target, rng, events);
        }
    }

    fn pick_kind(&self, rng: &mut SimRng) -> Option<AdversaryKind> {
        let eligible: Vec<&SpawnWeight> = self
            .weights
            .iter()
            .filter(|w| w.min_level <= self.level && w.weight > 0.0 && !w.kind.is_boss())
            .collect();
        let total: f32 = eligible.iter().map(|w| w.weight).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = rng.random::<f32>() * total;
        for weight in &eligible {
            if roll < weight.weight {
                return Some(weight.kind);
            }
            roll -= weight.weight;
        }
        eligible.last().map(|w| w.kind)
    }

    fn spawn(&mut self, kind: AdversaryKind, arena: &Arena, events: &mut dyn EventSink) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let profile = kind.profile();
        let pos = Vec2::new(
            arena.width + self.spawn_offset,
            arena.ground_y() - profile.height,
        );
        let multiplier = self.table.multiplier(self.level);
        self.adversaries
            .push(Adversary::spawn(id, kind, pos, multiplier, &self.book));
        events.emit(GameEvent::AdversarySpawned { id, kind });
        id
    }

    fn spawn_boss(&mut self, arena: &Arena, rng: &mut SimRng, events: &mut dyn EventSink) {
        let id = self.next_id;
        self.next_id += 1;
        self.adversaries.push(Adversary::spawn_boss(
            id,
            arena,
            &self.boss_tuning,
            &self.book,
            rng,
        ));
        self.phase = DirectorPhase::BossActive;
        log::info!("Boss spawned with {} health", self.boss_tuning.health);
        events.emit(GameEvent::BossSpawned);
    }

    /// Spawn a regular adversary immediately, ignoring the timer and cap.
    /// Refused once the boss sequence has started.
    pub fn force_spawn(
        &mut self,
        kind: AdversaryKind,
        arena: &Arena,
        events: &mut dyn EventSink,
    ) -> Option<u32> {
        if kind.is_boss() || !self.spawning_active() {
            return None;
        }
        Some(self.spawn(kind, arena, events))
    }

    /// Count a kill and re-evaluate difficulty and boss gating
    pub fn record_kill(&mut self, kind: AdversaryKind, events: &mut dyn EventSink) {
        if kind.is_boss() {
            if self.phase == DirectorPhase::BossActive {
                self.phase = DirectorPhase::Resolved(Outcome::Victory);
                log::info!("Boss defeated");
                events.emit(GameEvent::BossDefeated);
            }
            return;
        }
        if self.outcome().is_some() {
            return;
        }

        self.defeated += 1;
        let level = self.table.level_for(self.defeated);
        if level > self.level {
            self.level = level;
            let config = self.table.config_for(level);
            self.spawn_interval = config.spawn_interval;
            self.max_enemies = config.max_enemies;
            log::info!(
                "Level {} - spawn every {}ms, up to {} enemies",
                level,
                config.spawn_interval,
                config.max_enemies
            );
            events.emit(GameEvent::LevelUp { level });
        }

        if self.phase == DirectorPhase::Spawning && self.defeated >= self.boss_threshold {
            log::info!("Boss threshold reached after {} kills", self.defeated);
            self.phase = DirectorPhase::AwaitingClearForBoss;
        }
    }

    /// Freeze progression with a final outcome
    pub fn resolve(&mut self, outcome: Outcome) {
        if self.outcome().is_none() {
            self.phase = DirectorPhase::Resolved(outcome);
        }
    }

    /// Drop finished adversaries and spent boss projectiles; returns escapes
    pub fn sweep(&mut self, events: &mut dyn EventSink) -> u32 {
        let mut escapes = 0;
        for adversary in self.adversaries.iter().filter(|a| a.escaped()) {
            escapes += 1;
            events.emit(GameEvent::AdversaryEscaped {
                id: adversary.id,
                kind: adversary.kind,
            });
        }
        self.escaped += escapes;
        for adversary in &mut self.adversaries {
            if let Some(brain) = adversary.boss_brain_mut() {
                brain.sweep();
            }
        }
        self.adversaries.retain(|a| !a.should_remove());
        escapes
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        for adversary in &self.adversaries {
            adversary.render(canvas);
        }
    }
}
