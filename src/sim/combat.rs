//! Collision and damage resolution
//!
//! Runs once per step, after every `update` and before the removal sweep.
//! Discrete AABB tests only; projectile speeds are kept small relative to hit
//! boxes so nothing tunnels at the fixed step.

use glam::Vec2;

use super::SimRng;
use super::adversary::{Adversary, AdversaryKind, StrikeEffect};
use super::events::{EventSink, GameEvent, HitSource};
use super::player::Player;
use super::projectile::{Expiry, ProjectileKind};

/// An adversary killed during this pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub id: u32,
    pub kind: AdversaryKind,
    /// Center of the adversary's sprite at the moment of death
    pub at: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatReport {
    pub kills: Vec<Kill>,
    /// Total damage the player took
    pub player_damage: u32,
    pub player_died: bool,
}

impl CombatReport {
    fn hurt_player(
        &mut self,
        player: &mut Player,
        damage: u32,
        source: HitSource,
        events: &mut dyn EventSink,
    ) {
        if !player.can_be_hit() {
            return;
        }
        let died = player.take_damage(damage);
        self.player_damage += damage;
        events.emit(GameEvent::PlayerHit { damage, source });
        if died {
            self.player_died = true;
            events.emit(GameEvent::PlayerDied);
        }
    }
}

pub fn resolve(
    player: &mut Player,
    adversaries: &mut [Adversary],
    rng: &mut SimRng,
    events: &mut dyn EventSink,
) -> CombatReport {
    let mut report = CombatReport::default();

    // Player projectiles: first overlapping adversary takes the hit
    for projectile in player.projectiles.iter_mut().filter(|p| p.is_active()) {
        let bounds = projectile.bounds();
        let Some(target) = adversaries
            .iter_mut()
            .find(|a| a.actor.is_targetable() && a.bounds().intersects(&bounds))
        else {
            continue;
        };
        projectile.expire(Expiry::Hit);
        let died = target.take_damage(projectile.damage);
        events.emit(GameEvent::AdversaryHit {
            id: target.id,
            damage: projectile.damage,
        });
        if died {
            report.kills.push(Kill {
                id: target.id,
                kind: target.kind,
                at: target.actor.bounds().center(),
            });
            events.emit(GameEvent::AdversaryDefeated {
                id: target.id,
                kind: target.kind,
            });
        }
    }

    // Boss projectiles against the player
    for adversary in adversaries.iter_mut() {
        let Some(brain) = adversary.boss_brain_mut() else {
            continue;
        };
        for projectile in brain.projectiles.iter_mut().filter(|p| p.is_active()) {
            if !player.can_be_hit() || !projectile.bounds().intersects(&player.bounds()) {
                continue;
            }
            projectile.expire(Expiry::Hit);
            let source = match projectile.kind {
                ProjectileKind::AerialBomb => HitSource::AerialBomb,
                _ => HitSource::BossShot,
            };
            report.hurt_player(player, projectile.damage, source, events);
        }
    }

    // Body contact triggers the adversary's attack policy
    for adversary in adversaries.iter_mut() {
        if !player.can_be_hit() {
            break;
        }
        let body = player.bounds();
        if adversary.is_boss() || !adversary.bounds().intersects(&body) {
            continue;
        }
        let Some(strike) = adversary.attack(&body, rng) else {
            continue;
        };
        match strike.effect {
            StrikeEffect::GasCloud => events.emit(GameEvent::GasCloudReleased { id: adversary.id }),
            StrikeEffect::Dash => events.emit(GameEvent::DashStarted { id: adversary.id }),
            StrikeEffect::Direct => {}
        }
        report.hurt_player(player, strike.damage, HitSource::Melee(adversary.kind), events);
    }

    // Lingering gas
    for adversary in adversaries.iter_mut() {
        if !player.can_be_hit() {
            break;
        }
        if let Some(damage) = adversary.gas_cloud_tick(&player.bounds()) {
            report.hurt_player(player, damage, HitSource::GasCloud, events);
        }
    }

    report
}
