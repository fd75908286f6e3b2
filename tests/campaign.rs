//! End-to-end runs through the public `Game` API

use std::cell::RefCell;
use std::rc::Rc;

use crypto_heroes::audio::AudioLog;
use crypto_heroes::hud::Banner;
use crypto_heroes::platform::{
    ActionState, AssetTable, ImageHandle, LogicalAction, RecordingCanvas,
};
use crypto_heroes::sim::{AdversaryKind, GameEvent, Outcome, Projectile, ProjectileKind};
use crypto_heroes::tuning::ProjectileSpec;
use crypto_heroes::{Game, Tuning};
use glam::Vec2;

const FRAME: f32 = 1000.0 / 60.0;

fn new_game(seed: u64) -> Game {
    Game::new(seed, Tuning::default(), &AssetTable::standard())
}

/// Fire steadily while standing still; returns every event seen
fn play(game: &mut Game, frames: u32) -> Vec<GameEvent> {
    let mut input = ActionState::new();
    let mut seen = Vec::new();
    for frame in 0..frames {
        if frame % 20 == 0 {
            input.tap(LogicalAction::Power);
        }
        game.update(FRAME, &mut input);
        seen.extend_from_slice(game.events());
    }
    seen
}

#[test]
fn same_seed_replays_identically() {
    let mut a = new_game(2024);
    let mut b = new_game(2024);
    let events_a = play(&mut a, 1800);
    let events_b = play(&mut b, 1800);
    assert_eq!(events_a, events_b);
    assert_eq!(a.hud(), b.hud());
}

#[test]
fn adversaries_arrive_and_get_defeated() {
    let mut game = new_game(5);
    let events = play(&mut game, 3600);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::AdversarySpawned { .. }))
    );
    assert!(events.iter().any(|e| *e == GameEvent::PowerFired));
    let hud = game.hud();
    assert!(hud.score > 0);
    assert_eq!(hud.score, game.state().director.defeated());
}

#[test]
fn pause_stops_time_and_shows_banner() {
    let mut game = new_game(8);
    let mut input = ActionState::new();
    game.update(FRAME, &mut input);
    input.tap(LogicalAction::Escape);
    game.update(FRAME, &mut input);
    assert!(game.hud().paused);
    assert_eq!(game.hud().banner, Some(Banner::Paused));

    let ticks = game.state().time_ticks;
    for _ in 0..120 {
        game.update(FRAME, &mut input);
    }
    assert_eq!(game.state().time_ticks, ticks);

    input.tap(LogicalAction::Escape);
    game.update(FRAME, &mut input);
    assert!(!game.hud().paused);
    assert!(game.state().time_ticks > ticks);
}

#[test]
fn losing_every_life_reports_defeat_once() {
    let mut game = new_game(13);
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    game.on_outcome(move |o| sink.borrow_mut().push(o));

    let mut input = ActionState::new();
    // Let escapes drain the pool: the player never fires
    for _ in 0..60 * 60 * 10 {
        game.update(FRAME, &mut input);
        if game.is_over() {
            break;
        }
    }
    for _ in 0..30 {
        game.update(FRAME, &mut input);
    }
    assert!(game.is_over());
    assert_eq!(*outcomes.borrow(), vec![Outcome::Defeat]);
    let hud = game.hud();
    assert_eq!(hud.lives, 0);
    assert_eq!(hud.banner, Some(Banner::Defeat));
}

#[test]
fn boss_defeat_is_victory() {
    let mut game = new_game(21);
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outcomes);
    game.on_outcome(move |o| sink.borrow_mut().push(o));

    let mut scratch: Vec<GameEvent> = Vec::new();
    {
        let director = &mut game.state_mut().director;
        for _ in 0..30 {
            director.record_kill(AdversaryKind::GasGoblin, &mut scratch);
        }
        assert!(director.ready_for_boss());
        director.adversaries.clear();
    }

    let mut input = ActionState::new();
    let mut seen = Vec::new();
    for _ in 0..240 {
        game.update(FRAME, &mut input);
        seen.extend_from_slice(game.events());
        if game.state().director.boss_active() {
            break;
        }
    }
    assert!(seen.contains(&GameEvent::BossIncoming));
    assert!(seen.contains(&GameEvent::BossSpawned));
    assert!(game.hud().boss.is_some());

    {
        let state = game.state_mut();
        let boss = state
            .director
            .adversaries
            .iter_mut()
            .find(|a| a.is_boss())
            .expect("boss present");
        boss.actor.health = 1;
        let target = boss.bounds();
        let spec = ProjectileSpec {
            damage: 5,
            ..state.tuning.player.power
        };
        state.player.projectiles.push(Projectile::new(
            ProjectileKind::PlayerPower,
            &spec,
            target.center() - Vec2::new(spec.width, spec.height) * 0.5,
            Vec2::X,
            ImageHandle::pending("power_usd"),
        ));
    }
    let mut after = Vec::new();
    for _ in 0..5 {
        game.update(FRAME, &mut input);
        after.extend_from_slice(game.events());
    }
    assert_eq!(*outcomes.borrow(), vec![Outcome::Victory]);
    assert_eq!(game.hud().banner, Some(Banner::Victory));
    let defeated = after
        .iter()
        .filter(|e| **e == GameEvent::BossDefeated)
        .count();
    assert_eq!(defeated, 1);
}

#[test]
fn missing_assets_render_placeholders() {
    let mut game = Game::new(3, Tuning::default(), &AssetTable::new());
    let mut input = ActionState::new();
    for _ in 0..10 {
        game.update(FRAME, &mut input);
    }
    let mut canvas = RecordingCanvas::new();
    game.render(&mut canvas);
    assert!(!canvas.commands.is_empty());

    let mut audio = AudioLog::default();
    input.tap(LogicalAction::Power);
    game.update(FRAME, &mut input);
    game.play_audio(&mut audio);
    assert!(audio.played.is_empty());
}

#[test]
fn firing_plays_the_power_cue() {
    let mut game = new_game(4);
    let mut input = ActionState::new();
    let mut audio = AudioLog::default();
    input.tap(LogicalAction::Power);
    game.update(FRAME, &mut input);
    game.play_audio(&mut audio);
    assert!(audio.played.iter().any(|(key, _)| key == "power"));
}

#[test]
fn hud_snapshot_serializes() {
    let game = new_game(1);
    let json = game.hud().to_json().expect("hud serializes");
    assert!(json.contains("\"score\":0"));
    assert!(json.contains("\"level\":1"));
}
