//! Crypto Heroes entry point
//!
//! Natively this runs a headless session driven by a scripted auto-pilot,
//! which is handy for soak-testing balance changes. A browser host links the
//! library directly and supplies its own input, assets and canvas.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::Cell;
    use std::rc::Rc;

    use crypto_heroes::audio::AudioLog;
    use crypto_heroes::platform::{ActionState, AssetTable, LogicalAction, RecordingCanvas};
    use crypto_heroes::sim::Outcome;
    use crypto_heroes::{Game, Tuning};

    /// Roughly a 60 Hz display
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Give up after this much simulated time
    const MAX_FRAMES: u64 = 60 * 60 * 15;

    pub fn run() {
        let seed = std::env::args()
            .nth(1)
            .and_then(|arg| arg.parse::<u64>().ok())
            .unwrap_or(0xC0FFEE);
        let tuning = match std::env::var("CRYPTO_HEROES_TUNING") {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(text) => match Tuning::from_json(&text) {
                    Ok(tuning) => tuning,
                    Err(e) => {
                        log::error!("{} - using defaults", e);
                        Tuning::default()
                    }
                },
                Err(e) => {
                    log::error!("Failed to read tuning file {}: {} - using defaults", path, e);
                    Tuning::default()
                }
            },
            Err(_) => Tuning::default(),
        };

        let assets = AssetTable::standard();
        let mut game = Game::new(seed, tuning, &assets);
        game.resize(1200.0, 700.0);

        let outcome = Rc::new(Cell::new(None));
        let reported = Rc::clone(&outcome);
        game.on_outcome(move |o| reported.set(Some(o)));

        let mut input = ActionState::new();
        let mut audio = AudioLog::default();
        let mut canvas = RecordingCanvas::new();
        let mut frames = 0u64;

        while outcome.get().is_none() && frames < MAX_FRAMES {
            drive(&game, &mut input, frames);
            game.update(FRAME_MS, &mut input);
            game.play_audio(&mut audio);
            canvas.commands.clear();
            game.render(&mut canvas);
            frames += 1;

            if frames % 600 == 0 {
                let hud = game.hud();
                log::debug!(
                    "t={}s level {} score {} lives {}/{} health {}",
                    frames / 60,
                    hud.level,
                    hud.score,
                    hud.lives,
                    hud.max_lives,
                    hud.health
                );
            }
        }

        let hud = game.hud();
        match outcome.get() {
            Some(Outcome::Victory) => log::info!("Victory after {} frames", frames),
            Some(Outcome::Defeat) => log::info!("Defeat after {} frames", frames),
            None => log::warn!("Session timed out after {} frames", frames),
        }
        log::info!(
            "Final score {}, level {}, {} sounds played",
            hud.score,
            hud.level,
            audio.played.len()
        );
    }

    /// Hold position near the left edge and keep throwing
    fn drive(game: &Game, input: &mut ActionState, frame: u64) {
        let state = game.state();
        let x = state.player.actor.transform.pos.x;
        input.set(LogicalAction::Left, x > 160.0);
        input.set(LogicalAction::Right, x < 80.0);
        if frame % 20 == 0 {
            input.tap(LogicalAction::Power);
        }
        if frame % 90 == 45 {
            input.tap(LogicalAction::Jump);
        }
        if state.player.ultimate.is_ready() {
            input.tap(LogicalAction::SpecialPower);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Crypto Heroes starting (headless)...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `crypto_heroes::Game` directly
}
