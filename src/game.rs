//! Scene-facing driver
//!
//! The host calls [`Game::update`] with wall-clock time and an input source,
//! then [`Game::render`] with a canvas. Simulation runs in fixed steps behind
//! an accumulator; rendering only reads state.

use crate::audio::{AudioDirector, AudioSink};
use crate::consts::SIM_DT;
use crate::hud::HudSnapshot;
use crate::platform::{AssetProvider, Canvas, InputSource};
use crate::sim::{FixedStep, GameEvent, GameState, Outcome, TickInput, tick};
use crate::tuning::Tuning;

/// Invoked once when the run ends
pub type OutcomeCallback = Box<dyn FnMut(Outcome)>;

pub struct Game {
    state: GameState,
    clock: FixedStep,
    /// Events produced by the most recent `update`
    events: Vec<GameEvent>,
    audio: AudioDirector,
    on_outcome: Option<OutcomeCallback>,
    outcome_reported: bool,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning, assets: &dyn AssetProvider) -> Self {
        let audio = AudioDirector::new(&tuning.audio, assets);
        Self {
            state: GameState::new(seed, tuning, assets),
            clock: FixedStep::new(),
            events: Vec::new(),
            audio,
            on_outcome: None,
            outcome_reported: false,
        }
    }

    /// Register the terminal-outcome callback (replaces any previous one)
    pub fn on_outcome(&mut self, callback: impl FnMut(Outcome) + 'static) {
        self.on_outcome = Some(Box::new(callback));
    }

    /// Viewport size in arena units
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.arena.resize(width, height);
        log::info!("Arena resized to {}x{}", width, height);
    }

    /// Run as many fixed steps as `elapsed` milliseconds allow.
    /// Input is polled once; one-shot actions apply to the first step only.
    pub fn update(&mut self, elapsed: f32, input: &mut dyn InputSource) -> u32 {
        self.events.clear();
        let steps = self.clock.advance(elapsed);
        if steps == 0 {
            return 0;
        }
        let polled = TickInput::poll(input);
        for step in 0..steps {
            let tick_input = if step == 0 {
                polled
            } else {
                polled.without_edges()
            };
            tick(&mut self.state, &tick_input, SIM_DT, &mut self.events);
        }
        self.report_outcome();
        steps
    }

    fn report_outcome(&mut self) {
        if self.outcome_reported {
            return;
        }
        let Some(outcome) = self.state.outcome else {
            return;
        };
        self.outcome_reported = true;
        if let Some(callback) = self.on_outcome.as_mut() {
            callback(outcome);
        }
    }

    /// Hand this frame's sound cues to the host
    pub fn play_audio(&mut self, sink: &mut dyn AudioSink) {
        self.audio.dispatch(&self.events, sink);
    }

    pub fn audio_mut(&mut self) -> &mut AudioDirector {
        &mut self.audio
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.state.render(canvas);
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}
