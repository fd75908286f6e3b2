//! Event-driven sound cues
//!
//! Gameplay events are mapped to named sounds and handed to the host's
//! [`AudioSink`]. Decoding and mixing happen on the host side.

use std::collections::HashMap;

use crate::platform::{AssetProvider, SoundHandle};
use crate::sim::GameEvent;
use crate::tuning::AudioTuning;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Power object thrown
    Power,
    /// Projectile connects with an adversary
    Punch,
    /// Adversary defeated
    Kick,
    /// Player takes a hit
    Block,
    /// Special burst or boss attack
    Whoosh,
    /// Boss fight ambience (looped)
    Crowd,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Power,
        SoundCue::Punch,
        SoundCue::Kick,
        SoundCue::Block,
        SoundCue::Whoosh,
        SoundCue::Crowd,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SoundCue::Power => "power",
            SoundCue::Punch => "punch",
            SoundCue::Kick => "kick",
            SoundCue::Block => "block",
            SoundCue::Whoosh => "whoosh",
            SoundCue::Crowd => "crowd",
        }
    }

    /// One-shot cue for an event, if any
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::PowerFired => Some(SoundCue::Power),
            GameEvent::AdversaryHit { .. } => Some(SoundCue::Punch),
            GameEvent::AdversaryDefeated { .. } => Some(SoundCue::Kick),
            GameEvent::PlayerHit { .. } => Some(SoundCue::Block),
            GameEvent::SpecialUnleashed { .. }
            | GameEvent::BossFired
            | GameEvent::BombsReleased { .. } => Some(SoundCue::Whoosh),
            _ => None,
        }
    }
}

/// Playback interface provided by the host
pub trait AudioSink {
    fn play_sound(&mut self, sound: &SoundHandle, volume: f32);
    fn play_looping_sound(&mut self, sound: &SoundHandle, volume: f32);
    fn stop_looping_sound(&mut self);
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioDirector {
    sounds: HashMap<SoundCue, SoundHandle>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    looping: bool,
}

impl AudioDirector {
    /// Resolve every cue up front; missing sounds are skipped silently later
    pub fn new(tuning: &AudioTuning, assets: &dyn AssetProvider) -> Self {
        let mut sounds = HashMap::new();
        for cue in SoundCue::ALL {
            match assets.sound(cue.key()) {
                Some(handle) => {
                    sounds.insert(cue, handle);
                }
                None => log::warn!("Sound '{}' not found - cue disabled", cue.key()),
            }
        }
        Self {
            sounds,
            master_volume: tuning.master_volume.clamp(0.0, 1.0),
            sfx_volume: tuning.sfx_volume.clamp(0.0, 1.0),
            music_volume: tuning.music_volume.clamp(0.0, 1.0),
            muted: tuning.muted,
            looping: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a one-shot cue
    pub fn play(&self, cue: SoundCue, sink: &mut dyn AudioSink) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        if let Some(handle) = self.sounds.get(&cue) {
            sink.play_sound(handle, vol);
        }
    }

    /// Play cues for a frame's events and manage the boss-fight loop
    pub fn dispatch(&mut self, events: &[GameEvent], sink: &mut dyn AudioSink) {
        for event in events {
            if let Some(cue) = SoundCue::for_event(event) {
                self.play(cue, sink);
            }
            match event {
                GameEvent::BossSpawned => self.start_loop(sink),
                GameEvent::BossDefeated | GameEvent::GameOver { .. } => self.stop_loop(sink),
                _ => {}
            }
        }
    }

    fn start_loop(&mut self, sink: &mut dyn AudioSink) {
        if self.looping {
            return;
        }
        let vol = self.effective_volume(self.music_volume);
        if let Some(handle) = self.sounds.get(&SoundCue::Crowd) {
            sink.play_looping_sound(handle, vol);
            self.looping = true;
        }
    }

    fn stop_loop(&mut self, sink: &mut dyn AudioSink) {
        if self.looping {
            sink.stop_looping_sound();
            self.looping = false;
        }
    }
}

/// Sink that records what would have played (headless hosts, tests)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioLog {
    pub played: Vec<(String, f32)>,
    pub looping: Option<String>,
}

impl AudioSink for AudioLog {
    fn play_sound(&mut self, sound: &SoundHandle, volume: f32) {
        self.played.push((sound.key().to_string(), volume));
    }

    fn play_looping_sound(&mut self, sound: &SoundHandle, _volume: f32) {
        self.looping = Some(sound.key().to_string());
    }

    fn stop_looping_sound(&mut self) {
        self.looping = None;
    }
}
